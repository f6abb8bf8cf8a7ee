//! Delayed and debounced callbacks on the tokio runtime.
//!
//! Both helpers must be used from within a tokio runtime. The menu search
//! box is built on [`Debouncer`].

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;

/// A callback scheduled to run once after a fixed wait.
#[derive(Debug)]
pub struct Delay {
    handle: JoinHandle<()>,
}

impl Delay {
    /// Run `callback` after `wait`.
    pub fn spawn<F>(wait: Duration, callback: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(wait).await;
            callback();
        });
        Self { handle }
    }

    /// Cancel the callback if it has not run yet.
    pub fn cancel(&self) {
        self.handle.abort();
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

/// Runs a callback only once calls have stopped arriving for `wait`.
///
/// Each [`call`](Self::call) replaces any pending invocation, so only the
/// argument of the last call in a burst is delivered.
pub struct Debouncer<T> {
    wait: Duration,
    callback: Arc<dyn Fn(T) + Send + Sync>,
    pending: Mutex<Option<Delay>>,
}

impl<T> std::fmt::Debug for Debouncer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Debouncer")
            .field("wait", &self.wait)
            .finish_non_exhaustive()
    }
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new<F>(wait: Duration, callback: F) -> Self
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        Self {
            wait,
            callback: Arc::new(callback),
            pending: Mutex::new(None),
        }
    }

    /// Schedule the callback with `arg`, cancelling any pending one.
    pub fn call(&self, arg: T) {
        let callback = Arc::clone(&self.callback);
        let next = Delay::spawn(self.wait, move || callback(arg));

        match self.pending.lock() {
            Ok(mut pending) => {
                if let Some(previous) = pending.replace(next) {
                    previous.cancel();
                }
            }
            Err(_) => {
                tracing::warn!("Debouncer state poisoned, dropping call");
                next.cancel();
            }
        }
    }

    /// Drop the pending invocation, if any.
    pub fn cancel(&self) {
        if let Ok(mut pending) = self.pending.lock()
            && let Some(previous) = pending.take()
        {
            previous.cancel();
        }
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Ok(mut pending) = self.pending.lock()
            && let Some(previous) = pending.take()
        {
            previous.cancel();
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_delay_runs_after_wait() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        let delay = Delay::spawn(Duration::from_millis(100), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(60)).await;
        tokio::task::yield_now().await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert!(delay.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_cancel() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        let delay = Delay::spawn(Duration::from_millis(100), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        delay.cancel();
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_debouncer_delivers_last_call() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let debouncer = Debouncer::new(Duration::from_millis(300), move |query: String| {
            sink.lock().unwrap().push(query);
        });

        for query in ["p", "pi", "piz"] {
            debouncer.call(query.to_string());
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        tokio::time::sleep(Duration::from_millis(400)).await;

        assert_eq!(*seen.lock().unwrap(), ["piz"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_debouncer_cancel() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        let debouncer = Debouncer::new(Duration::from_millis(300), move |(): ()| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        debouncer.call(());
        debouncer.cancel();
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }
}
