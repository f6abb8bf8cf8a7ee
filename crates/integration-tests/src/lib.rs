//! Integration tests for Tiffin.
//!
//! The tests drive the storefront library end to end against a real
//! [`FileStore`] in a throwaway directory, the same backend the CLI uses.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p tiffin-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tiffin_storefront::{
    Cart, CartSettings, FileStore, FormHandler, FormSettings, RecordingNotifier, Storage,
    Validator,
};

/// A file-backed store in a fresh temporary directory, removed on drop.
pub struct TestContext {
    dir: PathBuf,
    pub storage: Storage,
    pub notifier: Arc<RecordingNotifier>,
}

impl TestContext {
    /// Create a context with an empty data directory.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        let dir = std::env::temp_dir().join(format!("tiffin-it-{}", uuid::Uuid::new_v4()));
        let store = FileStore::open(dir.clone()).expect("Failed to create test data directory");
        Self {
            dir,
            storage: Storage::new(store),
            notifier: Arc::new(RecordingNotifier::new()),
        }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Load the cart as a fresh process would.
    #[must_use]
    pub fn cart(&self) -> Cart {
        Cart::load(
            self.storage.clone(),
            self.notifier.clone(),
            CartSettings::default(),
        )
    }

    #[must_use]
    pub fn forms(&self) -> FormHandler {
        FormHandler::new(
            Validator::new(),
            self.storage.clone(),
            self.notifier.clone(),
            FormSettings::default(),
        )
    }

    /// Messages of every notice raised so far.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.notifier
            .notices()
            .into_iter()
            .map(|notice| notice.message)
            .collect()
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.dir);
    }
}
