//! Local key-value persistence.
//!
//! # Layout
//!
//! Every value is stored as a JSON document under a string key:
//!
//! - `cart` - array of line items
//! - `orders` - array of order snapshots
//! - `currentUser` - the logged-in user
//! - `userAddress` - the saved delivery address
//! - `reviews` - array of reviews, newest first
//! - `subscribers` - array of newsletter e-mail addresses
//!
//! # Failure handling
//!
//! [`Storage`] never propagates backend or decoding failures. Reads fall back
//! to the caller's default and writes report `false`; the underlying error is
//! logged at `error` level.

mod file;
mod memory;

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Keys under which application state is persisted.
pub mod keys {
    /// Key for the cart line items.
    pub const CART: &str = "cart";

    /// Key for the order history.
    pub const ORDERS: &str = "orders";

    /// Key for the logged-in user.
    pub const CURRENT_USER: &str = "currentUser";

    /// Key for the saved delivery address.
    pub const USER_ADDRESS: &str = "userAddress";

    /// Key for submitted reviews.
    pub const REVIEWS: &str = "reviews";

    /// Key for newsletter subscribers.
    pub const SUBSCRIBERS: &str = "subscribers";
}

/// Errors raised by a [`KeyValueStore`] backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Writing the value would exceed the store's capacity.
    #[error("storage quota exceeded: {needed} bytes needed, {available} available")]
    QuotaExceeded {
        /// Bytes the store would hold after the write.
        needed: usize,
        /// Configured capacity in bytes.
        available: usize,
    },

    /// The key cannot be represented by this backend.
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),

    /// Filesystem operation failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The store's lock was poisoned by a panicking writer.
    #[error("storage lock poisoned")]
    Poisoned,
}

/// A string-keyed store of string values.
///
/// This is the raw backend; use [`Storage`] for typed JSON access.
pub trait KeyValueStore: Send + Sync {
    /// Read the raw value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the value cannot be written.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete `key`. Deleting an absent key succeeds.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend cannot be modified.
    fn remove_item(&self, key: &str) -> Result<(), StoreError>;
}

/// Typed JSON access over a shared [`KeyValueStore`].
///
/// Cheap to clone; clones share the same backend.
#[derive(Clone)]
pub struct Storage {
    backend: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage").finish_non_exhaustive()
    }
}

impl Storage {
    /// Wrap a backend.
    #[must_use]
    pub fn new(backend: impl KeyValueStore + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// Wrap an already shared backend.
    #[must_use]
    pub fn from_shared(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// A storage over a fresh, empty [`MemoryStore`].
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }

    /// Read and decode the value under `key`.
    ///
    /// Returns `default` when the key is absent, the backend fails, or the
    /// stored text is not a valid encoding of `T`.
    pub fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        let raw = match self.backend.get_item(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return default,
            Err(e) => {
                tracing::error!(key, error = %e, "Error reading from storage");
                return default;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!(key, error = %e, "Error decoding stored value");
                default
            }
        }
    }

    /// Like [`Storage::get`] with `T::default()` as the fallback.
    pub fn get_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        self.get(key, T::default())
    }

    /// Encode `value` and store it under `key`.
    ///
    /// Returns `false` if encoding or writing failed.
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> bool {
        let encoded = match serde_json::to_string(value) {
            Ok(encoded) => encoded,
            Err(e) => {
                tracing::error!(key, error = %e, "Error encoding value for storage");
                return false;
            }
        };

        match self.backend.set_item(key, &encoded) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(key, error = %e, "Error writing to storage");
                false
            }
        }
    }

    /// Delete `key`. Returns `false` if the backend failed.
    pub fn remove(&self, key: &str) -> bool {
        match self.backend.remove_item(key) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(key, error = %e, "Error removing from storage");
                false
            }
        }
    }
}
