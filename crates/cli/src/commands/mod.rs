//! Command implementations.
//!
//! Every command works against a [`Context`] opened from the environment.
//! Results are reported through `tracing` at `info` level.

pub mod account;
pub mod cart;
pub mod menu;

use std::sync::Arc;

use tiffin_storefront::{
    Cart, FileStore, FormHandler, SharedNotifier, Storage, StoreError, StorefrontConfig,
    TracingNotifier, Validator,
};

/// Storage and settings shared by all commands.
pub struct Context {
    config: StorefrontConfig,
    storage: Storage,
    notifier: SharedNotifier,
}

impl Context {
    /// Open the file store under the configured data directory.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the data directory cannot be created.
    pub fn open(config: StorefrontConfig) -> Result<Self, StoreError> {
        let store = FileStore::open(config.data_dir.clone())?;

        Ok(Self {
            config,
            storage: Storage::new(store),
            notifier: Arc::new(TracingNotifier),
        })
    }

    pub fn cart(&self) -> Cart {
        Cart::load(
            self.storage.clone(),
            Arc::clone(&self.notifier),
            self.config.cart_settings(),
        )
    }

    pub fn forms(&self) -> FormHandler {
        FormHandler::new(
            Validator::new(),
            self.storage.clone(),
            Arc::clone(&self.notifier),
            self.config.form_settings(),
        )
    }
}
