//! Tiffin storefront library.
//!
//! Cart, menu, validation and form handling for the food-ordering site,
//! persisted through a pluggable key-value [`storage`] backend. State is
//! turned into display data by the pure mappings in [`view`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod config;
pub mod error;
pub mod forms;
pub mod menu;
pub mod models;
pub mod notify;
pub mod order;
pub mod storage;
pub mod timer;
pub mod validation;
pub mod view;

pub use cart::{Cart, CartError, CartSettings, LineItem, Pricing, Product};
pub use config::{ConfigError, StorefrontConfig};
pub use error::{Error, Result};
pub use forms::{FormError, FormHandler, FormSettings, Page, Submission, form_ids};
pub use menu::{CategoryFilter, Menu, MenuError, MenuItem, MenuItemUpdate, MenuStats, SearchBox};
pub use notify::{Notice, Notifier, RecordingNotifier, SharedNotifier, TracingNotifier};
pub use order::{Order, OrderHistory};
pub use storage::{FileStore, KeyValueStore, MemoryStore, Storage, StoreError, keys};
pub use validation::{Field, Form, InputKind, ValidationErrors, Validator};
pub use view::{CartItemView, CartView, CheckoutView, MenuItemView};
