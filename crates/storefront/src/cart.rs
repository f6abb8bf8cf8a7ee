//! Shopping cart backed by local storage.
//!
//! The cart is an ordered list of line items, unique by name. Every mutation
//! is written through to the [`Storage`] under [`keys::CART`] before the
//! method returns, so a reloaded cart always matches the last displayed one.
//!
//! Money is computed with exact decimals. Tax and total are *not* rounded
//! here; rounding to whole rupees happens in [`crate::view`] only.

use std::time::Duration;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;

use tiffin_core::OrderStatus;

use crate::notify::{Notice, SharedNotifier};
use crate::order::{Order, OrderHistory};
use crate::storage::{Storage, keys};
use crate::view::CheckoutView;

/// How long the order confirmation notice stays visible.
const ORDER_CONFIRMED_NOTICE: Duration = Duration::from_secs(5);

/// Errors returned by cart operations.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CartError {
    /// The operation needs at least one line item.
    #[error("cart is empty")]
    Empty,
}

/// One distinct product in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Product name; unique within a cart.
    pub name: String,
    /// Unit price in whole rupees.
    #[serde(rename = "price")]
    pub unit_price: u64,
    /// Always at least 1 while the item is in the cart.
    pub quantity: u32,
}

impl LineItem {
    /// `unit_price × quantity`, saturating at [`Decimal::MAX`].
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        Decimal::from(self.unit_price).saturating_mul(Decimal::from(self.quantity))
    }
}

/// A product being added to the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub name: String,
    pub price: u64,
}

impl Product {
    #[must_use]
    pub fn new(name: impl Into<String>, price: u64) -> Self {
        Self {
            name: name.into(),
            price,
        }
    }
}

/// Fixed charges applied on top of the subtotal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pricing {
    /// Flat fee added to every order.
    pub delivery_fee: Decimal,
    /// Fraction of the subtotal charged as tax.
    pub tax_rate: Decimal,
}

impl Default for Pricing {
    fn default() -> Self {
        Self {
            delivery_fee: Decimal::from(50),
            tax_rate: Decimal::new(5, 2),
        }
    }
}

impl Pricing {
    /// Unrounded tax on `subtotal`.
    #[must_use]
    pub fn tax_on(&self, subtotal: Decimal) -> Decimal {
        subtotal.saturating_mul(self.tax_rate)
    }

    /// Unrounded total for `subtotal`. Saturates at [`Decimal::MAX`].
    #[must_use]
    pub fn total_for(&self, subtotal: Decimal) -> Decimal {
        subtotal
            .saturating_add(self.delivery_fee)
            .saturating_add(self.tax_on(subtotal))
    }
}

/// Construction-time settings for a [`Cart`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartSettings {
    pub pricing: Pricing,
    /// Simulated processing time before a confirmed order is committed.
    pub confirm_latency: Duration,
}

impl Default for CartSettings {
    fn default() -> Self {
        Self {
            pricing: Pricing::default(),
            confirm_latency: Duration::from_secs(2),
        }
    }
}

/// The shopping cart.
pub struct Cart {
    items: Vec<LineItem>,
    settings: CartSettings,
    storage: Storage,
    orders: OrderHistory,
    notifier: SharedNotifier,
}

impl std::fmt::Debug for Cart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cart")
            .field("items", &self.items)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl Cart {
    /// Load the cart persisted in `storage`, or start empty.
    ///
    /// Persisted entries with a zero quantity are dropped.
    #[must_use]
    pub fn load(storage: Storage, notifier: SharedNotifier, settings: CartSettings) -> Self {
        let mut items: Vec<LineItem> = storage.get_or_default(keys::CART);
        let before = items.len();
        items.retain(|item| item.quantity > 0);
        if items.len() != before {
            tracing::warn!(
                dropped = before - items.len(),
                "Dropped persisted cart items with zero quantity"
            );
        }
        tracing::debug!(items = items.len(), "Cart loaded");

        Self {
            items,
            settings,
            orders: OrderHistory::new(storage.clone()),
            storage,
            notifier,
        }
    }

    /// Line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// The line item named `name`, if present.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&LineItem> {
        self.items.iter().find(|item| item.name == name)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub const fn settings(&self) -> &CartSettings {
        &self.settings
    }

    /// The order history this cart appends to on confirmation.
    #[must_use]
    pub const fn orders(&self) -> &OrderHistory {
        &self.orders
    }

    /// Add one unit of `product`.
    ///
    /// An existing line with the same name gains one in quantity; otherwise a
    /// new line with quantity 1 is appended.
    #[instrument(skip(self), fields(name = %product.name))]
    pub fn add_item(&mut self, product: &Product) {
        if let Some(existing) = self.items.iter_mut().find(|item| item.name == product.name) {
            existing.quantity = existing.quantity.saturating_add(1);
        } else {
            self.items.push(LineItem {
                name: product.name.clone(),
                unit_price: product.price,
                quantity: 1,
            });
        }

        self.save();
        self.notifier
            .notify(Notice::success(format!("{} added to cart!", product.name)));
    }

    /// Remove the line named `name`. Absent names are not an error.
    #[instrument(skip(self))]
    pub fn remove_item(&mut self, name: &str) {
        self.items.retain(|item| item.name != name);
        self.save();
        self.notifier.notify(Notice::info("Item removed from cart"));
    }

    /// Set the quantity of the line named `name`.
    ///
    /// A quantity of zero or less removes the line. Unknown names are ignored.
    #[instrument(skip(self))]
    pub fn update_quantity(&mut self, name: &str, quantity: i64) {
        let Some(item) = self.items.iter_mut().find(|item| item.name == name) else {
            return;
        };

        if quantity <= 0 {
            self.remove_item(name);
            return;
        }

        item.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        self.save();
    }

    /// Empty the cart.
    #[instrument(skip(self))]
    pub fn clear(&mut self) {
        self.items.clear();
        self.save();
        self.notifier.notify(Notice::info("Cart cleared"));
    }

    /// `Σ unit_price × quantity`, saturating at [`Decimal::MAX`].
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.items
            .iter()
            .map(LineItem::line_total)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    /// Unrounded tax on the subtotal.
    #[must_use]
    pub fn tax(&self) -> Decimal {
        self.settings.pricing.tax_on(self.subtotal())
    }

    #[must_use]
    pub const fn delivery_fee(&self) -> Decimal {
        self.settings.pricing.delivery_fee
    }

    /// Unrounded `subtotal + delivery fee + tax`.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.settings.pricing.total_for(self.subtotal())
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items
            .iter()
            .map(|item| u64::from(item.quantity))
            .fold(0, u64::saturating_add)
    }

    /// Prepare the order summary shown before confirmation.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Empty` (after a warning notice) if there is
    /// nothing to order.
    pub fn checkout(&self) -> Result<CheckoutView, CartError> {
        if self.is_empty() {
            self.notifier.notify(Notice::warning("Your cart is empty!"));
            return Err(CartError::Empty);
        }

        Ok(CheckoutView::from(self))
    }

    /// Wait out the simulated processing time, then confirm the order.
    ///
    /// The wait is not cancellable; once started the order is always
    /// committed.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Empty` if the cart has no items.
    pub async fn confirm_order(&mut self) -> Result<Order, CartError> {
        if self.is_empty() {
            return Err(CartError::Empty);
        }

        tokio::time::sleep(self.settings.confirm_latency).await;
        self.confirm_order_at(Utc::now())
    }

    /// Snapshot the cart into the order history and empty it.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Empty` if the cart has no items.
    #[instrument(skip(self))]
    pub fn confirm_order_at(&mut self, now: DateTime<Utc>) -> Result<Order, CartError> {
        if self.is_empty() {
            return Err(CartError::Empty);
        }

        let order = Order {
            id: self.orders.next_id(now),
            items: self.items.clone(),
            total: self.total(),
            created_at: now,
            status: OrderStatus::Confirmed,
        };

        if !self.orders.append(order.clone()) {
            tracing::warn!(order_id = %order.id, "Order history could not be persisted");
        }

        self.items.clear();
        self.save();

        tracing::info!(order_id = %order.id, total = %order.total, "Order confirmed");
        self.notifier.notify(
            Notice::success("Order confirmed! Thank you for your purchase.")
                .with_duration(ORDER_CONFIRMED_NOTICE),
        );

        Ok(order)
    }

    fn save(&self) {
        if !self.storage.set(keys::CART, &self.items) {
            tracing::warn!("Cart could not be persisted");
        }
        tracing::debug!(count = self.item_count(), "Cart count updated");
    }
}
