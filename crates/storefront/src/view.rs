//! Display data derived from cart and menu state.
//!
//! Everything here is a pure mapping. Monetary figures are formatted as
//! whole rupees (`₹512`); this is the only place tax and total are rounded.

use serde::Serialize;

use tiffin_core::Price;

use crate::cart::{Cart, LineItem};
use crate::menu::{Menu, MenuItem};

/// Cart line display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartItemView {
    pub name: String,
    pub price: String,
    pub quantity: u32,
    pub line_price: String,
    /// Quantity the "−" control sets; zero removes the line.
    pub decrement_to: i64,
    /// Quantity the "+" control sets.
    pub increment_to: i64,
}

/// Cart display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub delivery_fee: String,
    pub tax: String,
    pub total: String,
    pub item_count: u64,
    pub is_empty: bool,
}

impl CartView {
    /// Text for the navigation badge. Empty when the cart is.
    #[must_use]
    pub fn badge(&self) -> String {
        if self.item_count == 0 {
            String::new()
        } else {
            self.item_count.to_string()
        }
    }
}

/// One line of the checkout summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckoutLine {
    /// `"<name> x <quantity>"`.
    pub label: String,
    pub line_price: String,
}

/// Order summary shown before confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckoutView {
    pub lines: Vec<CheckoutLine>,
    pub total: String,
}

/// Menu card display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuItemView {
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: String,
    pub icon: String,
}

// =============================================================================
// Type Conversions
// =============================================================================

fn rupees(units: u64) -> String {
    Price::from_units(units).display()
}

impl From<&LineItem> for CartItemView {
    fn from(item: &LineItem) -> Self {
        let quantity = i64::from(item.quantity);
        Self {
            name: item.name.clone(),
            price: rupees(item.unit_price),
            quantity: item.quantity,
            line_price: Price::from_decimal(item.line_total()).display(),
            decrement_to: quantity - 1,
            increment_to: quantity + 1,
        }
    }
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.items().iter().map(CartItemView::from).collect(),
            subtotal: Price::from_decimal(cart.subtotal()).display(),
            delivery_fee: Price::from_decimal(cart.delivery_fee()).display(),
            tax: Price::from_decimal(cart.tax()).display(),
            total: Price::from_decimal(cart.total()).display(),
            item_count: cart.item_count(),
            is_empty: cart.is_empty(),
        }
    }
}

impl From<&Cart> for CheckoutView {
    fn from(cart: &Cart) -> Self {
        Self {
            lines: cart
                .items()
                .iter()
                .map(|item| CheckoutLine {
                    label: format!("{} x {}", item.name, item.quantity),
                    line_price: Price::from_decimal(item.line_total()).display(),
                })
                .collect(),
            total: Price::from_decimal(cart.total()).display(),
        }
    }
}

impl From<&MenuItem> for MenuItemView {
    fn from(item: &MenuItem) -> Self {
        Self {
            name: item.name.clone(),
            description: item.description.clone(),
            category: item.category.clone(),
            price: rupees(item.price),
            icon: item.icon.clone(),
        }
    }
}

/// Cards for the items visible under the menu's current category.
#[must_use]
pub fn menu_cards(menu: &Menu) -> Vec<MenuItemView> {
    menu.visible().into_iter().map(MenuItemView::from).collect()
}
