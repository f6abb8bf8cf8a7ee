//! Cart, checkout and order history commands.

use tracing::info;

use tiffin_core::Price;
use tiffin_storefront::{CartError, CartView, CheckoutView, Menu, MenuError};

use super::Context;

/// Log the cart contents and totals.
pub fn show(ctx: &Context) {
    let view = CartView::from(&ctx.cart());

    if view.is_empty {
        info!("Your cart is empty");
        return;
    }

    for item in &view.items {
        info!(
            quantity = item.quantity,
            "{} {} x {} = {}",
            item.name,
            item.price,
            item.quantity,
            item.line_price
        );
    }
    info!(
        subtotal = %view.subtotal,
        delivery_fee = %view.delivery_fee,
        tax = %view.tax,
        items = view.item_count,
        "Total {}",
        view.total
    );
}

/// Add one unit of the menu item `name`.
///
/// # Errors
///
/// Returns `MenuError::UnknownItem` if the menu has no such item.
pub fn add(ctx: &Context, name: &str) -> Result<(), MenuError> {
    let menu = Menu::default_catalog()?;
    let mut cart = ctx.cart();
    menu.add_to_cart(name, &mut cart)?;
    info!(badge = %CartView::from(&cart).badge(), "Cart updated");
    Ok(())
}

pub fn remove(ctx: &Context, name: &str) {
    ctx.cart().remove_item(name);
}

pub fn set(ctx: &Context, name: &str, quantity: i64) {
    let mut cart = ctx.cart();
    if cart.get(name).is_none() {
        info!(name, "Item is not in the cart");
        return;
    }
    cart.update_quantity(name, quantity);
    show(ctx);
}

pub fn clear(ctx: &Context) {
    ctx.cart().clear();
}

/// Log the order summary.
///
/// # Errors
///
/// Returns `CartError::Empty` if the cart has no items.
pub fn checkout(ctx: &Context) -> Result<(), CartError> {
    let summary: CheckoutView = ctx.cart().checkout()?;

    for line in &summary.lines {
        info!("{} {}", line.label, line.line_price);
    }
    info!("Total {}", summary.total);
    Ok(())
}

/// Confirm the order after the processing delay.
///
/// # Errors
///
/// Returns `CartError::Empty` if the cart has no items.
pub async fn confirm(ctx: &Context) -> Result<(), CartError> {
    let mut cart = ctx.cart();
    info!("Processing order...");
    let order = cart.confirm_order().await?;
    info!(
        order_id = %order.id,
        total = %Price::from_decimal(order.total),
        "Order placed"
    );
    Ok(())
}

/// Log every stored order, oldest first.
pub fn orders(ctx: &Context) {
    let orders = ctx.cart().orders().all();

    if orders.is_empty() {
        info!("No orders yet");
        return;
    }

    for order in &orders {
        let units: u64 = order.items.iter().map(|item| u64::from(item.quantity)).sum();
        info!(
            order_id = %order.id,
            date = %order.created_at.format("%Y-%m-%d %H:%M"),
            items = units,
            status = ?order.status,
            "Total {}",
            Price::from_decimal(order.total)
        );
    }
}
