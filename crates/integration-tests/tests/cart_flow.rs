//! End-to-end cart, menu and order flows against the file store.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use tiffin_core::{OrderStatus, Price};
use tiffin_integration_tests::TestContext;
use tiffin_storefront::{
    Cart, CartError, CartSettings, CartView, CategoryFilter, MemoryStore, Menu, Product,
    RecordingNotifier, Storage, keys,
};

// ============================================================================
// Persistence
// ============================================================================

#[test]
fn test_cart_survives_reload() {
    let ctx = TestContext::new();
    let menu = Menu::default_catalog().unwrap();

    {
        let mut cart = ctx.cart();
        menu.add_to_cart("Margherita Pizza", &mut cart).unwrap();
        menu.add_to_cart("Margherita Pizza", &mut cart).unwrap();
        menu.add_to_cart("Coke", &mut cart).unwrap();
    }

    let cart = ctx.cart();
    assert_eq!(cart.items().len(), 2);
    assert_eq!(cart.get("Margherita Pizza").unwrap().quantity, 2);
    assert_eq!(cart.item_count(), 3);
    assert!(ctx.dir().join("cart.json").exists());
}

#[test]
fn test_persisted_layout_is_plain_json() {
    let ctx = TestContext::new();
    let mut cart = ctx.cart();
    cart.add_item(&Product::new("Pizza", 200));

    let raw = std::fs::read_to_string(ctx.dir().join("cart.json")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(
        json,
        serde_json::json!([{ "name": "Pizza", "price": 200, "quantity": 1 }])
    );
}

#[test]
fn test_hand_edited_zero_quantity_is_dropped() {
    let ctx = TestContext::new();
    std::fs::write(
        ctx.dir().join("cart.json"),
        r#"[{"name":"Pizza","price":200,"quantity":0},{"name":"Coke","price":40,"quantity":1}]"#,
    )
    .unwrap();

    let cart = ctx.cart();
    assert_eq!(cart.items().len(), 1);
    assert_eq!(cart.items()[0].name, "Coke");
}

#[test]
fn test_corrupt_cart_file_starts_empty() {
    let ctx = TestContext::new();
    std::fs::write(ctx.dir().join("cart.json"), "not json").unwrap();

    let cart = ctx.cart();
    assert!(cart.is_empty());
}

#[test]
fn test_quota_exceeded_keeps_in_memory_state() {
    let storage = Storage::new(MemoryStore::with_quota(16));
    let mut cart = Cart::load(
        storage.clone(),
        Arc::new(RecordingNotifier::new()),
        CartSettings::default(),
    );

    cart.add_item(&Product::new("Paneer Tikka Pizza", 280));

    assert_eq!(cart.items().len(), 1);
    let persisted: Vec<serde_json::Value> = storage.get_or_default(keys::CART);
    assert!(persisted.is_empty());
}

// ============================================================================
// Totals
// ============================================================================

#[test]
fn test_worked_example_totals() {
    let ctx = TestContext::new();
    let mut cart = ctx.cart();
    let pizza = Product::new("Pizza", 200);
    cart.add_item(&pizza);
    cart.add_item(&pizza);
    cart.add_item(&Product::new("Coke", 40));

    let view = CartView::from(&cart);
    assert_eq!(view.subtotal, "₹440");
    assert_eq!(view.tax, "₹22");
    assert_eq!(view.delivery_fee, "₹50");
    assert_eq!(view.total, "₹512");
}

#[test]
fn test_quantity_controls() {
    let ctx = TestContext::new();
    let mut cart = ctx.cart();
    cart.add_item(&Product::new("Masala Chai", 30));

    let line = CartView::from(&cart).items[0].clone();
    cart.update_quantity(&line.name, line.increment_to);
    assert_eq!(cart.get("Masala Chai").unwrap().quantity, 2);

    cart.update_quantity("Masala Chai", 0);
    assert!(cart.is_empty());
    assert!(ctx.cart().is_empty());
}

// ============================================================================
// Checkout & Orders
// ============================================================================

#[test]
fn test_checkout_then_confirm() {
    let ctx = TestContext::new();
    let mut menu = Menu::default_catalog().unwrap();
    let mut cart = ctx.cart();

    let pizzas: Vec<String> = menu
        .filter(CategoryFilter::Only("pizza".to_string()))
        .iter()
        .map(|item| item.name.clone())
        .collect();
    for name in &pizzas {
        menu.add_to_cart(name, &mut cart).unwrap();
    }

    let summary = cart.checkout().unwrap();
    assert_eq!(summary.lines.len(), pizzas.len());
    let expected_total = Price::from_decimal(cart.total()).display();
    assert_eq!(summary.total, expected_total);

    let items_before = cart.items().to_vec();
    let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
    let order = cart.confirm_order_at(now).unwrap();

    assert!(cart.is_empty());
    assert!(ctx.cart().is_empty());
    assert_eq!(order.items, items_before);
    assert_eq!(order.status, OrderStatus::Confirmed);

    let history = ctx.cart().orders().all();
    assert_eq!(history, vec![order]);
    assert_eq!(
        ctx.messages().last().map(String::as_str),
        Some("Order confirmed! Thank you for your purchase.")
    );
}

#[test]
fn test_orders_accumulate_with_unique_ids() {
    let ctx = TestContext::new();
    let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();

    for _ in 0..3 {
        let mut cart = ctx.cart();
        cart.add_item(&Product::new("Veg Burger", 120));
        cart.confirm_order_at(now).unwrap();
    }

    let ids: Vec<i64> = ctx
        .cart()
        .orders()
        .all()
        .iter()
        .map(|order| order.id.as_i64())
        .collect();
    let first = now.timestamp_millis();
    assert_eq!(ids, [first, first + 1, first + 2]);
}

#[test]
fn test_empty_cart_cannot_be_ordered() {
    let ctx = TestContext::new();
    let mut cart = ctx.cart();

    assert_eq!(cart.checkout().unwrap_err(), CartError::Empty);
    assert_eq!(cart.confirm_order_at(Utc::now()).unwrap_err(), CartError::Empty);
    assert!(cart.orders().all().is_empty());
    assert_eq!(ctx.messages(), ["Your cart is empty!"]);
}

#[tokio::test(start_paused = true)]
async fn test_confirm_order_with_latency() {
    let ctx = TestContext::new();
    let mut cart = ctx.cart();
    cart.add_item(&Product::new("Gulab Jamun", 80));

    let started = tokio::time::Instant::now();
    let order = cart.confirm_order().await.unwrap();

    assert!(started.elapsed() >= std::time::Duration::from_secs(2));
    assert_eq!(ctx.cart().orders().all(), vec![order]);
}
