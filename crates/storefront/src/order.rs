//! Order snapshots and the persisted order history.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use tiffin_core::{OrderId, OrderStatus};

use crate::cart::LineItem;
use crate::storage::{Storage, keys};

/// An immutable snapshot of a confirmed cart.
///
/// `total` is stored unrounded, exactly as computed from the items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub items: Vec<LineItem>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    #[serde(rename = "date")]
    pub created_at: DateTime<Utc>,
    pub status: OrderStatus,
}

/// Append-only list of orders stored under [`keys::ORDERS`].
#[derive(Debug, Clone)]
pub struct OrderHistory {
    storage: Storage,
}

impl OrderHistory {
    #[must_use]
    pub const fn new(storage: Storage) -> Self {
        Self { storage }
    }

    /// Every stored order, oldest first.
    #[must_use]
    pub fn all(&self) -> Vec<Order> {
        self.storage.get_or_default(keys::ORDERS)
    }

    /// Append `order`. Returns `false` if the history could not be written.
    pub fn append(&self, order: Order) -> bool {
        let mut orders = self.all();
        orders.push(order);
        self.storage.set(keys::ORDERS, &orders)
    }

    /// ID for an order created at `now`.
    ///
    /// IDs are the creation time in milliseconds, bumped past the newest
    /// stored ID when two orders land in the same millisecond.
    #[must_use]
    pub fn next_id(&self, now: DateTime<Utc>) -> OrderId {
        let candidate = OrderId::from_timestamp(now);
        match self.all().iter().map(|order| order.id).max() {
            Some(latest) if latest >= candidate => OrderId::new(latest.as_i64() + 1),
            _ => candidate,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn order(id: i64, total: Decimal) -> Order {
        Order {
            id: OrderId::new(id),
            items: vec![LineItem {
                name: "Pizza".to_string(),
                unit_price: 200,
                quantity: 2,
            }],
            total,
            created_at: Utc.timestamp_millis_opt(id).unwrap(),
            status: OrderStatus::Confirmed,
        }
    }

    #[test]
    fn test_append_keeps_order() {
        let history = OrderHistory::new(Storage::in_memory());
        assert!(history.all().is_empty());

        assert!(history.append(order(1, Decimal::from(470))));
        assert!(history.append(order(2, Decimal::from(470))));

        let ids: Vec<_> = history.all().iter().map(|o| o.id.as_i64()).collect();
        assert_eq!(ids, [1, 2]);
    }

    #[test]
    fn test_next_id_uses_timestamp() {
        let history = OrderHistory::new(Storage::in_memory());
        let now = Utc.timestamp_millis_opt(1_000).unwrap();
        assert_eq!(history.next_id(now), OrderId::new(1_000));
    }

    #[test]
    fn test_next_id_never_repeats() {
        let history = OrderHistory::new(Storage::in_memory());
        history.append(order(1_000, Decimal::from(470)));
        let now = Utc.timestamp_millis_opt(1_000).unwrap();
        assert_eq!(history.next_id(now), OrderId::new(1_001));
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_value(order(5, Decimal::new(815, 1))).unwrap();
        assert_eq!(json["id"], 5);
        assert_eq!(json["total"], 81.5);
        assert_eq!(json["status"], "confirmed");
        assert_eq!(json["items"][0]["price"], 200);
        assert!(json["date"].as_str().unwrap().starts_with("1970-01-01T00:00:00.005"));
    }
}
