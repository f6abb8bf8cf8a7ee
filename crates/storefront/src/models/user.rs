//! User domain types.
//!
//! Field names follow the persisted JSON layout (`camelCase`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The user recorded by the login form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    /// Customer's display name.
    pub name: String,
    /// 10-digit mobile number.
    pub phone: String,
    /// When the login form was submitted.
    pub login_time: DateTime<Utc>,
}

/// The delivery address recorded by the address form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAddress {
    pub house_flat_no: String,
    pub street_name: String,
    pub city: String,
    pub state: String,
    /// 6-digit postal code.
    pub pincode: String,
    /// When the address was saved.
    pub saved_time: DateTime<Utc>,
}
