//! Customer reviews.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A review left through the review form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub name: String,
    /// Star rating; `None` when the submitted value was not a number.
    pub rating: Option<u8>,
    pub text: String,
    /// Calendar day the review was posted (`YYYY-MM-DD`).
    pub date: NaiveDate,
}
