//! Domain models persisted by form submissions.

pub mod review;
pub mod user;

pub use review::Review;
pub use user::{CurrentUser, UserAddress};
