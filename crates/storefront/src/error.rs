//! Crate-level error type.
//!
//! Each module defines its own error enum; [`Error`] gathers them so callers
//! that drive several modules can use a single `Result`.

use thiserror::Error;

use crate::cart::CartError;
use crate::config::ConfigError;
use crate::forms::FormError;
use crate::menu::MenuError;
use crate::storage::StoreError;

/// Any error raised by the storefront library.
#[derive(Debug, Error)]
pub enum Error {
    /// Storage backend failed.
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// Cart operation refused.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Menu lookup or edit failed.
    #[error("Menu error: {0}")]
    Menu(#[from] MenuError),

    /// Form submission rejected.
    #[error("Form error: {0}")]
    Form(#[from] FormError),

    /// Configuration could not be read.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for storefront operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wraps_module_errors() {
        let err: Error = CartError::Empty.into();
        assert!(matches!(err, Error::Cart(CartError::Empty)));
        assert!(err.to_string().starts_with("Cart error: "));

        let err: Error = FormError::MissingField("city").into();
        assert_eq!(err.to_string(), "Form error: missing form field: city");
    }
}
