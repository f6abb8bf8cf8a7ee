//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `TIFFIN_DATA_DIR` - Directory for the file-backed store (default: .tiffin)
//! - `TIFFIN_DELIVERY_FEE` - Flat delivery fee in rupees (default: 50)
//! - `TIFFIN_TAX_RATE` - Tax rate as a fraction (default: 0.05)
//! - `TIFFIN_ORDER_LATENCY_MS` - Simulated order processing delay (default: 2000)
//! - `TIFFIN_FORM_LATENCY_MS` - Simulated login/address save delay (default: 1500)

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::cart::{CartSettings, Pricing};
use crate::forms::FormSettings;

const DEFAULT_DATA_DIR: &str = ".tiffin";
const DEFAULT_DELIVERY_FEE: &str = "50";
const DEFAULT_TAX_RATE: &str = "0.05";
const DEFAULT_ORDER_LATENCY_MS: &str = "2000";
const DEFAULT_FORM_LATENCY_MS: &str = "1500";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorefrontConfig {
    /// Directory holding persisted state
    pub data_dir: PathBuf,
    /// Delivery fee and tax rate
    pub pricing: Pricing,
    /// Delay before a confirmed order is committed
    pub order_latency: Duration,
    /// Delay before login and address submissions are committed
    pub form_latency: Duration,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            pricing: Pricing::default(),
            order_latency: CartSettings::default().confirm_latency,
            form_latency: FormSettings::default().submit_latency,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let data_dir = PathBuf::from(get("TIFFIN_DATA_DIR", DEFAULT_DATA_DIR));
        let delivery_fee: Decimal = parse_var(
            "TIFFIN_DELIVERY_FEE",
            &get("TIFFIN_DELIVERY_FEE", DEFAULT_DELIVERY_FEE),
        )?;
        let tax_rate: Decimal =
            parse_var("TIFFIN_TAX_RATE", &get("TIFFIN_TAX_RATE", DEFAULT_TAX_RATE))?;
        let order_latency_ms: u64 = parse_var(
            "TIFFIN_ORDER_LATENCY_MS",
            &get("TIFFIN_ORDER_LATENCY_MS", DEFAULT_ORDER_LATENCY_MS),
        )?;
        let form_latency_ms: u64 = parse_var(
            "TIFFIN_FORM_LATENCY_MS",
            &get("TIFFIN_FORM_LATENCY_MS", DEFAULT_FORM_LATENCY_MS),
        )?;

        if delivery_fee.is_sign_negative() {
            return Err(ConfigError::InvalidEnvVar(
                "TIFFIN_DELIVERY_FEE".to_string(),
                "must not be negative".to_string(),
            ));
        }
        if tax_rate.is_sign_negative() || tax_rate > Decimal::ONE {
            return Err(ConfigError::InvalidEnvVar(
                "TIFFIN_TAX_RATE".to_string(),
                "must be between 0 and 1".to_string(),
            ));
        }

        Ok(Self {
            data_dir,
            pricing: Pricing {
                delivery_fee,
                tax_rate,
            },
            order_latency: Duration::from_millis(order_latency_ms),
            form_latency: Duration::from_millis(form_latency_ms),
        })
    }

    /// Settings for [`crate::cart::Cart`].
    #[must_use]
    pub const fn cart_settings(&self) -> CartSettings {
        CartSettings {
            pricing: self.pricing,
            confirm_latency: self.order_latency,
        }
    }

    /// Settings for [`crate::forms::FormHandler`].
    #[must_use]
    pub const fn form_settings(&self) -> FormSettings {
        FormSettings {
            submit_latency: self.form_latency,
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse a variable's value, naming the variable in the error.
fn parse_var<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}
