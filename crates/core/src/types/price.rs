//! Type-safe price representation using decimal arithmetic.
//!
//! Amounts are kept exact; rounding to whole currency units happens only
//! when a price is displayed.

use core::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., rupees, not paise).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Create a price in the default currency from a whole number of units.
    #[must_use]
    pub fn from_units(units: u64) -> Self {
        Self::new(Decimal::from(units), CurrencyCode::default())
    }

    /// Create a price in the default currency from an exact decimal amount.
    #[must_use]
    pub fn from_decimal(amount: Decimal) -> Self {
        Self::new(amount, CurrencyCode::default())
    }

    /// The amount rounded to the nearest whole unit, halves away from zero.
    #[must_use]
    pub fn rounded(&self) -> Decimal {
        self.amount
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .normalize()
    }

    /// Format for display (e.g., "₹512").
    #[must_use]
    pub fn display(&self) -> String {
        format!("{}{}", self.currency_code.symbol(), self.rounded())
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    INR,
}

impl CurrencyCode {
    /// Display symbol for the currency.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::INR => "₹",
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn test_display_whole_units() {
        assert_eq!(Price::from_units(200).display(), "₹200");
        assert_eq!(Price::from_units(0).display(), "₹0");
    }

    #[test]
    fn test_display_rounds_half_away_from_zero() {
        // 30 * 0.05 = 1.5
        let tax = Price::from_decimal(Decimal::new(15, 1));
        assert_eq!(tax.display(), "₹2");

        let tax = Price::from_decimal(Decimal::new(1249, 2));
        assert_eq!(tax.display(), "₹12");
    }

    #[test]
    fn test_rounded_drops_trailing_scale() {
        let total = Price::from_decimal(Decimal::new(51200, 2));
        assert_eq!(total.rounded().to_string(), "512");
    }

    #[test]
    fn test_default_currency_is_rupee() {
        assert_eq!(CurrencyCode::default(), CurrencyCode::INR);
        assert_eq!(Price::from_units(5).currency_code.symbol(), "₹");
    }
}
