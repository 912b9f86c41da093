//! Monetary values in integer micro-units.
//!
//! The CRM stores currency amounts as micro-units (1,000,000 micros = 1 whole
//! unit) alongside an ISO currency code. All arithmetic stays in micros;
//! conversion to whole units happens only at display time.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of micro-units in one whole currency unit.
pub const MICROS_PER_UNIT: i64 = 1_000_000;

/// A currency amount in integer micro-units.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Money {
    /// Amount in micro-units
    pub amount_micros: i64,

    /// ISO 4217 currency code (e.g., "USD")
    pub currency_code: String,
}

impl Money {
    /// Create a money value directly from micro-units.
    pub fn from_micros(amount_micros: i64, currency_code: impl Into<String>) -> Self {
        Self {
            amount_micros,
            currency_code: currency_code.into(),
        }
    }

    /// Convert a whole-units value supplied by a caller into micros.
    ///
    /// Rounds once at the boundary; everything downstream is integer math.
    pub fn from_units(value: f64, currency_code: impl Into<String>) -> Self {
        Self {
            amount_micros: (value * MICROS_PER_UNIT as f64).round() as i64,
            currency_code: currency_code.into(),
        }
    }

    /// The whole-units value, for display only.
    pub fn units(&self) -> f64 {
        self.amount_micros as f64 / MICROS_PER_UNIT as f64
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} {}", self.units(), self.currency_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_two_decimal_values() {
        // Values with at most 2 decimal digits survive the micros round trip
        for value in [0.0, 0.01, 1.5, 19.99, 123.45, 50_000.0, 9_999_999.99] {
            let money = Money::from_units(value, "USD");
            assert_eq!(money.units(), value, "round trip failed for {}", value);
        }
    }

    #[test]
    fn test_micro_sum_has_no_drift() {
        // Summing micros equals the micro-sum of individually converted values
        let values = vec![0.1_f64; 1000];
        let micro_sum: i64 = values
            .iter()
            .map(|v| Money::from_units(*v, "USD").amount_micros)
            .sum();
        assert_eq!(micro_sum, 100 * MICROS_PER_UNIT);
    }

    #[test]
    fn test_from_units_rounds_half_up() {
        let money = Money::from_units(0.0000005, "USD");
        assert_eq!(money.amount_micros, 1);
    }

    #[test]
    fn test_display_formatting() {
        let money = Money::from_micros(50_000_000, "USD");
        assert_eq!(money.to_string(), "50.00 USD");

        let money = Money::from_micros(12_340_000, "EUR");
        assert_eq!(money.to_string(), "12.34 EUR");
    }

    #[test]
    fn test_deserialization() {
        let json = r#"{"amount_micros":75000000,"currency_code":"USD"}"#;
        let money: Money = serde_json::from_str(json).unwrap();
        assert_eq!(money.amount_micros, 75_000_000);
        assert_eq!(money.currency_code, "USD");
    }
}
