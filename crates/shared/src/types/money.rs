//! Money type with decimal precision and currency.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! This type wraps `rust_decimal::Decimal` for arbitrary precision.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Represents a monetary amount with currency.
///
/// Uses `Decimal` internally to avoid floating-point precision errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// The monetary amount.
    pub amount: Decimal,
    /// ISO 4217 currency code (e.g., "UGX", "USD").
    pub currency: Currency,
}

/// ISO 4217 currency codes supported by the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Ugandan Shilling
    Ugx,
    /// US Dollar
    Usd,
    /// Euro
    Eur,
    /// Kenyan Shilling
    Kes,
}

impl Money {
    /// Creates a new Money instance.
    #[must_use]
    pub const fn new(amount: Decimal, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Creates a zero amount in the specified currency.
    #[must_use]
    pub fn zero(currency: Currency) -> Self {
        Self {
            amount: Decimal::ZERO,
            currency,
        }
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Returns true if the amount is negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.amount.is_sign_negative()
    }

    /// Formats the amount for display with a currency prefix and
    /// thousands separators, e.g. `UGX 1,250,000.00`.
    #[must_use]
    pub fn format(&self) -> String {
        format!("{} {}", self.currency, format_amount(self.amount))
    }
}

/// Formats a decimal amount with thousands separators and two decimal
/// places. Negative amounts keep a leading minus sign.
#[must_use]
pub fn format_amount(amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    let raw = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = raw.split_once('.').unwrap_or((raw.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    let digits: Vec<char> = int_part.chars().collect();
    for (i, ch) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i).is_multiple_of(3) {
            grouped.push(',');
        }
        grouped.push(*ch);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}{grouped}.{frac_part}")
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ugx => write!(f, "UGX"),
            Self::Usd => write!(f, "USD"),
            Self::Eur => write!(f, "EUR"),
            Self::Kes => write!(f, "KES"),
        }
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "UGX" => Ok(Self::Ugx),
            "USD" => Ok(Self::Usd),
            "EUR" => Ok(Self::Eur),
            "KES" => Ok(Self::Kes),
            _ => Err(format!("Unknown currency: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::str::FromStr;

    #[test]
    fn test_money_new() {
        let amount = dec!(100.00);
        let money = Money::new(amount, Currency::Ugx);
        assert_eq!(money.amount, amount);
        assert_eq!(money.currency, Currency::Ugx);
    }

    #[test]
    fn test_money_zero() {
        let money = Money::zero(Currency::Ugx);
        assert!(money.is_zero());
        assert_eq!(money.amount, Decimal::ZERO);
    }

    #[test]
    fn test_money_is_negative() {
        assert!(!Money::new(dec!(10), Currency::Ugx).is_negative());
        assert!(Money::new(dec!(-10), Currency::Ugx).is_negative());
        assert!(!Money::new(dec!(0), Currency::Ugx).is_negative());
    }

    #[rstest::rstest]
    #[case::millions(dec!(1250000), "1,250,000.00")]
    #[case::thousands(dec!(1000), "1,000.00")]
    #[case::hundreds(dec!(999), "999.00")]
    #[case::zero(dec!(0), "0.00")]
    #[case::cents(dec!(1234.5), "1,234.50")]
    #[case::negative(dec!(-45000.25), "-45,000.25")]
    fn test_format_amount(#[case] amount: Decimal, #[case] expected: &str) {
        assert_eq!(format_amount(amount), expected);
    }

    #[test]
    fn test_money_format_prefixes_currency() {
        let money = Money::new(dec!(1500000), Currency::Ugx);
        assert_eq!(money.format(), "UGX 1,500,000.00");
    }

    #[test]
    fn test_currency_from_str() {
        assert_eq!(Currency::from_str("ugx").unwrap(), Currency::Ugx);
        assert_eq!(Currency::from_str("USD").unwrap(), Currency::Usd);
        assert!(Currency::from_str("XXX").is_err());
    }
}
