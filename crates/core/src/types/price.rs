//! Type-safe price representation using decimal arithmetic.
//!
//! Prices are stored as [`Decimal`] so that summing line totals never drifts
//! the way binary floats do (`0.1 + 0.2`). On the wire they are plain JSON
//! numbers, matching the hosted `products` table and the persisted cart blob.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, Mul};
use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// Errors that can occur when parsing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input is not a decimal number.
    #[error("invalid price: {0}")]
    Invalid(String),
    /// Prices cannot be negative.
    #[error("price cannot be negative")]
    Negative,
}

/// A non-negative amount in the store currency (USD).
///
/// Deserializing rejects negative amounts. Arithmetic saturates at the
/// largest representable amount instead of overflowing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct Price(#[serde(serialize_with = "rust_decimal::serde::float::serialize")] Decimal);

impl Price {
    /// A price of zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] for amounts below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }
        Ok(Self(amount))
    }

    /// Create a price from an amount in cents.
    ///
    /// ```
    /// # use zoco_core::Price;
    /// assert_eq!(Price::from_cents(2999).to_string(), "$29.99");
    /// ```
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// Parse a price from user input such as `"29.99"` or `"$29.99"`.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not a decimal number or is negative.
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        let trimmed = s.trim().trim_start_matches('$');
        let amount =
            Decimal::from_str(trimmed).map_err(|_| PriceError::Invalid(s.to_string()))?;
        Self::new(amount)
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Whether this price is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0.round_dp(2))
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = rust_decimal::serde::float::deserialize(deserializer)?;
        Self::new(amount).map_err(serde::de::Error::custom)
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Mul<u32> for Price {
    type Output = Self;

    fn mul(self, quantity: u32) -> Self::Output {
        Self(self.0.saturating_mul(Decimal::from(quantity)))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_two_decimals() {
        assert_eq!(Price::from_cents(4500).to_string(), "$45.00");
        assert_eq!(Price::parse("59.999").unwrap().to_string(), "$60.00");
    }

    #[test]
    fn test_parse_accepts_dollar_sign() {
        assert_eq!(Price::parse("$29.99").unwrap(), Price::from_cents(2999));
        assert_eq!(" 12 ".parse::<Price>().unwrap(), Price::from_cents(1200));
    }

    #[test]
    fn test_parse_rejects_garbage_and_negative() {
        assert!(matches!(Price::parse("abc"), Err(PriceError::Invalid(_))));
        assert_eq!(Price::parse("-1"), Err(PriceError::Negative));
    }

    #[test]
    fn test_arithmetic_is_exact() {
        let total: Price = [Price::from_cents(10), Price::from_cents(20)]
            .into_iter()
            .sum();
        assert_eq!(total, Price::from_cents(30));
        assert_eq!(Price::from_cents(2999) * 3, Price::from_cents(8997));
    }

    #[test]
    fn test_arithmetic_saturates() {
        let huge = Price::new(Decimal::MAX).unwrap();
        assert_eq!((huge * 10).amount(), Decimal::MAX);
        assert_eq!((huge + Price::from_cents(1)).amount(), Decimal::MAX);

        let total: Price = [huge, huge, huge].into_iter().sum();
        assert_eq!(total.amount(), Decimal::MAX);
    }

    #[test]
    fn test_deserialize_rejects_negative() {
        let err = serde_json::from_str::<Price>("-5").unwrap_err();
        assert!(err.to_string().contains("negative"));
        assert!(serde_json::from_str::<Price>("0").unwrap().is_zero());
        assert_eq!(
            Price::try_from(Decimal::new(-1, 2)),
            Err(PriceError::Negative)
        );
    }

    #[test]
    fn test_serializes_as_json_number() {
        let json = serde_json::to_string(&Price::from_cents(2999)).unwrap();
        assert_eq!(json, "29.99");

        let parsed: Price = serde_json::from_str("89.99").unwrap();
        assert_eq!(parsed, Price::from_cents(8999));
    }
}
