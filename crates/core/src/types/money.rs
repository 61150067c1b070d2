//! Monetary amounts backed by decimal arithmetic.
//!
//! Prices and order totals are `NUMERIC(10, 2)` in Postgres and must never
//! pass through floating point. [`Price`] normalizes every value to exactly
//! two decimal places so that equality checks (for example verifying a
//! client-declared checkout total) are exact string-level comparisons.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input string is not a valid decimal number.
    #[error("invalid decimal amount")]
    Invalid,
    /// The amount is negative.
    #[error("amount cannot be negative")]
    Negative,
}

/// A non-negative monetary amount with exactly two decimal places.
///
/// Serializes as a decimal string (`"19.99"`) and deserializes from either a
/// string or a bare JSON number, matching what storefront clients send.
/// Deserialization normalizes scale and rejects negative amounts.
///
/// ## Examples
///
/// ```
/// use driftwear_core::Price;
///
/// let unit = Price::parse("29.99").unwrap();
/// let line = unit.times(2);
/// assert_eq!(line.to_string(), "59.98");
///
/// // Whole amounts keep their two-place scale
/// assert_eq!(Price::parse("60").unwrap().to_string(), "60.00");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Zero, at two decimal places.
    pub const ZERO: Self = Self(Decimal::from_parts(0, 0, 0, false, 2));

    /// Create a price from a raw decimal, rounding half-away-from-zero to
    /// two places and rescaling so `60` and `60.00` compare equal.
    #[must_use]
    pub fn new(amount: Decimal) -> Self {
        let mut rounded =
            amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(2);
        Self(rounded)
    }

    /// Parse a `Price` from a decimal string.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Invalid`] for non-numeric input and
    /// [`PriceError::Negative`] for amounts below zero.
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        let amount: Decimal = s.trim().parse().map_err(|_| PriceError::Invalid)?;
        Self::from_decimal(amount)
    }

    /// Validate and normalize a decimal into a `Price`.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] for amounts below zero.
    pub fn from_decimal(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }
        Ok(Self::new(amount))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Line total: unit price multiplied by a quantity.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Self {
        Self::new(self.0 * Decimal::from(quantity))
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.0 + rhs.0)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let amount = <Decimal as Deserialize>::deserialize(deserializer)?;
        Self::from_decimal(amount).map_err(serde::de::Error::custom)
    }
}

// SQLx support (with postgres feature): stored as NUMERIC
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Price {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <Decimal as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <Decimal as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Price {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let amount = <Decimal as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::new(amount))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Price {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <Decimal as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert_eq!(Price::parse("19.99").unwrap().to_string(), "19.99");
        assert_eq!(Price::parse(" 5 ").unwrap().to_string(), "5.00");
        assert_eq!(Price::parse("0").unwrap(), Price::ZERO);
    }

    #[test]
    fn test_parse_invalid() {
        assert_eq!(Price::parse("abc"), Err(PriceError::Invalid));
        assert_eq!(Price::parse(""), Err(PriceError::Invalid));
        assert_eq!(Price::parse("-4.50"), Err(PriceError::Negative));
    }

    #[test]
    fn test_rescale_makes_equality_exact() {
        let a = Price::parse("60").unwrap();
        let b = Price::parse("60.00").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "60.00");
    }

    #[test]
    fn test_rounds_midpoint_away_from_zero() {
        let price = Price::parse("1.005").unwrap();
        assert_eq!(price.to_string(), "1.01");
    }

    #[test]
    fn test_times() {
        let unit = Price::parse("29.99").unwrap();
        assert_eq!(unit.times(2).to_string(), "59.98");
        assert_eq!(unit.times(0), Price::ZERO);
    }

    #[test]
    fn test_sum() {
        let total: Price = ["10.00", "4.50", "0.50"]
            .iter()
            .map(|s| Price::parse(s).unwrap())
            .sum();
        assert_eq!(total.to_string(), "15.00");
    }

    #[test]
    fn test_serde_as_string() {
        let price = Price::parse("19.99").unwrap();
        let json = serde_json::to_string(&price).unwrap();
        assert_eq!(json, "\"19.99\"");

        let parsed: Price = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, price);
    }

    #[test]
    fn test_serde_from_number() {
        let parsed: Price = serde_json::from_str("19.99").unwrap();
        assert_eq!(parsed, Price::parse("19.99").unwrap());
    }

    #[test]
    fn test_deserialize_normalizes_scale() {
        let a: Price = serde_json::from_str("60").unwrap();
        let b: Price = serde_json::from_str("\"60.00\"").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_deserialize_rejects_negative() {
        assert!(serde_json::from_str::<Price>("-1.00").is_err());
    }
}
