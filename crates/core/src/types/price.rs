//! Type-safe price representation using decimal arithmetic.
//!
//! Prices always carry exactly two decimal places. On the wire they are
//! strings (`"129.99"`); incoming JSON numbers are accepted as well.

use core::fmt;
use core::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

/// Number of decimal places a price is normalized to.
pub const PRICE_SCALE: u32 = 2;

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input is not a decimal number.
    #[error("price must be a decimal number")]
    Invalid,
    /// The amount is below zero.
    #[error("price cannot be negative")]
    Negative,
}

/// A non-negative amount with two decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price(Decimal);

impl Price {
    /// Create a price, rounding half away from zero to two decimal places.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Negative` if the amount is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }
        let mut normalized =
            amount.round_dp_with_strategy(PRICE_SCALE, RoundingStrategy::MidpointAwayFromZero);
        normalized.rescale(PRICE_SCALE);
        if normalized.is_zero() {
            normalized.set_sign_positive(true);
        }
        Ok(Self(normalized))
    }

    /// Get the decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let amount = Decimal::from_str(s.trim()).map_err(|_| PriceError::Invalid)?;
        Self::new(amount)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(PriceVisitor)
    }
}

struct PriceVisitor;

impl de::Visitor<'_> for PriceVisitor {
    type Value = Price;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a decimal price as a string or number")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Price, E> {
        v.parse().map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Price, E> {
        Price::new(Decimal::from(v)).map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Price, E> {
        Price::new(Decimal::from(v)).map_err(E::custom)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Price, E> {
        let amount = Decimal::try_from(v).map_err(|_| E::custom(PriceError::Invalid))?;
        Price::new(amount).map_err(E::custom)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_price_formats_two_decimal_places() {
        assert_eq!("10".parse::<Price>().unwrap().to_string(), "10.00");
        assert_eq!("129.99".parse::<Price>().unwrap().to_string(), "129.99");
        assert_eq!("0.5".parse::<Price>().unwrap().to_string(), "0.50");
    }

    #[test]
    fn test_price_rounds_half_away_from_zero() {
        assert_eq!("10.005".parse::<Price>().unwrap().to_string(), "10.01");
        assert_eq!("10.004".parse::<Price>().unwrap().to_string(), "10.00");
    }

    #[test]
    fn test_price_rejects_negative_and_garbage() {
        assert_eq!("-1.00".parse::<Price>(), Err(PriceError::Negative));
        assert_eq!("ten".parse::<Price>(), Err(PriceError::Invalid));
        assert_eq!("-0".parse::<Price>().unwrap().to_string(), "0.00");
    }

    #[test]
    fn test_price_json_accepts_string_and_number() {
        let from_str: Price = serde_json::from_str("\"89.9\"").unwrap();
        let from_num: Price = serde_json::from_str("89.9").unwrap();
        let from_int: Price = serde_json::from_str("90").unwrap();
        assert_eq!(from_str, from_num);
        assert_eq!(serde_json::to_string(&from_str).unwrap(), "\"89.90\"");
        assert_eq!(serde_json::to_string(&from_int).unwrap(), "\"90.00\"");
    }
}
