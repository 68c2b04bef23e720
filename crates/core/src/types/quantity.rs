//! Order line quantity type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Quantity`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum QuantityError {
    /// The value is zero or negative.
    #[error("quantity must be at least 1")]
    NotPositive,
    /// The value exceeds the supported maximum.
    #[error("quantity must be at most {max}")]
    TooLarge {
        /// Maximum allowed quantity.
        max: i64,
    },
}

/// A positive order line quantity.
///
/// ## Constraints
///
/// - Must be at least 1
/// - Must be at most `i32::MAX` (Shopify line item limit)
///
/// ## Examples
///
/// ```
/// use order_bridge_core::Quantity;
///
/// assert!(Quantity::parse(2).is_ok());
/// assert!(Quantity::parse(0).is_err());
/// assert!(Quantity::parse(-1).is_err());
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Quantity(i64);

impl Quantity {
    /// Maximum supported quantity.
    pub const MAX: i64 = i32::MAX as i64;

    /// Parse a `Quantity` from an integer.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is below 1 or above [`Self::MAX`].
    pub const fn parse(value: i64) -> Result<Self, QuantityError> {
        if value < 1 {
            return Err(QuantityError::NotPositive);
        }
        if value > Self::MAX {
            return Err(QuantityError::TooLarge { max: Self::MAX });
        }
        Ok(Self(value))
    }

    /// Get the underlying value.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Quantity> for i64 {
    fn from(quantity: Quantity) -> Self {
        quantity.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert_eq!(Quantity::parse(1).unwrap().get(), 1);
        assert_eq!(Quantity::parse(250).unwrap().get(), 250);
    }

    #[test]
    fn test_parse_zero() {
        assert!(matches!(Quantity::parse(0), Err(QuantityError::NotPositive)));
    }

    #[test]
    fn test_parse_negative() {
        assert!(matches!(
            Quantity::parse(-5),
            Err(QuantityError::NotPositive)
        ));
    }

    #[test]
    fn test_parse_too_large() {
        assert!(matches!(
            Quantity::parse(i64::MAX),
            Err(QuantityError::TooLarge { .. })
        ));
    }

    #[test]
    fn test_serde_roundtrip() {
        let quantity = Quantity::parse(3).unwrap();
        let json = serde_json::to_string(&quantity).unwrap();
        assert_eq!(json, "3");

        let parsed: Quantity = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, quantity);
    }
}
