//! Stock Keeping Unit type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Sku`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum SkuError {
    /// The input string is empty.
    #[error("sku cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("sku must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
}

/// A Stock Keeping Unit - a human-assigned string identifying a variant.
///
/// SKU matching against the catalog is exact and case-sensitive, so the
/// value is stored verbatim (no trimming, no case folding).
///
/// ## Constraints
///
/// - Length: 1-255 characters (Shopify field limit)
///
/// ## Examples
///
/// ```
/// use order_bridge_core::Sku;
///
/// assert!(Sku::parse("BLUE-TEE-M").is_ok());
/// assert!(Sku::parse("").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Sku(String);

impl Sku {
    /// Maximum length of a SKU (Shopify field limit).
    pub const MAX_LENGTH: usize = 255;

    /// Parse a `Sku` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty or longer than 255 characters.
    pub fn parse(s: &str) -> Result<Self, SkuError> {
        if s.is_empty() {
            return Err(SkuError::Empty);
        }

        if s.len() > Self::MAX_LENGTH {
            return Err(SkuError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the SKU as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Sku` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Sku {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Sku {
    type Err = SkuError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Sku {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert!(Sku::parse("BLUE-TEE-M").is_ok());
        assert!(Sku::parse("x").is_ok());
        assert!(Sku::parse("sku with spaces").is_ok());
    }

    #[test]
    fn test_parse_empty() {
        assert!(matches!(Sku::parse(""), Err(SkuError::Empty)));
    }

    #[test]
    fn test_parse_too_long() {
        let long = "a".repeat(256);
        assert!(matches!(Sku::parse(&long), Err(SkuError::TooLong { .. })));
    }

    #[test]
    fn test_case_preserved() {
        let sku = Sku::parse("Blue-Tee-M").unwrap();
        assert_eq!(sku.as_str(), "Blue-Tee-M");
        assert_ne!(sku, Sku::parse("blue-tee-m").unwrap());
    }

    #[test]
    fn test_display() {
        let sku = Sku::parse("X1").unwrap();
        assert_eq!(format!("{sku}"), "X1");
    }

    #[test]
    fn test_serde_roundtrip() {
        let sku = Sku::parse("X1").unwrap();
        let json = serde_json::to_string(&sku).unwrap();
        assert_eq!(json, "\"X1\"");

        let parsed: Sku = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, sku);
    }
}
