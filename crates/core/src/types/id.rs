//! Newtype IDs for type-safe catalog references.
//!
//! Shopify identifies catalog entities two ways: numeric ids in the REST
//! Admin API (`632910392`) and global ids in the GraphQL Admin API
//! (`gid://shopify/ProductVariant/632910392`). These wrappers store the id
//! verbatim in whichever form it arrived and convert between the two.

use serde::{Deserialize, Serialize};

/// Macro to define a type-safe catalog ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize` as a plain string; `Deserialize` from either a JSON string
///   or a JSON number (the REST API sends numbers, GraphQL sends gids)
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - `new()`, `as_str()`, `rest_id()`, and `as_gid()` accessors
/// - `From<i64>` for REST numeric ids
macro_rules! define_catalog_id {
    ($name:ident, $gid_type:literal) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: ::serde::Deserializer<'de>,
            {
                #[derive(Deserialize)]
                #[serde(untagged)]
                enum Raw {
                    Num(i64),
                    Str(String),
                }

                match Raw::deserialize(deserializer)? {
                    Raw::Num(n) => Ok(Self(n.to_string())),
                    Raw::Str(s) => Ok(Self(s)),
                }
            }
        }

        impl $name {
            /// Create a new ID from any string form.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the id as it was received.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// The numeric REST id, if the stored form carries one.
            ///
            /// Both `632910392` and `gid://shopify/…/632910392` yield
            /// `Some(632910392)`.
            #[must_use]
            pub fn rest_id(&self) -> Option<i64> {
                self.0.rsplit('/').next().and_then(|s| s.parse().ok())
            }

            /// The GraphQL global id form.
            #[must_use]
            pub fn as_gid(&self) -> String {
                if self.0.starts_with("gid://") {
                    self.0.clone()
                } else {
                    format!(concat!("gid://shopify/", $gid_type, "/{}"), self.0)
                }
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id.to_string())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_catalog_id!(ProductId, "Product");
define_catalog_id!(VariantId, "ProductVariant");

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_rest_id_from_numeric() {
        let id = VariantId::from(632_910_392);
        assert_eq!(id.rest_id(), Some(632_910_392));
    }

    #[test]
    fn test_rest_id_from_gid() {
        let id = VariantId::new("gid://shopify/ProductVariant/632910392");
        assert_eq!(id.rest_id(), Some(632_910_392));
    }

    #[test]
    fn test_rest_id_opaque() {
        let id = VariantId::new("not-a-number");
        assert_eq!(id.rest_id(), None);
    }

    #[test]
    fn test_as_gid_from_numeric() {
        let id = VariantId::from(42);
        assert_eq!(id.as_gid(), "gid://shopify/ProductVariant/42");
    }

    #[test]
    fn test_as_gid_idempotent() {
        let gid = "gid://shopify/ProductVariant/42";
        let id = VariantId::new(gid);
        assert_eq!(id.as_gid(), gid);
    }

    #[test]
    fn test_product_id_gid() {
        let id = ProductId::from(7);
        assert_eq!(id.as_gid(), "gid://shopify/Product/7");
    }

    #[test]
    fn test_type_safety() {
        // Different entity types are different Rust types
        let product = ProductId::from(1);
        let variant = VariantId::from(1);
        assert_eq!(product.as_str(), variant.as_str());
        // let _: ProductId = variant; // does not compile
    }

    #[test]
    fn test_serde_transparent() {
        let id = VariantId::new("gid://shopify/ProductVariant/42");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"gid://shopify/ProductVariant/42\"");
    }

    #[test]
    fn test_deserialize_from_number_or_string() {
        // REST resources carry numeric ids
        let id: VariantId = serde_json::from_str("808950810").unwrap();
        assert_eq!(id.as_str(), "808950810");

        // GraphQL resources carry gid strings
        let id: VariantId = serde_json::from_str("\"gid://shopify/ProductVariant/42\"").unwrap();
        assert_eq!(id.rest_id(), Some(42));
    }
}
