//! Wire types for the Shopify Admin API.
//!
//! REST resources deserialize straight from `products.json`/`orders.json`;
//! GraphQL payloads carry the camelCase field names the Admin schema uses.

use order_bridge_core::{ProductId, VariantId};
use serde::{Deserialize, Serialize};

// =============================================================================
// Catalog (REST products.json)
// =============================================================================

/// A product variant as returned by the REST product listing.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogVariant {
    pub id: VariantId,
    /// SKU as stored in the catalog. May be empty.
    #[serde(default)]
    pub sku: String,
    /// Price as a decimal string (e.g. "19.99").
    #[serde(default)]
    pub price: Option<String>,
}

/// A product with its variants from the REST product listing.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogProduct {
    pub id: ProductId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub variants: Vec<CatalogVariant>,
}

/// One page of the paginated product listing.
#[derive(Debug, Clone)]
pub struct ProductPage {
    pub products: Vec<CatalogProduct>,
    /// Cursor for the next page, from the `Link` response header.
    pub next_page: Option<String>,
}

/// A variant resolved from a SKU, ready to become a line item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedVariant {
    pub variant_id: VariantId,
    /// Catalog price as a decimal string, when the lookup surfaced one.
    pub price: Option<String>,
}

// =============================================================================
// Order submission (REST orders.json)
// =============================================================================

/// A line item on an outbound REST order.
#[derive(Debug, Clone, Serialize)]
pub struct OrderLineItem {
    pub variant_id: i64,
    pub quantity: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
}

/// Customer block on an outbound REST order.
#[derive(Debug, Clone, Serialize)]
pub struct OrderCustomer {
    pub email: String,
}

/// Postal address on an outbound REST order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PostalAddress {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub province: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// The `order` object POSTed to `orders.json`.
#[derive(Debug, Clone, Serialize)]
pub struct OrderInput {
    pub line_items: Vec<OrderLineItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<OrderCustomer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_address: Option<PostalAddress>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<PostalAddress>,
    pub financial_status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    pub source_name: String,
}

// =============================================================================
// Draft order submission (GraphQL draftOrderCreate)
// =============================================================================

/// A line item on an outbound draft order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftOrderLineItem {
    /// Variant as a GraphQL global id.
    pub variant_id: String,
    pub quantity: i64,
}

/// The `input` object for the `draftOrderCreate` mutation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftOrderInput {
    pub line_items: Vec<DraftOrderLineItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// A field-scoped error Shopify returns instead of failing the mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserError {
    #[serde(default)]
    pub field: Vec<String>,
    pub message: String,
}

// =============================================================================
// Results
// =============================================================================

/// The order (or draft order) Shopify created, as reported back to callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedOrder {
    pub id: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub rest: serde_json::Map<String, serde_json::Value>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_catalog_product_deserializes_rest_shape() {
        let product: CatalogProduct = serde_json::from_value(json!({
            "id": 632910392,
            "title": "IPod Nano",
            "variants": [
                {"id": 808950810, "sku": "IPOD2008PINK", "price": "199.00"},
                {"id": 808950811, "sku": "", "price": null}
            ]
        }))
        .unwrap();

        assert_eq!(product.variants.len(), 2);
        assert_eq!(product.variants[0].sku, "IPOD2008PINK");
        assert_eq!(product.variants[0].price.as_deref(), Some("199.00"));
        assert_eq!(product.variants[0].id.rest_id(), Some(808_950_810));
        assert!(product.variants[1].price.is_none());
    }

    #[test]
    fn test_order_input_omits_absent_fields() {
        let input = OrderInput {
            line_items: vec![OrderLineItem {
                variant_id: 42,
                quantity: 1,
                price: None,
            }],
            customer: None,
            email: None,
            billing_address: None,
            shipping_address: None,
            financial_status: "pending".to_string(),
            tags: None,
            source_name: "api".to_string(),
        };

        let json = serde_json::to_value(&input).unwrap();
        assert!(json.get("customer").is_none());
        assert!(json.get("billing_address").is_none());
        assert!(json["line_items"][0].get("price").is_none());
        assert_eq!(json["source_name"], "api");
    }

    #[test]
    fn test_draft_order_input_is_camel_case() {
        let input = DraftOrderInput {
            line_items: vec![DraftOrderLineItem {
                variant_id: "gid://shopify/ProductVariant/42".to_string(),
                quantity: 2,
            }],
            email: Some("buyer@example.com".to_string()),
            tags: None,
        };

        let json = serde_json::to_value(&input).unwrap();
        assert!(json.get("lineItems").is_some());
        assert_eq!(json["lineItems"][0]["variantId"], "gid://shopify/ProductVariant/42");
    }

    #[test]
    fn test_user_error_tolerates_missing_field_path() {
        let err: UserError = serde_json::from_value(json!({"message": "nope"})).unwrap();
        assert!(err.field.is_empty());
        assert_eq!(err.message, "nope");
    }
}
