//! SKU to variant resolution.
//!
//! Two strategies exist because the intake sources predate the catalog's
//! GraphQL search: the REST listing scan works on any store, the SKU search
//! needs the indexed `sku:` query. SKU matching is exact and case-sensitive
//! in both.

use order_bridge_core::{Quantity, Sku, VariantId};

use super::normalize::OrderItem;
use crate::auth::AuthContext;
use crate::shopify::{ResolvedVariant, ShopifyApi, ShopifyError};

/// How a SKU is looked up in the shop's catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveStrategy {
    /// Page through the REST product listing and scan every variant.
    LinearScan,
    /// GraphQL `products(first: 1, query: "sku:<value>")`.
    SkuSearch,
}

/// A resolved line item, input order preserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLineItem {
    pub variant_id: VariantId,
    pub quantity: Quantity,
    /// Unit price from the catalog or the source payload.
    pub unit_price: Option<String>,
}

/// Resolve one SKU to a variant.
///
/// Not finding the SKU is a normal outcome (`Ok(None)`), never an error.
///
/// # Errors
///
/// Propagates `ShopifyError` from the catalog lookup.
pub async fn resolve_sku(
    api: &dyn ShopifyApi,
    auth: &AuthContext,
    strategy: ResolveStrategy,
    sku: &Sku,
) -> Result<Option<ResolvedVariant>, ShopifyError> {
    match strategy {
        ResolveStrategy::LinearScan => linear_scan(api, auth, sku).await,
        ResolveStrategy::SkuSearch => api.search_variant_by_sku(auth, sku.as_str()).await,
    }
}

/// Resolve a batch of items sequentially, preserving input order.
///
/// Items whose SKU is not in the catalog are skipped with a warning; the
/// caller decides what an empty result means.
///
/// # Errors
///
/// Propagates `ShopifyError` from any lookup; a transport failure aborts the
/// whole batch rather than silently dropping items.
pub async fn resolve_items(
    api: &dyn ShopifyApi,
    auth: &AuthContext,
    strategy: ResolveStrategy,
    items: &[OrderItem],
) -> Result<Vec<ResolvedLineItem>, ShopifyError> {
    let mut resolved = Vec::with_capacity(items.len());

    for item in items {
        match resolve_sku(api, auth, strategy, &item.sku).await? {
            Some(variant) => resolved.push(ResolvedLineItem {
                variant_id: variant.variant_id,
                quantity: item.quantity,
                unit_price: variant.price.or_else(|| item.total.clone()),
            }),
            None => {
                tracing::warn!(sku = %item.sku, "SKU not found in catalog, skipping item");
            }
        }
    }

    Ok(resolved)
}

/// First variant with an exactly matching SKU across the paged listing.
async fn linear_scan(
    api: &dyn ShopifyApi,
    auth: &AuthContext,
    sku: &Sku,
) -> Result<Option<ResolvedVariant>, ShopifyError> {
    let mut page_info: Option<String> = None;

    loop {
        let page = api.list_products(auth, page_info.as_deref()).await?;

        for product in page.products {
            for variant in product.variants {
                if variant.sku == sku.as_str() {
                    return Ok(Some(ResolvedVariant {
                        variant_id: variant.id,
                        price: variant.price,
                    }));
                }
            }
        }

        match page.next_page {
            Some(cursor) => page_info = Some(cursor),
            None => return Ok(None),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use order_bridge_core::ProductId;
    use secrecy::SecretString;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::shopify::{
        CatalogProduct, CatalogVariant, CreatedOrder, DraftOrderInput, OrderInput, ProductPage,
    };

    /// Two-page catalog fake. Counts listing calls.
    struct PagedCatalog {
        list_calls: AtomicUsize,
    }

    impl PagedCatalog {
        fn new() -> Self {
            Self {
                list_calls: AtomicUsize::new(0),
            }
        }

        fn product(id: i64, variants: Vec<CatalogVariant>) -> CatalogProduct {
            CatalogProduct {
                id: ProductId::from(id),
                title: format!("Product {id}"),
                variants,
            }
        }

        fn variant(id: i64, sku: &str, price: Option<&str>) -> CatalogVariant {
            CatalogVariant {
                id: VariantId::from(id),
                sku: sku.to_string(),
                price: price.map(ToString::to_string),
            }
        }
    }

    #[async_trait]
    impl ShopifyApi for PagedCatalog {
        async fn list_products(
            &self,
            _auth: &AuthContext,
            page_info: Option<&str>,
        ) -> Result<ProductPage, ShopifyError> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            match page_info {
                None => Ok(ProductPage {
                    products: vec![Self::product(
                        1,
                        vec![Self::variant(11, "ALPHA", Some("5.00"))],
                    )],
                    next_page: Some("page2".to_string()),
                }),
                Some("page2") => Ok(ProductPage {
                    products: vec![Self::product(
                        2,
                        vec![
                            Self::variant(21, "beta", None),
                            Self::variant(22, "GAMMA", Some("7.50")),
                        ],
                    )],
                    next_page: None,
                }),
                Some(other) => Err(ShopifyError::Parse(format!("unknown cursor {other}"))),
            }
        }

        async fn search_variant_by_sku(
            &self,
            _auth: &AuthContext,
            sku: &str,
        ) -> Result<Option<ResolvedVariant>, ShopifyError> {
            Ok((sku == "ALPHA").then(|| ResolvedVariant {
                variant_id: VariantId::from(11),
                price: Some("5.00".to_string()),
            }))
        }

        async fn create_order(
            &self,
            _auth: &AuthContext,
            _order: &OrderInput,
        ) -> Result<CreatedOrder, ShopifyError> {
            unimplemented!("not used by resolution tests")
        }

        async fn create_draft_order(
            &self,
            _auth: &AuthContext,
            _draft: &DraftOrderInput,
        ) -> Result<CreatedOrder, ShopifyError> {
            unimplemented!("not used by resolution tests")
        }
    }

    fn test_auth() -> AuthContext {
        AuthContext {
            shop_domain: "demo.myshopify.com".to_string(),
            access_token: SecretString::from("shpat_test"),
        }
    }

    fn item(sku: &str, quantity: i64) -> OrderItem {
        OrderItem {
            sku: sku.parse().unwrap(),
            quantity: Quantity::parse(quantity).unwrap(),
            total: None,
        }
    }

    #[tokio::test]
    async fn test_linear_scan_finds_on_first_page() {
        let api = PagedCatalog::new();
        let found = resolve_sku(
            &api,
            &test_auth(),
            ResolveStrategy::LinearScan,
            &"ALPHA".parse().unwrap(),
        )
        .await
        .unwrap()
        .unwrap();

        assert_eq!(found.variant_id.rest_id(), Some(11));
        assert_eq!(found.price.as_deref(), Some("5.00"));
        // Match on page one means page two is never fetched
        assert_eq!(api.list_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_linear_scan_follows_pagination() {
        let api = PagedCatalog::new();
        let found = resolve_sku(
            &api,
            &test_auth(),
            ResolveStrategy::LinearScan,
            &"GAMMA".parse().unwrap(),
        )
        .await
        .unwrap()
        .unwrap();

        assert_eq!(found.variant_id.rest_id(), Some(22));
        assert_eq!(api.list_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_linear_scan_is_case_sensitive() {
        let api = PagedCatalog::new();
        let found = resolve_sku(
            &api,
            &test_auth(),
            ResolveStrategy::LinearScan,
            &"BETA".parse().unwrap(),
        )
        .await
        .unwrap();

        // Catalog has "beta"; lookup of "BETA" must miss
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_linear_scan_not_found_after_all_pages() {
        let api = PagedCatalog::new();
        let found = resolve_sku(
            &api,
            &test_auth(),
            ResolveStrategy::LinearScan,
            &"MISSING".parse().unwrap(),
        )
        .await
        .unwrap();

        assert!(found.is_none());
        assert_eq!(api.list_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_sku_search_delegates() {
        let api = PagedCatalog::new();
        let found = resolve_sku(
            &api,
            &test_auth(),
            ResolveStrategy::SkuSearch,
            &"ALPHA".parse().unwrap(),
        )
        .await
        .unwrap();

        assert!(found.is_some());
        assert_eq!(api.list_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_resolve_items_skips_misses_and_preserves_order() {
        let api = PagedCatalog::new();
        let items = vec![item("ALPHA", 1), item("MISSING", 2), item("GAMMA", 3)];

        let resolved = resolve_items(&api, &test_auth(), ResolveStrategy::LinearScan, &items)
            .await
            .unwrap();

        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[0].variant_id.rest_id(), Some(11));
        assert_eq!(resolved[0].quantity.get(), 1);
        assert_eq!(resolved[1].variant_id.rest_id(), Some(22));
        assert_eq!(resolved[1].quantity.get(), 3);
    }

    #[tokio::test]
    async fn test_resolve_items_all_missing_yields_empty() {
        let api = PagedCatalog::new();
        let items = vec![item("X", 1), item("Y", 1), item("Z", 1)];

        let resolved = resolve_items(&api, &test_auth(), ResolveStrategy::LinearScan, &items)
            .await
            .unwrap();

        assert!(resolved.is_empty());
    }
}
