//! Shopify Admin API integration.
//!
//! The pipeline talks to Shopify through the [`ShopifyApi`] trait so tests
//! can substitute a fake catalog. [`AdminClient`] is the production
//! implementation over REST + GraphQL.

mod client;
mod types;

pub use client::AdminClient;
pub use types::{
    CatalogProduct, CatalogVariant, CreatedOrder, DraftOrderInput, DraftOrderLineItem,
    OrderCustomer, OrderInput, OrderLineItem, PostalAddress, ProductPage, ResolvedVariant,
    UserError,
};

use async_trait::async_trait;
use thiserror::Error;

use crate::auth::AuthContext;

/// Errors from the Shopify Admin API.
#[derive(Debug, Error)]
pub enum ShopifyError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Access token rejected by Shopify")]
    Unauthorized,

    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    #[error("GraphQL errors: {}", .0.join("; "))]
    GraphQL(Vec<String>),

    /// The mutation ran but Shopify rejected the input field-by-field.
    #[error("Shopify rejected the order input")]
    UserErrors(Vec<UserError>),

    #[error("Shopify API error ({status}): {message}")]
    Api { status: u16, message: String },
}

/// The Admin API surface the order pipeline depends on.
///
/// One implementation per deployment (`AdminClient`); tests inject fakes.
#[async_trait]
pub trait ShopifyApi: Send + Sync {
    /// Fetch one page of the product catalog.
    ///
    /// `page_info` is the cursor from a previous page's `Link` header;
    /// `None` fetches the first page.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError` on transport or API failures.
    async fn list_products(
        &self,
        auth: &AuthContext,
        page_info: Option<&str>,
    ) -> Result<ProductPage, ShopifyError>;

    /// Look up a variant by exact SKU via GraphQL product search.
    ///
    /// `Ok(None)` when no product carries the SKU; that is not an error.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError` on transport or API failures.
    async fn search_variant_by_sku(
        &self,
        auth: &AuthContext,
        sku: &str,
    ) -> Result<Option<ResolvedVariant>, ShopifyError>;

    /// Create a real order via REST `orders.json`.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError` on transport or API failures.
    async fn create_order(
        &self,
        auth: &AuthContext,
        order: &OrderInput,
    ) -> Result<CreatedOrder, ShopifyError>;

    /// Create a draft order via the GraphQL `draftOrderCreate` mutation.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::UserErrors` when the mutation succeeds but
    /// Shopify rejects the input, and other variants on transport failures.
    async fn create_draft_order(
        &self,
        auth: &AuthContext,
        draft: &DraftOrderInput,
    ) -> Result<CreatedOrder, ShopifyError>;
}
