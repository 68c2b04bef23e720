//! Integration test support for Order Bridge.
//!
//! Builds the real router with a fake Shopify Admin API behind it, so tests
//! drive full request/response cycles in process via
//! `tower::ServiceExt::oneshot`. Live-server tests (`tests/live_server.rs`)
//! use reqwest against a running instance instead and are `#[ignore]`d by
//! default.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use hmac::{Hmac, Mac};
use order_bridge_core::{ProductId, VariantId};
use order_bridge_server::AppState;
use order_bridge_server::auth::{AuthContext, Authenticator, ConfigTokens, DisabledSessions};
use order_bridge_server::config::{IntakeConfig, ServerConfig, ShopifyConfig};
use order_bridge_server::shopify::{
    CatalogProduct, CatalogVariant, CreatedOrder, DraftOrderInput, OrderInput, ProductPage,
    ResolvedVariant, ShopifyApi, ShopifyError, UserError,
};
use secrecy::SecretString;
use serde_json::{Value, json};
use sha2::Sha256;
use tower::ServiceExt;

pub const TEST_SHOP: &str = "demo.myshopify.com";
pub const TEST_API_KEY: &str = "it-api-key-8f3k2j9x";
pub const TEST_API_SECRET: &str = "it-api-secret-2m7q4w1z";
pub const TEST_WEBHOOK_SECRET: &str = "it-webhook-secret-5t8y3u6i";
pub const TEST_SHARED_SECRET: &str = "it-shared-secret-9p0o4i7u";

/// REST page size used by the fake catalog, small to exercise pagination.
const FAKE_PAGE_SIZE: usize = 2;

/// One SKU in the fake catalog.
#[derive(Debug, Clone)]
pub struct FakeVariant {
    pub sku: String,
    pub variant_id: i64,
    pub price: Option<String>,
}

impl FakeVariant {
    #[must_use]
    pub fn new(sku: &str, variant_id: i64, price: Option<&str>) -> Self {
        Self {
            sku: sku.to_string(),
            variant_id,
            price: price.map(ToString::to_string),
        }
    }
}

/// In-memory Shopify Admin API.
///
/// Records every submitted order and counts every call, so tests assert
/// both on what was created and on whether Shopify was reached at all.
#[derive(Default)]
pub struct FakeShopify {
    catalog: Vec<FakeVariant>,
    draft_user_errors: Vec<UserError>,
    pub orders: Mutex<Vec<OrderInput>>,
    pub drafts: Mutex<Vec<DraftOrderInput>>,
    pub api_calls: AtomicUsize,
}

impl FakeShopify {
    #[must_use]
    pub fn with_catalog(catalog: Vec<FakeVariant>) -> Self {
        Self {
            catalog,
            ..Self::default()
        }
    }

    /// Make `create_draft_order` answer with user errors instead of a draft.
    #[must_use]
    pub fn rejecting_drafts(mut self, errors: Vec<UserError>) -> Self {
        self.draft_user_errors = errors;
        self
    }

    #[must_use]
    pub fn call_count(&self) -> usize {
        self.api_calls.load(Ordering::SeqCst)
    }

    fn record_call(&self) {
        self.api_calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ShopifyApi for FakeShopify {
    async fn list_products(
        &self,
        _auth: &AuthContext,
        page_info: Option<&str>,
    ) -> Result<ProductPage, ShopifyError> {
        self.record_call();

        let start: usize = match page_info {
            None => 0,
            Some(cursor) => cursor
                .parse()
                .map_err(|_| ShopifyError::Parse(format!("bad cursor {cursor}")))?,
        };
        let end = (start + FAKE_PAGE_SIZE).min(self.catalog.len());

        // One variant per product is enough for scan coverage
        let products = self.catalog[start..end]
            .iter()
            .map(|v| CatalogProduct {
                id: ProductId::from(v.variant_id + 1000),
                title: format!("Product for {}", v.sku),
                variants: vec![CatalogVariant {
                    id: VariantId::from(v.variant_id),
                    sku: v.sku.clone(),
                    price: v.price.clone(),
                }],
            })
            .collect();

        Ok(ProductPage {
            products,
            next_page: (end < self.catalog.len()).then(|| end.to_string()),
        })
    }

    async fn search_variant_by_sku(
        &self,
        _auth: &AuthContext,
        sku: &str,
    ) -> Result<Option<ResolvedVariant>, ShopifyError> {
        self.record_call();
        Ok(self.catalog.iter().find(|v| v.sku == sku).map(|v| {
            ResolvedVariant {
                variant_id: VariantId::new(format!("gid://shopify/ProductVariant/{}", v.variant_id)),
                price: v.price.clone(),
            }
        }))
    }

    async fn create_order(
        &self,
        _auth: &AuthContext,
        order: &OrderInput,
    ) -> Result<CreatedOrder, ShopifyError> {
        self.record_call();
        self.orders
            .lock()
            .expect("orders lock poisoned")
            .push(order.clone());
        Ok(created_order(1001, "#1001"))
    }

    async fn create_draft_order(
        &self,
        _auth: &AuthContext,
        draft: &DraftOrderInput,
    ) -> Result<CreatedOrder, ShopifyError> {
        self.record_call();
        if !self.draft_user_errors.is_empty() {
            return Err(ShopifyError::UserErrors(self.draft_user_errors.clone()));
        }
        self.drafts
            .lock()
            .expect("drafts lock poisoned")
            .push(draft.clone());
        Ok(created_order(2002, "#D2002"))
    }
}

fn created_order(id: i64, name: &str) -> CreatedOrder {
    serde_json::from_value(json!({"id": id, "name": name}))
        .expect("static order JSON deserializes")
}

/// Test configuration matching the fake deployment.
#[must_use]
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".parse().expect("valid test host"),
        port: 0,
        shopify: ShopifyConfig {
            store: TEST_SHOP.to_string(),
            api_version: "2026-01".to_string(),
            access_token: SecretString::from("shpat_integration_test"),
        },
        intake: test_intake(),
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 1.0,
    }
}

fn test_intake() -> IntakeConfig {
    IntakeConfig {
        api_key: SecretString::from(TEST_API_KEY),
        api_secret: SecretString::from(TEST_API_SECRET),
        webhook_secret: SecretString::from(TEST_WEBHOOK_SECRET),
        shopfunnels_secret: SecretString::from(TEST_SHARED_SECRET),
    }
}

/// Build the real application router around a fake Shopify.
#[must_use]
pub fn test_app(shopify: Arc<FakeShopify>) -> Router {
    let config = test_config();
    let authenticator = Authenticator::new(
        config.intake.clone(),
        config.shopify.store.clone(),
        Box::new(ConfigTokens::new(
            config.shopify.store.clone(),
            config.shopify.access_token.clone(),
        )),
        Box::new(DisabledSessions),
    );
    let state = AppState::with_parts(config, authenticator, shopify);
    order_bridge_server::app(state)
}

/// Hex HMAC signature over `timestamp ∥ body` with the test API secret.
#[must_use]
pub fn sign_hmac(timestamp: &str, body: &str) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(TEST_API_SECRET.as_bytes())
        .expect("HMAC accepts any key length");
    mac.update(timestamp.as_bytes());
    mac.update(body.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Base64 webhook signature over the body with the test webhook secret.
#[must_use]
pub fn sign_webhook(body: &str) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(TEST_WEBHOOK_SECRET.as_bytes())
        .expect("HMAC accepts any key length");
    mac.update(body.as_bytes());
    BASE64.encode(mac.finalize().into_bytes())
}

/// Current Unix time as a header-ready string.
#[must_use]
pub fn now_timestamp() -> String {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("system clock after 1970")
        .as_secs()
        .to_string()
}

/// Drive one request through the router.
///
/// # Panics
///
/// Panics on malformed test input or infrastructure failure.
pub async fn send(
    app: Router,
    method: &str,
    uri: &str,
    headers: &[(&str, &str)],
    body: &str,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    for (name, value) in headers {
        request = request.header(*name, *value);
    }
    let request = request
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("valid test request");

    let response: Response<Body> = app.oneshot(request).await.expect("router is infallible");
    let status = response.status();

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body collects");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("response body is JSON")
    };

    (status, value)
}
