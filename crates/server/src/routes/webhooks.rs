//! Webhook intake endpoints.
//!
//! Signatures are verified over the raw body bytes before any parsing; an
//! invalid signature never reaches the JSON layer.

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use serde_json::Value;

use super::{ShopQuery, envelope};
use crate::auth::{AuthScheme, RequestAuth};
use crate::error::AppError;
use crate::pipeline::resolve::ResolveStrategy;
use crate::pipeline::{normalize, resolve, submit};
use crate::state::AppState;

const TOPIC_HEADER: &str = "x-shopify-topic";

/// Shopify webhook topics this service acknowledges without acting on.
const ACKNOWLEDGED_TOPICS: &[&str] = &["orders/create", "orders/updated", "orders/cancelled"];

/// `POST /webhooks/order-create`.
///
/// Serves two callers behind one Shopify-signed endpoint: custom senders
/// POST a single-product payload (detected by its `sku` field) that becomes
/// a draft order, while Shopify's own webhook dispatch sends platform
/// payloads that are acknowledged by topic.
pub async fn order_create(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    let request = RequestAuth {
        headers: &headers,
        body: &body,
        shop_param: None,
    };
    let auth = state
        .authenticator()
        .authenticate(&[AuthScheme::Webhook], &request)
        .await?;

    let payload: Value = serde_json::from_slice(&body)?;

    // Custom payloads carry a string `sku`; platform order payloads do not
    if payload.get("sku").is_some_and(Value::is_string) {
        let order = normalize::parse_single(&payload).map_err(AppError::Validation)?;

        let variant = resolve::resolve_sku(
            state.shopify(),
            &auth,
            ResolveStrategy::SkuSearch,
            &order.sku,
        )
        .await?
        .ok_or_else(|| AppError::SkuNotFound(order.sku.to_string()))?;

        let draft = submit::build_draft_order(&order, &variant);
        let created = state.shopify().create_draft_order(&auth, &draft).await?;

        tracing::info!(shop = %auth.shop_domain, sku = %order.sku, "draft order created from webhook");
        return Ok(envelope::created("Draft order created successfully", &created));
    }

    let topic = headers
        .get(TOPIC_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            AppError::Validation(vec![format!("{TOPIC_HEADER} header is required")])
        })?;

    if ACKNOWLEDGED_TOPICS.contains(&topic) {
        tracing::info!(shop = %auth.shop_domain, topic = %topic, "webhook acknowledged");
        Ok(envelope::acknowledged(&format!("Webhook {topic} processed")))
    } else {
        Err(AppError::Validation(vec![format!(
            "Unhandled webhook topic '{topic}'"
        )]))
    }
}

/// `POST /webhooks/shopfunnels-order`.
///
/// Multi-item orders from ShopFunnels. Items whose SKU is missing from the
/// catalog are dropped; an order where nothing resolved is rejected.
pub async fn shopfunnels_order(
    State(state): State<AppState>,
    Query(query): Query<ShopQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    let request = RequestAuth {
        headers: &headers,
        body: &body,
        shop_param: query.shop.as_deref(),
    };
    let auth = state
        .authenticator()
        .authenticate(&[AuthScheme::SharedSecret, AuthScheme::Hmac], &request)
        .await?;

    let payload: Value = serde_json::from_slice(&body)?;
    let order = normalize::parse_multi(&payload).map_err(AppError::Validation)?;

    let resolved = resolve::resolve_items(
        state.shopify(),
        &auth,
        ResolveStrategy::LinearScan,
        &order.items,
    )
    .await?;

    let input = submit::build_multi_order(&order, &resolved)?;
    let created = state.shopify().create_order(&auth, &input).await?;

    tracing::info!(
        shop = %auth.shop_domain,
        items = order.items.len(),
        resolved = resolved.len(),
        "order created from ShopFunnels webhook"
    );
    Ok(envelope::created("Order created successfully", &created))
}
