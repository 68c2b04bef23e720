//! `POST /api/create-order` — programmatic single-product order intake.
//!
//! Accepts the static API key or a signed request. The shop to act on must
//! arrive with the request (`x-shopify-shop-domain` header or `?shop=`).
//! Resolution scans the REST product listing; a miss is a 404 because the
//! caller named one specific SKU.

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

pub async fn create(
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
        .authenticate(&[AuthScheme::ApiKey, AuthScheme::Hmac], &request)
        .await?;

    let payload: Value = serde_json::from_slice(&body)?;
    let order = normalize::parse_single(&payload).map_err(AppError::Validation)?;

    let variant = resolve::resolve_sku(
        state.shopify(),
        &auth,
        ResolveStrategy::LinearScan,
        &order.sku,
    )
    .await?
    .ok_or_else(|| AppError::SkuNotFound(order.sku.to_string()))?;

    let input = submit::build_single_order(&order, &variant)?;
    let created = state.shopify().create_order(&auth, &input).await?;

    tracing::info!(shop = %auth.shop_domain, sku = %order.sku, "order created via API intake");
    Ok(envelope::created("Order created successfully", &created))
}
