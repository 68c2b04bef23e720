//! `POST /create-order` — draft order intake for embedded-app callers.
//!
//! Session authentication is tried first; callers without a session fall
//! back to the API key or request signing. Resolution uses the GraphQL SKU
//! search and the result is a draft order rather than a committed one.

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use serde_json::{Value, json};

use super::{ShopQuery, envelope};
use crate::auth::{AuthScheme, RequestAuth};
use crate::error::AppError;
use crate::pipeline::resolve::ResolveStrategy;
use crate::pipeline::{normalize, resolve, submit};
use crate::state::AppState;

/// `GET /create-order` usage hint.
pub async fn usage() -> Json<Value> {
    Json(json!({
        "message": "Send a POST request with a JSON body to create a draft order",
        "example": {
            "sku": "PRODUCT-SKU",
            "quantity": 1,
            "email": "customer@example.com",
        },
    }))
}

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
        .authenticate(
            &[AuthScheme::Session, AuthScheme::ApiKey, AuthScheme::Hmac],
            &request,
        )
        .await?;

    let payload: Value = serde_json::from_slice(&body)?;
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

    tracing::info!(shop = %auth.shop_domain, sku = %order.sku, "draft order created");
    Ok(envelope::created("Draft order created successfully", &created))
}
