//! HTTP routes.

mod api_create_order;
mod create_order;
pub mod envelope;
mod webhooks;

use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use crate::error::AppError;
use crate::state::AppState;

/// Optional `?shop=` query parameter accepted by intake endpoints.
#[derive(Debug, Deserialize)]
pub(crate) struct ShopQuery {
    pub shop: Option<String>,
}

/// Build the application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/create-order", post(api_create_order::create))
        .route(
            "/create-order",
            get(create_order::usage).post(create_order::create),
        )
        .route("/webhooks/order-create", post(webhooks::order_create))
        .route(
            "/webhooks/shopfunnels-order",
            post(webhooks::shopfunnels_order),
        )
        .method_not_allowed_fallback(method_not_allowed)
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({"status": "ok"}))
}

async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
