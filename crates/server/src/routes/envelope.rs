//! Success response envelopes.
//!
//! Every endpoint answers with the same `{success, message, ...}` shape so
//! callers handle one format regardless of intake path.

use axum::Json;
use serde_json::{Value, json};

use crate::shopify::CreatedOrder;

/// Envelope for a created order or draft order.
pub fn created(message: &str, order: &CreatedOrder) -> Json<Value> {
    Json(json!({
        "success": true,
        "message": message,
        "order": order,
    }))
}

/// Envelope acknowledging a webhook with no order to report.
pub fn acknowledged(message: &str) -> Json<Value> {
    Json(json!({
        "success": true,
        "message": message,
    }))
}
