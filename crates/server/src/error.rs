//! Application error types and HTTP response mapping.
//!
//! Every handler returns `Result<_, AppError>`; the `IntoResponse` impl is
//! the single place where outcomes become status codes and JSON envelopes.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use crate::auth::AuthError;
use crate::shopify::{ShopifyError, UserError};

/// Top-level application error.
#[derive(Debug, Error)]
pub enum AppError {
    /// Request used an HTTP method the route does not accept.
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// No configured authentication scheme accepted the request.
    #[error("Authentication failed: {0}")]
    Unauthorized(#[from] AuthError),

    /// The payload failed normalization. Carries every violation found.
    #[error("Invalid request payload")]
    Validation(Vec<String>),

    /// A single-SKU endpoint could not resolve the requested SKU.
    #[error("Product with SKU '{0}' not found")]
    SkuNotFound(String),

    /// A multi-item order resolved zero line items.
    #[error("No valid products found for this order.")]
    NoValidItems,

    /// Shopify accepted the request but rejected the order input.
    #[error("Order creation rejected")]
    UpstreamRejected(Vec<UserError>),

    /// Transport or protocol failure talking to the Admin API.
    #[error("Shopify API error: {0}")]
    Shopify(ShopifyError),

    /// Anything else. The message is logged, not exposed.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ShopifyError> for AppError {
    fn from(err: ShopifyError) -> Self {
        match err {
            // User errors are the caller's problem, not ours
            ShopifyError::UserErrors(errors) => Self::UpstreamRejected(errors),
            other => Self::Shopify(other),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::Validation(vec![format!("Body is not valid JSON: {err}")])
    }
}

impl AppError {
    /// The status code this error maps to.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Unauthorized(err) => {
                // A recognized caller with no shop context is a bad request,
                // not an authentication failure.
                if matches!(err, AuthError::ShopRequired) {
                    StatusCode::BAD_REQUEST
                } else {
                    StatusCode::UNAUTHORIZED
                }
            }
            Self::Validation(_) | Self::NoValidItems | Self::UpstreamRejected(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::SkuNotFound(_) => StatusCode::NOT_FOUND,
            Self::Shopify(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing error message. Never exposes internals on 5xx.
    fn public_message(&self) -> String {
        match self {
            Self::MethodNotAllowed => "Method not allowed".to_string(),
            Self::Unauthorized(err) => err.to_string(),
            Self::Validation(_) => "Invalid request payload".to_string(),
            Self::SkuNotFound(sku) => format!("Product with SKU '{sku}' not found"),
            Self::NoValidItems => "No valid products found for this order.".to_string(),
            Self::UpstreamRejected(_) => "Order creation rejected".to_string(),
            Self::Shopify(_) | Self::Internal(_) => "Failed to process order".to_string(),
        }
    }

    /// Structured detail array for 400-class responses, if any.
    fn details(&self) -> Option<serde_json::Value> {
        match self {
            Self::Validation(violations) => Some(json!(violations)),
            Self::UpstreamRejected(errors) => Some(json!(errors)),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
            sentry::capture_error(&self);
        } else {
            tracing::debug!(error = %self, status = %status, "request rejected");
        }

        let mut body = json!({
            "success": false,
            "error": self.public_message(),
        });
        if let Some(details) = self.details() {
            body["details"] = details;
        }

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::MethodNotAllowed.status_code(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(
            AppError::Unauthorized(AuthError::BadSignature).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Unauthorized(AuthError::StaleRequest).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Validation(vec!["sku is required".to_string()]).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::SkuNotFound("X1".to_string()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(AppError::NoValidItems.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::Internal("boom".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_shop_required_is_bad_request() {
        // Missing shop context is a caller mistake, not failed credentials
        assert_eq!(
            AppError::Unauthorized(AuthError::ShopRequired).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_user_errors_map_to_upstream_rejected() {
        let err: AppError = ShopifyError::UserErrors(vec![UserError {
            field: vec!["lineItems".to_string()],
            message: "Line items cannot be empty".to_string(),
        }])
        .into();
        assert!(matches!(err, AppError::UpstreamRejected(_)));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_server_errors_hide_internals() {
        let err = AppError::Internal("database password leaked".to_string());
        assert_eq!(err.public_message(), "Failed to process order");
    }

    #[test]
    fn test_validation_details_list_all_violations() {
        let err = AppError::Validation(vec![
            "sku is required".to_string(),
            "quantity must be a positive integer".to_string(),
        ]);
        let details = err.details().unwrap();
        assert_eq!(details.as_array().unwrap().len(), 2);
    }
}
