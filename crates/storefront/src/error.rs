//! Unified error handling for the storefront API.
//!
//! Provides a single `AppError` type whose `IntoResponse` impl does the HTTP
//! status mapping and JSON body shaping. All route handlers return
//! `Result<T, AppError>`. Server-side failures are logged with full detail;
//! clients only ever see a generic message for those.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use navona_core::ProductId;

use crate::db::RepositoryError;

/// Message returned for every coupon validity failure.
///
/// Wrong code, already redeemed, expired, and session/store mismatch all
/// collapse into this one message so the endpoint cannot be used as an
/// oracle for guessing codes.
pub const INVALID_OR_EXPIRED: &str = "Coupon is invalid or expired";

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Request failed schema validation; carries the first violated rule's
    /// message.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Referenced products are absent from the catalog.
    #[error("Some products no longer exist")]
    MissingProducts(Vec<ProductId>),

    /// Referenced resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Coupon failed its validity predicate (deliberately undifferentiated).
    #[error("{INVALID_OR_EXPIRED}")]
    InvalidOrExpired,

    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON error body. `accepted` is always false so trigger-recording clients
/// can branch on it without inspecting the status code.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    accepted: bool,
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    missing_products: Option<Vec<ProductId>>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if matches!(self, Self::Database(_) | Self::Internal(_)) {
            tracing::error!(error = %self, "Request error");
        }

        let status = match &self {
            Self::Validation(_) | Self::MissingProducts(_) | Self::InvalidOrExpired => {
                StatusCode::BAD_REQUEST
            }
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Database(_) | Self::Internal(_) => "Internal server error".to_owned(),
            Self::Validation(msg) => msg.clone(),
            Self::MissingProducts(_) => "Some products no longer exist".to_owned(),
            Self::NotFound(what) => format!("{what} not found"),
            Self::InvalidOrExpired => INVALID_OR_EXPIRED.to_owned(),
        };

        let missing_products = match self {
            Self::MissingProducts(ids) => Some(ids),
            _ => None,
        };

        let body = ErrorBody {
            accepted: false,
            error: message,
            missing_products,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::Validation("store ID is required".to_owned())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::MissingProducts(vec![ProductId::generate()])),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::InvalidOrExpired),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::NotFound("Store".to_owned())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Internal("boom".to_owned())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_detail_is_not_leaked() {
        let response = AppError::Internal("connection string with password".to_owned());
        assert_eq!(
            response.to_string(),
            "Internal error: connection string with password"
        );
        // The body only carries the generic message; the detail stays in logs.
        let body = ErrorBody {
            accepted: false,
            error: "Internal server error".to_owned(),
            missing_products: None,
        };
        let json = serde_json::to_value(&body).expect("serialize");
        assert_eq!(json["error"], "Internal server error");
        assert_eq!(json["accepted"], false);
    }

    #[test]
    fn test_missing_products_are_enumerated() {
        let id = ProductId::generate();
        let body = ErrorBody {
            accepted: false,
            error: "Some products no longer exist".to_owned(),
            missing_products: Some(vec![id]),
        };
        let json = serde_json::to_value(&body).expect("serialize");
        assert_eq!(json["missingProducts"][0], id.to_string());
    }

    #[test]
    fn test_coupon_failures_share_one_message() {
        // All validity failures must be externally indistinguishable.
        assert_eq!(AppError::InvalidOrExpired.to_string(), INVALID_OR_EXPIRED);
    }
}
