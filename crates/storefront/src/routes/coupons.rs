//! Coupon validation route handler.
//!
//! Read-only discount preview for the checkout form. The handler is rate
//! limited per client IP (see `middleware::coupon_rate_limiter`) and every
//! miss returns the same undifferentiated error.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use navona_core::{SessionId, StoreId};

use crate::error::{AppError, Result};
use crate::models::Coupon;
use crate::services::AbandonmentService;
use crate::state::AppState;

/// Request body for coupon validation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateCouponRequest {
    pub store_id: Option<String>,
    pub session_id: Option<String>,
    pub code: Option<String>,
}

impl ValidateCouponRequest {
    fn validate(self) -> Result<(StoreId, SessionId, String)> {
        let store_id: StoreId = self
            .store_id
            .ok_or_else(|| AppError::Validation("store ID is required".to_owned()))?
            .parse()
            .map_err(|_| AppError::Validation("store ID is invalid".to_owned()))?;

        let session_id = self
            .session_id
            .ok_or_else(|| AppError::Validation("session ID is required".to_owned()))?;
        if session_id.is_empty() {
            return Err(AppError::Validation("session ID is invalid".to_owned()));
        }

        let code = self
            .code
            .ok_or_else(|| AppError::Validation("code is required".to_owned()))?;
        if code.is_empty() {
            return Err(AppError::Validation("code is invalid".to_owned()));
        }

        Ok((store_id, SessionId::new(session_id), code))
    }
}

/// Response for a successfully validated coupon.
#[derive(Debug, Serialize)]
pub struct ValidateCouponResponse {
    pub message: String,
    pub coupon: Coupon,
}

/// Validate a coupon code for discount preview.
#[instrument(skip_all)]
pub async fn validate(
    State(state): State<AppState>,
    Json(body): Json<ValidateCouponRequest>,
) -> Result<Json<ValidateCouponResponse>> {
    let (store_id, session_id, code) = body.validate()?;
    let service = AbandonmentService::new(state.pool(), &state.config().coupon);
    let coupon = service.validate_coupon(store_id, &session_id, &code).await?;

    Ok(Json(ValidateCouponResponse {
        message: "Coupon applied successfully".to_owned(),
        coupon,
    }))
}
