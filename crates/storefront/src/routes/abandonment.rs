//! Abandonment event route handlers.
//!
//! `POST /abandonment-events` is the entry point of the lifecycle: the
//! client's trigger detection reports a store, session, trigger kind, and
//! the cart contents, and gets back a freshly issued coupon.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use navona_core::{SessionId, StoreId, TriggerEvent};

use crate::error::{AppError, Result};
use crate::models::{AbandonmentCartItem, AbandonmentEvent, Coupon};
use crate::services::{AbandonmentService, CartItemInput, RecordAbandonment};
use crate::state::AppState;

/// Request body for recording an abandonment event.
///
/// Fields are optional so validation can produce per-rule messages instead
/// of a serde rejection; `validate` enforces the actual contract.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordAbandonmentRequest {
    pub store_id: Option<String>,
    pub session_id: Option<String>,
    pub trigger_type: Option<String>,
    pub items: Option<Vec<CartItemBody>>,
}

/// One cart line in the request.
#[derive(Debug, Deserialize)]
pub struct CartItemBody {
    pub id: Option<String>,
    pub name: Option<String>,
    pub price: Option<f64>,
    pub quantity: Option<f64>,
}

impl RecordAbandonmentRequest {
    /// Validate the request, returning the first violated rule's message.
    fn validate(self) -> Result<RecordAbandonment> {
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

        let trigger: TriggerEvent = self
            .trigger_type
            .ok_or_else(|| AppError::Validation("trigger type is required".to_owned()))?
            .parse()
            .map_err(|e: navona_core::ParseTriggerEventError| AppError::Validation(e.to_string()))?;

        let raw_items = self
            .items
            .ok_or_else(|| AppError::Validation("items is required".to_owned()))?;
        if raw_items.is_empty() {
            return Err(AppError::Validation(
                "at least one item is required".to_owned(),
            ));
        }

        let items = raw_items
            .into_iter()
            .map(CartItemBody::validate)
            .collect::<Result<Vec<_>>>()?;

        Ok(RecordAbandonment {
            store_id,
            session_id: SessionId::new(session_id),
            trigger,
            items,
        })
    }
}

impl CartItemBody {
    fn validate(self) -> Result<CartItemInput> {
        let product_id = self
            .id
            .ok_or_else(|| AppError::Validation("Item ID is required".to_owned()))?
            .parse()
            .map_err(|_| AppError::Validation("Invalid ID".to_owned()))?;

        let name = self
            .name
            .ok_or_else(|| AppError::Validation("Item name is required".to_owned()))?;
        if name.is_empty() {
            return Err(AppError::Validation("Invalid name".to_owned()));
        }

        let quantity = validate_quantity(self.quantity)?;

        let raw_price = self
            .price
            .ok_or_else(|| AppError::Validation("Price must be a number".to_owned()))?;
        if raw_price < 0.0 {
            return Err(AppError::Validation("Price cannot be negative".to_owned()));
        }
        let price = rust_decimal::Decimal::try_from(raw_price)
            .map_err(|_| AppError::Validation("Price must be a number".to_owned()))?;

        Ok(CartItemInput {
            product_id,
            name,
            price,
            quantity,
        })
    }
}

/// Shared quantity rule: a positive integer, reported with the rule that
/// failed first.
pub(crate) fn validate_quantity(raw: Option<f64>) -> Result<i32> {
    let q = raw.ok_or_else(|| AppError::Validation("Quantity must be a number".to_owned()))?;
    if !q.is_finite() {
        return Err(AppError::Validation("Quantity must be a number".to_owned()));
    }
    if q.fract() != 0.0 || q > f64::from(i32::MAX) {
        return Err(AppError::Validation(
            "Quantity must be an integer".to_owned(),
        ));
    }
    if q <= 0.0 {
        return Err(AppError::Validation(
            "Quantity must be greater than 0".to_owned(),
        ));
    }
    #[allow(clippy::cast_possible_truncation)]
    Ok(q as i32)
}

/// Response for a successfully recorded event.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordAbandonmentResponse {
    pub accepted: bool,
    pub message: String,
    pub coupon: Coupon,
    pub abandonment_event: AbandonmentEvent,
    pub abandonment_cart_items: Vec<AbandonmentCartItem>,
}

/// Response for the event listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListAbandonmentResponse {
    pub accepted: bool,
    pub abandonment_events: Vec<AbandonmentEvent>,
}

/// Record an abandonment event and issue its coupon.
#[instrument(skip_all)]
pub async fn record(
    State(state): State<AppState>,
    Json(body): Json<RecordAbandonmentRequest>,
) -> Result<Json<RecordAbandonmentResponse>> {
    let cmd = body.validate()?;
    let service = AbandonmentService::new(state.pool(), &state.config().coupon);
    let receipt = service.record(cmd).await?;

    Ok(Json(RecordAbandonmentResponse {
        accepted: true,
        message: "Event Created Successfully!".to_owned(),
        coupon: receipt.coupon,
        abandonment_event: receipt.event,
        abandonment_cart_items: receipt.cart_items,
    }))
}

/// List all recorded abandonment events.
#[instrument(skip_all)]
pub async fn list(State(state): State<AppState>) -> Result<Json<ListAbandonmentResponse>> {
    let service = AbandonmentService::new(state.pool(), &state.config().coupon);
    let events = service.list().await?;

    Ok(Json(ListAbandonmentResponse {
        accepted: true,
        abandonment_events: events,
    }))
}
