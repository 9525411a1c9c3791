//! Order placement route handler.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use navona_core::{CouponId, SessionId};

use crate::error::{AppError, Result};
use crate::models::{AbandonmentEvent, Coupon, OrderWithItems};
use crate::routes::abandonment::validate_quantity;
use crate::services::{OrderItemInput, OrderService, PlaceOrder};
use crate::state::AppState;

/// Request body for placing an order.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    pub session_id: Option<String>,
    pub customer_email: Option<String>,
    pub customer_name: Option<String>,
    pub items: Option<Vec<OrderItemBody>>,
    pub coupon_id: Option<String>,
}

/// One order line in the request. Quantity only; prices come from the
/// catalog, never from the client.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemBody {
    pub product_id: Option<String>,
    pub quantity: Option<f64>,
}

impl PlaceOrderRequest {
    fn validate(self) -> Result<PlaceOrder> {
        let session_id = self
            .session_id
            .ok_or_else(|| AppError::Validation("session ID is required".to_owned()))?;
        if session_id.is_empty() {
            return Err(AppError::Validation("session ID is invalid".to_owned()));
        }

        let customer_email = self
            .customer_email
            .ok_or_else(|| AppError::Validation("customer email is required".to_owned()))?;
        if !is_valid_email(&customer_email) {
            return Err(AppError::Validation(
                "customer email is invalid".to_owned(),
            ));
        }

        let customer_name = self
            .customer_name
            .ok_or_else(|| AppError::Validation("customer name is required".to_owned()))?;
        if customer_name.is_empty() {
            return Err(AppError::Validation("customer name is invalid".to_owned()));
        }

        let coupon_id = self
            .coupon_id
            .map(|raw| {
                raw.parse::<CouponId>()
                    .map_err(|_| AppError::Validation("coupon ID is invalid".to_owned()))
            })
            .transpose()?;

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
            .map(OrderItemBody::validate)
            .collect::<Result<Vec<_>>>()?;

        Ok(PlaceOrder {
            session_id: SessionId::new(session_id),
            customer_email,
            customer_name,
            items,
            coupon_id,
        })
    }
}

impl OrderItemBody {
    fn validate(self) -> Result<OrderItemInput> {
        let product_id = self
            .product_id
            .ok_or_else(|| AppError::Validation("Item ID is required".to_owned()))?
            .parse()
            .map_err(|_| AppError::Validation("Invalid product ID".to_owned()))?;

        let quantity = validate_quantity(self.quantity)?;

        Ok(OrderItemInput {
            product_id,
            quantity,
        })
    }
}

/// Basic email validation.
fn is_valid_email(email: &str) -> bool {
    // Simple validation: contains @, has content before and after @
    let mut parts = email.splitn(2, '@');
    let Some(local) = parts.next() else {
        return false;
    };
    let Some(domain) = parts.next() else {
        return false;
    };
    !local.is_empty() && !domain.is_empty() && domain.contains('.')
}

/// Response for a successfully placed order.
///
/// `coupon` and `abandonmentEvent` are null when no coupon was applied.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderResponse {
    pub message: String,
    pub order: OrderWithItems,
    pub coupon: Option<Coupon>,
    pub abandonment_event: Option<AbandonmentEvent>,
}

/// Place an order, applying and redeeming a coupon when one is referenced.
#[instrument(skip_all)]
pub async fn place(
    State(state): State<AppState>,
    Json(body): Json<PlaceOrderRequest>,
) -> Result<Json<PlaceOrderResponse>> {
    let cmd = body.validate()?;
    let service = OrderService::new(state.pool());
    let placed = service.place(cmd).await?;

    Ok(Json(PlaceOrderResponse {
        message: "Order created successfully!".to_owned(),
        order: placed.order,
        coupon: placed.coupon,
        abandonment_event: placed.event,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_request() -> PlaceOrderRequest {
        PlaceOrderRequest {
            session_id: Some("sess1".to_owned()),
            customer_email: Some("buyer@example.com".to_owned()),
            customer_name: Some("Buyer".to_owned()),
            items: Some(vec![OrderItemBody {
                product_id: Some(uuid::Uuid::new_v4().to_string()),
                quantity: Some(2.0),
            }]),
            coupon_id: None,
        }
    }

    fn message(err: AppError) -> String {
        match err {
            AppError::Validation(msg) => msg,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_valid_request_passes() {
        let cmd = base_request().validate().expect("valid request");
        assert_eq!(cmd.customer_email, "buyer@example.com");
        assert!(cmd.coupon_id.is_none());
        assert_eq!(cmd.items.len(), 1);
    }

    #[test]
    fn test_coupon_id_is_optional_but_must_parse() {
        let mut req = base_request();
        req.coupon_id = Some("not-a-uuid".to_owned());
        assert_eq!(message(req.validate().unwrap_err()), "coupon ID is invalid");

        let mut req = base_request();
        req.coupon_id = Some(uuid::Uuid::new_v4().to_string());
        assert!(req.validate().expect("valid").coupon_id.is_some());
    }

    #[test]
    fn test_email_rules() {
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("missing-at.example.com"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@"));
        assert!(!is_valid_email("user@nodot"));

        let mut req = base_request();
        req.customer_email = Some("not-an-email".to_owned());
        assert_eq!(
            message(req.validate().unwrap_err()),
            "customer email is invalid"
        );
    }

    #[test]
    fn test_items_are_required_and_nonempty() {
        let mut req = base_request();
        req.items = None;
        assert_eq!(message(req.validate().unwrap_err()), "items is required");

        let mut req = base_request();
        req.items = Some(vec![]);
        assert_eq!(
            message(req.validate().unwrap_err()),
            "at least one item is required"
        );
    }
}
