//! Business services for the coupon/abandonment lifecycle.
//!
//! Route handlers stay thin; these services own the invariants:
//!
//! - [`abandonment`] - trigger recording, coupon issuance, coupon validation
//! - [`orders`] - order placement and coupon redemption
//!
//! Every multi-entity write runs inside one sqlx transaction so partial
//! states (a coupon without its event, an order with a half-claimed coupon)
//! are never observable.

pub mod abandonment;
pub mod orders;

pub use abandonment::{AbandonmentService, CartItemInput, RecordAbandonment};
pub use orders::{OrderItemInput, OrderService, PlaceOrder};
