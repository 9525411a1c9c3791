//! Database-backed domain models.
//!
//! Every model derives `sqlx::FromRow` (snake_case columns) and `Serialize`
//! with camelCase renaming, so a row fetched from Postgres is also the wire
//! representation the JSON API returns.

pub mod abandonment;
pub mod coupon;
pub mod order;
pub mod product;
pub mod store;

pub use abandonment::{AbandonmentCartItem, AbandonmentEvent};
pub use coupon::Coupon;
pub use order::{Order, OrderItem, OrderWithItems};
pub use product::Product;
pub use store::Store;
