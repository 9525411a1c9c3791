//! Navona Core - Shared types library.
//!
//! This crate provides common types used across all Navona components:
//! - `storefront` - Public-facing storefront API
//! - `cli` - Command-line tools for migrations and seeding
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! database access, no HTTP. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and the trigger enum
//! - [`coupon`] - Coupon code generation and issuance constants
//! - [`money`] - Discount application and currency rounding

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod coupon;
pub mod money;
pub mod types;

pub use types::*;
