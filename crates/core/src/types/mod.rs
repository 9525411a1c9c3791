//! Core types for Navona.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod trigger;

pub use id::*;
pub use trigger::{ParseTriggerEventError, TriggerEvent};
