//! Procurement order status types
//!
//! - [`OrderStatus`]: lifecycle of a purchase order (nine states, two terminal)
//! - [`ItemStatus`]: receiving progress of a single line item or supplier group
//!
//! Status values are persisted as their SCREAMING_SNAKE_CASE names. Rows keep the raw
//! string so that an unknown value can be reported by the integrity auditor instead of
//! failing the read.

pub mod status;

// Re-exports
pub use status::{ItemStatus, OrderStatus, ParseStatusError};
