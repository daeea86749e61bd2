//! Shared types for the procurement workspace
//!
//! Common types used by the procurement server and its callers: order and
//! item status enums, row models, integrity report DTOs, error codes and
//! small utilities.

pub mod error;
pub mod models;
pub mod order;
pub mod util;

// Re-exports
pub use error::{AppError, AppResult, ErrorCategory, ErrorCode};
pub use order::{ItemStatus, OrderStatus};
pub use serde::{Deserialize, Serialize};
