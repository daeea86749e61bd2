//! Utility module - logging and validation helpers

pub mod logger;
pub mod validation;

pub use shared::error::{AppError, AppResult, ErrorCategory, ErrorCode};
