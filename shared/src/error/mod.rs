//! Unified error system for the procurement workspace
//!
//! - [`ErrorCode`]: Standardized numeric error codes
//! - [`ErrorCategory`]: Classification of errors by domain
//! - [`AppError`]: Rich error type with codes, messages, and details
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 4xxx: Order lifecycle errors
//! - 5xxx: Receiving errors
//! - 6xxx: Integrity audit errors
//! - 7xxx: External collaborator errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode};
//!
//! let err = AppError::with_message(ErrorCode::ExceedsOrdered, "11 > 10")
//!     .with_detail("item_id", 7);
//! assert_eq!(err.code.code(), 5003);
//! ```

mod category;
mod codes;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{AppError, AppResult};
