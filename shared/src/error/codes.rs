//! Unified error codes for the procurement workspace
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 4xxx: Order lifecycle errors
//! - 5xxx: Receiving errors
//! - 6xxx: Integrity audit errors
//! - 7xxx: External collaborator errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Status transition not allowed by the transition table
    InvalidTransition = 4002,
    /// Order status changed concurrently
    StatusConflict = 4004,

    // ==================== 5xxx: Receiving ====================
    /// Order item not found (or does not resolve to an order)
    OrderItemNotFound = 5001,
    /// Received quantity must be positive
    InvalidQuantity = 5002,
    /// Accumulated quantity would exceed the ordered quantity
    ExceedsOrdered = 5003,
    /// Receiving record changed concurrently
    ReceiptConflict = 5004,

    // ==================== 6xxx: Integrity ====================
    /// Integrity audit could not complete
    AuditFailed = 6001,

    // ==================== 7xxx: Collaborators ====================
    /// External collaborator failed (best-effort, never aborts the core)
    DependencyFailed = 7001,
    /// Contract reservation service failed
    ReservationFailed = 7002,
    /// Inventory service failed
    InventoryFailed = 7003,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9005,
    /// Database locked by another writer, retry later
    SystemBusy = 9404,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::InvalidTransition => "Status transition is not allowed",
            ErrorCode::StatusConflict => "Order status was changed concurrently",

            // Receiving
            ErrorCode::OrderItemNotFound => "Order item not found",
            ErrorCode::InvalidQuantity => "Quantity must be greater than zero",
            ErrorCode::ExceedsOrdered => "Received quantity exceeds ordered quantity",
            ErrorCode::ReceiptConflict => "Receiving record was changed concurrently",

            // Integrity
            ErrorCode::AuditFailed => "Integrity audit failed",

            // Collaborators
            ErrorCode::DependencyFailed => "External dependency failed",
            ErrorCode::ReservationFailed => "Contract reservation service failed",
            ErrorCode::InventoryFailed => "Inventory service failed",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::SystemBusy => "System busy, please retry later",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),

            // Order
            4001 => Ok(ErrorCode::OrderNotFound),
            4002 => Ok(ErrorCode::InvalidTransition),
            4004 => Ok(ErrorCode::StatusConflict),

            // Receiving
            5001 => Ok(ErrorCode::OrderItemNotFound),
            5002 => Ok(ErrorCode::InvalidQuantity),
            5003 => Ok(ErrorCode::ExceedsOrdered),
            5004 => Ok(ErrorCode::ReceiptConflict),

            // Integrity
            6001 => Ok(ErrorCode::AuditFailed),

            // Collaborators
            7001 => Ok(ErrorCode::DependencyFailed),
            7002 => Ok(ErrorCode::ReservationFailed),
            7003 => Ok(ErrorCode::InventoryFailed),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9005 => Ok(ErrorCode::ConfigError),
            9404 => Ok(ErrorCode::SystemBusy),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::NotFound.code(), 3);

        assert_eq!(ErrorCode::OrderNotFound.code(), 4001);
        assert_eq!(ErrorCode::InvalidTransition.code(), 4002);

        assert_eq!(ErrorCode::OrderItemNotFound.code(), 5001);
        assert_eq!(ErrorCode::InvalidQuantity.code(), 5002);
        assert_eq!(ErrorCode::ExceedsOrdered.code(), 5003);

        assert_eq!(ErrorCode::AuditFailed.code(), 6001);
        assert_eq!(ErrorCode::DependencyFailed.code(), 7001);

        assert_eq!(ErrorCode::InternalError.code(), 9001);
        assert_eq!(ErrorCode::DatabaseError.code(), 9002);
        assert_eq!(ErrorCode::SystemBusy.code(), 9404);
    }

    #[test]
    fn test_try_from_valid() {
        assert_eq!(ErrorCode::try_from(0), Ok(ErrorCode::Success));
        assert_eq!(ErrorCode::try_from(4002), Ok(ErrorCode::InvalidTransition));
        assert_eq!(ErrorCode::try_from(5003), Ok(ErrorCode::ExceedsOrdered));
        assert_eq!(ErrorCode::try_from(9002), Ok(ErrorCode::DatabaseError));
        assert_eq!(ErrorCode::try_from(9404), Ok(ErrorCode::SystemBusy));
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(999), Err(InvalidErrorCode(999)));
        assert_eq!(ErrorCode::try_from(1), Err(InvalidErrorCode(1)));
        assert_eq!(ErrorCode::try_from(4999), Err(InvalidErrorCode(4999)));
        assert_eq!(ErrorCode::try_from(10000), Err(InvalidErrorCode(10000)));
    }

    #[test]
    fn test_serialize_as_number() {
        let json = serde_json::to_string(&ErrorCode::ExceedsOrdered).unwrap();
        assert_eq!(json, "5003");

        let code: ErrorCode = serde_json::from_str("4002").unwrap();
        assert_eq!(code, ErrorCode::InvalidTransition);

        let result: Result<ErrorCode, _> = serde_json::from_str("1234");
        assert!(result.is_err());
    }

    #[test]
    fn test_display_and_message() {
        assert_eq!(format!("{}", ErrorCode::OrderNotFound), "4001");
        assert_eq!(ErrorCode::OrderNotFound.message(), "Order not found");
        assert_eq!(
            ErrorCode::ExceedsOrdered.message(),
            "Received quantity exceeds ordered quantity"
        );
    }

    #[test]
    fn test_invalid_error_code_display() {
        let err = InvalidErrorCode(999);
        assert_eq!(format!("{}", err), "invalid error code: 999");
    }
}
