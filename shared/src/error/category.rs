//! Error category classification

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category classification based on error code ranges
///
/// Categories are determined by the leading digit of the error code:
/// - 0xxx: General errors
/// - 4xxx: Order lifecycle errors
/// - 5xxx: Receiving errors
/// - 6xxx: Integrity audit errors
/// - 7xxx: External collaborator errors
/// - 9xxx: System errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// General errors (0xxx)
    General,
    /// Order lifecycle errors (4xxx)
    Order,
    /// Receiving errors (5xxx)
    Receiving,
    /// Integrity audit errors (6xxx)
    Integrity,
    /// External collaborator errors (7xxx)
    Dependency,
    /// System errors (9xxx and anything unassigned)
    System,
}

impl ErrorCategory {
    /// Determine category from error code value
    pub fn from_code(code: u16) -> Self {
        match code {
            0..1000 => Self::General,
            4000..5000 => Self::Order,
            5000..6000 => Self::Receiving,
            6000..7000 => Self::Integrity,
            7000..8000 => Self::Dependency,
            _ => Self::System,
        }
    }

    /// Get the string name for this category
    pub fn name(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Order => "order",
            Self::Receiving => "receiving",
            Self::Integrity => "integrity",
            Self::Dependency => "dependency",
            Self::System => "system",
        }
    }
}

impl ErrorCode {
    /// Get the category for this error code
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_code() {
        assert_eq!(ErrorCategory::from_code(0), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(999), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(4001), ErrorCategory::Order);
        assert_eq!(ErrorCategory::from_code(5003), ErrorCategory::Receiving);
        assert_eq!(ErrorCategory::from_code(6001), ErrorCategory::Integrity);
        assert_eq!(ErrorCategory::from_code(7001), ErrorCategory::Dependency);
        assert_eq!(ErrorCategory::from_code(9001), ErrorCategory::System);
        assert_eq!(ErrorCategory::from_code(10000), ErrorCategory::System);
    }

    #[test]
    fn test_error_code_category() {
        assert_eq!(ErrorCode::Success.category(), ErrorCategory::General);
        assert_eq!(ErrorCode::InvalidTransition.category(), ErrorCategory::Order);
        assert_eq!(ErrorCode::ExceedsOrdered.category(), ErrorCategory::Receiving);
        assert_eq!(ErrorCode::AuditFailed.category(), ErrorCategory::Integrity);
        assert_eq!(
            ErrorCode::ReservationFailed.category(),
            ErrorCategory::Dependency
        );
        assert_eq!(ErrorCode::DatabaseError.category(), ErrorCategory::System);
    }

    #[test]
    fn test_category_serialize() {
        let json = serde_json::to_string(&ErrorCategory::Receiving).unwrap();
        assert_eq!(json, "\"receiving\"");

        let category: ErrorCategory = serde_json::from_str("\"dependency\"").unwrap();
        assert_eq!(category, ErrorCategory::Dependency);
    }
}
