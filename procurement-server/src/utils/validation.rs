//! Input validation helpers
//!
//! Text limits and checks shared by the state machine and the receiving
//! accumulator. SQLite TEXT has no built-in length enforcement.

use crate::orders::error::OrderError;

// ── Text length limits ──────────────────────────────────────────────

/// Notes, cancellation reasons, receipt notes
pub const MAX_NOTE_LEN: usize = 500;

/// Lot / batch identifiers
pub const MAX_LOT_LEN: usize = 64;

/// Actor identifiers (user name, service name)
pub const MAX_ACTOR_LEN: usize = 100;

/// Minimum cancellation justification, after trimming
pub const MIN_CANCEL_NOTE_LEN: usize = 5;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: Option<&str>,
    field: &str,
    max_len: usize,
) -> Result<(), OrderError> {
    if let Some(v) = value
        && v.chars().count() > max_len
    {
        return Err(OrderError::Validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.chars().count()
        )));
    }
    Ok(())
}

/// Cancellation must carry a justification of at least [`MIN_CANCEL_NOTE_LEN`] chars.
pub fn validate_cancel_note(note: Option<&str>) -> Result<(), OrderError> {
    let len = note.map(|n| n.trim().chars().count()).unwrap_or(0);
    if len < MIN_CANCEL_NOTE_LEN {
        return Err(OrderError::Validation(format!(
            "cancellation requires a note of at least {MIN_CANCEL_NOTE_LEN} characters"
        )));
    }
    Ok(())
}

/// Expiry dates are calendar dates (`YYYY-MM-DD`).
pub fn validate_expiry_date(value: Option<&str>) -> Result<(), OrderError> {
    if let Some(v) = value
        && chrono::NaiveDate::parse_from_str(v, "%Y-%m-%d").is_err()
    {
        return Err(OrderError::Validation(format!(
            "expiry_date must be YYYY-MM-DD, got {v:?}"
        )));
    }
    Ok(())
}
