//! Input validation helpers
//!
//! Text length constants and field checks applied when a request becomes a
//! draft. PostgreSQL TEXT has no built-in length enforcement.

use shared::error::{AppError, ErrorCode};

// ── Text length limits ──────────────────────────────────────────────

/// Names, brands, nation, region
pub const MAX_NAME_LEN: usize = 200;

/// Tasting notes and personal notes
pub const MAX_NOTE_LEN: usize = 2000;

/// Flavor tags, pairing icons and names
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Image references
pub const MAX_URL_LEN: usize = 2048;

// ── Validation helpers ──────────────────────────────────────────────

/// Required string: present, non-blank and within the length limit.
pub fn validate_required_text(
    value: Option<String>,
    field: &str,
    max_len: usize,
) -> Result<String, AppError> {
    let Some(value) = value.filter(|v| !v.trim().is_empty()) else {
        return Err(AppError::required(field));
    };
    validate_text(&value, field, max_len)?;
    Ok(value)
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value {
        validate_text(v, field, max_len)?;
    }
    Ok(())
}

/// Numbers must be finite; NaN and infinities cannot be stored meaningfully.
pub fn validate_number(value: Option<f64>, field: &str) -> Result<(), AppError> {
    if let Some(v) = value
        && !v.is_finite()
    {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            format!("{field} must be a finite number"),
        )
        .with_detail("field", field));
    }
    Ok(())
}

/// Length check in characters, not bytes.
pub fn validate_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    let len = value.chars().count();
    if len > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({len} chars, max {max_len})"
        ))
        .with_detail("field", field));
    }
    Ok(())
}
