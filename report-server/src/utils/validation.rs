//! Input validation helpers
//!
//! Text length limits and numeric checks shared by the CRUD handlers.
//! The reconciliation rules themselves live in [`crate::recon`]; these
//! helpers guard the request surface before anything reaches the engine.

use rust_decimal::Decimal;

use crate::utils::AppError;

// ========== Text length limits ==========

/// Entity names: venue, user display name, etc.
pub const MAX_NAME_LEN: usize = 200;

/// Notes and line-item reasons
pub const MAX_REASON_LEN: usize = 500;

/// Usernames
pub const MAX_USERNAME_LEN: usize = 100;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;

/// Addresses
pub const MAX_ADDRESS_LEN: usize = 500;

/// Upper bound for any single monetary field (1,000,000)
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

// ========== Validation helpers ==========

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

/// Validate a monetary amount: non-negative and below [`MAX_AMOUNT`].
///
/// Negative or absurd amounts reaching the engine would be a caller bug;
/// they are rejected here at the request boundary.
pub fn validate_amount(value: Decimal, field: &str) -> Result<(), AppError> {
    if value < Decimal::ZERO {
        return Err(AppError::validation(format!(
            "{field} must be non-negative, got {value}"
        )));
    }
    if value > MAX_AMOUNT {
        return Err(AppError::validation(format!(
            "{field} exceeds maximum allowed ({MAX_AMOUNT}), got {value}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_required_text() {
        assert!(validate_required_text("  ", "name", MAX_NAME_LEN).is_err());
        assert!(validate_required_text("Centrum", "name", MAX_NAME_LEN).is_ok());
    }

    #[test]
    fn rejects_negative_amounts() {
        assert!(validate_amount(Decimal::new(-1, 2), "cash").is_err());
        assert!(validate_amount(Decimal::ZERO, "cash").is_ok());
        assert!(validate_amount(Decimal::new(99_999, 2), "cash").is_ok());
    }

    #[test]
    fn rejects_amounts_above_cap() {
        assert!(validate_amount(MAX_AMOUNT, "cash").is_ok());
        assert!(validate_amount(MAX_AMOUNT + Decimal::ONE, "cash").is_err());
    }
}
