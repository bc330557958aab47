//! Request parameter checks shared by every entry point.

use common::UserId;

use crate::error::DomainError;

/// Longest venue or region name accepted.
pub const MAX_NAME_LEN: usize = 255;

/// Checks a venue or region name.
///
/// Names are exact, case-sensitive keys, so they are rejected rather than
/// trimmed when they carry surrounding whitespace.
pub fn validate_name<'a>(field: &'static str, value: &'a str) -> Result<&'a str, DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::InvalidInput(format!("{field} must not be empty")));
    }
    if value.trim() != value {
        return Err(DomainError::InvalidInput(format!(
            "{field} must not start or end with whitespace"
        )));
    }
    if value.chars().count() > MAX_NAME_LEN {
        return Err(DomainError::InvalidInput(format!(
            "{field} must be at most {MAX_NAME_LEN} characters"
        )));
    }
    if value.chars().any(char::is_control) {
        return Err(DomainError::InvalidInput(format!(
            "{field} must not contain control characters"
        )));
    }
    Ok(value)
}

/// Checks that a user id could have been issued by the identity service.
pub fn validate_user_id(user_id: UserId) -> Result<UserId, DomainError> {
    if !user_id.is_valid() {
        return Err(DomainError::InvalidInput(format!(
            "user_id must be positive, got {user_id}"
        )));
    }
    Ok(user_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_names() {
        assert_eq!(validate_name("venue_name", "Jakarta").unwrap(), "Jakarta");
        assert!(validate_name("venue_name", "Gelora Bung Karno").is_ok());
    }

    #[test]
    fn rejects_blank_and_padded_names() {
        assert!(validate_name("venue_name", "").is_err());
        assert!(validate_name("venue_name", "   ").is_err());
        assert!(validate_name("venue_name", " Jakarta").is_err());
    }

    #[test]
    fn rejects_overlong_and_control_characters() {
        let long = "x".repeat(MAX_NAME_LEN + 1);
        assert!(validate_name("region", &long).is_err());
        assert!(validate_name("region", &"x".repeat(MAX_NAME_LEN)).is_ok());
        assert!(validate_name("region", "Jak\narta").is_err());
    }

    #[test]
    fn rejects_non_positive_user_ids() {
        assert!(validate_user_id(UserId::new(1)).is_ok());
        assert!(validate_user_id(UserId::new(0)).is_err());
        assert!(validate_user_id(UserId::new(-1)).is_err());
    }
}
