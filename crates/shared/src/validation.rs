//! Common validation utilities for invitation inputs.

use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

/// Maximum length of the notes field on an invitation token.
pub const MAX_NOTES_LENGTH: usize = 1000;

/// Maximum length of a recipient email address.
pub const MAX_EMAIL_LENGTH: usize = 255;

lazy_static! {
    /// Basic email-shape pattern: something@something.something, no whitespace.
    static ref EMAIL_SHAPE: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
        .expect("email shape regex is valid");
}

/// Validates that a string looks like an email address.
///
/// This is a shape check, not full RFC 5322 validation; the address is only
/// used as a delivery target and a dedup key.
pub fn validate_email_shape(email: &str) -> Result<(), ValidationError> {
    if email.len() > MAX_EMAIL_LENGTH {
        let mut err = ValidationError::new("email_too_long");
        err.message = Some("Email must be at most 255 characters".into());
        return Err(err);
    }
    if EMAIL_SHAPE.is_match(email) {
        Ok(())
    } else {
        let mut err = ValidationError::new("email_shape");
        err.message = Some("Invalid email format".into());
        Err(err)
    }
}

/// Parses an expiry timestamp from its wire representation (RFC 3339).
///
/// Returns `None` when the value does not parse as a date. Whether the value
/// must also lie in the future is a policy decision made by the caller.
pub fn parse_expires_at(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Normalizes an email for storage and comparison: trimmed and lowercased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email_shape_accepts_plain_addresses() {
        assert!(validate_email_shape("student@example.com").is_ok());
        assert!(validate_email_shape("first.last+tag@sub.domain.org").is_ok());
    }

    #[test]
    fn test_validate_email_shape_rejects_malformed() {
        assert!(validate_email_shape("not-an-email").is_err());
        assert!(validate_email_shape("missing@tld").is_err());
        assert!(validate_email_shape("two words@example.com").is_err());
        assert!(validate_email_shape("@example.com").is_err());
        assert!(validate_email_shape("").is_err());
    }

    #[test]
    fn test_validate_email_shape_rejects_overlong() {
        let long = format!("{}@example.com", "a".repeat(250));
        assert!(long.len() > MAX_EMAIL_LENGTH);
        assert!(validate_email_shape(&long).is_err());
    }

    #[test]
    fn test_parse_expires_at_rfc3339() {
        let parsed = parse_expires_at("2026-09-01T12:00:00Z").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2026-09-01T12:00:00+00:00");

        // Offset forms normalize to UTC
        let parsed = parse_expires_at("2026-09-01T14:00:00+02:00").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2026-09-01T12:00:00+00:00");
    }

    #[test]
    fn test_parse_expires_at_rejects_garbage() {
        assert!(parse_expires_at("invalid-date").is_none());
        assert!(parse_expires_at("2026-13-40").is_none());
        assert!(parse_expires_at("").is_none());
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Student@Example.COM "), "student@example.com");
        assert_eq!(normalize_email("plain@example.com"), "plain@example.com");
    }
}
