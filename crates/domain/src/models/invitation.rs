//! Invitation issuance and acceptance DTOs.
//!
//! Wire names are camelCase to match the admin frontend. Validation that can
//! be expressed declaratively lives on the request types; role normalization
//! and expiry parsing have dedicated helpers because their failure modes name
//! a specific field.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::validation::{parse_expires_at, validate_email_shape};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::role::{GrantRole, RoleParseError};

/// Request to issue an invitation to a recipient (with email dispatch).
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvitationRequest {
    /// Role the token grants on redemption. Defaults to Student.
    pub role_to_grant: Option<String>,

    /// Expiry timestamp (RFC 3339).
    pub expires_at: String,

    /// Use budget for the minted token (1-100, default 1).
    #[validate(range(min = 1, max = 100, message = "Invalid maxUses"))]
    pub max_uses: Option<i32>,

    /// Free-form notes for admin tracking.
    #[validate(length(max = 1000, message = "Notes too long"))]
    pub notes: Option<String>,

    /// Existing user to invite; when set, name and email are resolved from
    /// the user record.
    pub student_id: Option<Uuid>,

    /// Recipient email, required when no studentId is given.
    #[validate(custom(function = "validate_email_opt"))]
    pub recipient_email: Option<String>,

    /// Recipient display name used in the email greeting.
    #[validate(length(max = 100, message = "Recipient name too long"))]
    pub recipient_name: Option<String>,
}

/// Request to mint a bare invitation token (no recipient, no email).
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTokenRequest {
    /// Role the token grants on redemption. Defaults to Student.
    pub role_to_grant: Option<String>,

    /// Expiry timestamp (RFC 3339).
    pub expires_at: String,

    /// Use budget for the minted token (1-100, default 1).
    #[validate(range(min = 1, max = 100, message = "Invalid maxUses"))]
    pub max_uses: Option<i32>,

    /// Free-form notes for admin tracking.
    #[validate(length(max = 1000, message = "Notes too long"))]
    pub notes: Option<String>,
}

impl CreateInvitationRequest {
    /// Effective use budget.
    pub fn max_uses(&self) -> i32 {
        self.max_uses.unwrap_or(1)
    }

    /// Parsed and normalized role to grant.
    pub fn role(&self) -> Result<GrantRole, RoleParseError> {
        parse_role(self.role_to_grant.as_deref())
    }

    /// Parsed expiry, `None` when the wire value is not a valid date.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        parse_expires_at(&self.expires_at)
    }
}

impl CreateTokenRequest {
    /// Effective use budget.
    pub fn max_uses(&self) -> i32 {
        self.max_uses.unwrap_or(1)
    }

    /// Parsed and normalized role to grant.
    pub fn role(&self) -> Result<GrantRole, RoleParseError> {
        parse_role(self.role_to_grant.as_deref())
    }

    /// Parsed expiry, `None` when the wire value is not a valid date.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        parse_expires_at(&self.expires_at)
    }
}

/// Response after issuing an invitation with email dispatch.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvitationResponse {
    pub message: String,
    pub token_id: Uuid,
    pub invite_link: String,
    pub expires_at: DateTime<Utc>,
}

/// Response after minting a bare token. The raw token is shown exactly once.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTokenResponse {
    pub id: Uuid,
    pub token: String,
    pub invite_link: String,
    pub expires_at: DateTime<Utc>,
}

/// Request to redeem an invitation token.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptInvitationRequest {
    /// The raw token from the invite link. Checked by the handler so the
    /// missing-token error keeps the documented shape.
    pub token: Option<String>,

    /// Token id from the invite link; enables the indexed lookup path.
    pub invitation_id: Option<Uuid>,
}

/// Response after a successful redemption.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptInvitationResponse {
    pub message: String,
    pub project_id: Uuid,
}

fn parse_role(input: Option<&str>) -> Result<GrantRole, RoleParseError> {
    match input {
        None => Ok(GrantRole::Student),
        Some(value) if value.trim().is_empty() => Ok(GrantRole::Student),
        Some(value) => GrantRole::parse(value),
    }
}

fn validate_email_opt(email: &str) -> Result<(), ValidationError> {
    validate_email_shape(email)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn valid_request() -> CreateInvitationRequest {
        CreateInvitationRequest {
            role_to_grant: Some("student".to_string()),
            expires_at: (Utc::now() + Duration::days(7)).to_rfc3339(),
            max_uses: Some(1),
            notes: Some("Cohort 12 invite".to_string()),
            student_id: None,
            recipient_email: Some("student@example.com".to_string()),
            recipient_name: Some("Test Student".to_string()),
        }
    }

    #[test]
    fn test_valid_request_passes_validation() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn test_role_defaults_to_student() {
        let mut request = valid_request();
        request.role_to_grant = None;
        assert_eq!(request.role().unwrap(), GrantRole::Student);

        request.role_to_grant = Some("  ".to_string());
        assert_eq!(request.role().unwrap(), GrantRole::Student);
    }

    #[test]
    fn test_role_is_normalized() {
        let mut request = valid_request();
        request.role_to_grant = Some("lead mentor".to_string());
        assert_eq!(request.role().unwrap(), GrantRole::LeadMentor);
    }

    #[test]
    fn test_invalid_role_rejected() {
        let mut request = valid_request();
        request.role_to_grant = Some("Overlord".to_string());
        assert!(request.role().is_err());
    }

    #[test]
    fn test_max_uses_out_of_range() {
        let mut request = valid_request();
        request.max_uses = Some(0);
        assert!(request.validate().is_err());

        request.max_uses = Some(101);
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_max_uses_defaults_to_one() {
        let mut request = valid_request();
        request.max_uses = None;
        assert!(request.validate().is_ok());
        assert_eq!(request.max_uses(), 1);
    }

    #[test]
    fn test_notes_too_long() {
        let mut request = valid_request();
        request.notes = Some("x".repeat(1001));
        let err = request.validate().unwrap_err();
        assert!(err.field_errors().contains_key("notes"));
    }

    #[test]
    fn test_notes_at_limit_ok() {
        let mut request = valid_request();
        request.notes = Some("x".repeat(1000));
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_invalid_recipient_email() {
        let mut request = valid_request();
        request.recipient_email = Some("not-an-email".to_string());
        let err = request.validate().unwrap_err();
        assert!(err.field_errors().contains_key("recipient_email"));
    }

    #[test]
    fn test_expires_at_parsing() {
        let request = valid_request();
        assert!(request.expires_at().is_some());

        let mut bad = valid_request();
        bad.expires_at = "invalid-date".to_string();
        assert!(bad.expires_at().is_none());
    }

    #[test]
    fn test_accept_request_camel_case_wire_names() {
        let json = r#"{"token": "raw-value", "invitationId": "5a44ed46-7d07-4d3e-a1d7-9b9f4be5a46a"}"#;
        let request: AcceptInvitationRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.token.as_deref(), Some("raw-value"));
        assert!(request.invitation_id.is_some());
    }

    #[test]
    fn test_create_request_camel_case_wire_names() {
        let json = r#"{
            "roleToGrant": "student",
            "expiresAt": "2026-09-01T00:00:00Z",
            "maxUses": 3,
            "recipientEmail": "student@example.com"
        }"#;
        let request: CreateInvitationRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.max_uses(), 3);
        assert_eq!(request.role().unwrap(), GrantRole::Student);
    }
}
