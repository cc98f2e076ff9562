//! Project invitation entity (database row mapping).
//!
//! One row per (project, email) pair a person may be invited into. The table
//! enforces uniqueness of the pair; tokens hang off this record.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the project_invitations table.
#[derive(Debug, Clone, FromRow)]
pub struct ProjectInvitationEntity {
    pub id: Uuid,
    pub project_id: Uuid,
    /// Normalized (lowercased) recipient email.
    pub email: String,
    /// Set when the invitee already has an account.
    pub user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl ProjectInvitationEntity {
    /// Whether this record is for the given email (emails are stored
    /// normalized, so compare case-insensitively).
    pub fn is_for_email(&self, email: &str) -> bool {
        self.email.eq_ignore_ascii_case(email.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_for_email_case_insensitive() {
        let invitation = ProjectInvitationEntity {
            id: Uuid::new_v4(),
            project_id: Uuid::new_v4(),
            email: "student@example.com".to_string(),
            user_id: None,
            created_at: Utc::now(),
        };

        assert!(invitation.is_for_email("student@example.com"));
        assert!(invitation.is_for_email("Student@Example.COM"));
        assert!(invitation.is_for_email("  student@example.com "));
        assert!(!invitation.is_for_email("other@example.com"));
    }
}
