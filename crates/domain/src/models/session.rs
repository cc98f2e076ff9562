//! Typed session value object for authenticated actors.
//!
//! The API boundary validates the caller's credentials once and produces a
//! `Session`; everything downstream works with this struct instead of a
//! loosely-typed claims bag.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role an authenticated actor holds in the system.
///
/// `Admin` is a session-only role; it is never granted by an invitation
/// token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionRole {
    Admin,
    LeadMentor,
    ProjectMentor,
    ExternalPartner,
    Student,
}

impl SessionRole {
    /// Canonical string form, matching the `role` JWT claim.
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionRole::Admin => "Admin",
            SessionRole::LeadMentor => "Lead Mentor",
            SessionRole::ProjectMentor => "Project Mentor",
            SessionRole::ExternalPartner => "External Partner",
            SessionRole::Student => "Student",
        }
    }

    /// Parses a role claim, case-insensitively.
    pub fn parse(input: &str) -> Option<Self> {
        let lowered = input.trim().to_lowercase();
        match lowered.as_str() {
            "admin" => Some(SessionRole::Admin),
            "lead mentor" => Some(SessionRole::LeadMentor),
            "project mentor" => Some(SessionRole::ProjectMentor),
            "external partner" => Some(SessionRole::ExternalPartner),
            "student" => Some(SessionRole::Student),
            _ => None,
        }
    }
}

impl std::fmt::Display for SessionRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An authenticated actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// ID of the signed-in user.
    pub actor_id: Uuid,
    /// Role held by the actor.
    pub role: SessionRole,
    /// Display name, when the credential carries one.
    pub name: Option<String>,
    /// Email, when the credential carries one.
    pub email: Option<String>,
}

impl Session {
    /// Whether the actor may administer invitations.
    pub fn is_admin_like(&self) -> bool {
        self.role == SessionRole::Admin
    }
}

/// Capability check: does the session hold one of the required roles?
pub fn has_role(session: &Session, required: &[SessionRole]) -> bool {
    required.contains(&session.role)
}
