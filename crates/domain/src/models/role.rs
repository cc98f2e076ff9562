//! Roles granted by invitation tokens.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a role string does not match any known role.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid role: {0}")]
pub struct RoleParseError(pub String);

/// Role a redeemed invitation grants on the target project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrantRole {
    Student,
    ProjectMentor,
    LeadMentor,
    ExternalPartner,
}

impl GrantRole {
    /// All grantable roles, in display order.
    pub const ALL: [GrantRole; 4] = [
        GrantRole::Student,
        GrantRole::ProjectMentor,
        GrantRole::LeadMentor,
        GrantRole::ExternalPartner,
    ];

    /// Canonical Title Case representation, as stored and returned.
    pub fn as_str(&self) -> &'static str {
        match self {
            GrantRole::Student => "Student",
            GrantRole::ProjectMentor => "Project Mentor",
            GrantRole::LeadMentor => "Lead Mentor",
            GrantRole::ExternalPartner => "External Partner",
        }
    }

    /// Parses a role from arbitrary input, case-insensitively.
    ///
    /// Input is normalized to Title Case per word before matching, so
    /// `"student"`, `"STUDENT"` and `"Student"` all yield [`GrantRole::Student`].
    pub fn parse(input: &str) -> Result<Self, RoleParseError> {
        let normalized = title_case(input.trim());
        Self::ALL
            .iter()
            .copied()
            .find(|role| role.as_str() == normalized)
            .ok_or_else(|| RoleParseError(input.to_string()))
    }
}

impl std::fmt::Display for GrantRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for GrantRole {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for GrantRole {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        GrantRole::parse(&value).map_err(serde::de::Error::custom)
    }
}

/// Uppercases the first letter of each whitespace-separated word and
/// lowercases the rest.
fn title_case(input: &str) -> String {
    input
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_canonical_forms() {
        assert_eq!(GrantRole::parse("Student").unwrap(), GrantRole::Student);
        assert_eq!(
            GrantRole::parse("Project Mentor").unwrap(),
            GrantRole::ProjectMentor
        );
        assert_eq!(
            GrantRole::parse("Lead Mentor").unwrap(),
            GrantRole::LeadMentor
        );
        assert_eq!(
            GrantRole::parse("External Partner").unwrap(),
            GrantRole::ExternalPartner
        );
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(GrantRole::parse("student").unwrap(), GrantRole::Student);
        assert_eq!(GrantRole::parse("STUDENT").unwrap(), GrantRole::Student);
        assert_eq!(
            GrantRole::parse("lead mentor").unwrap(),
            GrantRole::LeadMentor
        );
        assert_eq!(
            GrantRole::parse("eXtErNaL pArTnEr").unwrap(),
            GrantRole::ExternalPartner
        );
    }

    #[test]
    fn test_parse_trims_whitespace() {
        assert_eq!(GrantRole::parse("  student  ").unwrap(), GrantRole::Student);
    }

    #[test]
    fn test_parse_rejects_unknown_roles() {
        assert!(GrantRole::parse("InvalidRole").is_err());
        assert!(GrantRole::parse("Admin").is_err());
        assert!(GrantRole::parse("").is_err());
    }

    #[test]
    fn test_display_is_title_case() {
        assert_eq!(GrantRole::Student.to_string(), "Student");
        assert_eq!(GrantRole::ProjectMentor.to_string(), "Project Mentor");
    }

    #[test]
    fn test_serde_round_trip() {
        let json = serde_json::to_string(&GrantRole::LeadMentor).unwrap();
        assert_eq!(json, "\"Lead Mentor\"");

        let parsed: GrantRole = serde_json::from_str("\"lead mentor\"").unwrap();
        assert_eq!(parsed, GrantRole::LeadMentor);
    }

    #[test]
    fn test_deserialize_rejects_unknown() {
        let result: Result<GrantRole, _> = serde_json::from_str("\"Superadmin\"");
        assert!(result.is_err());
    }
}
