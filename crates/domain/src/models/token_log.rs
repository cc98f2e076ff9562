//! Audit-ledger records for invitation token mutations.
//!
//! One record per create/update/delete, with full before/after snapshots of
//! the token row serialized as opaque JSON. The ledger references no live
//! entity; consumers re-derive identity from the snapshots.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Kind of mutation an audit record captures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenOperation {
    Create,
    Update,
    Delete,
}

impl TokenOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenOperation::Create => "create",
            TokenOperation::Update => "update",
            TokenOperation::Delete => "delete",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "create" => Some(TokenOperation::Create),
            "update" => Some(TokenOperation::Update),
            "delete" => Some(TokenOperation::Delete),
            _ => None,
        }
    }
}

impl std::fmt::Display for TokenOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the append-only token audit ledger.
#[derive(Debug, Clone)]
pub struct TokenAuditRecord {
    pub operation: TokenOperation,
    pub before: Option<JsonValue>,
    pub after: Option<JsonValue>,
    pub timestamp: DateTime<Utc>,
}

impl TokenAuditRecord {
    /// Token id recorded in the `after` snapshot, if present.
    pub fn after_token_id(&self) -> Option<&str> {
        self.after.as_ref()?.get("id")?.as_str()
    }

    /// `used_count` from a snapshot, if present.
    fn used_count(snapshot: Option<&JsonValue>) -> Option<i64> {
        snapshot?.get("used_count")?.as_i64()
    }

    /// Whether this record captures a usage increment (a redemption).
    pub fn is_usage_increment(&self) -> bool {
        match (
            Self::used_count(self.before.as_ref()),
            Self::used_count(self.after.as_ref()),
        ) {
            (Some(before), Some(after)) => after > before,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_operation_round_trip() {
        for op in [
            TokenOperation::Create,
            TokenOperation::Update,
            TokenOperation::Delete,
        ] {
            assert_eq!(TokenOperation::parse(op.as_str()), Some(op));
        }
        assert_eq!(TokenOperation::parse("truncate"), None);
    }

    #[test]
    fn test_after_token_id() {
        let record = TokenAuditRecord {
            operation: TokenOperation::Create,
            before: None,
            after: Some(json!({"id": "token-123", "used_count": 0})),
            timestamp: Utc::now(),
        };
        assert_eq!(record.after_token_id(), Some("token-123"));
    }

    #[test]
    fn test_is_usage_increment() {
        let increment = TokenAuditRecord {
            operation: TokenOperation::Update,
            before: Some(json!({"id": "t", "used_count": 0})),
            after: Some(json!({"id": "t", "used_count": 1})),
            timestamp: Utc::now(),
        };
        assert!(increment.is_usage_increment());

        let revocation = TokenAuditRecord {
            operation: TokenOperation::Update,
            before: Some(json!({"id": "t", "used_count": 2, "revoked": false})),
            after: Some(json!({"id": "t", "used_count": 2, "revoked": true})),
            timestamp: Utc::now(),
        };
        assert!(!revocation.is_usage_increment());
    }

    #[test]
    fn test_create_is_not_usage_increment() {
        let record = TokenAuditRecord {
            operation: TokenOperation::Create,
            before: None,
            after: Some(json!({"id": "t", "used_count": 0})),
            timestamp: Utc::now(),
        };
        assert!(!record.is_usage_increment());
    }
}
