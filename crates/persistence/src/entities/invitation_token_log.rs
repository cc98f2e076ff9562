//! Invitation token audit-log entity.

use chrono::{DateTime, Utc};
use domain::models::{TokenAuditRecord, TokenOperation};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the invitation_token_logs table.
#[derive(Debug, Clone, FromRow)]
pub struct InvitationTokenLogEntity {
    pub id: Uuid,
    /// "create", "update" or "delete".
    pub operation: String,
    /// Full serialized token row before the mutation.
    pub before: Option<serde_json::Value>,
    /// Full serialized token row after the mutation.
    pub after: Option<serde_json::Value>,
    pub timestamp: DateTime<Utc>,
}

impl InvitationTokenLogEntity {
    /// Converts the row into a domain audit record.
    ///
    /// Rows with an unknown operation string are dropped (`None`); the ledger
    /// is append-only and tolerates unreadable history.
    pub fn into_domain(self) -> Option<TokenAuditRecord> {
        let operation = TokenOperation::parse(&self.operation)?;
        Some(TokenAuditRecord {
            operation,
            before: self.before,
            after: self.after,
            timestamp: self.timestamp,
        })
    }
}
