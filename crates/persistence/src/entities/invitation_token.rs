//! Invitation token entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::TokenStatus;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the invitation_tokens table.
///
/// Serializes for audit snapshots; the stored value is the Argon2 hash, never
/// the raw token, so snapshots leak nothing redeemable.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct InvitationTokenEntity {
    pub id: Uuid,
    pub project_id: Uuid,
    /// Owning invitation record; absent for bare (token-only) issuance.
    pub invitation_id: Option<Uuid>,
    pub token_hash: String,
    pub role_to_grant: String,
    pub expires_at: DateTime<Utc>,
    pub max_uses: i32,
    pub used_count: i32,
    pub revoked: bool,
    pub notes: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl InvitationTokenEntity {
    /// Whether the token can still be redeemed.
    pub fn is_redeemable(&self) -> bool {
        !self.revoked && self.expires_at > Utc::now() && self.used_count < self.max_uses
    }

    /// Whether the expiry has passed.
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }

    /// Whether the use budget is spent.
    pub fn is_exhausted(&self) -> bool {
        self.used_count >= self.max_uses
    }

    /// Derived lifecycle status.
    pub fn status(&self) -> TokenStatus {
        TokenStatus::derive(
            self.revoked,
            self.expires_at,
            self.used_count,
            self.max_uses,
            Utc::now(),
        )
    }

    /// Full-row snapshot for the audit ledger.
    pub fn snapshot(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn token(revoked: bool, expires_in: Duration, used: i32, max: i32) -> InvitationTokenEntity {
        InvitationTokenEntity {
            id: Uuid::new_v4(),
            project_id: Uuid::new_v4(),
            invitation_id: Some(Uuid::new_v4()),
            token_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
            role_to_grant: "Student".to_string(),
            expires_at: Utc::now() + expires_in,
            max_uses: max,
            used_count: used,
            revoked,
            notes: None,
            created_by: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_is_redeemable_fresh_token() {
        assert!(token(false, Duration::days(7), 0, 1).is_redeemable());
    }

    #[test]
    fn test_not_redeemable_when_revoked() {
        assert!(!token(true, Duration::days(7), 0, 1).is_redeemable());
    }

    #[test]
    fn test_not_redeemable_when_expired() {
        assert!(!token(false, Duration::seconds(-1), 0, 1).is_redeemable());
    }

    #[test]
    fn test_not_redeemable_when_exhausted() {
        assert!(!token(false, Duration::days(7), 1, 1).is_redeemable());
        assert!(!token(false, Duration::days(7), 5, 5).is_redeemable());
    }

    #[test]
    fn test_status_derivation() {
        assert_eq!(token(false, Duration::days(7), 0, 1).status(), TokenStatus::Active);
        assert_eq!(token(true, Duration::days(7), 0, 1).status(), TokenStatus::Revoked);
        assert_eq!(
            token(false, Duration::seconds(-1), 0, 1).status(),
            TokenStatus::Expired
        );
        assert_eq!(
            token(false, Duration::days(7), 3, 3).status(),
            TokenStatus::Exhausted
        );
    }

    #[test]
    fn test_snapshot_contains_state_but_not_raw_token() {
        let entity = token(false, Duration::days(7), 0, 3);
        let snapshot = entity.snapshot();

        assert_eq!(snapshot["id"], serde_json::json!(entity.id.to_string()));
        assert_eq!(snapshot["used_count"], serde_json::json!(0));
        assert_eq!(snapshot["max_uses"], serde_json::json!(3));
        // The only secret-adjacent field is the one-way hash
        assert!(snapshot["token_hash"]
            .as_str()
            .unwrap()
            .starts_with("$argon2id$"));
    }
}
