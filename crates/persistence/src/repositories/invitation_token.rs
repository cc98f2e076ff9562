//! Repository for invitation token database operations.
//!
//! Every mutation on a token appends a best-effort entry to the audit ledger
//! with full before/after snapshots. Redemption runs its two writes
//! (membership grant + usage increment) in one transaction; the increment is
//! conditional on the use budget, so concurrent redemptions cannot push
//! `used_count` past `max_uses`.

use chrono::{DateTime, Utc};
use domain::models::TokenOperation;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::InvitationTokenEntity;
use crate::repositories::InvitationTokenLogRepository;

const TOKEN_COLUMNS: &str = "id, project_id, invitation_id, token_hash, role_to_grant, \
     expires_at, max_uses, used_count, revoked, notes, created_by, created_at";

/// Outcome of a redemption attempt.
#[derive(Debug, Clone)]
pub enum RedeemOutcome {
    /// Membership granted and usage incremented; holds the updated token.
    Redeemed(InvitationTokenEntity),
    /// The use budget was already spent (possibly by a concurrent redeem).
    UsageExceeded,
}

/// Repository for invitation token operations.
#[derive(Clone)]
pub struct InvitationTokenRepository {
    pool: PgPool,
    logs: InvitationTokenLogRepository,
}

impl InvitationTokenRepository {
    /// Creates a new invitation token repository.
    pub fn new(pool: PgPool) -> Self {
        let logs = InvitationTokenLogRepository::new(pool.clone());
        Self { pool, logs }
    }

    /// Creates a new invitation token and appends a `create` audit entry.
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        project_id: Uuid,
        invitation_id: Option<Uuid>,
        token_hash: &str,
        role_to_grant: &str,
        expires_at: DateTime<Utc>,
        max_uses: i32,
        notes: Option<&str>,
        created_by: Option<Uuid>,
    ) -> Result<InvitationTokenEntity, sqlx::Error> {
        let entity = sqlx::query_as::<_, InvitationTokenEntity>(&format!(
            r#"
            INSERT INTO invitation_tokens
                (project_id, invitation_id, token_hash, role_to_grant, expires_at,
                 max_uses, notes, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {TOKEN_COLUMNS}
            "#
        ))
        .bind(project_id)
        .bind(invitation_id)
        .bind(token_hash)
        .bind(role_to_grant)
        .bind(expires_at)
        .bind(max_uses)
        .bind(notes)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await?;

        self.logs
            .insert_async(TokenOperation::Create, None, Some(entity.snapshot()));

        Ok(entity)
    }

    /// Finds a token by ID.
    pub async fn find_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<InvitationTokenEntity>, sqlx::Error> {
        sqlx::query_as::<_, InvitationTokenEntity>(&format!(
            r#"
            SELECT {TOKEN_COLUMNS}
            FROM invitation_tokens
            WHERE id = $1
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Finds a token by ID within a project.
    pub async fn find_by_id_for_project(
        &self,
        id: Uuid,
        project_id: Uuid,
    ) -> Result<Option<InvitationTokenEntity>, sqlx::Error> {
        sqlx::query_as::<_, InvitationTokenEntity>(&format!(
            r#"
            SELECT {TOKEN_COLUMNS}
            FROM invitation_tokens
            WHERE id = $1 AND project_id = $2
            "#
        ))
        .bind(id)
        .bind(project_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Finds a token by ID, filtered to non-revoked, non-expired tokens.
    ///
    /// Exhausted tokens are returned so the caller can report the usage-limit
    /// error distinctly from an invalid token.
    pub async fn find_unexpired_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<InvitationTokenEntity>, sqlx::Error> {
        sqlx::query_as::<_, InvitationTokenEntity>(&format!(
            r#"
            SELECT {TOKEN_COLUMNS}
            FROM invitation_tokens
            WHERE id = $1 AND revoked = FALSE AND expires_at > NOW()
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Lists all non-revoked, non-expired tokens, newest first.
    ///
    /// This backs the tokenless redemption path, which has to hash-compare
    /// against every candidate. O(n) over live tokens; acceptable only while
    /// invitation volume stays small.
    pub async fn list_unexpired(&self) -> Result<Vec<InvitationTokenEntity>, sqlx::Error> {
        sqlx::query_as::<_, InvitationTokenEntity>(&format!(
            r#"
            SELECT {TOKEN_COLUMNS}
            FROM invitation_tokens
            WHERE revoked = FALSE AND expires_at > NOW()
            ORDER BY created_at DESC
            "#
        ))
        .fetch_all(&self.pool)
        .await
    }

    /// Lists a project's tokens with an optional status filter.
    pub async fn list_by_project(
        &self,
        project_id: Uuid,
        status: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<InvitationTokenEntity>, sqlx::Error> {
        let filter = status_condition(status);
        let query = format!(
            r#"
            SELECT {TOKEN_COLUMNS}
            FROM invitation_tokens
            WHERE project_id = $1 AND {filter}
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#
        );

        sqlx::query_as::<_, InvitationTokenEntity>(&query)
            .bind(project_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
    }

    /// Counts a project's tokens with an optional status filter.
    pub async fn count_by_project(
        &self,
        project_id: Uuid,
        status: Option<&str>,
    ) -> Result<i64, sqlx::Error> {
        let filter = status_condition(status);
        let query = format!(
            r#"
            SELECT COUNT(*) FROM invitation_tokens
            WHERE project_id = $1 AND {filter}
            "#
        );

        let result: (i64,) = sqlx::query_as(&query)
            .bind(project_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(result.0)
    }

    /// Redeems a token for the given user: grants project membership and
    /// increments the use count, atomically.
    ///
    /// The membership insert is idempotent; the increment is conditional on
    /// `used_count < max_uses` and the whole transaction rolls back when the
    /// budget is already spent. Appends an `update` audit entry on success.
    pub async fn redeem(
        &self,
        token: &InvitationTokenEntity,
        user_id: Uuid,
    ) -> Result<RedeemOutcome, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO project_members (project_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT (project_id, user_id) DO NOTHING
            "#,
        )
        .bind(token.project_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        let updated = sqlx::query_as::<_, InvitationTokenEntity>(&format!(
            r#"
            UPDATE invitation_tokens
            SET used_count = used_count + 1
            WHERE id = $1 AND used_count < max_uses
            RETURNING {TOKEN_COLUMNS}
            "#
        ))
        .bind(token.id)
        .fetch_optional(&mut *tx)
        .await?;

        match updated {
            Some(after) => {
                tx.commit().await?;

                tracing::info!(
                    token_id = %after.id,
                    project_id = %after.project_id,
                    user_id = %user_id,
                    used_count = after.used_count,
                    max_uses = after.max_uses,
                    "Invitation token redeemed"
                );

                self.logs.insert_async(
                    TokenOperation::Update,
                    Some(token.snapshot()),
                    Some(after.snapshot()),
                );

                Ok(RedeemOutcome::Redeemed(after))
            }
            None => {
                tx.rollback().await?;
                Ok(RedeemOutcome::UsageExceeded)
            }
        }
    }

    /// Revokes a token. Returns the updated row, or `None` when the token was
    /// already revoked (e.g. by a concurrent request).
    ///
    /// Tokens are never deleted; revocation is the terminal state an admin
    /// can force. Appends an `update` audit entry on success.
    pub async fn revoke(
        &self,
        token: &InvitationTokenEntity,
    ) -> Result<Option<InvitationTokenEntity>, sqlx::Error> {
        let updated = sqlx::query_as::<_, InvitationTokenEntity>(&format!(
            r#"
            UPDATE invitation_tokens
            SET revoked = TRUE
            WHERE id = $1 AND revoked = FALSE
            RETURNING {TOKEN_COLUMNS}
            "#
        ))
        .bind(token.id)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(after) = &updated {
            tracing::info!(token_id = %after.id, "Invitation token revoked");
            self.logs.insert_async(
                TokenOperation::Update,
                Some(token.snapshot()),
                Some(after.snapshot()),
            );
        }

        Ok(updated)
    }
}

/// SQL condition for a derived token status. `None` matches everything.
fn status_condition(status: Option<&str>) -> &'static str {
    match status {
        Some("active") => {
            "revoked = FALSE AND expires_at > NOW() AND used_count < max_uses"
        }
        Some("expired") => "revoked = FALSE AND expires_at <= NOW()",
        Some("revoked") => "revoked = TRUE",
        Some("exhausted") => {
            "revoked = FALSE AND expires_at > NOW() AND used_count >= max_uses"
        }
        _ => "TRUE",
    }
}
