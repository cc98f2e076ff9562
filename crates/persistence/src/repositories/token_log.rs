//! Repository for the invitation token audit ledger.
//!
//! The ledger is append-only: one row per create/update/delete on an
//! invitation token, carrying full before/after snapshots. Writes triggered
//! by token mutations are best-effort and must never fail the primary
//! operation.

use domain::models::{TokenAuditRecord, TokenOperation};
use sqlx::PgPool;

use crate::entities::InvitationTokenLogEntity;

/// Repository for invitation token log operations.
#[derive(Clone)]
pub struct InvitationTokenLogRepository {
    pool: PgPool,
}

impl InvitationTokenLogRepository {
    /// Creates a new invitation token log repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Appends an audit entry.
    pub async fn insert(
        &self,
        operation: TokenOperation,
        before: Option<serde_json::Value>,
        after: Option<serde_json::Value>,
    ) -> Result<InvitationTokenLogEntity, sqlx::Error> {
        sqlx::query_as::<_, InvitationTokenLogEntity>(
            r#"
            INSERT INTO invitation_token_logs (operation, before, after)
            VALUES ($1, $2, $3)
            RETURNING id, operation, before, after, timestamp
            "#,
        )
        .bind(operation.as_str())
        .bind(before)
        .bind(after)
        .fetch_one(&self.pool)
        .await
    }

    /// Appends an audit entry asynchronously (fire and forget).
    ///
    /// Uses tokio::spawn so the triggering mutation is never blocked on, or
    /// failed by, the audit write. Failures are logged.
    pub fn insert_async(
        &self,
        operation: TokenOperation,
        before: Option<serde_json::Value>,
        after: Option<serde_json::Value>,
    ) {
        let pool = self.pool.clone();
        tokio::spawn(async move {
            let repo = InvitationTokenLogRepository::new(pool);
            if let Err(e) = repo.insert(operation, before, after).await {
                tracing::error!(
                    operation = %operation,
                    "Failed to insert invitation token log: {}",
                    e
                );
            }
        });
    }

    /// Lists all audit entries, oldest first, as domain records.
    ///
    /// Rows with unknown operation strings are skipped.
    pub async fn list_all(&self) -> Result<Vec<TokenAuditRecord>, sqlx::Error> {
        let entities = sqlx::query_as::<_, InvitationTokenLogEntity>(
            r#"
            SELECT id, operation, before, after, timestamp
            FROM invitation_token_logs
            ORDER BY timestamp ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(entities
            .into_iter()
            .filter_map(InvitationTokenLogEntity::into_domain)
            .collect())
    }

    /// Counts entries for a given operation kind.
    pub async fn count_by_operation(
        &self,
        operation: TokenOperation,
    ) -> Result<i64, sqlx::Error> {
        let result: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM invitation_token_logs
            WHERE operation = $1
            "#,
        )
        .bind(operation.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(result.0)
    }
}
