//! Repository for project invitation database operations.
//!
//! A project invitation is the one-per-(project, email) record that tokens
//! attach to. The unique constraint on the pair makes find-or-create safe
//! under concurrent issuance.

use shared::validation::normalize_email;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::ProjectInvitationEntity;

/// Repository for project invitation operations.
#[derive(Clone)]
pub struct ProjectInvitationRepository {
    pool: PgPool,
}

impl ProjectInvitationRepository {
    /// Creates a new project invitation repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Finds the invitation record for a (project, email) pair, creating it
    /// when absent.
    ///
    /// Implemented as a single upsert so two concurrent issuance calls for
    /// the same pair converge on one row. An existing record keeps its id;
    /// a missing `user_id` is backfilled when the caller resolves one.
    pub async fn find_or_create(
        &self,
        project_id: Uuid,
        email: &str,
        user_id: Option<Uuid>,
    ) -> Result<ProjectInvitationEntity, sqlx::Error> {
        sqlx::query_as::<_, ProjectInvitationEntity>(
            r#"
            INSERT INTO project_invitations (project_id, email, user_id)
            VALUES ($1, $2, $3)
            ON CONFLICT (project_id, email)
            DO UPDATE SET user_id = COALESCE(project_invitations.user_id, EXCLUDED.user_id)
            RETURNING id, project_id, email, user_id, created_at
            "#,
        )
        .bind(project_id)
        .bind(normalize_email(email))
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
    }

    /// Finds an invitation record by ID.
    pub async fn find_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<ProjectInvitationEntity>, sqlx::Error> {
        sqlx::query_as::<_, ProjectInvitationEntity>(
            r#"
            SELECT id, project_id, email, user_id, created_at
            FROM project_invitations
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Finds the invitation record for a (project, email) pair.
    pub async fn find_by_project_and_email(
        &self,
        project_id: Uuid,
        email: &str,
    ) -> Result<Option<ProjectInvitationEntity>, sqlx::Error> {
        sqlx::query_as::<_, ProjectInvitationEntity>(
            r#"
            SELECT id, project_id, email, user_id, created_at
            FROM project_invitations
            WHERE project_id = $1 AND email = $2
            "#,
        )
        .bind(project_id)
        .bind(normalize_email(email))
        .fetch_optional(&self.pool)
        .await
    }

    /// Counts invitation records for a (project, email) pair.
    ///
    /// Used by tests to assert the dedup invariant; the unique constraint
    /// keeps this at 0 or 1.
    pub async fn count_by_project_and_email(
        &self,
        project_id: Uuid,
        email: &str,
    ) -> Result<i64, sqlx::Error> {
        let result: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM project_invitations
            WHERE project_id = $1 AND email = $2
            "#,
        )
        .bind(project_id)
        .bind(normalize_email(email))
        .fetch_one(&self.pool)
        .await?;

        Ok(result.0)
    }
}
