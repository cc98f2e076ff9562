//! Repository for project database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::ProjectEntity;

/// Repository for project operations.
#[derive(Clone)]
pub struct ProjectRepository {
    pool: PgPool,
}

impl ProjectRepository {
    /// Creates a new project repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates a project.
    pub async fn create(&self, name: &str) -> Result<ProjectEntity, sqlx::Error> {
        sqlx::query_as::<_, ProjectEntity>(
            r#"
            INSERT INTO projects (name)
            VALUES ($1)
            RETURNING id, name, created_at
            "#,
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await
    }

    /// Finds a project by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<ProjectEntity>, sqlx::Error> {
        sqlx::query_as::<_, ProjectEntity>(
            r#"
            SELECT id, name, created_at
            FROM projects
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Adds a user to a project's member set.
    ///
    /// Idempotent: adding an existing member is a no-op. Returns `true` when
    /// a new membership row was inserted.
    pub async fn add_member(&self, project_id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO project_members (project_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT (project_id, user_id) DO NOTHING
            "#,
        )
        .bind(project_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Checks whether a user is a member of a project.
    pub async fn is_member(&self, project_id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let result: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM project_members
            WHERE project_id = $1 AND user_id = $2
            "#,
        )
        .bind(project_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(result.0 > 0)
    }

    /// Counts a project's members.
    pub async fn member_count(&self, project_id: Uuid) -> Result<i64, sqlx::Error> {
        let result: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM project_members
            WHERE project_id = $1
            "#,
        )
        .bind(project_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(result.0)
    }
}
