//! Project entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the projects table.
#[derive(Debug, Clone, FromRow)]
pub struct ProjectEntity {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}
