//! Invitation token management routes (admin surface).
//!
//! Bare token issuance returns the raw token exactly once; afterwards only
//! metadata is visible. Revocation flips the flag and leaves the row in
//! place, so the audit trail stays complete.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use domain::models::{
    CreateTokenRequest, CreateTokenResponse, InvitationTokenResponse, ListTokensQuery,
    ListTokensResponse, TokenPagination,
};
use persistence::entities::InvitationTokenEntity;
use persistence::repositories::{InvitationTokenRepository, ProjectRepository};
use shared::token::{generate_invite_token, hash_invite_token};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::SessionAuth;
use crate::routes::invitations::{build_invite_link, parse_expiry, parse_role};

/// POST /api/projects/:project_id/invitationTokens
///
/// Mint a bare invitation token with no recipient record and no email
/// dispatch. Used for link-only distribution channels.
pub async fn create_token(
    State(state): State<AppState>,
    SessionAuth(session): SessionAuth,
    Path(project_id): Path<Uuid>,
    Json(request): Json<CreateTokenRequest>,
) -> Result<Json<CreateTokenResponse>, ApiError> {
    if !session.is_admin_like() {
        return Err(ApiError::Forbidden("Admin access required".to_string()));
    }

    request.validate()?;
    let role = parse_role(request.role())?;
    let expires_at = parse_expiry(&state, request.expires_at())?;

    ProjectRepository::new(state.pool.clone())
        .find_by_id(project_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    let raw_token = generate_invite_token();
    let token_hash = hash_invite_token(&raw_token)?;

    let token = InvitationTokenRepository::new(state.pool.clone())
        .create(
            project_id,
            None,
            &token_hash,
            role.as_str(),
            expires_at,
            request.max_uses(),
            request.notes.as_deref(),
            Some(session.actor_id),
        )
        .await?;

    info!(
        actor_id = %session.actor_id,
        project_id = %project_id,
        token_id = %token.id,
        role = %role,
        "Minted invitation token"
    );

    let invite_link = build_invite_link(&state.config.server.app_base_url, &raw_token, token.id);

    Ok(Json(CreateTokenResponse {
        id: token.id,
        token: raw_token,
        invite_link,
        expires_at: token.expires_at,
    }))
}

/// GET /api/projects/:project_id/invitationTokens
///
/// List a project's tokens with derived status. Hashes are never serialized.
pub async fn list_tokens(
    State(state): State<AppState>,
    SessionAuth(session): SessionAuth,
    Path(project_id): Path<Uuid>,
    Query(query): Query<ListTokensQuery>,
) -> Result<Json<ListTokensResponse>, ApiError> {
    if !session.is_admin_like() {
        return Err(ApiError::Forbidden("Admin access required".to_string()));
    }

    let project_repo = ProjectRepository::new(state.pool.clone());
    if project_repo.find_by_id(project_id).await?.is_none() {
        return Err(ApiError::NotFound("Project not found".to_string()));
    }

    let token_repo = InvitationTokenRepository::new(state.pool.clone());
    let status = query.status_filter();

    let entities = token_repo
        .list_by_project(project_id, status, query.per_page(), query.offset())
        .await?;
    let total = token_repo.count_by_project(project_id, status).await?;

    Ok(Json(ListTokensResponse {
        tokens: entities.into_iter().map(entity_to_response).collect(),
        pagination: TokenPagination::new(query.page(), query.per_page(), total),
    }))
}

/// DELETE /api/projects/:project_id/invitationTokens/:token_id
///
/// Revoke a token. Revoked tokens are rejected at redemption exactly like
/// expired ones.
pub async fn revoke_token(
    State(state): State<AppState>,
    SessionAuth(session): SessionAuth,
    Path((project_id, token_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    if !session.is_admin_like() {
        return Err(ApiError::Forbidden("Admin access required".to_string()));
    }

    let token_repo = InvitationTokenRepository::new(state.pool.clone());

    let token = token_repo
        .find_by_id_for_project(token_id, project_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Invitation token not found".to_string()))?;

    if token.revoked {
        return Err(ApiError::Conflict("Token is already revoked".to_string()));
    }

    match token_repo.revoke(&token).await? {
        Some(_) => {
            info!(
                actor_id = %session.actor_id,
                project_id = %project_id,
                token_id = %token_id,
                "Revoked invitation token"
            );
            Ok(StatusCode::NO_CONTENT)
        }
        // Revoked between the fetch and the update.
        None => Err(ApiError::Conflict("Token is already revoked".to_string())),
    }
}

/// Convert entity to response with status derivation.
fn entity_to_response(entity: InvitationTokenEntity) -> InvitationTokenResponse {
    let status = entity.status();
    InvitationTokenResponse {
        id: entity.id,
        role_to_grant: entity.role_to_grant,
        expires_at: entity.expires_at,
        max_uses: entity.max_uses,
        used_count: entity.used_count,
        revoked: entity.revoked,
        status,
        notes: entity.notes,
        created_by: entity.created_by,
        created_at: entity.created_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use domain::models::TokenStatus;

    #[test]
    fn test_entity_to_response_omits_hash_and_derives_status() {
        let entity = InvitationTokenEntity {
            id: Uuid::new_v4(),
            project_id: Uuid::new_v4(),
            invitation_id: None,
            token_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
            role_to_grant: "Student".to_string(),
            expires_at: Utc::now() + Duration::days(7),
            max_uses: 2,
            used_count: 2,
            revoked: false,
            notes: Some("cohort 12".to_string()),
            created_by: None,
            created_at: Utc::now(),
        };

        let response = entity_to_response(entity);
        assert_eq!(response.status, TokenStatus::Exhausted);

        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("tokenHash").is_none());
        assert!(json.get("token_hash").is_none());
        assert_eq!(json["usedCount"], serde_json::json!(2));
    }
}
