//! Invitation issuance and acceptance routes.
//!
//! Issuance validates everything before the first write, reuses the
//! per-(project, email) invitation record, and always mints a brand-new
//! token: each issuance is independently revocable and independently
//! audited, at the cost of allowing parallel valid tokens for one recipient.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use domain::models::{
    AcceptInvitationRequest, AcceptInvitationResponse, CreateInvitationRequest,
    CreateInvitationResponse, GrantRole,
};
use persistence::entities::InvitationTokenEntity;
use persistence::repositories::{
    InvitationTokenRepository, ProjectInvitationRepository, ProjectRepository, RedeemOutcome,
    UserRepository,
};
use shared::token::{generate_invite_token, hash_invite_token, verify_invite_token};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::SessionAuth;

/// POST /api/projects/:project_id/invitations
///
/// Issue an invitation to a recipient and email them the invite link.
/// The raw token appears in the returned link and nowhere else; only its
/// hash is persisted.
pub async fn create_invitation(
    State(state): State<AppState>,
    SessionAuth(session): SessionAuth,
    Path(project_id): Path<Uuid>,
    Json(request): Json<CreateInvitationRequest>,
) -> Result<Json<CreateInvitationResponse>, ApiError> {
    if !session.is_admin_like() {
        return Err(ApiError::Forbidden("Admin access required".to_string()));
    }

    // All validation happens before any read or write.
    request.validate()?;
    let role = parse_role(request.role())?;
    let expires_at = parse_expiry(&state, request.expires_at())?;
    if request.student_id.is_none() && request.recipient_email.is_none() {
        return Err(ApiError::validation_field(
            "recipientEmail is required when no studentId is given",
            "recipientEmail",
        ));
    }

    let project_repo = ProjectRepository::new(state.pool.clone());
    project_repo
        .find_by_id(project_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    // Resolve the recipient: an existing user wins over free-form fields.
    let (recipient_email, recipient_name, recipient_user_id) =
        if let Some(student_id) = request.student_id {
            let user = UserRepository::new(state.pool.clone())
                .find_by_id(student_id)
                .await?
                .ok_or_else(|| ApiError::NotFound("Student not found".to_string()))?;
            (user.email, Some(user.name), Some(user.id))
        } else {
            let email = request.recipient_email.clone().ok_or_else(|| {
                ApiError::validation_field(
                    "recipientEmail is required when no studentId is given",
                    "recipientEmail",
                )
            })?;
            (email, request.recipient_name.clone(), None)
        };

    // One invitation record per (project, email) pair; reused across
    // issuance calls.
    let invitation = ProjectInvitationRepository::new(state.pool.clone())
        .find_or_create(project_id, &recipient_email, recipient_user_id)
        .await?;

    let raw_token = generate_invite_token();
    let token_hash = hash_invite_token(&raw_token)?;

    let token = InvitationTokenRepository::new(state.pool.clone())
        .create(
            project_id,
            Some(invitation.id),
            &token_hash,
            role.as_str(),
            expires_at,
            request.max_uses(),
            request.notes.as_deref(),
            Some(session.actor_id),
        )
        .await?;

    let invite_link = build_invite_link(&state.config.server.app_base_url, &raw_token, token.id);

    state
        .email
        .send_invitation_email(
            &recipient_email,
            recipient_name.as_deref(),
            role.as_str(),
            &invite_link,
        )
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to send invitation email: {}", e)))?;

    info!(
        actor_id = %session.actor_id,
        project_id = %project_id,
        invitation_id = %invitation.id,
        token_id = %token.id,
        role = %role,
        max_uses = token.max_uses,
        "Issued project invitation"
    );

    Ok(Json(CreateInvitationResponse {
        message: "New invitation token created".to_string(),
        token_id: token.id,
        invite_link,
        expires_at: token.expires_at,
    }))
}

/// POST /api/invitations/accept
///
/// Redeem a raw token for project membership. Expired, revoked and unknown
/// tokens are indistinguishable in the response so callers cannot probe for
/// token existence.
pub async fn accept_invitation(
    State(state): State<AppState>,
    SessionAuth(session): SessionAuth,
    Json(request): Json<AcceptInvitationRequest>,
) -> Result<Json<AcceptInvitationResponse>, ApiError> {
    let raw_token = match request.token.as_deref() {
        Some(token) if !token.is_empty() => token,
        _ => return Err(ApiError::Validation("Missing token".to_string())),
    };

    let token_repo = InvitationTokenRepository::new(state.pool.clone());

    let token = match request.invitation_id {
        Some(token_id) => lookup_token_by_id(&token_repo, token_id, raw_token).await?,
        None => scan_tokens(&token_repo, raw_token).await?,
    }
    .ok_or_else(|| ApiError::NotFound("Invalid or expired token".to_string()))?;

    if token.is_exhausted() {
        return Err(ApiError::Validation(
            "Token usage limit exceeded".to_string(),
        ));
    }

    let project = ProjectRepository::new(state.pool.clone())
        .find_by_id(token.project_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    match token_repo.redeem(&token, session.actor_id).await? {
        RedeemOutcome::Redeemed(updated) => {
            info!(
                actor_id = %session.actor_id,
                project_id = %project.id,
                token_id = %updated.id,
                used_count = updated.used_count,
                "Invitation accepted"
            );

            Ok(Json(AcceptInvitationResponse {
                message: "Invitation accepted".to_string(),
                project_id: project.id,
            }))
        }
        // Lost a race against a concurrent redemption of the last use.
        RedeemOutcome::UsageExceeded => Err(ApiError::Validation(
            "Token usage limit exceeded".to_string(),
        )),
    }
}

/// Direct lookup path: fetch one live token by id and verify possession.
async fn lookup_token_by_id(
    token_repo: &InvitationTokenRepository,
    token_id: Uuid,
    raw_token: &str,
) -> Result<Option<InvitationTokenEntity>, ApiError> {
    let candidate = token_repo.find_unexpired_by_id(token_id).await?;

    Ok(candidate.filter(|c| verify_invite_token(raw_token, &c.token_hash).unwrap_or(false)))
}

/// Scan path: hash-compare against every live token until one matches.
/// O(n) over non-expired tokens; tolerable only at this system's volume.
async fn scan_tokens(
    token_repo: &InvitationTokenRepository,
    raw_token: &str,
) -> Result<Option<InvitationTokenEntity>, ApiError> {
    for candidate in token_repo.list_unexpired().await? {
        if verify_invite_token(raw_token, &candidate.token_hash).unwrap_or(false) {
            return Ok(Some(candidate));
        }
    }
    Ok(None)
}

/// Builds the frontend link that carries the raw token and the token id.
pub fn build_invite_link(app_base_url: &str, raw_token: &str, token_id: Uuid) -> String {
    format!(
        "{}/accept-invitation?token={}&invitationId={}",
        app_base_url.trim_end_matches('/'),
        raw_token,
        token_id
    )
}

/// Maps a role-parse failure onto the wire field that carried it.
pub fn parse_role(
    parsed: Result<GrantRole, domain::models::RoleParseError>,
) -> Result<GrantRole, ApiError> {
    parsed.map_err(|e| {
        ApiError::validation_field(
            format!("Invalid role: {} (expected one of Student, Project Mentor, Lead Mentor, External Partner)", e.0),
            "roleToGrant",
        )
    })
}

/// Applies the expiry-parse result and the optional future-only policy.
pub fn parse_expiry(
    state: &AppState,
    parsed: Option<chrono::DateTime<Utc>>,
) -> Result<chrono::DateTime<Utc>, ApiError> {
    let expires_at = parsed.ok_or_else(|| {
        ApiError::validation_field("expiresAt must be a valid RFC 3339 timestamp", "expiresAt")
    })?;

    if state.config.invitations.require_future_expiry && expires_at <= Utc::now() {
        return Err(ApiError::validation_field(
            "expiresAt must be in the future",
            "expiresAt",
        ));
    }

    Ok(expires_at)
}
