//! Session authentication extractor.
//!
//! Validates the Bearer token in the Authorization header once at the
//! boundary and hands handlers a typed [`Session`]. No session yields 401
//! before any handler logic runs.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use domain::models::{Session, SessionRole};
use shared::jwt::{extract_user_id, JwtConfig};

use crate::app::AppState;
use crate::config::JwtAuthConfig;
use crate::error::ApiError;

/// Authenticated session extracted from the request's Bearer token.
#[derive(Debug, Clone)]
pub struct SessionAuth(pub Session);

impl SessionAuth {
    /// Builds the JWT validator from app configuration.
    pub fn create_jwt_config(config: &JwtAuthConfig) -> Result<JwtConfig, ApiError> {
        JwtConfig::with_leeway(
            &config.private_key,
            &config.public_key,
            config.session_expiry_secs,
            config.leeway_secs,
        )
        .map_err(|e| ApiError::Internal(format!("Failed to initialize JWT config: {}", e)))
    }

    /// Validates a bearer token and produces a typed session.
    pub fn validate(jwt_config: &JwtConfig, token: &str) -> Result<Session, ApiError> {
        let claims = jwt_config
            .validate_session_token(token)
            .map_err(|_| ApiError::Unauthorized("Not authenticated".to_string()))?;

        let actor_id = extract_user_id(&claims)
            .map_err(|_| ApiError::Unauthorized("Not authenticated".to_string()))?;

        let role = SessionRole::parse(&claims.role)
            .ok_or_else(|| ApiError::Unauthorized("Not authenticated".to_string()))?;

        Ok(Session {
            actor_id,
            role,
            name: claims.name,
            email: claims.email,
        })
    }
}

#[async_trait]
impl FromRequestParts<AppState> for SessionAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Not authenticated".to_string()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::Unauthorized("Not authenticated".to_string()))?;

        let jwt_config = Self::create_jwt_config(&state.config.jwt)?;
        let session = Self::validate(&jwt_config, token)?;

        Ok(SessionAuth(session))
    }
}
