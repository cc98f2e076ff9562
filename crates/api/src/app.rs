use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{security_headers_middleware, trace_id};
use crate::routes::{analytics, health, invitation_tokens, invitations};
use crate::services::EmailService;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub email: EmailService,
}

pub fn create_app(config: Config, pool: PgPool) -> Router {
    let email = EmailService::new(config.email.clone());
    let config = Arc::new(config);

    let state = AppState {
        pool,
        config: config.clone(),
        email,
    };

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        // Production: only allow specified origins
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Invitation routes; authorization happens in the handlers, which need
    // the typed session anyway.
    let api_routes = Router::new()
        .route(
            "/api/projects/:project_id/invitations",
            post(invitations::create_invitation),
        )
        .route(
            "/api/projects/:project_id/invitationTokens",
            post(invitation_tokens::create_token).get(invitation_tokens::list_tokens),
        )
        .route(
            "/api/projects/:project_id/invitationTokens/:token_id",
            delete(invitation_tokens::revoke_token),
        )
        .route("/api/invitations/accept", post(invitations::accept_invitation))
        .route(
            "/api/invitations/analytics/response-time",
            get(analytics::response_time),
        );

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live));

    // Merge all routes
    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
