//! Invitation analytics routes.

use axum::{extract::State, Json};
use domain::services::response_time::compute_response_times;
use persistence::repositories::InvitationTokenLogRepository;
use serde::Serialize;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::SessionAuth;

/// Response for the invitation response-time report.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseTimeResponse {
    pub message: String,
    pub average_response_time_days: Option<f64>,
    pub total_responses: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub response_times: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<ResponseTimeDetails>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseTimeDetails {
    pub min_response_time: f64,
    pub max_response_time: f64,
}

/// GET /api/invitations/analytics/response-time
///
/// Average time between issuing an invitation token and its first
/// redemption, derived entirely from the audit ledger.
pub async fn response_time(
    State(state): State<AppState>,
    SessionAuth(session): SessionAuth,
) -> Result<Json<ResponseTimeResponse>, ApiError> {
    if !session.is_admin_like() {
        return Err(ApiError::Forbidden("Admin access required".to_string()));
    }

    let records = InvitationTokenLogRepository::new(state.pool.clone())
        .list_all()
        .await?;

    let response = match compute_response_times(&records) {
        Some(report) => ResponseTimeResponse {
            message: "Average response time calculated successfully".to_string(),
            average_response_time_days: Some(report.average_days),
            total_responses: report.response_times.len(),
            response_times: report.response_times.clone(),
            details: Some(ResponseTimeDetails {
                min_response_time: report.min_days,
                max_response_time: report.max_days,
            }),
        },
        None => ResponseTimeResponse {
            message: "No accepted invitations found".to_string(),
            average_response_time_days: None,
            total_responses: 0,
            response_times: Vec::new(),
            details: None,
        },
    };

    Ok(Json(response))
}
