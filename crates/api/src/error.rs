use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

/// API error taxonomy.
///
/// Every variant renders as `{"error": <message>, "code": <CODE>}` with an
/// optional `details` object; validation failures carry the offending field.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Validation error on {field}: {message}")]
    ValidationField { message: String, field: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Validation error naming the field that failed.
    pub fn validation_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        ApiError::ValidationField {
            message: message.into(),
            field: field.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match self {
            ApiError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg, None)
            }
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg, None),
            ApiError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg, None)
            }
            ApiError::ValidationField { message, field } => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                message,
                Some(json!({ "field": field })),
            ),
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "SERVER_ERROR",
                    msg,
                    None,
                )
            }
        };

        let body = ErrorBody {
            error: message,
            code: code.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".into()),
            sqlx::Error::Database(db_err) => {
                if let Some(code) = db_err.code() {
                    match code.as_ref() {
                        "23505" => ApiError::Conflict("Resource already exists".into()),
                        "23503" => ApiError::NotFound("Referenced resource not found".into()),
                        _ => ApiError::Internal(format!("Database error: {}", db_err)),
                    }
                } else {
                    ApiError::Internal(format!("Database error: {}", db_err))
                }
            }
            _ => ApiError::Internal(format!("Database error: {}", err)),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        // Report the first failing field; one actionable error beats a wall
        // of them in an admin tool.
        let first = errors.field_errors().into_iter().next().map(|(field, errs)| {
            let message = errs
                .first()
                .and_then(|e| e.message.clone())
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("Invalid {}", field));
            (message, field.to_string())
        });

        match first {
            Some((message, field)) => ApiError::ValidationField { message, field },
            None => ApiError::Validation("Invalid request".into()),
        }
    }
}

impl From<shared::token::TokenHashError> for ApiError {
    fn from(err: shared::token::TokenHashError) -> Self {
        ApiError::Internal(format!("Token hashing error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_status_codes() {
        let cases = [
            (
                ApiError::Unauthorized("no session".into()),
                StatusCode::UNAUTHORIZED,
            ),
            (
                ApiError::Forbidden("admins only".into()),
                StatusCode::FORBIDDEN,
            ),
            (ApiError::NotFound("gone".into()), StatusCode::NOT_FOUND),
            (ApiError::Conflict("dup".into()), StatusCode::CONFLICT),
            (
                ApiError::Validation("bad input".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::validation_field("Notes too long", "notes"),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::Internal("boom".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(
            format!("{}", ApiError::Validation("bad".into())),
            "Validation error: bad"
        );
        assert_eq!(
            format!("{}", ApiError::validation_field("too long", "notes")),
            "Validation error on notes: too long"
        );
        assert_eq!(
            format!("{}", ApiError::NotFound("missing".into())),
            "Not found: missing"
        );
    }

    #[test]
    fn test_from_sqlx_row_not_found() {
        let error: ApiError = sqlx::Error::RowNotFound.into();
        assert!(matches!(error, ApiError::NotFound(_)));
    }

    #[test]
    fn test_from_validator_picks_failing_field() {
        use validator::Validate;

        #[derive(Validate)]
        struct Probe {
            #[validate(length(max = 3, message = "Notes too long"))]
            notes: String,
        }

        let probe = Probe {
            notes: "too-long-value".to_string(),
        };
        let error: ApiError = probe.validate().unwrap_err().into();

        match error {
            ApiError::ValidationField { message, field } => {
                assert_eq!(message, "Notes too long");
                assert_eq!(field, "notes");
            }
            other => panic!("Expected ValidationField, got {:?}", other),
        }
    }
}
