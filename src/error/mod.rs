//! Application error types for robust error handling.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::config::ConfigLoadError;

/// Body sent for every authentication failure, whatever the cause.
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized";

/// Why a bearer token was refused. Only ever logged; clients see one generic 401.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    #[error("missing bearer token")]
    Missing,
    #[error("malformed token")]
    Malformed,
    #[error("invalid token signature")]
    Invalid,
    #[error("token expired")]
    Expired,
}

/// Failure reported by the user-data service. The reason is passed to clients verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{reason}")]
pub struct ServiceError {
    pub reason: String,
}

impl ServiceError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Conditions that must stop the process before it serves anything.
#[derive(Error, Debug)]
pub enum StartupError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigLoadError),

    #[error("user service connection failed: {0}")]
    Connect(ServiceError),

    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
}

/// Application-level errors.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication failed: {0}")]
    Auth(#[from] AuthError),

    /// User service failure on a public route (register, login).
    #[error("Rejected: {0}")]
    Rejected(String),

    /// User service failure on a protected route.
    #[error("Service error: {0}")]
    Service(#[from] ServiceError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid payload: {0}")]
    Payload(#[from] JsonRejection),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Auth(_) => (
                StatusCode::UNAUTHORIZED,
                json!({ "message": UNAUTHORIZED_MESSAGE }),
            ),
            AppError::Rejected(msg) | AppError::Validation(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, json!({ "message": msg }))
            }
            AppError::Service(e) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({ "error": e.reason }),
            ),
            AppError::Payload(JsonRejection::JsonDataError(e)) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({ "message": e.body_text() }),
            ),
            AppError::Payload(rejection) => (
                StatusCode::BAD_REQUEST,
                json!({ "message": rejection.body_text() }),
            ),
            AppError::Internal(e) => {
                tracing::error!(error = %e, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_of(err: AppError) -> (StatusCode, serde_json::Value) {
        let res = err.into_response();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn auth_errors_share_one_response() {
        let mut seen = Vec::new();
        for cause in [
            AuthError::Missing,
            AuthError::Malformed,
            AuthError::Invalid,
            AuthError::Expired,
        ] {
            seen.push(body_of(AppError::Auth(cause)).await);
        }
        assert!(seen.iter().all(|s| s == &seen[0]));
        assert_eq!(seen[0].0, StatusCode::UNAUTHORIZED);
        assert_eq!(seen[0].1, json!({ "message": "Unauthorized" }));
    }

    #[tokio::test]
    async fn service_reason_is_passed_through() {
        let (status, body) = body_of(ServiceError::new("Unable to find user").into()).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body, json!({ "error": "Unable to find user" }));

        let (status, body) = body_of(AppError::Rejected("invalid credentials".into())).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body, json!({ "message": "invalid credentials" }));
    }

    #[tokio::test]
    async fn internal_details_are_not_leaked() {
        let (status, body) =
            body_of(AppError::Internal(anyhow::anyhow!("db password is hunter2"))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Internal error" }));
    }
}
