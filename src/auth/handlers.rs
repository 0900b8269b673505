//! Auth HTTP handlers: register, login.

use axum::{extract::State, Json};
use serde_json::{json, Value};
use tracing::{debug, info};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::http::{ApiJson, AppState};
use crate::models::{Identity, LoginRequest, LoginResponse, RegisterRequest};

/// POST /api/user/register
pub async fn register(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<RegisterRequest>,
) -> AppResult<Json<Value>> {
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let message = state
        .users()
        .register_user(&body)
        .await
        .map_err(|e| {
            debug!(user = %body.user_name, reason = %e, "registration rejected");
            AppError::Rejected(e.reason)
        })?;

    info!(user = %body.user_name, "user registered");
    Ok(Json(json!({ "message": message })))
}

/// POST /api/user/login
pub async fn login(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let user = state.users().check_user(&body).await.map_err(|e| {
        debug!(user = %body.user_name, reason = %e, "login rejected");
        AppError::Rejected(e.reason)
    })?;

    let identity = Identity::from(user);
    let token = state.tokens().issue(&identity)?;
    info!(user_id = %identity.id, "login successful");

    Ok(Json(LoginResponse {
        token,
        message: "login successful".to_string(),
    }))
}
