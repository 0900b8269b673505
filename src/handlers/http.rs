//! Shared state, JSON body extractor, health and fallback handlers.

use std::sync::Arc;

use axum::{extract::FromRequest, http::StatusCode, Json};
use serde_json::json;
use tracing::{info, warn};

use crate::auth::TokenAuthority;
use crate::error::{AppError, StartupError};
use crate::services::UserService;

/// Shared application state for every handler. Immutable once built.
#[derive(Clone)]
pub struct AppState {
    pub tokens: TokenAuthority,
    pub users: Arc<dyn UserService>,
}

impl AppState {
    pub fn new(tokens: TokenAuthority, users: Arc<dyn UserService>) -> Self {
        Self { tokens, users }
    }

    /// Connect the user service, then build the state. Nothing should be served
    /// when this fails.
    pub async fn connect(
        tokens: TokenAuthority,
        users: Arc<dyn UserService>,
    ) -> Result<Self, StartupError> {
        users.connect().await.map_err(StartupError::Connect)?;
        if !tokens.expires() {
            warn!("JWT_EXPIRES_IN not set; issued tokens never expire");
        }
        info!("user service connected");
        Ok(Self::new(tokens, users))
    }

    pub fn tokens(&self) -> &TokenAuthority {
        &self.tokens
    }
    pub fn users(&self) -> &dyn UserService {
        self.users.as_ref()
    }
}

/// `axum::Json` whose rejection renders as an [`AppError`] JSON body.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// GET /health: liveness probe.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({ "status": "ok", "service": "user-api" })),
    )
}

/// Fallback for unknown routes.
pub async fn not_found() -> (StatusCode, Json<serde_json::Value>) {
    (StatusCode::NOT_FOUND, Json(json!({ "message": "Not found" })))
}
