//! User account API: registration, JWT login, and per-user favourites and history.
//!
//! Public routes hand credentials to a [`UserService`]; protected routes are gated by
//! the [`middleware::AuthUser`] extractor, which verifies a bearer token issued by
//! [`auth::TokenAuthority`]. Tokens are stateless and trusted until they expire.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

pub use config::Config;
pub use error::{AppError, StartupError};
pub use handlers::http::AppState;
pub use services::{MemoryUserService, UserService};

use std::sync::Arc;

use axum::routing::{get, post, put};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth::TokenAuthority;
use crate::db::PgUserService;

/// Build the API router. Used by main and by integration tests.
pub fn create_app(state: AppState) -> axum::Router {
    let user_routes = axum::Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/favourites", get(handlers::get_favourites))
        .route(
            "/favourites/:id",
            put(handlers::add_favourite).delete(handlers::remove_favourite),
        )
        .route("/history", get(handlers::get_history))
        .route(
            "/history/:id",
            put(handlers::add_history).delete(handlers::remove_history),
        );

    axum::Router::new()
        .route("/health", get(handlers::health))
        .nest("/api/user", user_routes)
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Construct the token authority and user service from config and connect the service.
pub async fn build_state(config: &Config) -> Result<AppState, StartupError> {
    let tokens = TokenAuthority::new(&config.jwt_secret, config.jwt_ttl)?;
    let users: Arc<dyn UserService> = match &config.database_url {
        Some(url) => Arc::new(PgUserService::new(url)?),
        None => Arc::new(MemoryUserService::new()),
    };
    AppState::connect(tokens, users).await
}
