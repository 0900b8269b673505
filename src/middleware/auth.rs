//! Auth extractor: verified identity from `Authorization: Bearer <jwt>`.

use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use tracing::debug;

use crate::error::{AppError, AuthError};
use crate::handlers::http::AppState;
use crate::models::Identity;

/// Identity decoded from a valid bearer token. Handlers taking this never run for
/// unauthenticated requests.
#[derive(Clone, Debug)]
pub struct AuthUser(pub Identity);

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| {
                    debug!(path = %parts.uri.path(), "rejected request: missing bearer token");
                    AuthError::Missing
                })?;

        let identity = state.tokens().verify(bearer.token()).map_err(|cause| {
            debug!(path = %parts.uri.path(), %cause, "rejected request: bad bearer token");
            cause
        })?;

        Ok(AuthUser(identity))
    }
}
