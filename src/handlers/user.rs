//! Protected handlers: favourites and history of the token's user.
//!
//! The user id always comes from the verified token, never from the request.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::error::AppResult;
use crate::handlers::http::AppState;
use crate::middleware::AuthUser;

/// GET /api/user/favourites
pub async fn get_favourites(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> AppResult<Json<Vec<String>>> {
    Ok(Json(state.users().get_favourites(&identity.id).await?))
}

/// PUT /api/user/favourites/:id
pub async fn add_favourite(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(item_id): Path<String>,
) -> AppResult<Json<Vec<String>>> {
    Ok(Json(
        state.users().add_favourite(&identity.id, &item_id).await?,
    ))
}

/// DELETE /api/user/favourites/:id
pub async fn remove_favourite(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(item_id): Path<String>,
) -> AppResult<Json<Vec<String>>> {
    Ok(Json(
        state
            .users()
            .remove_favourite(&identity.id, &item_id)
            .await?,
    ))
}

/// GET /api/user/history
pub async fn get_history(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> AppResult<Json<Vec<String>>> {
    Ok(Json(state.users().get_history(&identity.id).await?))
}

/// PUT /api/user/history/:id
pub async fn add_history(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(item_id): Path<String>,
) -> AppResult<Json<Vec<String>>> {
    Ok(Json(state.users().add_history(&identity.id, &item_id).await?))
}

/// DELETE /api/user/history/:id
pub async fn remove_history(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(item_id): Path<String>,
) -> AppResult<Json<Vec<String>>> {
    Ok(Json(
        state.users().remove_history(&identity.id, &item_id).await?,
    ))
}
