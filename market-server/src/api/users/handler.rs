//! User API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use validator::Validate;

use shared::error::{AppError, AppResult};
use shared::models::{User, UserCreate};

use crate::auth::CurrentUser;
use crate::core::ServerState;

/// POST /api/users - register a user record
///
/// Public: registration precedes any token being issued for the account.
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<UserCreate>,
) -> AppResult<Json<User>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let user = state.engine.create_user(payload).await?;
    Ok(Json(user))
}

/// GET /api/users/me - the caller's own record
pub async fn me(State(state): State<ServerState>, user: CurrentUser) -> AppResult<Json<User>> {
    let user = state
        .storage
        .get_user(&user.id)?
        .ok_or_else(|| AppError::not_found(format!("User {}", user.id)))?;
    Ok(Json(user))
}

/// GET /api/users/:id - look up a user
pub async fn get_by_id(
    State(state): State<ServerState>,
    _user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<User>> {
    let user = state
        .storage
        .get_user(&id)?
        .ok_or_else(|| AppError::not_found(format!("User {}", id)))?;
    Ok(Json(user))
}
