//! Verification API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use validator::Validate;

use shared::error::{AppError, AppResult};
use shared::models::{Verification, VerificationReview, VerificationSubmit};

use crate::auth::CurrentUser;
use crate::core::ServerState;

/// POST /api/verifications - apply for seller status
pub async fn submit(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<VerificationSubmit>,
) -> AppResult<Json<Verification>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let verification = state
        .engine
        .submit_verification(&user.caller(), payload)
        .await?;
    Ok(Json(verification))
}

/// GET /api/verifications - the caller's requests
pub async fn list_mine(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<Verification>>> {
    let verifications = state.storage.verifications_for_user(&user.id)?;
    Ok(Json(verifications))
}

/// GET /api/verifications/pending - review queue (admin)
pub async fn list_pending(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<Verification>>> {
    if !user.is_admin() {
        return Err(AppError::forbidden("admin role required"));
    }
    let pending = state.storage.list_pending_verifications()?;
    Ok(Json(pending))
}

/// GET /api/verifications/:id - owner or admin
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Verification>> {
    let verification = state
        .storage
        .get_verification(&id)?
        .ok_or_else(|| AppError::not_found(format!("Verification {}", id)))?;
    if !user.is_admin() && verification.user_id != user.id {
        return Err(AppError::forbidden("not your verification request"));
    }
    Ok(Json(verification))
}

/// POST /api/verifications/:id/review - record the admin decision
pub async fn review(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<VerificationReview>,
) -> AppResult<Json<Verification>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let verification = state
        .engine
        .review_verification(&user.caller(), &id, payload)
        .await?;
    Ok(Json(verification))
}
