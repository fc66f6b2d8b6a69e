//! User API Handlers

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{UserCreate, UserRole, UserUpdate};
use crate::security_log;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_PASSWORD_LEN, MAX_USERNAME_LEN, validate_optional_text,
    validate_required_text,
};
use crate::utils::{AppError, AppResult};
use shared::client::UserInfo;

/// GET /api/users (admin)
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<UserInfo>>> {
    let users = state.users().find_all().await?;
    Ok(Json(users.iter().map(|u| u.to_info()).collect()))
}

/// GET /api/users/:id (admin)
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<UserInfo>> {
    let user = state
        .users()
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {} not found", id)))?;
    Ok(Json(user.to_info()))
}

/// POST /api/users (admin)
pub async fn create(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<UserCreate>,
) -> AppResult<Json<UserInfo>> {
    validate_required_text(&payload.username, "username", MAX_USERNAME_LEN)?;
    validate_required_text(&payload.password, "password", MAX_PASSWORD_LEN)?;
    validate_optional_text(&payload.display_name, "display_name", MAX_NAME_LEN)?;

    // The owner role is seeded once, never handed out over the API
    if payload.role == UserRole::Owner {
        return Err(AppError::forbidden("Cannot create an owner account"));
    }

    let user = state.users().create(payload).await?;

    security_log!(
        "INFO",
        "user_created",
        operator = current_user.username.clone(),
        username = user.username.clone(),
        role = user.role.as_str()
    );

    Ok(Json(user.to_info()))
}

/// PUT /api/users/:id (admin)
pub async fn update(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(payload): Json<UserUpdate>,
) -> AppResult<Json<UserInfo>> {
    if let Some(username) = &payload.username {
        validate_required_text(username, "username", MAX_USERNAME_LEN)?;
    }
    if let Some(password) = &payload.password {
        validate_required_text(password, "password", MAX_PASSWORD_LEN)?;
    }
    validate_optional_text(&payload.display_name, "display_name", MAX_NAME_LEN)?;

    if payload.role == Some(UserRole::Owner) {
        return Err(AppError::forbidden("Cannot promote to owner"));
    }

    let user = state.users().update(&id, payload).await?;

    security_log!(
        "INFO",
        "user_updated",
        operator = current_user.username.clone(),
        user_id = id.clone()
    );

    Ok(Json(user.to_info()))
}

#[derive(Debug, Deserialize)]
pub struct DeleteQuery {
    /// User ID receiving the deleted user's reports
    pub transfer_to: Option<String>,
}

/// DELETE /api/users/:id?transfer_to=... (admin)
///
/// Reports created by the deleted user are transferred, never orphaned.
pub async fn delete(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Query(query): Query<DeleteQuery>,
) -> AppResult<Json<u64>> {
    if current_user.id == id {
        return Err(AppError::validation("Cannot delete your own account"));
    }

    let moved = state
        .users()
        .delete_with_transfer(&id, query.transfer_to.as_deref())
        .await?;

    security_log!(
        "INFO",
        "user_deleted",
        operator = current_user.username.clone(),
        user_id = id.clone(),
        reports_transferred = moved
    );

    Ok(Json(moved))
}
