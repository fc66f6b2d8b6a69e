//! Venue API Handlers

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Venue, VenueCreate, VenueUpdate};
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub include_inactive: bool,
}

/// GET /api/venues
pub async fn list(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Venue>>> {
    // Inactive venues only matter for admins cleaning up
    let include_inactive = query.include_inactive && user.is_admin();
    let venues = state.venues().find_all(include_inactive).await?;
    Ok(Json(venues))
}

/// GET /api/venues/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Venue>> {
    let venue = state
        .venues()
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Venue {} not found", id)))?;
    Ok(Json(venue))
}

/// POST /api/venues (admin)
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<VenueCreate>,
) -> AppResult<Json<Venue>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.address, "address", MAX_ADDRESS_LEN)?;

    let venue = state.venues().create(payload).await?;
    Ok(Json(venue))
}

/// PUT /api/venues/:id (admin)
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<VenueUpdate>,
) -> AppResult<Json<Venue>> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_optional_text(&payload.address, "address", MAX_ADDRESS_LEN)?;

    let venue = state.venues().update(&id, payload).await?;
    Ok(Json(venue))
}

/// DELETE /api/venues/:id (admin) - soft delete
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Venue>> {
    let venue = state.venues().deactivate(&id).await?;
    Ok(Json(venue))
}
