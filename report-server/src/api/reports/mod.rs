//! Daily Report API module
//!
//! CRUD, status lifecycle, line-item entries, reconciliation preview
//! and CSV export.

mod export;
mod handler;

use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/reports", routes())
}

fn routes() -> Router<ServerState> {
    let common_routes = Router::new()
        .route("/", get(handler::list))
        .route("/", post(handler::create))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}", put(handler::update))
        .route("/{id}/submit", post(handler::submit))
        .route("/{id}/reconciliation", get(handler::reconciliation))
        .route("/{id}/entries/{kind}", get(handler::list_entries))
        .route("/{id}/entries/{kind}", put(handler::replace_entries));

    let admin_routes = Router::new()
        .route("/export", get(export::export_csv))
        .route("/{id}/status", post(handler::change_status))
        .route("/{id}", delete(handler::delete))
        .layer(middleware::from_fn(require_admin));

    common_routes.merge(admin_routes)
}
