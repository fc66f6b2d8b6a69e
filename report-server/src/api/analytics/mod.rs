//! Analytics API module
//!
//! Aggregated figures over a date range, served through the TTL cache
//! so dashboard polling does not hammer the database.

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/analytics/summary", get(handler::summary))
}
