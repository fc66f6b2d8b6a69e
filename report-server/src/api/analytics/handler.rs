//! Analytics API Handlers

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::repository::report::AnalyticsSummary;
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    pub venue: Option<String>,
    pub from: String,
    pub to: String,
}

/// GET /api/analytics/summary?venue&from&to
pub async fn summary(
    State(state): State<ServerState>,
    Query(query): Query<SummaryQuery>,
) -> AppResult<Json<AnalyticsSummary>> {
    let cache_key = format!(
        "{}|{}|{}",
        query.venue.as_deref().unwrap_or("*"),
        query.from,
        query.to
    );

    if let Some(cached) = state.analytics_cache.get(&cache_key) {
        return Ok(Json(cached));
    }

    let venue = match &query.venue {
        Some(v) => Some(
            v.parse()
                .map_err(|_| AppError::invalid(format!("Invalid venue id: {v}")))?,
        ),
        None => None,
    };

    let summary = state
        .reports()
        .analytics_summary(venue, &query.from, &query.to)
        .await?;

    state.analytics_cache.insert(cache_key, summary.clone());

    Ok(Json(summary))
}
