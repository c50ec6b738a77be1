//! Site summary endpoint

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::AppResult;

/// Headline catalog counts plus the caller's visit counter
#[derive(Debug, Serialize, ToSchema)]
pub struct SiteSummary {
    pub num_books: i64,
    pub num_copies: i64,
    pub num_copies_available: i64,
    pub num_authors: i64,
    pub num_languages: i64,
    /// Visit count including the current request
    pub num_visits: i64,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct SummaryQuery {
    /// Visit count returned by the caller's previous summary request
    pub visits: Option<i64>,
}

/// Get catalog counts for the landing page
#[utoipa::path(
    get,
    path = "/summary",
    tag = "summary",
    params(SummaryQuery),
    responses(
        (status = 200, description = "Catalog counts and visit counter", body = SiteSummary)
    )
)]
pub async fn get_summary(
    State(state): State<crate::AppState>,
    Query(query): Query<SummaryQuery>,
) -> AppResult<Json<SiteSummary>> {
    let summary = state
        .services
        .stats
        .site_summary(query.visits.unwrap_or(0))
        .await?;
    Ok(Json(summary))
}
