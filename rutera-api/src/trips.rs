use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use rutera_core::Trip;
use serde::Deserialize;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct SearchQuery {
    from: String,
    to: String,
    /// Travel date, YYYY-MM-DD.
    date: String,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/trips/search", get(search_trips))
}

async fn search_trips(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Trip>>, ApiError> {
    let date = NaiveDate::parse_from_str(&query.date, "%Y-%m-%d")
        .map_err(|_| ApiError::ValidationError("date must be YYYY-MM-DD".to_string()))?;

    let trips = state
        .directory
        .search(&query.from, &query.to, date)
        .await
        .map_err(ApiError::directory)?;

    Ok(Json(trips))
}
