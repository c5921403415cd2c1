use axum::{
    extract::{Path, State},
    routing::{get, put},
    Json, Router,
};
use axum_extra::headers::{authorization::Bearer, Authorization};
use axum_extra::TypedHeader;
use rutera_core::{BookingRecord, BookingStatus};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
struct CancelResponse {
    booking_id: Uuid,
    status: BookingStatus,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/bookings", get(my_bookings))
        .route("/v1/bookings/{id}/cancel", put(cancel_booking))
}

async fn my_bookings(
    State(state): State<AppState>,
    TypedHeader(Authorization(bearer)): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Vec<BookingRecord>>, ApiError> {
    let session = state
        .sessions
        .authorize(bearer.token())
        .await
        .map_err(ApiError::session)?;

    let bookings = state
        .bookings
        .list_for_user(&session.token)
        .await
        .map_err(ApiError::submission)?;
    Ok(Json(bookings))
}

async fn cancel_booking(
    State(state): State<AppState>,
    TypedHeader(Authorization(bearer)): TypedHeader<Authorization<Bearer>>,
    Path(id): Path<Uuid>,
) -> Result<Json<CancelResponse>, ApiError> {
    let session = state
        .sessions
        .authorize(bearer.token())
        .await
        .map_err(ApiError::session)?;

    state
        .bookings
        .cancel(id, &session.token)
        .await
        .map_err(ApiError::submission)?;
    info!(booking_id = %id, user = %session.user_id, "booking cancelled");

    Ok(Json(CancelResponse {
        booking_id: id,
        status: BookingStatus::Cancelled,
    }))
}
