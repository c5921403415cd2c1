use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch, post, put},
    Json, Router,
};
use axum_extra::headers::{authorization::Bearer, Authorization};
use axum_extra::TypedHeader;
use rutera_booking::{BookingComposer, PassengerRecord, PassengerUpdate, PriceSummary, WorkflowState};
use rutera_core::{Gender, Reservation, SeatNumber, Session, Trip};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::{AppState, BookingWorkflow};

/// Seats per grid row, matching the coach layout used by the operator UI.
const SEAT_ROW_WIDTH: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeatStatus {
    Available,
    Selected,
    Booked,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeatCell {
    pub number: SeatNumber,
    pub status: SeatStatus,
}

#[derive(Debug, Serialize)]
struct WorkflowView {
    id: Uuid,
    state: WorkflowState,
    trip: Trip,
    seat_grid: Vec<Vec<SeatCell>>,
    selected_seats: Vec<SeatNumber>,
    passengers: Vec<PassengerRecord>,
    boarding_point: String,
    dropping_point: String,
    summary: PriceSummary,
}

#[derive(Debug, Deserialize)]
struct CreateWorkflowRequest {
    trip_id: Uuid,
}

#[derive(Debug, Deserialize)]
struct ToggleSeatRequest {
    seat: SeatNumber,
}

#[derive(Debug, Deserialize)]
struct UpdatePassengerRequest {
    name: Option<String>,
    age: Option<u32>,
    gender: Option<Gender>,
}

#[derive(Debug, Deserialize)]
struct SetPointsRequest {
    boarding_point: Option<String>,
    dropping_point: Option<String>,
}

#[derive(Debug, Serialize)]
struct SubmitResponse {
    reservation: Reservation,
    state: WorkflowState,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/workflows", post(create_workflow))
        .route("/v1/workflows/{id}", get(get_workflow))
        .route("/v1/workflows/{id}/seats", post(toggle_seat))
        .route("/v1/workflows/{id}/passengers/{seat}", patch(update_passenger))
        .route("/v1/workflows/{id}/points", put(set_points))
        .route("/v1/workflows/{id}/submit", post(submit_workflow))
}

/// Stateless grid derivation over seat numbers: row = (seat-1) / width,
/// column = (seat-1) % width. Never stored, always recomputed.
fn seat_grid(composer: &BookingComposer) -> Vec<Vec<SeatCell>> {
    let cells: Vec<SeatCell> = (1..=composer.trip().total_seats)
        .map(|number| {
            let status = if composer.is_booked(number) {
                SeatStatus::Booked
            } else if composer.is_selected(number) {
                SeatStatus::Selected
            } else {
                SeatStatus::Available
            };
            SeatCell { number, status }
        })
        .collect();
    cells.chunks(SEAT_ROW_WIDTH).map(|row| row.to_vec()).collect()
}

fn view(id: Uuid, composer: &BookingComposer) -> WorkflowView {
    WorkflowView {
        id,
        state: composer.state(),
        trip: composer.trip().clone(),
        seat_grid: seat_grid(composer),
        selected_seats: composer.selected_seats().to_vec(),
        passengers: composer.passengers().to_vec(),
        boarding_point: composer.boarding_point().to_string(),
        dropping_point: composer.dropping_point().to_string(),
        summary: composer.price_summary(),
    }
}

async fn authorize(state: &AppState, bearer: &Bearer) -> Result<Session, ApiError> {
    state
        .sessions
        .authorize(bearer.token())
        .await
        .map_err(ApiError::session)
}

/// Look up a live workflow and check it belongs to the caller.
async fn fetch_owned(
    state: &AppState,
    id: Uuid,
    user_id: &str,
) -> Result<Arc<Mutex<BookingWorkflow>>, ApiError> {
    let workflow = state
        .workflows
        .lock()
        .await
        .get(&id)
        .cloned()
        .ok_or_else(|| ApiError::NotFoundError(format!("workflow not found: {}", id)))?;

    if workflow.lock().await.owner != user_id {
        return Err(ApiError::AuthorizationError(
            "workflow does not belong to you".to_string(),
        ));
    }
    Ok(workflow)
}

async fn create_workflow(
    State(state): State<AppState>,
    TypedHeader(Authorization(bearer)): TypedHeader<Authorization<Bearer>>,
    Json(req): Json<CreateWorkflowRequest>,
) -> Result<(StatusCode, Json<WorkflowView>), ApiError> {
    let session = authorize(&state, &bearer).await?;

    let trip = state
        .directory
        .get_trip(req.trip_id)
        .await
        .map_err(ApiError::directory)?;
    trip.check_inventory()?;

    let id = Uuid::new_v4();
    let composer = BookingComposer::new(trip);
    let body = view(id, &composer);

    state.workflows.lock().await.insert(
        id,
        Arc::new(Mutex::new(BookingWorkflow {
            owner: session.user_id.clone(),
            composer,
        })),
    );
    info!(workflow_id = %id, trip_id = %req.trip_id, user = %session.user_id, "booking workflow started");

    Ok((StatusCode::CREATED, Json(body)))
}

async fn get_workflow(
    State(state): State<AppState>,
    TypedHeader(Authorization(bearer)): TypedHeader<Authorization<Bearer>>,
    Path(id): Path<Uuid>,
) -> Result<Json<WorkflowView>, ApiError> {
    let session = authorize(&state, &bearer).await?;
    let workflow = fetch_owned(&state, id, &session.user_id).await?;
    let workflow = workflow.lock().await;
    Ok(Json(view(id, &workflow.composer)))
}

async fn toggle_seat(
    State(state): State<AppState>,
    TypedHeader(Authorization(bearer)): TypedHeader<Authorization<Bearer>>,
    Path(id): Path<Uuid>,
    Json(req): Json<ToggleSeatRequest>,
) -> Result<Json<WorkflowView>, ApiError> {
    let session = authorize(&state, &bearer).await?;
    let workflow = fetch_owned(&state, id, &session.user_id).await?;
    let mut workflow = workflow.lock().await;

    workflow
        .composer
        .toggle_seat(req.seat)
        .map_err(ApiError::booking)?;
    Ok(Json(view(id, &workflow.composer)))
}

async fn update_passenger(
    State(state): State<AppState>,
    TypedHeader(Authorization(bearer)): TypedHeader<Authorization<Bearer>>,
    Path((id, seat)): Path<(Uuid, SeatNumber)>,
    Json(req): Json<UpdatePassengerRequest>,
) -> Result<Json<WorkflowView>, ApiError> {
    let session = authorize(&state, &bearer).await?;
    let workflow = fetch_owned(&state, id, &session.user_id).await?;
    let mut workflow = workflow.lock().await;

    let composer = &mut workflow.composer;
    if let Some(name) = req.name {
        composer
            .update_passenger(seat, PassengerUpdate::Name(name))
            .map_err(ApiError::booking)?;
    }
    if let Some(age) = req.age {
        composer
            .update_passenger(seat, PassengerUpdate::Age(age))
            .map_err(ApiError::booking)?;
    }
    if let Some(gender) = req.gender {
        composer
            .update_passenger(seat, PassengerUpdate::Gender(gender))
            .map_err(ApiError::booking)?;
    }

    Ok(Json(view(id, composer)))
}

async fn set_points(
    State(state): State<AppState>,
    TypedHeader(Authorization(bearer)): TypedHeader<Authorization<Bearer>>,
    Path(id): Path<Uuid>,
    Json(req): Json<SetPointsRequest>,
) -> Result<Json<WorkflowView>, ApiError> {
    let session = authorize(&state, &bearer).await?;
    let workflow = fetch_owned(&state, id, &session.user_id).await?;
    let mut workflow = workflow.lock().await;

    let composer = &mut workflow.composer;
    if let Some(boarding) = req.boarding_point {
        composer
            .set_boarding_point(boarding)
            .map_err(ApiError::booking)?;
    }
    if let Some(dropping) = req.dropping_point {
        composer
            .set_dropping_point(dropping)
            .map_err(ApiError::booking)?;
    }

    Ok(Json(view(id, composer)))
}

async fn submit_workflow(
    State(state): State<AppState>,
    TypedHeader(Authorization(bearer)): TypedHeader<Authorization<Bearer>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SubmitResponse>, ApiError> {
    let session = authorize(&state, &bearer).await?;
    let workflow = fetch_owned(&state, id, &session.user_id).await?;
    let mut workflow = workflow.lock().await;

    let reservation = workflow
        .composer
        .submit(state.bookings.as_ref(), &session.token)
        .await
        .map_err(ApiError::booking)?;

    Ok(Json(SubmitResponse {
        reservation,
        state: workflow.composer.state(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn trip(total_seats: u32, booked: &[SeatNumber]) -> Trip {
        Trip {
            id: Uuid::new_v4(),
            operator_name: "Hill Express".to_string(),
            from_city: "Pune".to_string(),
            to_city: "Mumbai".to_string(),
            departure: Utc.with_ymd_and_hms(2025, 6, 1, 6, 30, 0).unwrap(),
            arrival: Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).unwrap(),
            total_seats,
            booked_seats: booked.iter().copied().collect(),
            fare: 500,
            boarding_points: vec![],
            dropping_points: vec![],
        }
    }

    #[test]
    fn test_seat_grid_rows_of_four() {
        let mut composer = BookingComposer::new(trip(10, &[3]));
        composer.toggle_seat(5).unwrap();

        let grid = seat_grid(&composer);
        assert_eq!(grid.len(), 3);
        assert_eq!(grid[0].len(), 4);
        assert_eq!(grid[2].len(), 2);

        assert_eq!(grid[0][2].status, SeatStatus::Booked);
        assert_eq!(grid[1][0].status, SeatStatus::Selected);
        assert_eq!(grid[2][1].number, 10);
        assert_eq!(grid[2][1].status, SeatStatus::Available);
    }
}
