use crate::trip::SeatNumber;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    #[default]
    Male,
    Female,
    Other,
}

/// One traveler as sent to the submission service, in seat-selection order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PassengerDetail {
    pub seat_number: SeatNumber,
    pub name: String,
    pub age: u32,
    pub gender: Gender,
}

/// The immutable payload sent to the submission service. Built only from a
/// fully validated draft; never modified after construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRequest {
    pub trip_id: Uuid,
    pub passengers: Vec<PassengerDetail>,
    pub boarding_point: String,
    pub dropping_point: String,
    pub payment_method: String,
}

/// A confirmed reservation as returned by the submission service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    pub id: Uuid,
    pub trip_id: Uuid,
    pub seats: Vec<SeatNumber>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
}

/// A traveler's past booking, as listed by the submission service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRecord {
    pub id: Uuid,
    pub trip_id: Uuid,
    pub seats: Vec<SeatNumber>,
    pub total_fare: i32,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    /// Business-level refusal of a structurally valid request. The service
    /// may or may not supply a reason.
    #[error("booking rejected: {}", .reason.as_deref().unwrap_or("no reason given"))]
    Rejected { reason: Option<String> },

    #[error("booking service unavailable: {0}")]
    Unavailable(String),

    #[error("booking not found: {0}")]
    NotFound(Uuid),
}

/// Remote booking inventory service. Accepts at most one submission per
/// validated draft from this side; dedup across retries is its concern.
#[async_trait]
pub trait BookingService: Send + Sync {
    async fn submit(
        &self,
        request: &BookingRequest,
        token: &str,
    ) -> Result<Reservation, SubmissionError>;

    async fn list_for_user(&self, token: &str) -> Result<Vec<BookingRecord>, SubmissionError>;

    async fn cancel(&self, booking_id: Uuid, token: &str) -> Result<(), SubmissionError>;
}

/// What the in-memory service should do with the next submission.
#[derive(Debug, Clone)]
pub enum SubmissionOutcome {
    Confirm,
    Reject(Option<String>),
    Unavailable(String),
}

/// In-memory booking service for demos and tests. Counts every submission
/// call so callers can assert how many network round trips a workflow
/// actually issued.
pub struct InMemoryBookingService {
    outcome: Mutex<SubmissionOutcome>,
    submit_calls: AtomicUsize,
    per_seat_fare: i32,
    bookings: Mutex<Vec<(String, BookingRecord)>>,
}

impl InMemoryBookingService {
    pub fn new(per_seat_fare: i32) -> Self {
        Self {
            outcome: Mutex::new(SubmissionOutcome::Confirm),
            submit_calls: AtomicUsize::new(0),
            per_seat_fare,
            bookings: Mutex::new(Vec::new()),
        }
    }

    /// Configure the outcome of subsequent submissions.
    pub fn set_outcome(&self, outcome: SubmissionOutcome) {
        *self.outcome.lock().unwrap() = outcome;
    }

    /// Number of submission calls received so far.
    pub fn submit_calls(&self) -> usize {
        self.submit_calls.load(Ordering::SeqCst)
    }
}

impl Default for InMemoryBookingService {
    fn default() -> Self {
        Self::new(0)
    }
}

#[async_trait]
impl BookingService for InMemoryBookingService {
    async fn submit(
        &self,
        request: &BookingRequest,
        token: &str,
    ) -> Result<Reservation, SubmissionError> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);

        let outcome = self.outcome.lock().unwrap().clone();
        match outcome {
            SubmissionOutcome::Confirm => {
                let seats: Vec<SeatNumber> =
                    request.passengers.iter().map(|p| p.seat_number).collect();
                let record = BookingRecord {
                    id: Uuid::new_v4(),
                    trip_id: request.trip_id,
                    seats: seats.clone(),
                    total_fare: self.per_seat_fare * seats.len() as i32,
                    status: BookingStatus::Confirmed,
                    created_at: Utc::now(),
                };
                let reservation = Reservation {
                    id: record.id,
                    trip_id: record.trip_id,
                    seats,
                };
                self.bookings
                    .lock()
                    .unwrap()
                    .push((token.to_string(), record));
                info!("booking confirmed: {}", reservation.id);
                Ok(reservation)
            }
            SubmissionOutcome::Reject(reason) => Err(SubmissionError::Rejected { reason }),
            SubmissionOutcome::Unavailable(msg) => Err(SubmissionError::Unavailable(msg)),
        }
    }

    async fn list_for_user(&self, token: &str) -> Result<Vec<BookingRecord>, SubmissionError> {
        Ok(self
            .bookings
            .lock()
            .unwrap()
            .iter()
            .filter(|(owner, _)| owner == token)
            .map(|(_, record)| record.clone())
            .collect())
    }

    async fn cancel(&self, booking_id: Uuid, token: &str) -> Result<(), SubmissionError> {
        let mut bookings = self.bookings.lock().unwrap();
        let entry = bookings
            .iter_mut()
            .find(|(owner, record)| owner == token && record.id == booking_id)
            .ok_or(SubmissionError::NotFound(booking_id))?;
        entry.1.status = BookingStatus::Cancelled;
        Ok(())
    }
}
