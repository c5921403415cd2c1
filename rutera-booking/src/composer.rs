use crate::passenger::{PassengerRecord, PassengerUpdate};
use crate::selection::{SeatSelectionModel, SelectionError, Toggle};
use rutera_core::submission::{
    BookingRequest, BookingService, PassengerDetail, Reservation, SubmissionError,
};
use rutera_core::trip::{SeatNumber, Trip};
use serde::Serialize;
use tracing::{info, warn};

/// Payment method tag attached to every booking request.
pub const DEFAULT_PAYMENT_METHOD: &str = "credit_card";

/// Booking-session lifecycle. `Submitting` and `Confirmed` block every
/// mutation; a rejected submission drops back to `Composing` with the
/// draft intact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkflowState {
    Browsing,
    Selecting,
    Composing,
    Validated,
    Submitting,
    Confirmed,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("no seats selected")]
    EmptySelection,

    /// First seat, in selection order, whose record is missing a name or a
    /// positive age.
    #[error("passenger details incomplete for seat {0}")]
    IncompletePassenger(SeatNumber),
}

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("booking request not validated")]
    NotValidated,

    #[error("a submission is already in flight")]
    SubmissionInFlight,

    #[error("booking session already confirmed")]
    AlreadyConfirmed,

    /// Business-level refusal from the submission service. The draft is
    /// preserved so the traveler can adjust and resubmit.
    #[error("booking rejected: {0}")]
    Rejected(String),

    #[error("booking service unavailable: {0}")]
    ServiceUnavailable(String),
}

/// Flat per-seat pricing, recomputed from the current selection on every
/// call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriceSummary {
    pub seat_count: u32,
    pub per_seat_fare: i32,
    pub total: i32,
}

/// Owns one booking session: the seat selection, one passenger record per
/// selected seat, the boarding/dropping choice, and the submission
/// protocol. Passenger records and the selection are kept in lockstep on
/// every mutation.
pub struct BookingComposer {
    trip: Trip,
    selection: SeatSelectionModel,
    passengers: Vec<PassengerRecord>,
    boarding_point: String,
    dropping_point: String,
    state: WorkflowState,
}

impl BookingComposer {
    pub fn new(trip: Trip) -> Self {
        let selection = SeatSelectionModel::new(&trip);
        let boarding_point = trip.default_boarding_point().unwrap_or("").to_string();
        let dropping_point = trip.default_dropping_point().unwrap_or("").to_string();
        Self {
            trip,
            selection,
            passengers: Vec::new(),
            boarding_point,
            dropping_point,
            state: WorkflowState::Browsing,
        }
    }

    pub fn trip(&self) -> &Trip {
        &self.trip
    }

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    pub fn selected_seats(&self) -> &[SeatNumber] {
        self.selection.selected()
    }

    pub fn is_booked(&self, seat: SeatNumber) -> bool {
        self.selection.is_booked(seat)
    }

    pub fn is_selected(&self, seat: SeatNumber) -> bool {
        self.selection.is_selected(seat)
    }

    /// Passenger records in seat-selection order.
    pub fn passengers(&self) -> &[PassengerRecord] {
        &self.passengers
    }

    pub fn passenger(&self, seat: SeatNumber) -> Option<&PassengerRecord> {
        self.passengers.iter().find(|p| p.seat_number == seat)
    }

    pub fn boarding_point(&self) -> &str {
        &self.boarding_point
    }

    pub fn dropping_point(&self) -> &str {
        &self.dropping_point
    }

    /// Select or deselect a seat, then bring the passenger records back in
    /// line with the selection.
    pub fn toggle_seat(&mut self, seat: SeatNumber) -> Result<Toggle, BookingError> {
        self.guard_mutable()?;
        let outcome = self.selection.toggle(seat)?;
        self.reconcile();
        self.state = self.draft_state();
        Ok(outcome)
    }

    /// Apply a single-field edit to the record for `seat`. A seat with no
    /// record (already deselected) is silently ignored.
    pub fn update_passenger(
        &mut self,
        seat: SeatNumber,
        update: PassengerUpdate,
    ) -> Result<(), BookingError> {
        self.guard_mutable()?;
        if let Some(record) = self.passengers.iter_mut().find(|p| p.seat_number == seat) {
            record.apply(update);
            self.state = self.draft_state();
        }
        Ok(())
    }

    /// Overwrite the boarding point. Membership in the trip's listed stops
    /// is constrained by the presentation layer, not here.
    pub fn set_boarding_point(&mut self, value: impl Into<String>) -> Result<(), BookingError> {
        self.guard_mutable()?;
        self.boarding_point = value.into();
        Ok(())
    }

    pub fn set_dropping_point(&mut self, value: impl Into<String>) -> Result<(), BookingError> {
        self.guard_mutable()?;
        self.dropping_point = value.into();
        Ok(())
    }

    pub fn price_summary(&self) -> PriceSummary {
        let seat_count = self.selection.len() as u32;
        PriceSummary {
            seat_count,
            per_seat_fare: self.trip.fare,
            total: self.trip.fare * seat_count as i32,
        }
    }

    /// Check the draft for completeness. Success moves an editable
    /// session to `Validated`; failure leaves the draft untouched.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        self.check_complete()?;
        if self.guard_mutable().is_ok() {
            self.state = WorkflowState::Validated;
        }
        Ok(())
    }

    /// Assemble the immutable booking request. Only a validated draft may
    /// be packaged; passengers appear in seat-selection order.
    pub fn build_request(&self) -> Result<BookingRequest, BookingError> {
        if self.state != WorkflowState::Validated {
            return Err(BookingError::NotValidated);
        }

        let mut passengers = Vec::with_capacity(self.selection.len());
        for &seat in self.selection.selected() {
            let record = self.passenger(seat).ok_or(BookingError::NotValidated)?;
            let age = record.age.ok_or(BookingError::NotValidated)?;
            passengers.push(PassengerDetail {
                seat_number: seat,
                name: record.name.clone(),
                age,
                gender: record.gender,
            });
        }

        Ok(BookingRequest {
            trip_id: self.trip.id,
            passengers,
            boarding_point: self.boarding_point.clone(),
            dropping_point: self.dropping_point.clone(),
            payment_method: DEFAULT_PAYMENT_METHOD.to_string(),
        })
    }

    /// Drive one submission. Invalid drafts fail before any service call.
    /// A valid draft issues exactly one call: confirmation ends the
    /// session, rejection returns it to `Composing` with the whole draft
    /// preserved. Retrying is the caller's decision, never automatic.
    pub async fn submit(
        &mut self,
        service: &dyn BookingService,
        token: &str,
    ) -> Result<Reservation, BookingError> {
        self.guard_mutable()?;
        self.validate()?;
        let request = self.build_request()?;

        self.state = WorkflowState::Submitting;
        info!(
            trip_id = %request.trip_id,
            seats = request.passengers.len(),
            "submitting booking request"
        );

        match service.submit(&request, token).await {
            Ok(reservation) => {
                self.state = WorkflowState::Confirmed;
                info!(reservation_id = %reservation.id, "booking confirmed");
                Ok(reservation)
            }
            Err(SubmissionError::Rejected { reason }) => {
                self.state = WorkflowState::Composing;
                let reason = reason.unwrap_or_else(|| "booking failed".to_string());
                warn!(trip_id = %request.trip_id, %reason, "booking rejected");
                Err(BookingError::Rejected(reason))
            }
            Err(other) => {
                self.state = WorkflowState::Composing;
                warn!(trip_id = %request.trip_id, error = %other, "booking submission failed");
                Err(BookingError::ServiceUnavailable(other.to_string()))
            }
        }
    }

    fn guard_mutable(&self) -> Result<(), BookingError> {
        match self.state {
            WorkflowState::Submitting => Err(BookingError::SubmissionInFlight),
            WorkflowState::Confirmed => Err(BookingError::AlreadyConfirmed),
            _ => Ok(()),
        }
    }

    /// One record per selected seat, selection order, surviving records
    /// untouched. A deselected-then-reselected seat gets fresh defaults.
    fn reconcile(&mut self) {
        self.passengers
            .retain(|p| self.selection.is_selected(p.seat_number));
        for &seat in self.selection.selected() {
            if self.passengers.iter().all(|p| p.seat_number != seat) {
                self.passengers.push(PassengerRecord::new(seat));
            }
        }
    }

    fn draft_state(&self) -> WorkflowState {
        if self.selection.is_empty() {
            WorkflowState::Browsing
        } else if self.passengers.iter().all(|p| p.name.is_empty() && p.age.is_none()) {
            WorkflowState::Selecting
        } else {
            WorkflowState::Composing
        }
    }

    fn check_complete(&self) -> Result<(), ValidationError> {
        if self.selection.is_empty() {
            return Err(ValidationError::EmptySelection);
        }
        for &seat in self.selection.selected() {
            let complete = self.passenger(seat).is_some_and(|p| p.is_complete());
            if !complete {
                return Err(ValidationError::IncompletePassenger(seat));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rutera_core::submission::{Gender, InMemoryBookingService, SubmissionOutcome};
    use rutera_core::trip::Stop;
    use uuid::Uuid;

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
            boarding_points: vec![
                Stop {
                    location: "Central Depot".to_string(),
                    time: "06:00 AM".to_string(),
                },
                Stop {
                    location: "Airport Road".to_string(),
                    time: "06:20 AM".to_string(),
                },
            ],
            dropping_points: vec![Stop {
                location: "Dadar East".to_string(),
                time: "09:45 AM".to_string(),
            }],
        }
    }

    fn fill(composer: &mut BookingComposer, seat: SeatNumber, name: &str, age: u32) {
        composer
            .update_passenger(seat, PassengerUpdate::Name(name.to_string()))
            .unwrap();
        composer
            .update_passenger(seat, PassengerUpdate::Age(age))
            .unwrap();
    }

    #[test]
    fn test_defaults_come_from_first_listed_stops() {
        let composer = BookingComposer::new(trip(40, &[]));
        assert_eq!(composer.boarding_point(), "Central Depot");
        assert_eq!(composer.dropping_point(), "Dadar East");
        assert_eq!(composer.state(), WorkflowState::Browsing);
    }

    #[test]
    fn test_records_mirror_selection_on_every_mutation() {
        let mut composer = BookingComposer::new(trip(40, &[3, 4]));

        assert!(composer.toggle_seat(3).is_err());
        assert!(composer.passengers().is_empty());

        composer.toggle_seat(1).unwrap();
        composer.toggle_seat(2).unwrap();
        let keys: Vec<SeatNumber> = composer.passengers().iter().map(|p| p.seat_number).collect();
        assert_eq!(keys, composer.selected_seats());
        assert_eq!(keys, vec![1, 2]);

        composer.toggle_seat(1).unwrap();
        let keys: Vec<SeatNumber> = composer.passengers().iter().map(|p| p.seat_number).collect();
        assert_eq!(keys, vec![2]);
        assert_eq!(composer.selected_seats(), &[2]);
    }

    #[test]
    fn test_unrelated_toggle_keeps_existing_edits() {
        let mut composer = BookingComposer::new(trip(40, &[]));
        composer.toggle_seat(5).unwrap();
        fill(&mut composer, 5, "Asha Verma", 29);

        composer.toggle_seat(9).unwrap();
        composer.toggle_seat(9).unwrap();

        let record = composer.passenger(5).unwrap();
        assert_eq!(record.name, "Asha Verma");
        assert_eq!(record.age, Some(29));
    }

    #[test]
    fn test_reselected_seat_gets_fresh_defaults() {
        let mut composer = BookingComposer::new(trip(40, &[]));
        composer.toggle_seat(5).unwrap();
        fill(&mut composer, 5, "Asha Verma", 29);

        composer.toggle_seat(5).unwrap();
        composer.toggle_seat(5).unwrap();

        let record = composer.passenger(5).unwrap();
        assert_eq!(record.name, "");
        assert_eq!(record.age, None);
        assert_eq!(record.gender, Gender::Male);
    }

    #[test]
    fn test_update_for_removed_seat_is_silent() {
        let mut composer = BookingComposer::new(trip(40, &[]));
        composer.toggle_seat(5).unwrap();
        composer.toggle_seat(5).unwrap();

        composer
            .update_passenger(5, PassengerUpdate::Name("ghost".to_string()))
            .unwrap();
        assert!(composer.passenger(5).is_none());
    }

    #[test]
    fn test_price_summary_recomputes() {
        let mut composer = BookingComposer::new(trip(40, &[]));
        assert_eq!(
            composer.price_summary(),
            PriceSummary {
                seat_count: 0,
                per_seat_fare: 500,
                total: 0
            }
        );

        composer.toggle_seat(1).unwrap();
        composer.toggle_seat(2).unwrap();
        assert_eq!(
            composer.price_summary(),
            PriceSummary {
                seat_count: 2,
                per_seat_fare: 500,
                total: 1000
            }
        );

        composer.toggle_seat(2).unwrap();
        assert_eq!(composer.price_summary().total, 500);
    }

    #[test]
    fn test_validate_reports_first_incomplete_in_selection_order() {
        let mut composer = BookingComposer::new(trip(40, &[]));
        assert_eq!(composer.validate(), Err(ValidationError::EmptySelection));

        composer.toggle_seat(5).unwrap();
        composer.toggle_seat(2).unwrap();
        assert_eq!(
            composer.validate(),
            Err(ValidationError::IncompletePassenger(5))
        );

        fill(&mut composer, 5, "Asha Verma", 29);
        assert_eq!(
            composer.validate(),
            Err(ValidationError::IncompletePassenger(2))
        );

        fill(&mut composer, 2, "Ravi Verma", 31);
        assert_eq!(composer.validate(), Ok(()));
        assert_eq!(composer.state(), WorkflowState::Validated);
    }

    #[test]
    fn test_build_request_requires_validation() {
        let mut composer = BookingComposer::new(trip(40, &[]));
        composer.toggle_seat(1).unwrap();
        fill(&mut composer, 1, "Asha Verma", 29);

        assert!(matches!(
            composer.build_request(),
            Err(BookingError::NotValidated)
        ));

        composer.validate().unwrap();
        let request = composer.build_request().unwrap();
        assert_eq!(request.payment_method, DEFAULT_PAYMENT_METHOD);

        // Any mutation invalidates the draft again.
        composer.toggle_seat(2).unwrap();
        assert!(matches!(
            composer.build_request(),
            Err(BookingError::NotValidated)
        ));
    }

    #[test]
    fn test_request_passengers_follow_selection_order() {
        let mut composer = BookingComposer::new(trip(40, &[]));
        composer.toggle_seat(8).unwrap();
        composer.toggle_seat(3).unwrap();
        fill(&mut composer, 8, "Asha Verma", 29);
        fill(&mut composer, 3, "Ravi Verma", 31);
        composer
            .update_passenger(3, PassengerUpdate::Gender(Gender::Other))
            .unwrap();
        composer.validate().unwrap();

        let request = composer.build_request().unwrap();
        let seats: Vec<SeatNumber> = request.passengers.iter().map(|p| p.seat_number).collect();
        assert_eq!(seats, vec![8, 3]);
        assert_eq!(request.passengers[1].gender, Gender::Other);
    }

    #[tokio::test]
    async fn test_invalid_draft_issues_no_service_call() {
        let mut composer = BookingComposer::new(trip(40, &[]));
        let service = InMemoryBookingService::new(500);

        let err = composer.submit(&service, "tok").await.unwrap_err();
        assert!(matches!(
            err,
            BookingError::Validation(ValidationError::EmptySelection)
        ));
        assert_eq!(service.submit_calls(), 0);

        composer.toggle_seat(1).unwrap();
        let err = composer.submit(&service, "tok").await.unwrap_err();
        assert!(matches!(
            err,
            BookingError::Validation(ValidationError::IncompletePassenger(1))
        ));
        assert_eq!(service.submit_calls(), 0);
    }

    #[tokio::test]
    async fn test_booked_trip_scenario() {
        // 40 seats, 3 and 4 already booked.
        let mut composer = BookingComposer::new(trip(40, &[3, 4]));
        let service = InMemoryBookingService::new(500);

        assert!(composer.toggle_seat(3).is_err());
        assert!(composer.selected_seats().is_empty());

        composer.toggle_seat(1).unwrap();
        composer.toggle_seat(2).unwrap();
        assert_eq!(composer.selected_seats(), &[1, 2]);
        assert!(composer.passengers().iter().all(|p| p.name.is_empty()));

        assert_eq!(
            composer.validate(),
            Err(ValidationError::IncompletePassenger(1))
        );

        fill(&mut composer, 1, "Asha Verma", 29);
        fill(&mut composer, 2, "Ravi Verma", 31);
        assert_eq!(composer.validate(), Ok(()));
        assert_eq!(
            composer.price_summary(),
            PriceSummary {
                seat_count: 2,
                per_seat_fare: 500,
                total: 1000
            }
        );

        let reservation = composer.submit(&service, "tok").await.unwrap();
        assert_eq!(reservation.seats, vec![1, 2]);
        assert_eq!(service.submit_calls(), 1);
        assert_eq!(composer.state(), WorkflowState::Confirmed);
        assert_eq!(composer.selected_seats(), &[1, 2]);
    }

    #[tokio::test]
    async fn test_rejection_preserves_draft() {
        let mut composer = BookingComposer::new(trip(40, &[]));
        let service = InMemoryBookingService::new(500);
        service.set_outcome(SubmissionOutcome::Reject(Some(
            "seat no longer available".to_string(),
        )));

        composer.toggle_seat(1).unwrap();
        composer.toggle_seat(2).unwrap();
        fill(&mut composer, 1, "Asha Verma", 29);
        fill(&mut composer, 2, "Ravi Verma", 31);

        let err = composer.submit(&service, "tok").await.unwrap_err();
        assert!(matches!(err, BookingError::Rejected(ref r) if r == "seat no longer available"));

        assert_eq!(composer.state(), WorkflowState::Composing);
        assert_eq!(composer.selected_seats(), &[1, 2]);
        assert_eq!(composer.passenger(1).unwrap().name, "Asha Verma");
        assert_eq!(composer.passenger(2).unwrap().age, Some(31));

        // Same draft may be resubmitted once the conflict clears.
        service.set_outcome(SubmissionOutcome::Confirm);
        composer.submit(&service, "tok").await.unwrap();
        assert_eq!(service.submit_calls(), 2);
    }

    #[tokio::test]
    async fn test_rejection_without_reason_maps_to_generic_failure() {
        let mut composer = BookingComposer::new(trip(40, &[]));
        let service = InMemoryBookingService::new(500);
        service.set_outcome(SubmissionOutcome::Reject(None));

        composer.toggle_seat(1).unwrap();
        fill(&mut composer, 1, "Asha Verma", 29);

        let err = composer.submit(&service, "tok").await.unwrap_err();
        assert!(matches!(err, BookingError::Rejected(ref r) if r == "booking failed"));
    }

    #[tokio::test]
    async fn test_confirmed_session_blocks_mutation() {
        let mut composer = BookingComposer::new(trip(40, &[]));
        let service = InMemoryBookingService::new(500);

        composer.toggle_seat(1).unwrap();
        fill(&mut composer, 1, "Asha Verma", 29);
        composer.submit(&service, "tok").await.unwrap();

        assert!(matches!(
            composer.toggle_seat(2),
            Err(BookingError::AlreadyConfirmed)
        ));
        assert!(matches!(
            composer.submit(&service, "tok").await,
            Err(BookingError::AlreadyConfirmed)
        ));
        assert_eq!(service.submit_calls(), 1);
    }

    #[test]
    fn test_state_progression_through_draft() {
        let mut composer = BookingComposer::new(trip(40, &[]));
        assert_eq!(composer.state(), WorkflowState::Browsing);

        composer.toggle_seat(1).unwrap();
        assert_eq!(composer.state(), WorkflowState::Selecting);

        composer
            .update_passenger(1, PassengerUpdate::Name("Asha".to_string()))
            .unwrap();
        assert_eq!(composer.state(), WorkflowState::Composing);

        composer.toggle_seat(1).unwrap();
        assert_eq!(composer.state(), WorkflowState::Browsing);
    }
}
