use rutera_core::trip::{SeatNumber, Trip};
use std::collections::BTreeSet;

/// Ceiling on seats per booking, matching the remote inventory's rule.
pub const MAX_SEATS_PER_BOOKING: usize = 6;

/// Outcome of a successful toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Added,
    Removed,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SelectionError {
    /// Seat is reserved by someone else or outside the trip's inventory.
    /// State is never changed by this outcome.
    #[error("seat {0} is not available")]
    SeatUnavailable(SeatNumber),

    #[error("no more than {MAX_SEATS_PER_BOOKING} seats per booking")]
    CapacityExceeded,
}

/// Tracks which seats of one trip the traveler has picked. Insertion order
/// is preserved: it drives both the passenger-form order and the payload
/// order of the eventual booking request.
#[derive(Debug, Clone)]
pub struct SeatSelectionModel {
    total_seats: u32,
    booked: BTreeSet<SeatNumber>,
    selected: Vec<SeatNumber>,
}

impl SeatSelectionModel {
    pub fn new(trip: &Trip) -> Self {
        Self {
            total_seats: trip.total_seats,
            booked: trip.booked_seats.clone(),
            selected: Vec::new(),
        }
    }

    /// Select or deselect a seat. Booked and out-of-range seats are
    /// unavailable; selecting past the per-booking ceiling is refused with
    /// the selection left untouched.
    pub fn toggle(&mut self, seat: SeatNumber) -> Result<Toggle, SelectionError> {
        if seat == 0 || seat > self.total_seats || self.booked.contains(&seat) {
            return Err(SelectionError::SeatUnavailable(seat));
        }

        if let Some(pos) = self.selected.iter().position(|&s| s == seat) {
            self.selected.remove(pos);
            return Ok(Toggle::Removed);
        }

        if self.selected.len() == MAX_SEATS_PER_BOOKING {
            return Err(SelectionError::CapacityExceeded);
        }

        self.selected.push(seat);
        Ok(Toggle::Added)
    }

    pub fn is_booked(&self, seat: SeatNumber) -> bool {
        self.booked.contains(&seat)
    }

    pub fn is_selected(&self, seat: SeatNumber) -> bool {
        self.selected.contains(&seat)
    }

    /// Selected seats in insertion order.
    pub fn selected(&self) -> &[SeatNumber] {
        &self.selected
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}
