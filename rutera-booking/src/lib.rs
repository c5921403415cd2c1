pub mod composer;
pub mod passenger;
pub mod selection;

pub use composer::{BookingComposer, BookingError, PriceSummary, ValidationError, WorkflowState};
pub use passenger::{PassengerRecord, PassengerUpdate};
pub use selection::{SeatSelectionModel, SelectionError, Toggle, MAX_SEATS_PER_BOOKING};
