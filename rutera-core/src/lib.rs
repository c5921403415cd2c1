pub mod directory;
pub mod session;
pub mod submission;
pub mod trip;

pub use directory::{DirectoryError, InMemoryTripDirectory, TripDirectory};
pub use session::{Session, SessionError, SessionProvider, StaticSessionProvider};
pub use submission::{
    BookingRecord, BookingRequest, BookingService, BookingStatus, Gender, InMemoryBookingService,
    PassengerDetail, Reservation, SubmissionError, SubmissionOutcome,
};
pub use trip::{SeatNumber, Stop, Trip, TripError};
