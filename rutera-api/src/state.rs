use rutera_booking::BookingComposer;
use rutera_core::{BookingService, SessionProvider, TripDirectory};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

/// One traveler's active booking session, pinned to its owner.
pub struct BookingWorkflow {
    pub owner: String,
    pub composer: BookingComposer,
}

/// Live workflows keyed by id. Each workflow sits behind its own async
/// mutex so a submission holds exclusive access across the service call
/// without blocking unrelated sessions.
pub type WorkflowMap = Mutex<HashMap<Uuid, Arc<Mutex<BookingWorkflow>>>>;

#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<dyn TripDirectory>,
    pub bookings: Arc<dyn BookingService>,
    pub sessions: Arc<dyn SessionProvider>,
    pub workflows: Arc<WorkflowMap>,
}

impl AppState {
    pub fn new(
        directory: Arc<dyn TripDirectory>,
        bookings: Arc<dyn BookingService>,
        sessions: Arc<dyn SessionProvider>,
    ) -> Self {
        Self {
            directory,
            bookings,
            sessions,
            workflows: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}
