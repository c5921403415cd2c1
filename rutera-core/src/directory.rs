use crate::trip::Trip;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

/// Remote trip/route directory. Returns trip metadata including booked
/// seats as of the time of the call; seat inventory is owned by the
/// remote side.
#[async_trait]
pub trait TripDirectory: Send + Sync {
    async fn get_trip(&self, trip_id: Uuid) -> Result<Trip, DirectoryError>;

    async fn search(
        &self,
        from_city: &str,
        to_city: &str,
        date: NaiveDate,
    ) -> Result<Vec<Trip>, DirectoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("trip not found: {0}")]
    NotFound(Uuid),

    #[error("trip directory unavailable: {0}")]
    ServiceUnavailable(String),
}

/// In-memory directory seeded with a fixed set of trips.
pub struct InMemoryTripDirectory {
    trips: RwLock<HashMap<Uuid, Trip>>,
}

impl InMemoryTripDirectory {
    pub fn new() -> Self {
        Self {
            trips: RwLock::new(HashMap::new()),
        }
    }

    pub fn insert(&self, trip: Trip) {
        self.trips.write().unwrap().insert(trip.id, trip);
    }
}

impl Default for InMemoryTripDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TripDirectory for InMemoryTripDirectory {
    async fn get_trip(&self, trip_id: Uuid) -> Result<Trip, DirectoryError> {
        self.trips
            .read()
            .unwrap()
            .get(&trip_id)
            .cloned()
            .ok_or(DirectoryError::NotFound(trip_id))
    }

    async fn search(
        &self,
        from_city: &str,
        to_city: &str,
        date: NaiveDate,
    ) -> Result<Vec<Trip>, DirectoryError> {
        let trips = self.trips.read().unwrap();
        let mut matches: Vec<Trip> = trips
            .values()
            .filter(|t| {
                t.from_city.eq_ignore_ascii_case(from_city)
                    && t.to_city.eq_ignore_ascii_case(to_city)
                    && t.departure.date_naive() == date
            })
            .cloned()
            .collect();
        matches.sort_by_key(|t| t.departure);
        Ok(matches)
    }
}
