use rutera_core::submission::Gender;
use rutera_core::trip::SeatNumber;
use serde::{Deserialize, Serialize};

/// Traveler details for one selected seat. Created with defaults the
/// moment the seat is selected, dropped the moment it is deselected.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PassengerRecord {
    pub seat_number: SeatNumber,
    pub name: String,
    pub age: Option<u32>,
    pub gender: Gender,
}

impl PassengerRecord {
    pub fn new(seat_number: SeatNumber) -> Self {
        Self {
            seat_number,
            name: String::new(),
            age: None,
            gender: Gender::default(),
        }
    }

    /// Complete records have a non-empty name and a positive age.
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty() && self.age.is_some_and(|age| age >= 1)
    }

    pub fn apply(&mut self, update: PassengerUpdate) {
        match update {
            PassengerUpdate::Name(name) => self.name = name,
            PassengerUpdate::Age(age) => self.age = Some(age),
            PassengerUpdate::Gender(gender) => self.gender = gender,
        }
    }
}

/// A single-field edit, keyed to one seat's record by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassengerUpdate {
    Name(String),
    Age(u32),
    Gender(Gender),
}
