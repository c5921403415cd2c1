use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

/// Seat identifier, valid in `1..=total_seats` for the owning trip.
pub type SeatNumber = u32;

/// A boarding or dropping point on a trip's route.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Stop {
    pub location: String,
    /// Display time as published by the operator, e.g. "06:30 AM".
    pub time: String,
}

/// One scheduled departure with fixed seat inventory and pricing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trip {
    pub id: Uuid,
    pub operator_name: String,
    pub from_city: String,
    pub to_city: String,
    pub departure: DateTime<Utc>,
    pub arrival: DateTime<Utc>,
    pub total_seats: u32,
    /// Seats already reserved by other travelers, kept ordered.
    pub booked_seats: BTreeSet<SeatNumber>,
    /// Per-seat fare in minor currency units.
    pub fare: i32,
    pub boarding_points: Vec<Stop>,
    pub dropping_points: Vec<Stop>,
}

impl Trip {
    /// Check the inventory invariant: every booked seat must fall inside
    /// `1..=total_seats`.
    pub fn check_inventory(&self) -> Result<(), TripError> {
        for &seat in &self.booked_seats {
            if seat == 0 || seat > self.total_seats {
                return Err(TripError::SeatOutOfRange {
                    seat,
                    total_seats: self.total_seats,
                });
            }
        }
        Ok(())
    }

    pub fn is_booked(&self, seat: SeatNumber) -> bool {
        self.booked_seats.contains(&seat)
    }

    /// Default boarding point: first listed stop, if any.
    pub fn default_boarding_point(&self) -> Option<&str> {
        self.boarding_points.first().map(|s| s.location.as_str())
    }

    /// Default dropping point: first listed stop, if any.
    pub fn default_dropping_point(&self) -> Option<&str> {
        self.dropping_points.first().map(|s| s.location.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TripError {
    #[error("booked seat {seat} outside inventory of {total_seats} seats")]
    SeatOutOfRange { seat: SeatNumber, total_seats: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

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
            boarding_points: vec![Stop {
                location: "Central Depot".to_string(),
                time: "06:00 AM".to_string(),
            }],
            dropping_points: vec![Stop {
                location: "Dadar East".to_string(),
                time: "09:45 AM".to_string(),
            }],
        }
    }

    #[test]
    fn test_inventory_invariant() {
        assert!(trip(40, &[3, 4]).check_inventory().is_ok());
        assert!(trip(40, &[41]).check_inventory().is_err());
        assert!(trip(40, &[0]).check_inventory().is_err());
    }

    #[test]
    fn test_default_points() {
        let t = trip(40, &[]);
        assert_eq!(t.default_boarding_point(), Some("Central Depot"));
        assert_eq!(t.default_dropping_point(), Some("Dadar East"));
    }
}
