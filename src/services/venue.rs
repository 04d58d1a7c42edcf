//! Venue snapshot loading.
//!
//! The seat inventory is prepared outside this service and handed over as a
//! JSON document:
//!
//! ```json
//! {
//!   "id": 1,
//!   "name": "Summer concert",
//!   "starts_at": "2026-07-01T19:00:00Z",
//!   "levels": [{ "level": 0, "name": "Floor 288" }],
//!   "areas": [{ "area": 1, "level": 0 }],
//!   "seats": [{ "area": 1, "row": 1, "column": 1, "status": "locked" }]
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use tracing::info;

use crate::error::SeatError;
use crate::models::{Event, Level, Seat, SeatStatus, Seats};

#[derive(Debug, Error)]
pub enum VenueLoadError {
    #[error("failed to read venue file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid venue document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid seat: {0}")]
    Seat(#[from] SeatError),

    #[error("area {0} is not mapped to any level")]
    UnmappedArea(u16),
}

#[derive(Debug, Clone, Deserialize)]
pub struct VenueSnapshot {
    pub id: i64,
    pub name: String,
    pub starts_at: DateTime<Utc>,
    #[serde(default)]
    pub levels: Vec<LevelEntry>,
    #[serde(default)]
    pub areas: Vec<AreaEntry>,
    #[serde(default)]
    pub seats: Vec<SeatEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LevelEntry {
    pub level: Level,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AreaEntry {
    pub area: u16,
    pub level: Level,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeatEntry {
    pub area: u16,
    pub row: u16,
    pub column: u16,
    #[serde(default = "default_status")]
    pub status: SeatStatus,
}

fn default_status() -> SeatStatus {
    SeatStatus::Available
}

impl TryFrom<VenueSnapshot> for Event {
    type Error = VenueLoadError;

    fn try_from(snapshot: VenueSnapshot) -> Result<Self, Self::Error> {
        let mut event = Event::new(snapshot.id, snapshot.name, snapshot.starts_at);
        for entry in snapshot.levels {
            event.add_level(entry.level, entry.name);
        }
        for entry in snapshot.areas {
            event.add_area(entry.area, entry.level);
        }

        let mut seats = Vec::with_capacity(snapshot.seats.len());
        for entry in snapshot.seats {
            if event.find_level(entry.area).is_none() {
                return Err(VenueLoadError::UnmappedArea(entry.area));
            }
            seats.push(Seat::new(entry.area, entry.row, entry.column, entry.status)?);
        }
        event.set_seats(Seats::try_from(seats)?);

        Ok(event)
    }
}

pub fn parse_snapshot(json: &str) -> Result<Event, VenueLoadError> {
    let snapshot: VenueSnapshot = serde_json::from_str(json)?;
    Event::try_from(snapshot)
}

pub fn load_snapshot(path: impl AsRef<Path>) -> Result<Event, VenueLoadError> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path)?;
    let event = parse_snapshot(&json)?;
    info!(
        path = %path.display(),
        event_id = event.id,
        seats = event.seats().len(),
        "venue loaded"
    );
    Ok(event)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VENUE: &str = r#"{
        "id": 7,
        "name": "Summer concert",
        "starts_at": "2026-07-01T19:00:00Z",
        "levels": [{ "level": 0, "name": "Floor 288" }, { "level": 1, "name": "Stand 488" }],
        "areas": [{ "area": 1, "level": 0 }, { "area": 2, "level": 1 }],
        "seats": [
            { "area": 1, "row": 1, "column": 1 },
            { "area": 1, "row": 1, "column": 2, "status": "locked" },
            { "area": 2, "row": 1, "column": 1, "status": "ordered" }
        ]
    }"#;

    #[test]
    fn test_parse_snapshot() {
        let event = parse_snapshot(VENUE).unwrap();
        assert_eq!(event.id, 7);
        assert_eq!(event.level_name(Level(1)), Some("Stand 488"));
        assert_eq!(event.find_areas(Level(0)), &[1]);
        let summary = event.seats().summary();
        assert_eq!(summary.overall.total, 3);
        assert_eq!(summary.overall.available, 1);
        assert_eq!(summary.overall.locked, 1);
        assert_eq!(summary.overall.ordered, 1);
    }

    #[test]
    fn test_unmapped_area_is_rejected() {
        let json = VENUE.replace(r#"{ "area": 2, "row": 1"#, r#"{ "area": 3, "row": 1"#);
        assert!(matches!(parse_snapshot(&json), Err(VenueLoadError::UnmappedArea(3))));
    }

    #[test]
    fn test_bad_seats_are_rejected() {
        let json = VENUE.replace(r#""column": 2, "status": "locked""#, r#""column": 1000"#);
        assert!(matches!(
            parse_snapshot(&json),
            Err(VenueLoadError::Seat(SeatError::FieldOutOfRange { field: "column", .. }))
        ));

        let json = VENUE.replace(r#""column": 2, "status": "locked""#, r#""column": 1"#);
        assert!(matches!(
            parse_snapshot(&json),
            Err(VenueLoadError::Seat(SeatError::DuplicateSeat(_)))
        ));
    }
}
