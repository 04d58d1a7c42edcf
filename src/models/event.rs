use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::{info, warn};

use crate::error::SeatError;
use crate::models::seat::Seat;
use crate::models::seats::Seats;
use crate::services::allocator::Allocation;

/// Price tier.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Level(pub u8);

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}

/// One performance of an event: its price levels, which areas belong to which
/// level, and the seat pool.
///
/// An area belongs to exactly one level; a level may span many areas.
#[derive(Debug, Clone)]
pub struct Event {
    pub id: i64,
    pub name: String,
    pub starts_at: DateTime<Utc>,
    levels: BTreeMap<Level, String>,
    area_levels: BTreeMap<u16, Level>,
    level_areas: BTreeMap<Level, Vec<u16>>,
    seats: Seats,
}

impl Event {
    pub fn new(id: i64, name: impl Into<String>, starts_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: name.into(),
            starts_at,
            levels: BTreeMap::new(),
            area_levels: BTreeMap::new(),
            level_areas: BTreeMap::new(),
            seats: Seats::new(),
        }
    }

    pub fn add_level(&mut self, level: Level, name: impl Into<String>) {
        self.levels.insert(level, name.into());
    }

    /// Maps `area` to `level`. An area keeps the first level it was given.
    pub fn add_area(&mut self, area: u16, level: Level) {
        if self.area_levels.contains_key(&area) {
            return;
        }
        self.area_levels.insert(area, level);
        self.level_areas.entry(level).or_default().push(area);
    }

    pub fn find_areas(&self, level: Level) -> &[u16] {
        self.level_areas.get(&level).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn find_level(&self, area: u16) -> Option<Level> {
        self.area_levels.get(&area).copied()
    }

    pub fn level_name(&self, level: Level) -> Option<&str> {
        self.levels.get(&level).map(String::as_str)
    }

    pub fn levels(&self) -> impl Iterator<Item = (Level, &str)> + '_ {
        self.levels.iter().map(|(level, name)| (*level, name.as_str()))
    }

    /// Available seats per level that has at least one area.
    pub fn level_counts(&self) -> BTreeMap<Level, usize> {
        self.level_areas
            .iter()
            .map(|(level, areas)| (*level, self.seats.count_in_areas(areas)))
            .collect()
    }

    pub fn seats(&self) -> &Seats {
        &self.seats
    }

    pub fn add_seat(&mut self, seat: Seat) -> Result<(), SeatError> {
        self.seats.insert(seat)
    }

    pub fn set_seats(&mut self, seats: Seats) {
        self.seats = seats;
    }

    /// Marks every seat of `allocation` as ordered. Either all seats are
    /// committed or, if any of them is no longer available, none is.
    pub fn commit(&mut self, allocation: &Allocation) -> Result<Seats, SeatError> {
        let ids = allocation.seat_ids();
        let ordered = self.seats.order_seats(&ids)?;
        info!(
            event_id = self.id,
            seats = ordered.len(),
            runs = allocation.run_ids().len(),
            "allocation committed"
        );
        Ok(ordered)
    }

    /// Picks seats for a party in the areas of `level` and commits them.
    ///
    /// Returns `Ok(None)` when the level cannot seat the party right now.
    pub fn allocate(
        &mut self,
        party_size: usize,
        level: Level,
    ) -> Result<Option<(Allocation, Seats)>, SeatError> {
        let areas = self.find_areas(level).to_vec();
        let Some(allocation) = self.seats.pick_best(party_size, &areas) else {
            warn!(
                event_id = self.id,
                %level,
                party_size,
                available = self.seats.count_in_areas(&areas),
                "no consecutive seats found"
            );
            return Ok(None);
        };

        let ordered = self.commit(&allocation)?;
        Ok(Some((allocation, ordered)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::seat::SeatStatus;

    fn event() -> Event {
        let mut event = Event::new(1, "Test concert", Utc::now());
        event.add_level(Level(0), "Floor 288");
        event.add_level(Level(1), "Stand 488");
        event.add_area(10, Level(0));
        event.add_area(11, Level(0));
        event.add_area(20, Level(1));
        event.add_area(10, Level(1));
        for area in [10u16, 11, 20] {
            for column in 1..=4 {
                event
                    .add_seat(Seat::new(area, 1, column, SeatStatus::Available).unwrap())
                    .unwrap();
            }
        }
        event
    }

    #[test]
    fn test_topology() {
        let event = event();
        assert_eq!(event.find_areas(Level(0)), &[10, 11]);
        assert_eq!(event.find_areas(Level(1)), &[20]);
        assert!(event.find_areas(Level(5)).is_empty());
        assert_eq!(event.find_level(10), Some(Level(0)));
        assert_eq!(event.find_level(99), None);
        assert_eq!(event.level_name(Level(1)), Some("Stand 488"));
        assert_eq!(event.level_name(Level(3)), None);
    }

    #[test]
    fn test_level_counts_follow_orders() {
        let mut event = event();
        assert_eq!(event.level_counts()[&Level(0)], 8);

        let (allocation, ordered) = event.allocate(6, Level(0)).unwrap().unwrap();
        assert_eq!(allocation.seat_count(), 6);
        assert_eq!(ordered.len(), 6);
        assert!(ordered.iter().all(|s| s.status() == SeatStatus::Ordered));
        assert_eq!(event.level_counts()[&Level(0)], 2);
        assert_eq!(event.level_counts()[&Level(1)], 4);
        assert_eq!(event.seats().count_ordered(), 6);
    }

    #[test]
    fn test_allocate_without_room() {
        let mut event = event();
        assert!(event.allocate(5, Level(1)).unwrap().is_none());
        assert!(event.allocate(1, Level(7)).unwrap().is_none());
        assert_eq!(event.seats().count_ordered(), 0);
    }

    #[test]
    fn test_stale_allocation_is_rejected() {
        let mut event = event();
        let allocation = event.seats().pick_best(4, &[20]).unwrap();
        event.commit(&allocation).unwrap();
        let before = event.seats().clone();
        assert!(matches!(
            event.commit(&allocation),
            Err(SeatError::SeatUnavailable(_))
        ));
        assert_eq!(event.seats(), &before);
    }
}
