use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::ops::Index;

use crate::error::SeatError;
use crate::models::seat::{Seat, SeatId, SeatStatus};

/// A set of seats kept sorted by identity key.
///
/// No two seats share an (area, row, column) position, so after a status
/// change the collection is simply re-sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Seats {
    seats: Vec<Seat>,
}

impl Seats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps seats that already come from a sorted, duplicate-free collection.
    pub(crate) fn from_sorted(seats: Vec<Seat>) -> Self {
        debug_assert!(seats.windows(2).all(|pair| pair[0].id() < pair[1].id()));
        Seats { seats }
    }

    pub fn len(&self) -> usize {
        self.seats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Seat> {
        self.seats.iter()
    }

    pub fn as_slice(&self) -> &[Seat] {
        &self.seats
    }

    pub fn first(&self) -> Option<&Seat> {
        self.seats.first()
    }

    pub fn last(&self) -> Option<&Seat> {
        self.seats.last()
    }

    pub fn contains(&self, id: SeatId) -> bool {
        self.seats.binary_search_by_key(&id, Seat::id).is_ok()
    }

    /// Adds one seat, keeping the collection sorted.
    pub fn insert(&mut self, seat: Seat) -> Result<(), SeatError> {
        let occupied = SeatStatus::ALL
            .iter()
            .any(|status| self.contains(seat.id().with_status(*status)));
        if occupied {
            return Err(SeatError::DuplicateSeat(seat.id()));
        }
        let at = self.seats.partition_point(|s| s.id() < seat.id());
        self.seats.insert(at, seat);
        Ok(())
    }

    // Keys change with status, so every mutation ends with a re-sort.
    fn tidy(&mut self) {
        self.seats.sort_by_key(Seat::id);
    }

    /// Seats whose key lies in `range`, which must be one contiguous slice of
    /// the sorted collection.
    fn slice_in(&self, range: &std::ops::RangeInclusive<SeatId>) -> &[Seat] {
        let from = self.seats.partition_point(|s| s.id() < *range.start());
        let to = self.seats.partition_point(|s| s.id() <= *range.end());
        &self.seats[from..to]
    }

    pub fn count_by_status(&self, status: SeatStatus) -> usize {
        self.slice_in(&SeatId::status_range(status)).len()
    }

    pub fn count_available(&self) -> usize {
        self.count_by_status(SeatStatus::Available)
    }

    pub fn count_ordered(&self) -> usize {
        self.count_by_status(SeatStatus::Ordered)
    }

    pub fn count_locked(&self) -> usize {
        self.count_by_status(SeatStatus::Locked)
    }

    /// Available seats in `areas`, or the size of the whole collection when
    /// no area is given.
    pub fn count_in_areas(&self, areas: &[u16]) -> usize {
        if areas.is_empty() {
            return self.len();
        }
        self.filter_available_by_area(areas)
            .values()
            .map(Seats::len)
            .sum()
    }

    /// Available seats per requested area. Areas with no available seat or
    /// out of the codec's range map to an empty collection.
    pub fn filter_available_by_area(&self, areas: &[u16]) -> BTreeMap<u16, Seats> {
        let mut result = BTreeMap::new();
        for &area in areas {
            let seats = match SeatId::area_range(SeatStatus::Available, area) {
                Ok(range) => self.slice_in(&range).to_vec(),
                Err(_) => Vec::new(),
            };
            result.insert(area, Seats { seats });
        }
        result
    }

    pub fn group_by_area(&self) -> BTreeMap<u16, Seats> {
        let mut group: BTreeMap<u16, Seats> = BTreeMap::new();
        for seat in &self.seats {
            group.entry(seat.area()).or_default().seats.push(*seat);
        }
        for seats in group.values_mut() {
            seats.tidy();
        }
        group
    }

    /// Marks the first `n` seats as ordered and returns them.
    ///
    /// Nothing changes when fewer than `n` seats are present.
    pub fn order(&mut self, n: usize) -> Result<Seats, SeatError> {
        if self.len() < n {
            return Err(SeatError::InsufficientSeats {
                requested: n,
                available: self.len(),
            });
        }

        self.tidy();
        let mut ordered = Vec::with_capacity(n);
        for seat in &mut self.seats[..n] {
            seat.order();
            ordered.push(*seat);
        }
        self.tidy();

        Ok(Seats { seats: ordered })
    }

    /// Marks the given available seats as ordered, all or nothing.
    pub fn order_seats(&mut self, ids: &[SeatId]) -> Result<Seats, SeatError> {
        let mut indices = Vec::with_capacity(ids.len());
        let mut seen = HashSet::with_capacity(ids.len());
        for &id in ids {
            let index = self
                .seats
                .binary_search_by_key(&id, Seat::id)
                .map_err(|_| SeatError::SeatUnavailable(id))?;
            if id.status() != SeatStatus::Available || !seen.insert(id) {
                return Err(SeatError::SeatUnavailable(id));
            }
            indices.push(index);
        }

        let mut ordered = Vec::with_capacity(indices.len());
        for index in indices {
            let seat = &mut self.seats[index];
            seat.order();
            ordered.push(*seat);
        }
        self.tidy();
        ordered.sort_by_key(Seat::id);

        Ok(Seats { seats: ordered })
    }

    pub fn summary(&self) -> SeatSummary {
        let areas = self
            .group_by_area()
            .into_iter()
            .map(|(area, seats)| (area, AreaSummary::of(&seats)))
            .collect();
        SeatSummary {
            overall: AreaSummary::of(self),
            areas,
        }
    }
}

impl TryFrom<Vec<Seat>> for Seats {
    type Error = SeatError;

    fn try_from(mut seats: Vec<Seat>) -> Result<Self, Self::Error> {
        seats.sort_by_key(|s| s.id().position());
        if let Some(pair) = seats
            .windows(2)
            .find(|pair| pair[0].id().position() == pair[1].id().position())
        {
            return Err(SeatError::DuplicateSeat(pair[1].id()));
        }
        let mut seats = Seats { seats };
        seats.tidy();
        Ok(seats)
    }
}

impl Index<usize> for Seats {
    type Output = Seat;

    fn index(&self, index: usize) -> &Self::Output {
        &self.seats[index]
    }
}

impl<'a> IntoIterator for &'a Seats {
    type Item = &'a Seat;
    type IntoIter = std::slice::Iter<'a, Seat>;

    fn into_iter(self) -> Self::IntoIter {
        self.seats.iter()
    }
}

impl fmt::Display for Seats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.first(), self.last()) {
            (Some(first), Some(last)) => {
                write!(f, "from {} to {}, {} seats", first, last, self.len())
            }
            _ => write!(f, "no seats"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AreaSummary {
    pub total: usize,
    pub available: usize,
    pub ordered: usize,
    pub locked: usize,
}

impl AreaSummary {
    fn of(seats: &Seats) -> Self {
        AreaSummary {
            total: seats.len(),
            available: seats.count_available(),
            ordered: seats.count_ordered(),
            locked: seats.count_locked(),
        }
    }
}

impl fmt::Display for AreaSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "total[{}], available[{}], ordered[{}], locked[{}]",
            self.total, self.available, self.ordered, self.locked
        )
    }
}

/// Seat counts for the whole collection and per area.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeatSummary {
    pub overall: AreaSummary,
    pub areas: BTreeMap<u16, AreaSummary>,
}

impl fmt::Display for SeatSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "all: {}", self.overall)?;
        for (area, summary) in &self.areas {
            write!(f, "\narea {}: {}", area, summary)?;
        }
        Ok(())
    }
}
