//! Consecutive-run detection.
//!
//! A run is a maximal group of available seats in one area and one row whose
//! columns are consecutive integers. Runs of an area are numbered after they
//! are sorted by length, and that number is the run's stable handle.

use serde::Serialize;
use std::fmt;

use crate::models::seat::Seat;
use crate::models::seats::Seats;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct RunId {
    pub area: u16,
    pub ordinal: u32,
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Run({}#{})", self.area, self.ordinal)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    id: RunId,
    seats: Seats,
}

impl Run {
    #[inline]
    pub fn id(&self) -> RunId {
        self.id
    }

    pub fn area(&self) -> u16 {
        self.id.area
    }

    pub fn len(&self) -> usize {
        self.seats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    pub fn seats(&self) -> &Seats {
        &self.seats
    }

    /// Row shared by every seat of the run.
    pub fn row(&self) -> u16 {
        self.seats.first().map(Seat::row).unwrap_or_default()
    }

    pub fn first_column(&self) -> u16 {
        self.seats.first().map(Seat::column).unwrap_or_default()
    }

    pub fn last_column(&self) -> u16 {
        self.seats.last().map(Seat::column).unwrap_or_default()
    }
}

impl fmt::Display for Run {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.id, self.seats)
    }
}

fn extends(last: &Seat, next: &Seat) -> bool {
    last.area() == next.area()
        && last.row() == next.row()
        && u32::from(next.column()) == u32::from(last.column()) + 1
}

/// Splits the available seats of `area` into runs, shortest first.
///
/// `seats` is expected to hold the area's available seats only, as produced by
/// [`Seats::filter_available_by_area`]. Runs of equal length keep their seating
/// order.
pub fn build_runs(area: u16, seats: &Seats) -> Vec<Run> {
    let mut groups: Vec<Vec<Seat>> = Vec::new();
    let mut current: Vec<Seat> = Vec::new();

    for seat in seats {
        match current.last() {
            Some(last) if extends(last, seat) => current.push(*seat),
            Some(_) => {
                groups.push(std::mem::take(&mut current));
                current.push(*seat);
            }
            None => current.push(*seat),
        }
    }
    if !current.is_empty() {
        groups.push(current);
    }

    groups.sort_by_key(Vec::len);

    groups
        .into_iter()
        .enumerate()
        .map(|(ordinal, seats)| Run {
            id: RunId {
                area,
                ordinal: ordinal as u32,
            },
            seats: Seats::from_sorted(seats),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::seat::SeatStatus;
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    fn available(area: u16, positions: &[(u16, u16)]) -> Seats {
        let seats = positions
            .iter()
            .map(|&(row, column)| Seat::new(area, row, column, SeatStatus::Available).unwrap())
            .collect::<Vec<_>>();
        Seats::try_from(seats).unwrap()
    }

    #[test]
    fn test_empty_and_single() {
        assert!(build_runs(1, &Seats::new()).is_empty());

        let runs = build_runs(1, &available(1, &[(1, 5)]));
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].len(), 1);
        assert_eq!(runs[0].first_column(), 5);
    }

    #[test]
    fn test_runs_are_sorted_by_length() {
        let seats = available(4, &[(1, 1), (1, 2), (1, 3), (1, 5), (1, 7), (1, 8)]);
        let runs = build_runs(4, &seats);
        let lengths: Vec<usize> = runs.iter().map(Run::len).collect();
        assert_eq!(lengths, vec![1, 2, 3]);
        assert_eq!(runs[0].first_column(), 5);
        assert_eq!((runs[1].first_column(), runs[1].last_column()), (7, 8));
        assert_eq!(runs[2].id(), RunId { area: 4, ordinal: 2 });
    }

    #[test]
    fn test_equal_lengths_keep_seating_order() {
        let seats = available(1, &[(1, 1), (1, 2), (1, 4), (1, 5), (2, 1), (2, 2)]);
        let runs = build_runs(1, &seats);
        let starts: Vec<(u16, u16)> = runs.iter().map(|r| (r.row(), r.first_column())).collect();
        assert_eq!(starts, vec![(1, 1), (1, 4), (2, 1)]);
    }

    #[test]
    fn test_row_change_breaks_a_run() {
        // Column 10 of row 1 is followed by column 11 of row 2.
        let seats = available(1, &[(1, 9), (1, 10), (2, 11), (2, 12)]);
        let runs = build_runs(1, &seats);
        assert_eq!(runs.len(), 2);
        assert!(runs.iter().all(|r| r.len() == 2));
    }

    proptest! {
        #[test]
        fn runs_partition_the_input(positions in prop::collection::btree_set((0u16..4, 0u16..40), 0..80)) {
            let positions: Vec<(u16, u16)> = positions.into_iter().collect();
            let seats = available(3, &positions);
            let runs = build_runs(3, &seats);

            let mut covered = BTreeSet::new();
            for run in &runs {
                prop_assert!(!run.is_empty());
                for pair in run.seats().as_slice().windows(2) {
                    prop_assert!(extends(&pair[0], &pair[1]));
                }
                for seat in run.seats() {
                    prop_assert!(covered.insert(seat.id()));
                }
            }
            prop_assert_eq!(covered.len(), seats.len());

            for pair in runs.windows(2) {
                prop_assert!(pair[0].len() <= pair[1].len());
            }

            // Maximality: no run could be extended by another run.
            for a in &runs {
                for b in &runs {
                    if let (Some(last), Some(first)) = (a.seats().last(), b.seats().first()) {
                        prop_assert!(!extends(last, first));
                    }
                }
            }
        }
    }
}
