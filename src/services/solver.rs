//! solver.rs
//!
//! Greedy cover of a party size by runs of consecutive seats.
//!
//! When no single run is long enough, the request is turned into several
//! shorter runs. Lengths are tried strictly from the largest down; a length
//! that would overshoot is split, so the result either covers the target
//! exactly or uses one run only partially. For example, a venue holding four
//! pairs (8 seats) asked for 7 takes three pairs in full and one seat of the
//! fourth pair.

use std::collections::BTreeMap;

use crate::models::run::Run;

/// Run length → number of runs of that length.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunHistogram(BTreeMap<usize, usize>);

impl RunHistogram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, length: usize, count: usize) {
        if length > 0 && count > 0 {
            *self.0.entry(length).or_default() += count;
        }
    }

    pub fn from_runs<'a>(runs: impl IntoIterator<Item = &'a Run>) -> Self {
        let mut histogram = RunHistogram::new();
        for run in runs {
            histogram.add(run.len(), 1);
        }
        histogram
    }

    pub fn count(&self, length: usize) -> usize {
        self.0.get(&length).copied().unwrap_or_default()
    }

    pub fn contains(&self, length: usize) -> bool {
        self.0.contains_key(&length)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Seats held by all runs together.
    pub fn total_seats(&self) -> usize {
        self.0.iter().map(|(length, count)| length * count).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.0.iter().map(|(&length, &count)| (length, count))
    }
}

impl FromIterator<(usize, usize)> for RunHistogram {
    fn from_iter<I: IntoIterator<Item = (usize, usize)>>(iter: I) -> Self {
        let mut histogram = RunHistogram::new();
        for (length, count) in iter {
            histogram.add(length, count);
        }
        histogram
    }
}

/// One run of `length` seats of which only `used` are taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Overflow {
    pub length: usize,
    pub used: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    /// Runs taken per length. The partially used run is counted here as well.
    pub full: BTreeMap<usize, usize>,
    pub overflow: Option<Overflow>,
}

impl Selection {
    fn take(&mut self, length: usize, count: usize) {
        *self.full.entry(length).or_default() += count;
    }

    fn done(mut self, length: usize, count: usize) -> Option<Selection> {
        self.take(length, count);
        Some(self)
    }

    /// Seats the selection actually uses.
    pub fn seats_used(&self) -> usize {
        let taken: usize = self.full.iter().map(|(length, count)| length * count).sum();
        match self.overflow {
            Some(overflow) => taken - (overflow.length - overflow.used),
            None => taken,
        }
    }
}

pub fn solve(target: usize, available: &RunHistogram) -> Option<Selection> {
    if target == 0 || available.is_empty() {
        return None;
    }

    if available.contains(target) {
        return Selection::default().done(target, 1);
    }

    let mut selection = Selection::default();
    let mut left = target;

    for (n, count) in available.iter().collect::<Vec<_>>().into_iter().rev() {
        // A single run covers what is left; an exact length still wins.
        if n > left {
            if available.contains(left) {
                return selection.done(left, 1);
            }
            selection.overflow = Some(Overflow { length: n, used: left });
            return selection.done(n, 1);
        }

        if n == left {
            return selection.done(n, 1);
        }

        let total = n * count;
        if total == left {
            return selection.done(n, count);
        }
        if total < left {
            selection.take(n, count);
            left -= total;
            continue;
        }

        let times = left / n;
        let last = left % n;
        if last == 0 {
            return selection.done(n, times);
        }
        selection.overflow = Some(Overflow { length: n, used: last });
        return selection.done(n, times + 1);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn histogram(pairs: &[(usize, usize)]) -> RunHistogram {
        pairs.iter().copied().collect()
    }

    fn full(pairs: &[(usize, usize)]) -> BTreeMap<usize, usize> {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_exact_length_wins() {
        let selection = solve(3, &histogram(&[(1, 4), (3, 1), (9, 1)])).unwrap();
        assert_eq!(selection.full, full(&[(3, 1)]));
        assert_eq!(selection.overflow, None);
    }

    #[test]
    fn test_largest_first_then_exact_remainder() {
        let selection = solve(7, &histogram(&[(2, 1), (3, 1), (4, 1), (5, 1)])).unwrap();
        assert_eq!(selection.full, full(&[(5, 1), (2, 1)]));
        assert_eq!(selection.overflow, None);
    }

    #[test]
    fn test_four_pairs_for_seven() {
        let selection = solve(7, &histogram(&[(2, 4)])).unwrap();
        assert_eq!(selection.full, full(&[(2, 4)]));
        assert_eq!(selection.overflow, Some(Overflow { length: 2, used: 1 }));
        assert_eq!(selection.seats_used(), 7);
    }

    #[test]
    fn test_larger_run_is_split_for_remainder() {
        // 6 is taken, 5 would overshoot the remaining 2 and no run of 2 exists.
        let selection = solve(8, &histogram(&[(5, 1), (6, 1)])).unwrap();
        assert_eq!(selection.full, full(&[(6, 1), (5, 1)]));
        assert_eq!(selection.overflow, Some(Overflow { length: 5, used: 2 }));
    }

    #[test]
    fn test_multiple_of_length() {
        let selection = solve(6, &histogram(&[(2, 5)])).unwrap();
        assert_eq!(selection.full, full(&[(2, 3)]));
        assert_eq!(selection.overflow, None);
    }

    #[test]
    fn test_all_runs_of_a_length_exactly() {
        let selection = solve(9, &histogram(&[(3, 3), (1, 2)])).unwrap();
        assert_eq!(selection.full, full(&[(3, 3)]));
    }

    #[test]
    fn test_no_solution() {
        assert_eq!(solve(10, &histogram(&[(2, 2), (3, 1)])), None);
        assert_eq!(solve(1, &RunHistogram::new()), None);
        assert_eq!(solve(0, &histogram(&[(1, 1)])), None);
    }

    #[test]
    fn test_every_target_against_one_of_each() {
        let available: RunHistogram = (1..=12).map(|length| (length, 1)).collect();
        for target in 1..=78 {
            let selection = solve(target, &available).unwrap();
            assert_eq!(selection.seats_used(), target, "target {}", target);
        }
        assert_eq!(solve(79, &available), None);
    }

    fn histogram_strategy() -> impl Strategy<Value = RunHistogram> {
        prop::collection::btree_map(1usize..15, 1usize..6, 0..8)
            .prop_map(|map| map.into_iter().collect())
    }

    proptest! {
        #[test]
        fn present_target_is_taken_alone(available in histogram_strategy(), pick in any::<prop::sample::Index>()) {
            prop_assume!(!available.is_empty());
            let lengths: Vec<usize> = available.iter().map(|(length, _)| length).collect();
            let target = lengths[pick.index(lengths.len())];
            let selection = solve(target, &available).unwrap();
            prop_assert_eq!(selection.full, full(&[(target, 1)]));
            prop_assert_eq!(selection.overflow, None);
        }

        #[test]
        fn solution_exists_iff_enough_seats(available in histogram_strategy(), target in 1usize..120) {
            let result = solve(target, &available);
            prop_assert_eq!(result.is_some(), available.total_seats() >= target);
        }

        #[test]
        fn selection_is_feasible(available in histogram_strategy(), target in 1usize..120) {
            if let Some(selection) = solve(target, &available) {
                prop_assert_eq!(selection.seats_used(), target);
                for (&length, &count) in &selection.full {
                    prop_assert!(count >= 1);
                    prop_assert!(count <= available.count(length));
                }
                if let Some(overflow) = selection.overflow {
                    prop_assert!(overflow.used > 0);
                    prop_assert!(overflow.used < overflow.length);
                    prop_assert!(selection.full.contains_key(&overflow.length));
                }
            }
        }
    }
}
