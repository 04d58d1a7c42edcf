//! allocator.rs
//!
//! Picks consecutive seats for a party.
//!
//! Strategies, first success wins:
//! 1.  **Direct**: the shortest run that fits the whole party, in the lowest
//!     area that has one. A longer run is used partially.
//! 2.  **Per area**: runs of one area combined by the solver, areas tried in
//!     ascending order.
//! 3.  **Pooled**: runs of every requested area combined by the solver.
//!
//! Nothing here changes seat status; see [`Seats::order_seats`] and
//! [`crate::models::Event::commit`].

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::models::run::{build_runs, Run, RunId};
use crate::models::seat::SeatId;
use crate::models::seats::Seats;
use crate::services::solver::{solve, RunHistogram, Selection};

/// A run of which only the first `used` seats are taken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialRun {
    pub run: Run,
    pub used: usize,
}

impl PartialRun {
    /// Seats left free in the run.
    pub fn overage(&self) -> usize {
        self.run.len() - self.used
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Direct,
    PerArea,
    Pooled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allocation {
    pub full: Vec<Run>,
    pub partial: Option<PartialRun>,
    pub strategy: Strategy,
}

impl Allocation {
    pub fn seat_count(&self) -> usize {
        let full: usize = self.full.iter().map(Run::len).sum();
        full + self.partial.as_ref().map_or(0, |p| p.used)
    }

    /// Every seat to commit: full runs first, then the used head of the
    /// partial run.
    pub fn seat_ids(&self) -> Vec<SeatId> {
        let mut ids: Vec<SeatId> = self
            .full
            .iter()
            .flat_map(|run| run.seats().iter().map(|s| s.id()))
            .collect();
        if let Some(partial) = &self.partial {
            ids.extend(partial.run.seats().iter().take(partial.used).map(|s| s.id()));
        }
        ids
    }

    pub fn run_ids(&self) -> Vec<RunId> {
        self.full
            .iter()
            .chain(self.partial.as_ref().map(|p| &p.run))
            .map(Run::id)
            .collect()
    }
}

impl Seats {
    /// Finds seats for a party of `target` among the available seats of
    /// `areas`. Returns `None` when the areas cannot hold the party even with
    /// splitting.
    pub fn pick_best(&self, target: usize, areas: &[u16]) -> Option<Allocation> {
        if target == 0 {
            warn!("pick_best called with an empty party");
            return None;
        }

        let mut areas = areas.to_vec();
        areas.sort_unstable();
        areas.dedup();

        let available = self.filter_available_by_area(&areas);
        let area_runs: BTreeMap<u16, Vec<Run>> = available
            .iter()
            .map(|(&area, seats)| (area, build_runs(area, seats)))
            .collect();

        if let Some(allocation) = pick_direct(target, &area_runs) {
            return Some(allocation);
        }

        for (area, runs) in &area_runs {
            let histogram = RunHistogram::from_runs(runs);
            if let Some(selection) = solve(target, &histogram) {
                debug!(area, target, ?selection, "split within one area");
                return Some(translate(&selection, runs.iter(), Strategy::PerArea));
            }
        }

        let pooled: Vec<&Run> = area_runs.values().flatten().collect();
        let histogram = RunHistogram::from_runs(pooled.iter().copied());
        match solve(target, &histogram) {
            Some(selection) => {
                debug!(target, ?selection, "split across areas");
                Some(translate(&selection, pooled.into_iter(), Strategy::Pooled))
            }
            None => {
                debug!(
                    target,
                    available = histogram.total_seats(),
                    "no allocation possible"
                );
                None
            }
        }
    }
}

/// Shortest fitting run of the lowest area that has one.
fn pick_direct(target: usize, area_runs: &BTreeMap<u16, Vec<Run>>) -> Option<Allocation> {
    let (area, run) = area_runs
        .iter()
        .find_map(|(area, runs)| runs.iter().find(|r| r.len() >= target).map(|r| (*area, r)))?;

    debug!(area, target, run = %run.id(), length = run.len(), "direct run");

    let allocation = if run.len() == target {
        Allocation {
            full: vec![run.clone()],
            partial: None,
            strategy: Strategy::Direct,
        }
    } else {
        Allocation {
            full: Vec::new(),
            partial: Some(PartialRun {
                run: run.clone(),
                used: target,
            }),
            strategy: Strategy::Direct,
        }
    };
    Some(allocation)
}

/// Maps per-length counts back to concrete runs, taking runs of each length in
/// the order given. The split length gives its first run as the partial run.
fn translate<'a>(
    selection: &Selection,
    runs: impl Iterator<Item = &'a Run>,
    strategy: Strategy,
) -> Allocation {
    let mut by_length: BTreeMap<usize, Vec<&Run>> = BTreeMap::new();
    for run in runs {
        by_length.entry(run.len()).or_default().push(run);
    }

    let mut full = Vec::new();
    let mut partial = None;
    for (&length, &count) in selection.full.iter().rev() {
        let group = by_length.get(&length).map(Vec::as_slice).unwrap_or_default();
        let taken = &group[..count.min(group.len())];
        match selection.overflow {
            Some(overflow) if overflow.length == length => {
                if let Some((head, rest)) = taken.split_first() {
                    partial = Some(PartialRun {
                        run: (*head).clone(),
                        used: overflow.used,
                    });
                    full.extend(rest.iter().map(|r| (*r).clone()));
                }
            }
            _ => full.extend(taken.iter().map(|r| (*r).clone())),
        }
    }

    Allocation {
        full,
        partial,
        strategy,
    }
}
