use std::{collections::HashMap, sync::Arc};

use tracing::debug;

use crate::{
    schedule::{Mode, ScheduleIndex},
    shared::time::Duration,
};

/// Which transport modes a search is allowed to ride.
///
/// Routes classified as [`Mode::Other`] never pass the filter, even when
/// every supported mode is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeFilter {
    tram: bool,
    subway: bool,
    rail: bool,
    bus: bool,
}

impl Default for ModeFilter {
    fn default() -> Self {
        Self::all()
    }
}

impl ModeFilter {
    pub const fn all() -> Self {
        Self {
            tram: true,
            subway: true,
            rail: true,
            bus: true,
        }
    }

    pub const fn none() -> Self {
        Self {
            tram: false,
            subway: false,
            rail: false,
            bus: false,
        }
    }

    pub const fn with_tram(mut self) -> Self {
        self.tram = true;
        self
    }

    pub const fn with_subway(mut self) -> Self {
        self.subway = true;
        self
    }

    pub const fn with_rail(mut self) -> Self {
        self.rail = true;
        self
    }

    pub const fn with_bus(mut self) -> Self {
        self.bus = true;
        self
    }

    pub const fn allows(&self, mode: Mode) -> bool {
        match mode {
            Mode::Tram => self.tram,
            Mode::Subway => self.subway,
            Mode::Rail => self.rail,
            Mode::Bus => self.bus,
            Mode::Other(_) => false,
        }
    }

    pub const fn is_empty(&self) -> bool {
        !(self.tram || self.subway || self.rail || self.bus)
    }
}

/// Minimal travel times from one origin stop, keyed by stop id.
///
/// Ephemeral per query. Never contains the origin itself, and never a value
/// above the query budget.
#[derive(Debug, Clone, Default)]
pub struct ConnectivityResult {
    pub origin: Arc<str>,
    pub budget: Duration,
    times: HashMap<Arc<str>, f64>,
}

impl ConnectivityResult {
    /// Minimal travel time to the given stop in minutes, if it was reached.
    pub fn minutes_to(&self, stop_id: &str) -> Option<f64> {
        self.times.get(stop_id).copied()
    }

    /// Iterates over (stop id, minutes) entries in arbitrary order.
    pub fn stops(&self) -> impl Iterator<Item = (&Arc<str>, f64)> {
        self.times.iter().map(|(id, minutes)| (id, *minutes))
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}

/// Bounded single-trip reachability from one origin stop.
///
/// Walks every trip calling at the origin forward and backward from the
/// origin's position, keeping the minimum elapsed time per stop. Stops that
/// need a transfer onto a second trip are out of reach on purpose.
pub struct ReachQuery<'a> {
    index: &'a ScheduleIndex,
    origin: Arc<str>,
    budget: Duration,
    modes: ModeFilter,
}

impl<'a> ReachQuery<'a> {
    pub fn new(index: &'a ScheduleIndex, origin: &str) -> Self {
        Self {
            index,
            origin: origin.into(),
            budget: Duration::from_minutes(30),
            modes: ModeFilter::all(),
        }
    }

    pub fn budget_minutes(mut self, minutes: u32) -> Self {
        self.budget = Duration::from_minutes(minutes);
        self
    }

    pub fn modes(mut self, modes: ModeFilter) -> Self {
        self.modes = modes;
        self
    }

    /// Runs the search. An unknown origin or an origin with zero scheduled
    /// visits yields an empty result.
    pub fn run(self) -> ConnectivityResult {
        let Some(origin) = self.index.stop_by_id(&self.origin) else {
            debug!("Origin stop {} is not in the schedule", self.origin);
            return ConnectivityResult {
                origin: self.origin,
                budget: self.budget,
                ..Default::default()
            };
        };

        let mut best: HashMap<u32, Duration> = HashMap::new();
        // An origin may appear on many trips, or twice within a loop trip.
        // Every occurrence is an independent boarding opportunity.
        for visit_idx in self.index.stop_visit_indexes(origin.index) {
            let visit = &self.index.visits[*visit_idx as usize];
            let trip = &self.index.trips[visit.trip_idx as usize];
            if !self.modes.allows(self.index.mode_of_trip(trip)) {
                continue;
            }
            let trip_visits = self.index.trip_visit_indexes(visit.trip_idx);
            let Some(position) = trip_visits.iter().position(|idx| idx == visit_idx) else {
                continue;
            };
            self.walk_forward(trip_visits, position, &mut best);
            self.walk_backward(trip_visits, position, &mut best);
        }

        // A loop trip can pass the origin again within budget; the origin is
        // never part of its own result.
        best.remove(&origin.index);

        debug!(
            "Reached {} stops within {} min of {}",
            best.len(),
            self.budget.as_minutes(),
            origin.id
        );

        let times = best
            .into_iter()
            .map(|(stop_idx, elapsed)| {
                let stop = &self.index.stops[stop_idx as usize];
                (stop.id.clone(), elapsed.as_minutes())
            })
            .collect();
        ConnectivityResult {
            origin: origin.id.clone(),
            budget: self.budget,
            times,
        }
    }

    fn walk_forward(&self, trip_visits: &[u32], position: usize, best: &mut HashMap<u32, Duration>) {
        let boarded = self.index.visits[trip_visits[position] as usize].departure_time;
        for idx in &trip_visits[position + 1..] {
            let visit = &self.index.visits[*idx as usize];
            let elapsed = visit.departure_time - boarded;
            // The list is departure-sorted, so the first visit past the
            // budget ends the walk.
            if elapsed > self.budget {
                break;
            }
            record_if_better(best, visit.stop_idx, elapsed);
        }
    }

    fn walk_backward(
        &self,
        trip_visits: &[u32],
        position: usize,
        best: &mut HashMap<u32, Duration>,
    ) {
        let boarded = self.index.visits[trip_visits[position] as usize].departure_time;
        for idx in trip_visits[..position].iter().rev() {
            let visit = &self.index.visits[*idx as usize];
            let elapsed = boarded - visit.departure_time;
            if elapsed > self.budget {
                break;
            }
            record_if_better(best, visit.stop_idx, elapsed);
        }
    }
}

fn record_if_better(best: &mut HashMap<u32, Duration>, stop_idx: u32, elapsed: Duration) {
    best.entry(stop_idx)
        .and_modify(|current| {
            if elapsed < *current {
                *current = elapsed;
            }
        })
        .or_insert(elapsed);
}

#[test]
fn mode_filter_allows_test() {
    let filter = ModeFilter::none().with_subway().with_bus();
    assert!(filter.allows(Mode::Subway));
    assert!(filter.allows(Mode::Bus));
    assert!(!filter.allows(Mode::Tram));
    assert!(!filter.allows(Mode::Rail));
}

#[test]
fn mode_filter_never_allows_other_test() {
    assert!(!ModeFilter::all().allows(Mode::Other(4)));
}

#[test]
fn mode_filter_empty_test() {
    assert!(ModeFilter::none().is_empty());
    assert!(!ModeFilter::none().with_tram().is_empty());
}
