use std::{collections::HashMap, sync::Arc, time::Instant};

mod models;
mod records;
pub use models::*;
pub use records::*;

use rayon::prelude::*;
use tracing::debug;

use crate::{isochrone::IsochroneRequest, shared::time::ClockTime};

/// Already-parsed schedule tables handed over by the data provider.
///
/// This crate never fetches or parses raw feeds; acquisition lives with an
/// external collaborator that fills these four tables.
#[derive(Debug, Clone, Default)]
pub struct ScheduleData {
    pub stops: Vec<StopRecord>,
    pub routes: Vec<RouteRecord>,
    pub trips: Vec<TripRecord>,
    pub visits: Vec<VisitRecord>,
}

/// Counts of rows dropped while building the index.
///
/// A dangling reference never aborts the build; the offending row is skipped
/// and tallied here so callers can judge feed quality.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexDiagnostics {
    /// Trips that referenced an unknown route.
    pub dangling_trips: usize,
    /// Visits that referenced an unknown stop.
    pub dangling_stop_refs: usize,
    /// Visits that referenced an unknown trip.
    pub dangling_trip_refs: usize,
    /// Visits whose arrival or departure clock time failed to parse.
    pub unparseable_times: usize,
}

impl IndexDiagnostics {
    pub const fn dropped_rows(&self) -> usize {
        self.dangling_trips
            + self.dangling_stop_refs
            + self.dangling_trip_refs
            + self.unparseable_times
    }
}

/// Read-only lookup structures over one loaded schedule.
///
/// Built once, then shared by reference across any number of concurrent
/// queries. Reloading means building a fresh index and swapping the value.
#[derive(Debug, Clone, Default)]
pub struct ScheduleIndex {
    pub stops: Box<[Stop]>,
    pub routes: Box<[Route]>,
    pub trips: Box<[Trip]>,
    pub visits: Box<[StopVisit]>,

    stop_lookup: HashMap<Arc<str>, u32>,
    route_lookup: HashMap<Arc<str>, u32>,
    trip_lookup: HashMap<Arc<str>, u32>,
    stop_to_visits: Box<[Box<[u32]>]>,
    trip_to_visits: Box<[Box<[u32]>]>,
    diagnostics: IndexDiagnostics,
}

impl ScheduleIndex {
    pub fn new() -> Self {
        Default::default()
    }

    /// Streams the provider tables into the index.
    /// Row order in the adjacency lists is normalized to departure time, so
    /// identical input always produces an identical index.
    pub fn load_records(mut self, data: ScheduleData) -> Self {
        self.load_stops(data.stops);
        self.load_routes(data.routes);
        self.load_trips(data.trips);
        self.load_visits(data.visits);
        debug!(
            "Indexed {} stops, {} routes, {} trips, {} visits ({} rows dropped)",
            self.stops.len(),
            self.routes.len(),
            self.trips.len(),
            self.visits.len(),
            self.diagnostics.dropped_rows()
        );
        self
    }

    fn load_stops(&mut self, records: Vec<StopRecord>) {
        debug!("Indexing stops...");
        let now = Instant::now();
        let mut stop_lookup: HashMap<Arc<str>, u32> = HashMap::new();
        let mut stops: Vec<Stop> = Vec::with_capacity(records.len());
        records.into_iter().for_each(|record| {
            let mut value: Stop = record.into();
            value.index = stops.len() as u32;
            stop_lookup.insert(value.id.clone(), value.index);
            stops.push(value);
        });
        self.stops = stops.into();
        self.stop_lookup = stop_lookup;
        debug!("Indexing stops took {:?}", now.elapsed());
    }

    fn load_routes(&mut self, records: Vec<RouteRecord>) {
        debug!("Indexing routes...");
        let now = Instant::now();
        let mut route_lookup: HashMap<Arc<str>, u32> = HashMap::new();
        let mut routes: Vec<Route> = Vec::with_capacity(records.len());
        records.into_iter().for_each(|record| {
            let mut value: Route = record.into();
            value.index = routes.len() as u32;
            route_lookup.insert(value.id.clone(), value.index);
            routes.push(value);
        });
        self.routes = routes.into();
        self.route_lookup = route_lookup;
        debug!("Indexing routes took {:?}", now.elapsed());
    }

    fn load_trips(&mut self, records: Vec<TripRecord>) {
        debug!("Indexing trips...");
        let now = Instant::now();
        let mut trip_lookup: HashMap<Arc<str>, u32> = HashMap::new();
        let mut trips: Vec<Trip> = Vec::with_capacity(records.len());
        records.into_iter().for_each(|record| {
            let Some(route_idx) = self.route_lookup.get(record.route_id.as_str()) else {
                self.diagnostics.dangling_trips += 1;
                return;
            };
            let value = Trip {
                index: trips.len() as u32,
                id: record.trip_id.into(),
                route_idx: *route_idx,
                service_id: record.service_id.into(),
                headsign: record.trip_headsign.map(|val| val.into()),
            };
            trip_lookup.insert(value.id.clone(), value.index);
            trips.push(value);
        });
        self.trips = trips.into();
        self.trip_lookup = trip_lookup;
        debug!("Indexing trips took {:?}", now.elapsed());
    }

    fn load_visits(&mut self, records: Vec<VisitRecord>) {
        debug!("Indexing stop visits...");
        let now = Instant::now();
        let mut visits: Vec<StopVisit> = Vec::with_capacity(records.len());
        let mut stop_to_visits: Vec<Vec<u32>> = vec![Vec::new(); self.stops.len()];
        let mut trip_to_visits: Vec<Vec<u32>> = vec![Vec::new(); self.trips.len()];
        records.into_iter().for_each(|record| {
            let Some(trip_idx) = self.trip_lookup.get(record.trip_id.as_str()) else {
                self.diagnostics.dangling_trip_refs += 1;
                return;
            };
            let Some(stop_idx) = self.stop_lookup.get(record.stop_id.as_str()) else {
                self.diagnostics.dangling_stop_refs += 1;
                return;
            };
            let (Some(arrival_time), Some(departure_time)) = (
                ClockTime::from_hms(&record.arrival_time),
                ClockTime::from_hms(&record.departure_time),
            ) else {
                self.diagnostics.unparseable_times += 1;
                return;
            };
            let value = StopVisit {
                index: visits.len() as u32,
                trip_idx: *trip_idx,
                stop_idx: *stop_idx,
                sequence: record.stop_sequence,
                arrival_time,
                departure_time,
            };
            stop_to_visits[value.stop_idx as usize].push(value.index);
            trip_to_visits[value.trip_idx as usize].push(value.index);
            visits.push(value);
        });

        // Both adjacency lists are kept sorted by departure so trip walks and
        // per-stop scans can bail out early.
        let visits: Box<[StopVisit]> = visits.into();
        let sorted_lists = |lists: Vec<Vec<u32>>| -> Box<[Box<[u32]>]> {
            let sorted: Vec<Box<[u32]>> = lists
                .into_par_iter()
                .map(|mut list| {
                    list.sort_unstable_by_key(|idx| {
                        let visit = &visits[*idx as usize];
                        (visit.departure_time, visit.sequence)
                    });
                    list.into()
                })
                .collect();
            sorted.into()
        };
        self.stop_to_visits = sorted_lists(stop_to_visits);
        self.trip_to_visits = sorted_lists(trip_to_visits);
        self.visits = visits;
        debug!("Indexing stop visits took {:?}", now.elapsed());
    }

    /// Get a stop with the given id.
    /// If no stop is found with the given id None is returned.
    pub fn stop_by_id(&self, id: &str) -> Option<&Stop> {
        let index = self.stop_lookup.get(id)?;
        Some(&self.stops[*index as usize])
    }

    /// Get a route with the given id.
    pub fn route_by_id(&self, id: &str) -> Option<&Route> {
        let index = self.route_lookup.get(id)?;
        Some(&self.routes[*index as usize])
    }

    /// Get a trip with the given id.
    pub fn trip_by_id(&self, id: &str) -> Option<&Trip> {
        let index = self.trip_lookup.get(id)?;
        Some(&self.trips[*index as usize])
    }

    /// All visits calling at the given stop, sorted by departure time.
    /// If no stop was found with the given id None is returned.
    pub fn visits_by_stop_id(&self, stop_id: &str) -> Option<Vec<&StopVisit>> {
        let stop = self.stop_by_id(stop_id)?;
        Some(
            self.stop_to_visits[stop.index as usize]
                .iter()
                .map(|idx| &self.visits[*idx as usize])
                .collect(),
        )
    }

    /// All visits of the given trip, sorted by departure time.
    /// If no trip was found with the given id None is returned.
    pub fn visits_by_trip_id(&self, trip_id: &str) -> Option<Vec<&StopVisit>> {
        let trip = self.trip_by_id(trip_id)?;
        Some(
            self.trip_to_visits[trip.index as usize]
                .iter()
                .map(|idx| &self.visits[*idx as usize])
                .collect(),
        )
    }

    /// The mode of the route serving the given trip.
    pub fn mode_of_trip(&self, trip: &Trip) -> Mode {
        self.routes[trip.route_idx as usize].mode
    }

    pub fn diagnostics(&self) -> &IndexDiagnostics {
        &self.diagnostics
    }

    pub(crate) fn stop_visit_indexes(&self, stop_idx: u32) -> &[u32] {
        &self.stop_to_visits[stop_idx as usize]
    }

    pub(crate) fn trip_visit_indexes(&self, trip_idx: u32) -> &[u32] {
        &self.trip_to_visits[trip_idx as usize]
    }

    /// Start building an isochrone request around the given origin stop.
    pub fn isochrones(&'_ self, origin: &str) -> IsochroneRequest<'_> {
        IsochroneRequest::new(self, origin)
    }
}
