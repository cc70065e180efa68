use ripple::prelude::*;
use ripple::schedule::{Mode, RouteRecord, StopRecord, TripRecord, VisitRecord};

fn stop(id: &str, latitude: f64, longitude: f64) -> StopRecord {
    StopRecord {
        stop_id: id.to_string(),
        stop_name: format!("Stop {id}"),
        stop_lat: latitude,
        stop_lon: longitude,
        wheelchair_boarding: None,
    }
}

fn route(id: &str, route_type: i32) -> RouteRecord {
    RouteRecord {
        route_id: id.to_string(),
        agency_id: None,
        route_short_name: Some(id.to_string()),
        route_long_name: None,
        route_type,
    }
}

fn trip(route_id: &str, id: &str) -> TripRecord {
    TripRecord {
        route_id: route_id.to_string(),
        service_id: "weekday".to_string(),
        trip_id: id.to_string(),
        trip_headsign: None,
    }
}

fn visit(trip_id: &str, stop_id: &str, departure: &str, sequence: u32) -> VisitRecord {
    VisitRecord {
        trip_id: trip_id.to_string(),
        arrival_time: departure.to_string(),
        departure_time: departure.to_string(),
        stop_id: stop_id.to_string(),
        stop_sequence: sequence,
    }
}

fn sample_data() -> ScheduleData {
    ScheduleData {
        stops: vec![
            stop("central", 52.3791, 4.8980),
            stop("museum", 52.3600, 4.8852),
            stop("harbor", 52.3949, 4.9147),
        ],
        routes: vec![route("m52", 1), route("night", 714)],
        trips: vec![trip("m52", "m52-1"), trip("ghost", "ghost-1")],
        visits: vec![
            // Listed out of order on purpose.
            visit("m52-1", "harbor", "08:12:00", 3),
            visit("m52-1", "central", "08:00:00", 1),
            visit("m52-1", "museum", "08:05:00", 2),
            visit("m52-1", "nowhere", "08:20:00", 4),
            visit("ghost-1", "central", "09:00:00", 1),
            visit("m52-1", "central", "bad time", 5),
        ],
    }
}

#[test]
fn index_counts_test() {
    let index = ScheduleIndex::new().load_records(sample_data());

    assert_eq!(index.stops.len(), 3);
    assert_eq!(index.routes.len(), 2);
    // The ghost trip referenced an unknown route.
    assert_eq!(index.trips.len(), 1);
    // One unknown stop, one orphaned visit, one broken clock time.
    assert_eq!(index.visits.len(), 3);
}

#[test]
fn index_diagnostics_test() {
    let index = ScheduleIndex::new().load_records(sample_data());
    let diagnostics = index.diagnostics();

    assert_eq!(diagnostics.dangling_trips, 1);
    assert_eq!(diagnostics.dangling_stop_refs, 1);
    assert_eq!(diagnostics.dangling_trip_refs, 1);
    assert_eq!(diagnostics.unparseable_times, 1);
    assert_eq!(diagnostics.dropped_rows(), 4);
}

#[test]
fn lookup_test() {
    let index = ScheduleIndex::new().load_records(sample_data());

    let museum = index.stop_by_id("museum").unwrap();
    assert_eq!(&*museum.name, "Stop museum");
    assert_eq!(museum.coordinate, Coordinate::new(52.3600, 4.8852));

    assert!(index.stop_by_id("nowhere").is_none());
    assert!(index.route_by_id("m52").is_some());
    assert!(index.trip_by_id("ghost-1").is_none());
}

#[test]
fn visits_sorted_by_departure_test() {
    let index = ScheduleIndex::new().load_records(sample_data());

    let by_trip = index.visits_by_trip_id("m52-1").unwrap();
    let departures: Vec<ClockTime> = by_trip.iter().map(|visit| visit.departure_time).collect();
    assert_eq!(
        departures,
        vec![
            ClockTime::from_hms("08:00:00").unwrap(),
            ClockTime::from_hms("08:05:00").unwrap(),
            ClockTime::from_hms("08:12:00").unwrap(),
        ]
    );

    let by_stop = index.visits_by_stop_id("central").unwrap();
    assert_eq!(by_stop.len(), 1);
    assert_eq!(by_stop[0].sequence, 1);
}

#[test]
fn mode_of_trip_test() {
    let index = ScheduleIndex::new().load_records(sample_data());

    let trip = index.trip_by_id("m52-1").unwrap();
    assert_eq!(index.mode_of_trip(trip), Mode::Subway);
    assert_eq!(index.route_by_id("night").unwrap().mode, Mode::Other(714));
}

#[test]
fn empty_index_test() {
    let index = ScheduleIndex::new().load_records(ScheduleData::default());

    assert!(index.stops.is_empty());
    assert!(index.visits.is_empty());
    assert_eq!(index.diagnostics().dropped_rows(), 0);
    assert!(index.visits_by_stop_id("anything").is_none());
}
