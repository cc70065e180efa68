use ripple::field::AnchoredField;
use ripple::prelude::*;
use ripple::reach::ReachQuery;
use ripple::schedule::{RouteRecord, StopRecord, TripRecord, VisitRecord};

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

/// Four stops on the corners of a roughly 2 km square, reached in 0, 5, 12
/// and 20 minutes.
fn square_index() -> ScheduleIndex {
    let data = ScheduleData {
        stops: vec![
            stop("origin", 52.3700, 4.8900),
            stop("a", 52.3700, 4.9200),
            stop("b", 52.3880, 4.8900),
            stop("c", 52.3880, 4.9200),
        ],
        routes: vec![route("m1", 1)],
        trips: vec![trip("m1", "m1-1")],
        visits: vec![
            visit("m1-1", "origin", "08:00:00", 1),
            visit("m1-1", "a", "08:05:00", 2),
            visit("m1-1", "c", "08:12:00", 3),
            visit("m1-1", "b", "08:20:00", 4),
        ],
    };
    ScheduleIndex::new().load_records(data)
}

fn square_field() -> (ScheduleIndex, ConnectivityResult) {
    let index = square_index();
    let result = ReachQuery::new(&index, "origin").run();
    (index, result)
}

#[test]
fn anchors_exact_test() {
    let (index, result) = square_field();
    let field = AnchoredField::from_connectivity(&index, &result).unwrap();

    // Anchor coordinates return their recorded minutes, not an estimate.
    let a = index.stop_by_id("a").unwrap();
    assert_eq!(field.time_at(a.coordinate), 5.0);
    let b = index.stop_by_id("b").unwrap();
    assert_eq!(field.time_at(b.coordinate), 20.0);

    let origin = index.stop_by_id("origin").unwrap();
    assert_eq!(field.time_at(origin.coordinate), 0.0);
}

#[test]
fn anchor_order_test() {
    let (index, result) = square_field();
    let field = AnchoredField::from_connectivity(&index, &result).unwrap();

    let anchors = field.anchors();
    assert_eq!(anchors.len(), 4);
    assert_eq!(anchors[0].minutes, 0.0);
    assert_eq!(
        anchors[0].coordinate,
        index.stop_by_id("origin").unwrap().coordinate
    );
    // Remaining anchors follow stop indexing order.
    assert_eq!(anchors[1].minutes, 5.0);
    assert_eq!(anchors[2].minutes, 20.0);
    assert_eq!(anchors[3].minutes, 12.0);
}

#[test]
fn interpolation_bounded_test() {
    let (index, result) = square_field();
    let field = AnchoredField::from_connectivity(&index, &result).unwrap();

    // The square's center lies inside the triangulation, so its value is a
    // convex mix of corner times.
    let center = field.time_at(Coordinate::new(52.3790, 4.9050));
    assert!(center > 0.0);
    assert!(center < 20.0);
}

#[test]
fn distance_blend_outside_test() {
    let (index, result) = square_field();
    let field = AnchoredField::from_connectivity(&index, &result).unwrap();

    // Far outside the triangulated extent the blend still stays within the
    // anchor time range.
    let faraway = field.time_at(Coordinate::new(52.5000, 5.1000));
    assert!(faraway >= 0.0);
    assert!(faraway <= 20.0);
}

#[test]
fn field_deterministic_test() {
    let (index, result) = square_field();
    let first = AnchoredField::from_connectivity(&index, &result).unwrap();
    let second = AnchoredField::from_connectivity(&index, &result).unwrap();

    for (latitude, longitude) in [
        (52.3790, 4.9050),
        (52.3650, 4.8850),
        (52.4100, 4.9500),
        (52.3700, 4.9000),
    ] {
        let at = Coordinate::new(latitude, longitude);
        assert_eq!(first.time_at(at), second.time_at(at));
    }
}

#[test]
fn unknown_origin_field_test() {
    let index = square_index();
    let mut result = ReachQuery::new(&index, "origin").run();
    result.origin = "missing".into();

    assert!(AnchoredField::from_connectivity(&index, &result).is_none());
}

#[test]
fn sample_set_accessors_test() {
    let (index, result) = square_field();
    let field = AnchoredField::from_connectivity(&index, &result).unwrap();

    let anchored = SampleSet::Anchored(field);
    assert_eq!(anchored.samples().len(), 4);
    assert!(anchored.field().is_some());

    let radial = SampleSet::Radial(vec![TravelTimeSample {
        coordinate: Coordinate::new(52.37, 4.89),
        minutes: 0.0,
    }]);
    assert_eq!(radial.samples().len(), 1);
    assert!(radial.field().is_none());
}
