use std::cell::RefCell;

use geo::{Area, Coord, LineString, Polygon};
use ripple::contour::{self, GeometryStrategy, StandardGeometry};
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

fn anchored_square() -> SampleSet {
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
    let index = ScheduleIndex::new().load_records(data);
    let result = ReachQuery::new(&index, "origin").run();
    let field = AnchoredField::from_connectivity(&index, &result).unwrap();
    SampleSet::Anchored(field)
}

fn flat_samples(minutes: f64) -> SampleSet {
    SampleSet::Radial(vec![
        TravelTimeSample {
            coordinate: Coordinate::new(52.3700, 4.8900),
            minutes: 0.0,
        },
        TravelTimeSample {
            coordinate: Coordinate::new(52.3700, 4.9200),
            minutes,
        },
        TravelTimeSample {
            coordinate: Coordinate::new(52.3880, 4.8900),
            minutes,
        },
        TravelTimeSample {
            coordinate: Coordinate::new(52.3880, 4.9200),
            minutes,
        },
        TravelTimeSample {
            coordinate: Coordinate::new(52.3790, 4.9050),
            minutes,
        },
    ])
}

fn unit_square() -> Polygon<f64> {
    let ring = vec![
        Coord { x: 4.89, y: 52.37 },
        Coord { x: 4.92, y: 52.37 },
        Coord { x: 4.92, y: 52.39 },
        Coord { x: 4.89, y: 52.39 },
    ];
    Polygon::new(LineString::from(ring), Vec::new())
}

/// Scripted strategy that records which stages ran and succeeds only where
/// told to.
struct Scripted {
    isoline: bool,
    concave: bool,
    convex: bool,
    calls: RefCell<Vec<&'static str>>,
}

impl Scripted {
    fn new(isoline: bool, concave: bool, convex: bool) -> Self {
        Self {
            isoline,
            concave,
            convex,
            calls: RefCell::new(Vec::new()),
        }
    }
}

impl GeometryStrategy for Scripted {
    fn try_isoline(
        &self,
        _field: &AnchoredField,
        _qualifying: &[TravelTimeSample],
        _threshold: f64,
        _origin: Coordinate,
        _params: &ContourParams,
    ) -> Option<Polygon<f64>> {
        self.calls.borrow_mut().push("isoline");
        self.isoline.then(unit_square)
    }

    fn try_concave_hull(
        &self,
        _points: &[Coordinate],
        _params: &ContourParams,
    ) -> Option<Polygon<f64>> {
        self.calls.borrow_mut().push("concave");
        self.concave.then(unit_square)
    }

    fn try_convex_hull(&self, _points: &[Coordinate]) -> Option<Polygon<f64>> {
        self.calls.borrow_mut().push("convex");
        self.convex.then(unit_square)
    }

    fn circle(&self, center: Coordinate, radius: Distance, segments: u32) -> Polygon<f64> {
        self.calls.borrow_mut().push("circle");
        StandardGeometry.circle(center, radius, segments)
    }
}

#[test]
fn radial_sets_skip_isoline_test() {
    let strategy = Scripted::new(true, true, true);
    let samples = flat_samples(10.0);
    let contour = contour::extract(
        &strategy,
        &samples,
        Coordinate::new(52.3700, 4.8900),
        30,
        &ContourParams::default(),
    );

    assert_eq!(contour.method, ExtractionMethod::ConcaveHull);
    assert_eq!(*strategy.calls.borrow(), vec!["concave"]);
}

#[test]
fn anchored_sets_try_isoline_first_test() {
    let strategy = Scripted::new(true, true, true);
    let samples = anchored_square();
    let contour = contour::extract(
        &strategy,
        &samples,
        Coordinate::new(52.3700, 4.8900),
        30,
        &ContourParams::default(),
    );

    assert_eq!(contour.method, ExtractionMethod::Isoline);
    assert_eq!(*strategy.calls.borrow(), vec!["isoline"]);
}

#[test]
fn fallback_to_convex_test() {
    let strategy = Scripted::new(false, false, true);
    let samples = flat_samples(10.0);
    let contour = contour::extract(
        &strategy,
        &samples,
        Coordinate::new(52.3700, 4.8900),
        30,
        &ContourParams::default(),
    );

    assert_eq!(contour.method, ExtractionMethod::ConvexHull);
    assert_eq!(*strategy.calls.borrow(), vec!["concave", "convex"]);
}

#[test]
fn fallback_to_circle_test() {
    let strategy = Scripted::new(false, false, false);
    let samples = flat_samples(10.0);
    let contour = contour::extract(
        &strategy,
        &samples,
        Coordinate::new(52.3700, 4.8900),
        30,
        &ContourParams::default(),
    );

    assert_eq!(contour.method, ExtractionMethod::Circle);
    assert_eq!(*strategy.calls.borrow(), vec!["concave", "convex", "circle"]);
}

#[test]
fn few_points_skip_to_convex_test() {
    let strategy = Scripted::new(true, true, true);
    // Only three samples qualify at this threshold.
    let samples = SampleSet::Radial(vec![
        TravelTimeSample {
            coordinate: Coordinate::new(52.3700, 4.8900),
            minutes: 0.0,
        },
        TravelTimeSample {
            coordinate: Coordinate::new(52.3700, 4.9200),
            minutes: 5.0,
        },
        TravelTimeSample {
            coordinate: Coordinate::new(52.3880, 4.8900),
            minutes: 12.0,
        },
        TravelTimeSample {
            coordinate: Coordinate::new(52.3880, 4.9200),
            minutes: 45.0,
        },
    ]);
    let contour = contour::extract(
        &strategy,
        &samples,
        Coordinate::new(52.3700, 4.8900),
        30,
        &ContourParams::default(),
    );

    assert_eq!(contour.method, ExtractionMethod::ConvexHull);
    assert_eq!(*strategy.calls.borrow(), vec!["convex"]);
}

#[test]
fn circle_geometry_test() {
    let center = Coordinate::new(52.3700, 4.8900);
    let circle = StandardGeometry.circle(center, Distance::from_kilometers(1.0), 64);

    // 64 vertices plus the closing coordinate.
    let exterior = circle.exterior();
    assert_eq!(exterior.0.len(), 65);
    assert_eq!(exterior.0.first(), exterior.0.last());
    assert!(circle.unsigned_area() > 0.0);

    for coord in &exterior.0 {
        let vertex = Coordinate::new(coord.y, coord.x);
        let radius = center.euclidean_distance(&vertex).as_kilometers();
        assert!((radius - 1.0).abs() < 1e-6);
    }
}

#[test]
fn sparse_anchors_become_convex_test() {
    // Square corners sit about two kilometers apart, too far for the
    // default concave edge limit, and the low times defeat the isoline.
    let samples = anchored_square();
    let contour = contour::extract(
        &StandardGeometry,
        &samples,
        Coordinate::new(52.3700, 4.8900),
        30,
        &ContourParams::default(),
    );

    assert_eq!(contour.method, ExtractionMethod::ConvexHull);
    let exterior = contour.polygon.exterior();
    assert_eq!(exterior.0.first(), exterior.0.last());
    assert!(contour.polygon.unsigned_area() > 0.0);
}

#[test]
fn lone_origin_circle_scaling_test() {
    let origin = Coordinate::new(52.3700, 4.8900);
    // Every stop sample sits beyond the threshold, leaving the origin alone.
    let samples = flat_samples(65.0);

    for (threshold, expected_km) in [(15_u32, 0.5), (30, 1.0), (60, 2.0)] {
        let contour = contour::extract(
            &StandardGeometry,
            &samples,
            origin,
            threshold,
            &ContourParams::default(),
        );
        assert_eq!(contour.method, ExtractionMethod::Circle);

        for coord in &contour.polygon.exterior().0 {
            let vertex = Coordinate::new(coord.y, coord.x);
            let radius = origin.euclidean_distance(&vertex).as_kilometers();
            assert!((radius - expected_km).abs() < 1e-6);
        }
    }
}
