use criterion::{Criterion, criterion_group, criterion_main};
use std::{hint::black_box, time::Duration};

use ripple::{
    isochrone::compute_batch,
    prelude::*,
    reach::ReachQuery,
    schedule::{RouteRecord, StopRecord, TripRecord, VisitRecord},
};

const GRID: u32 = 20;
const STOP_SPACING_LAT: f64 = 0.0045;
const STOP_SPACING_LON: f64 = 0.0074;

/// A synthetic city: a square stop grid roughly 500 m apart, one bus trip
/// per row heading east and one per column heading south, two minutes per
/// hop.
fn grid_schedule() -> ScheduleData {
    let stop_id = |row: u32, col: u32| format!("s-{row}-{col}");
    let clock = |minutes: u32| format!("{:02}:{:02}:00", 8 + minutes / 60, minutes % 60);

    let mut data = ScheduleData::default();
    data.routes.push(RouteRecord {
        route_id: "bus".to_string(),
        agency_id: None,
        route_short_name: Some("B".to_string()),
        route_long_name: None,
        route_type: 3,
    });

    for row in 0..GRID {
        for col in 0..GRID {
            data.stops.push(StopRecord {
                stop_id: stop_id(row, col),
                stop_name: format!("Stop {row}/{col}"),
                stop_lat: 52.0 + f64::from(row) * STOP_SPACING_LAT,
                stop_lon: 4.0 + f64::from(col) * STOP_SPACING_LON,
                wheelchair_boarding: None,
            });
        }
    }

    for row in 0..GRID {
        let trip_id = format!("east-{row}");
        data.trips.push(TripRecord {
            route_id: "bus".to_string(),
            service_id: "weekday".to_string(),
            trip_id: trip_id.clone(),
            trip_headsign: None,
        });
        for col in 0..GRID {
            data.visits.push(VisitRecord {
                trip_id: trip_id.clone(),
                arrival_time: clock(col * 2),
                departure_time: clock(col * 2),
                stop_id: stop_id(row, col),
                stop_sequence: col + 1,
            });
        }
    }
    for col in 0..GRID {
        let trip_id = format!("south-{col}");
        data.trips.push(TripRecord {
            route_id: "bus".to_string(),
            service_id: "weekday".to_string(),
            trip_id: trip_id.clone(),
            trip_headsign: None,
        });
        for row in 0..GRID {
            data.visits.push(VisitRecord {
                trip_id: trip_id.clone(),
                arrival_time: clock(row * 2),
                departure_time: clock(row * 2),
                stop_id: stop_id(row, col),
                stop_sequence: row + 1,
            });
        }
    }
    data
}

fn reach_search(index: &ScheduleIndex) {
    let _ = black_box(
        ReachQuery::new(index, "s-10-10")
            .budget_minutes(45)
            .run(),
    );
}

fn single_compute(index: &ScheduleIndex) {
    let _ = black_box(
        index
            .isochrones("s-10-10")
            .budget_minutes(60)
            .thresholds(&[15, 30, 45, 60])
            .compute(),
    );
}

fn batch(index: &ScheduleIndex, config: &IsochroneConfig) {
    let origins = ["s-0-0", "s-5-15", "s-10-10", "s-19-19"];
    let _ = black_box(compute_batch(index, &origins, config));
}

fn criterion_benchmark(c: &mut Criterion) {
    let index = ScheduleIndex::new().load_records(grid_schedule());
    let config = IsochroneConfig::default();

    let mut group = c.benchmark_group("Isochrones");

    group.warm_up_time(Duration::from_secs(5));

    group.measurement_time(Duration::from_secs(15));

    group.bench_function("Reach search", |b| b.iter(|| reach_search(&index)));

    group.bench_function("Single origin", |b| b.iter(|| single_compute(&index)));

    group.bench_function("Origin batch", |b| b.iter(|| batch(&index, &config)));

    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
