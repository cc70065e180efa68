use std::collections::HashMap;

use geo::{Area, Contains, Coord, LineString, Point, Polygon};

use crate::{
    field::{AnchoredField, TravelTimeSample},
    shared::geo::Coordinate,
};

/// Traces the `time == threshold` level of the field with marching squares
/// over a regular grid spanning the qualifying points.
///
/// Returns the closed ring containing the origin, or the largest closed
/// ring when none does. None when no ring closes inside the padded grid.
pub(crate) fn threshold_contour(
    field: &AnchoredField,
    qualifying: &[TravelTimeSample],
    threshold: f64,
    origin: Coordinate,
    grid: usize,
) -> Option<Polygon<f64>> {
    if qualifying.is_empty() {
        return None;
    }
    let nodes = grid.max(8);

    let mut min_lat = f64::INFINITY;
    let mut max_lat = f64::NEG_INFINITY;
    let mut min_lon = f64::INFINITY;
    let mut max_lon = f64::NEG_INFINITY;
    for sample in qualifying {
        min_lat = min_lat.min(sample.coordinate.latitude);
        max_lat = max_lat.max(sample.coordinate.latitude);
        min_lon = min_lon.min(sample.coordinate.longitude);
        max_lon = max_lon.max(sample.coordinate.longitude);
    }

    // The margin pushes the grid border past the qualifying points, where
    // field values should exceed the threshold and let the ring close.
    let pad_lat = ((max_lat - min_lat) * 0.25).max(1e-3);
    let pad_lon = ((max_lon - min_lon) * 0.25).max(1e-3);
    min_lat -= pad_lat;
    max_lat += pad_lat;
    min_lon -= pad_lon;
    max_lon += pad_lon;

    let step_lat = (max_lat - min_lat) / (nodes - 1) as f64;
    let step_lon = (max_lon - min_lon) / (nodes - 1) as f64;

    // Field values at every node, row-major from the south-west corner.
    let mut values = Vec::with_capacity(nodes * nodes);
    for row in 0..nodes {
        let latitude = min_lat + step_lat * row as f64;
        for column in 0..nodes {
            let longitude = min_lon + step_lon * column as f64;
            values.push(field.time_at(Coordinate::new(latitude, longitude)));
        }
    }
    let value_at = |column: usize, row: usize| values[row * nodes + column];

    // Boundary segments in grid coordinates, cell by cell. Crossing points
    // on a shared cell edge are computed from the same node pair in both
    // cells, so matching endpoints compare equal when chained.
    let mut segments: Vec<((f64, f64), (f64, f64))> = Vec::new();
    for row in 0..nodes - 1 {
        for column in 0..nodes - 1 {
            let v0 = value_at(column, row);
            let v1 = value_at(column + 1, row);
            let v2 = value_at(column + 1, row + 1);
            let v3 = value_at(column, row + 1);

            let mut mask = 0_u8;
            if v0 <= threshold {
                mask |= 1;
            }
            if v1 <= threshold {
                mask |= 2;
            }
            if v2 <= threshold {
                mask |= 4;
            }
            if v3 <= threshold {
                mask |= 8;
            }
            if mask == 0 || mask == 15 {
                continue;
            }

            let x = column as f64;
            let y = row as f64;
            let frac = |from: f64, to: f64| ((threshold - from) / (to - from)).clamp(0.0, 1.0);
            let bottom = (x + frac(v0, v1), y);
            let right = (x + 1.0, y + frac(v1, v2));
            let top = (x + frac(v3, v2), y + 1.0);
            let left = (x, y + frac(v0, v3));

            match mask {
                1 => segments.push((left, bottom)),
                2 => segments.push((bottom, right)),
                3 => segments.push((left, right)),
                4 => segments.push((right, top)),
                5 => {
                    // Saddle cell: the center value picks which corners
                    // stay connected.
                    if (v0 + v1 + v2 + v3) / 4.0 <= threshold {
                        segments.push((left, top));
                        segments.push((bottom, right));
                    } else {
                        segments.push((left, bottom));
                        segments.push((right, top));
                    }
                }
                6 => segments.push((bottom, top)),
                7 => segments.push((left, top)),
                8 => segments.push((top, left)),
                9 => segments.push((bottom, top)),
                10 => {
                    if (v0 + v1 + v2 + v3) / 4.0 <= threshold {
                        segments.push((bottom, left));
                        segments.push((right, top));
                    } else {
                        segments.push((bottom, right));
                        segments.push((top, left));
                    }
                }
                11 => segments.push((right, top)),
                12 => segments.push((left, right)),
                13 => segments.push((bottom, right)),
                14 => segments.push((bottom, left)),
                _ => {}
            }
        }
    }

    let rings = chain_rings(&segments);
    if rings.is_empty() {
        return None;
    }

    let to_polygon = |ring: &Vec<(f64, f64)>| {
        let exterior: Vec<Coord<f64>> = ring
            .iter()
            .map(|&(grid_x, grid_y)| Coord {
                x: min_lon + step_lon * grid_x,
                y: min_lat + step_lat * grid_y,
            })
            .collect();
        Polygon::new(LineString::from(exterior), Vec::new())
    };

    let origin_point = Point::new(origin.longitude, origin.latitude);
    let mut best: Option<Polygon<f64>> = None;
    let mut best_area = 0.0;
    for ring in &rings {
        let polygon = to_polygon(ring);
        if polygon.contains(&origin_point) {
            return Some(polygon);
        }
        let area = polygon.unsigned_area();
        if area > best_area {
            best_area = area;
            best = Some(polygon);
        }
    }
    best
}

/// Joins segments end to end into closed rings. Chains that leave the grid
/// or revisit a point are dropped.
fn chain_rings(segments: &[((f64, f64), (f64, f64))]) -> Vec<Vec<(f64, f64)>> {
    let quantum = 1e-6;
    let key =
        |point: (f64, f64)| ((point.0 / quantum).round() as i64, (point.1 / quantum).round() as i64);

    let mut at: HashMap<(i64, i64), Vec<usize>> = HashMap::new();
    for (id, (from, to)) in segments.iter().enumerate() {
        at.entry(key(*from)).or_default().push(id);
        at.entry(key(*to)).or_default().push(id);
    }

    let mut used = vec![false; segments.len()];
    let mut rings: Vec<Vec<(f64, f64)>> = Vec::new();
    for start in 0..segments.len() {
        if used[start] {
            continue;
        }
        used[start] = true;
        let (first, mut current) = segments[start];
        let start_key = key(first);
        let mut ring = vec![first, current];
        let closed = loop {
            let Some(candidates) = at.get(&key(current)) else {
                break false;
            };
            let Some(next_id) = candidates.iter().copied().find(|id| !used[*id]) else {
                break false;
            };
            used[next_id] = true;
            let (from, to) = segments[next_id];
            let next = if key(from) == key(current) { to } else { from };
            if key(next) == start_key {
                break true;
            }
            if ring.iter().any(|point| key(*point) == key(next)) {
                break false;
            }
            ring.push(next);
            current = next;
        };
        if closed && ring.len() >= 3 {
            rings.push(ring);
        }
    }
    rings
}
