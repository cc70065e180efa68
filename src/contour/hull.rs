use std::{
    cmp::Ordering,
    collections::{HashMap, VecDeque},
};

use geo::{Area, ConvexHull, Coord, LineString, MultiPoint, Point, Polygon};

use crate::{
    field::delaunay,
    shared::geo::{Coordinate, Distance},
};

/// A concave outline of the points: triangulate, drop triangles with a side
/// longer than `max_edge`, keep the largest connected patch and trace its
/// boundary. None when no closed, non-self-touching ring survives.
pub(crate) fn concave_hull(points: &[Coordinate], max_edge: Distance) -> Option<Polygon<f64>> {
    let reference = points.first()?;
    let planar: Vec<(f64, f64)> = points.iter().map(|point| point.to_local(reference)).collect();

    // Overlong sides span areas the samples say nothing about.
    let kept: Vec<[usize; 3]> = delaunay::triangulate(&planar)
        .into_iter()
        .filter(|triangle| {
            triangle_edges(triangle).iter().all(|(from, to)| {
                points[*from].euclidean_distance(&points[*to]) <= max_edge
            })
        })
        .collect();
    if kept.is_empty() {
        return None;
    }

    let largest = components(&kept).into_iter().max_by_key(Vec::len)?;

    // An edge belonging to exactly one triangle of the patch bounds it.
    let mut edge_counts: HashMap<(usize, usize), u32> = HashMap::new();
    for member in &largest {
        for edge in triangle_edges(&kept[*member]) {
            *edge_counts.entry(edge).or_insert(0) += 1;
        }
    }
    let mut boundary: Vec<(usize, usize)> = Vec::new();
    for member in &largest {
        for edge in triangle_edges(&kept[*member]) {
            if edge_counts.get(&edge) == Some(&1) {
                boundary.push(edge);
            }
        }
    }

    trace_largest_ring(&boundary, points)
}

/// Convex outline via the geo crate. Requires more than three distinct
/// points and a positive area, otherwise None.
pub(crate) fn convex_hull(points: &[Coordinate]) -> Option<Polygon<f64>> {
    let mut distinct: Vec<(f64, f64)> = points
        .iter()
        .map(|point| (point.longitude, point.latitude))
        .collect();
    distinct.sort_unstable_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    distinct.dedup();
    if distinct.len() <= 3 {
        return None;
    }

    let candidates: Vec<Point<f64>> = distinct
        .into_iter()
        .map(|(x, y)| Point::new(x, y))
        .collect();
    let hull = MultiPoint::from(candidates).convex_hull();
    (hull.unsigned_area() > 0.0).then_some(hull)
}

fn triangle_edges(triangle: &[usize; 3]) -> [(usize, usize); 3] {
    let sorted = |from: usize, to: usize| if from < to { (from, to) } else { (to, from) };
    [
        sorted(triangle[0], triangle[1]),
        sorted(triangle[1], triangle[2]),
        sorted(triangle[2], triangle[0]),
    ]
}

/// Groups triangles into edge-connected components, members listed in
/// discovery order.
fn components(triangles: &[[usize; 3]]) -> Vec<Vec<usize>> {
    let mut by_edge: HashMap<(usize, usize), Vec<usize>> = HashMap::new();
    for (id, triangle) in triangles.iter().enumerate() {
        for edge in triangle_edges(triangle) {
            by_edge.entry(edge).or_default().push(id);
        }
    }

    let mut assigned = vec![false; triangles.len()];
    let mut found: Vec<Vec<usize>> = Vec::new();
    for seed in 0..triangles.len() {
        if assigned[seed] {
            continue;
        }
        assigned[seed] = true;
        let mut members = vec![seed];
        let mut queue = VecDeque::from([seed]);
        while let Some(current) = queue.pop_front() {
            for edge in triangle_edges(&triangles[current]) {
                let Some(neighbors) = by_edge.get(&edge) else {
                    continue;
                };
                for neighbor in neighbors {
                    if !assigned[*neighbor] {
                        assigned[*neighbor] = true;
                        members.push(*neighbor);
                        queue.push_back(*neighbor);
                    }
                }
            }
        }
        found.push(members);
    }
    found
}

/// Chains boundary edges into closed rings and returns the largest by area.
/// Walks that revisit a vertex or dead-end are discarded.
fn trace_largest_ring(boundary: &[(usize, usize)], points: &[Coordinate]) -> Option<Polygon<f64>> {
    let mut edges_at: HashMap<usize, Vec<usize>> = HashMap::new();
    for (id, (from, to)) in boundary.iter().enumerate() {
        edges_at.entry(*from).or_default().push(id);
        edges_at.entry(*to).or_default().push(id);
    }

    let mut used = vec![false; boundary.len()];
    let mut best: Option<Polygon<f64>> = None;
    let mut best_area = 0.0;
    for start_edge in 0..boundary.len() {
        if used[start_edge] {
            continue;
        }
        used[start_edge] = true;
        let (start, mut current) = boundary[start_edge];
        let mut ring = vec![start, current];
        let closed = loop {
            let Some(candidates) = edges_at.get(&current) else {
                break false;
            };
            let Some(next_edge) = candidates.iter().copied().find(|edge| !used[*edge]) else {
                break false;
            };
            used[next_edge] = true;
            let (from, to) = boundary[next_edge];
            let next = if from == current { to } else { from };
            if next == start {
                break true;
            }
            if ring.contains(&next) {
                // A pinch vertex would make the ring touch itself.
                break false;
            }
            ring.push(next);
            current = next;
        };
        if !closed || ring.len() < 3 {
            continue;
        }

        let exterior: Vec<Coord<f64>> = ring
            .iter()
            .map(|vertex| Coord {
                x: points[*vertex].longitude,
                y: points[*vertex].latitude,
            })
            .collect();
        let polygon = Polygon::new(LineString::from(exterior), Vec::new());
        let area = polygon.unsigned_area();
        if area > best_area {
            best_area = area;
            best = Some(polygon);
        }
    }
    best
}

#[cfg(test)]
fn grid(base: Coordinate, columns: u32, rows: u32, spacing: Distance) -> Vec<Coordinate> {
    let mut points = Vec::new();
    for row in 0..rows {
        let south = base.destination(0.0, spacing * f64::from(row));
        for column in 0..columns {
            points.push(south.destination(90.0, spacing * f64::from(column)));
        }
    }
    points
}

#[test]
fn convex_hull_declines_few_points_test() {
    let corner = |latitude, longitude| Coordinate::new(latitude, longitude);
    let triangle = [corner(48.0, 2.0), corner(48.01, 2.0), corner(48.0, 2.01)];
    assert!(convex_hull(&triangle).is_none());

    // Duplicates do not count towards the minimum.
    let padded = [triangle[0], triangle[1], triangle[2], triangle[0], triangle[1]];
    assert!(convex_hull(&padded).is_none());

    assert!(convex_hull(&[]).is_none());
}

#[test]
fn convex_hull_square_test() {
    let points = [
        Coordinate::new(48.0, 2.0),
        Coordinate::new(48.01, 2.0),
        Coordinate::new(48.01, 2.01),
        Coordinate::new(48.0, 2.01),
        Coordinate::new(48.005, 2.005),
    ];
    let hull = convex_hull(&points).unwrap();
    assert!(hull.unsigned_area() > 0.0);
    // Four corners plus the closing coordinate; the interior point is gone.
    assert_eq!(hull.exterior().0.len(), 5);
}

#[test]
fn convex_hull_collinear_test() {
    let points: Vec<Coordinate> = (0..5)
        .map(|step| Coordinate::new(48.0, 2.0 + 0.001 * f64::from(step)))
        .collect();
    assert!(convex_hull(&points).is_none());
}

#[test]
fn concave_hull_grid_test() {
    let points = grid(Coordinate::new(48.0, 2.0), 4, 4, Distance::from_meters(300.0));
    let hull = concave_hull(&points, Distance::from_kilometers(1.0)).unwrap();
    assert!(hull.unsigned_area() > 0.0);

    let exterior = hull.exterior();
    assert_eq!(exterior.0.first(), exterior.0.last());
}

#[test]
fn concave_hull_keeps_largest_patch_test() {
    let near = grid(Coordinate::new(48.0, 2.0), 4, 4, Distance::from_meters(300.0));
    let far = grid(Coordinate::new(48.0, 2.1), 2, 2, Distance::from_meters(300.0));
    let mut points = near;
    points.extend(far);

    let hull = concave_hull(&points, Distance::from_kilometers(1.0)).unwrap();

    // Every boundary vertex sits in a single cluster.
    let first = hull.exterior().0[0];
    let anchor = Coordinate::new(first.y, first.x);
    for coord in &hull.exterior().0 {
        let vertex = Coordinate::new(coord.y, coord.x);
        assert!(anchor.euclidean_distance(&vertex) < Distance::from_kilometers(2.0));
    }
}

#[test]
fn concave_hull_sparse_points_test() {
    // Neighbors sit farther apart than the edge limit, so nothing survives.
    let points = grid(Coordinate::new(48.0, 2.0), 3, 3, Distance::from_kilometers(2.0));
    assert!(concave_hull(&points, Distance::from_kilometers(1.0)).is_none());
}
