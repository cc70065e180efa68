//! Incremental Bowyer-Watson triangulation over a small planar point set.
//!
//! Inputs are local east/north meter offsets, so plain f64 arithmetic is
//! accurate at the scales a transit network covers.

/// Triangulates the given points, returning corner indexes into the input
/// slice. Degenerate inputs (fewer than three points, or all collinear)
/// produce no triangles.
pub(crate) fn triangulate(points: &[(f64, f64)]) -> Vec<[usize; 3]> {
    if points.len() < 3 {
        return Vec::new();
    }

    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for (x, y) in points {
        min_x = min_x.min(*x);
        min_y = min_y.min(*y);
        max_x = max_x.max(*x);
        max_y = max_y.max(*y);
    }
    let span = (max_x - min_x).max(max_y - min_y).max(1.0);
    let mid_x = (min_x + max_x) / 2.0;
    let mid_y = (min_y + max_y) / 2.0;

    // Three synthetic vertices far enough out that their removal at the end
    // leaves the Delaunay property intact over the real points.
    let mut vertices: Vec<(f64, f64)> = points.to_vec();
    let anchor_a = vertices.len();
    vertices.push((mid_x - 20.0 * span, mid_y - span));
    let anchor_b = vertices.len();
    vertices.push((mid_x, mid_y + 20.0 * span));
    let anchor_c = vertices.len();
    vertices.push((mid_x + 20.0 * span, mid_y - span));

    let mut triangles: Vec<[usize; 3]> = vec![[anchor_a, anchor_b, anchor_c]];
    for inserted in 0..points.len() {
        let point = vertices[inserted];

        // Triangles whose circumcircle swallows the new point form the
        // cavity to retriangulate.
        let (bad, kept): (Vec<[usize; 3]>, Vec<[usize; 3]>) =
            triangles.into_iter().partition(|triangle| {
                in_circumcircle(
                    vertices[triangle[0]],
                    vertices[triangle[1]],
                    vertices[triangle[2]],
                    point,
                )
            });
        triangles = kept;

        // The cavity boundary is every edge belonging to exactly one bad
        // triangle; shared edges cancel out.
        let mut boundary: Vec<(usize, usize)> = Vec::new();
        for triangle in &bad {
            for (from, to) in [
                (triangle[0], triangle[1]),
                (triangle[1], triangle[2]),
                (triangle[2], triangle[0]),
            ] {
                let edge = if from < to { (from, to) } else { (to, from) };
                if let Some(position) = boundary.iter().position(|entry| *entry == edge) {
                    boundary.swap_remove(position);
                } else {
                    boundary.push(edge);
                }
            }
        }
        for (from, to) in boundary {
            triangles.push([from, to, inserted]);
        }
    }

    triangles.retain(|triangle| triangle.iter().all(|vertex| *vertex < points.len()));
    triangles
}

/// Barycentric weights of `point` relative to the triangle `a`, `b`, `c`.
/// None when the triangle has no area. Weights sum to one; all three are
/// non-negative exactly when the point lies inside or on the boundary.
pub(crate) fn barycentric(
    a: (f64, f64),
    b: (f64, f64),
    c: (f64, f64),
    point: (f64, f64),
) -> Option<(f64, f64, f64)> {
    let denominator = (b.0 - a.0) * (c.1 - a.1) - (c.0 - a.0) * (b.1 - a.1);
    if denominator == 0.0 {
        return None;
    }
    let weight_a =
        ((b.0 - point.0) * (c.1 - point.1) - (c.0 - point.0) * (b.1 - point.1)) / denominator;
    let weight_b =
        ((c.0 - point.0) * (a.1 - point.1) - (a.0 - point.0) * (c.1 - point.1)) / denominator;
    let weight_c =
        ((a.0 - point.0) * (b.1 - point.1) - (b.0 - point.0) * (a.1 - point.1)) / denominator;
    Some((weight_a, weight_b, weight_c))
}

fn in_circumcircle(a: (f64, f64), b: (f64, f64), c: (f64, f64), point: (f64, f64)) -> bool {
    let orientation = (b.0 - a.0) * (c.1 - a.1) - (c.0 - a.0) * (b.1 - a.1);
    if orientation == 0.0 {
        return false;
    }

    let (ax, ay) = (a.0 - point.0, a.1 - point.1);
    let (bx, by) = (b.0 - point.0, b.1 - point.1);
    let (cx, cy) = (c.0 - point.0, c.1 - point.1);
    let determinant = (ax * ax + ay * ay) * (bx * cy - cx * by)
        - (bx * bx + by * by) * (ax * cy - cx * ay)
        + (cx * cx + cy * cy) * (ax * by - bx * ay);

    if orientation > 0.0 {
        determinant > 0.0
    } else {
        determinant < 0.0
    }
}

#[test]
fn triangulate_square_test() {
    let points = [(0.0, 0.0), (100.0, 0.0), (100.0, 100.0), (0.0, 100.0)];
    let triangles = triangulate(&points);
    assert_eq!(triangles.len(), 2);

    let mut used: Vec<usize> = triangles.iter().flatten().copied().collect();
    used.sort_unstable();
    used.dedup();
    assert_eq!(used, vec![0, 1, 2, 3]);
}

#[test]
fn triangulate_collinear_test() {
    let points = [(0.0, 0.0), (50.0, 50.0), (100.0, 100.0)];
    assert!(triangulate(&points).is_empty());
}

#[test]
fn triangulate_too_few_test() {
    assert!(triangulate(&[]).is_empty());
    assert!(triangulate(&[(0.0, 0.0), (10.0, 0.0)]).is_empty());
}

#[test]
fn barycentric_vertex_test() {
    let (wa, wb, wc) = barycentric((0.0, 0.0), (10.0, 0.0), (0.0, 10.0), (0.0, 0.0)).unwrap();
    assert_eq!((wa, wb, wc), (1.0, 0.0, 0.0));
}

#[test]
fn barycentric_center_test() {
    let (wa, wb, wc) = barycentric((0.0, 0.0), (30.0, 0.0), (0.0, 30.0), (10.0, 10.0)).unwrap();
    assert!((wa - 1.0 / 3.0).abs() < 1e-12);
    assert!((wb - 1.0 / 3.0).abs() < 1e-12);
    assert!((wc - 1.0 / 3.0).abs() < 1e-12);
    assert!((wa + wb + wc - 1.0).abs() < 1e-12);
}

#[test]
fn barycentric_degenerate_test() {
    assert!(barycentric((0.0, 0.0), (10.0, 10.0), (20.0, 20.0), (5.0, 5.0)).is_none());
}
