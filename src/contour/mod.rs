mod hull;
mod isoline;

use geo::{Coord, LineString, Polygon};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    field::{AnchoredField, SampleSet, TravelTimeSample},
    shared::geo::{Coordinate, Distance},
};

/// Tuning knobs for boundary extraction.
#[derive(Debug, Clone, Copy)]
pub struct ContourParams {
    /// Longest triangle side the concave hull keeps.
    pub concave_edge: Distance,
    /// Nodes per axis of the isoline sampling grid.
    pub isoline_grid: usize,
    /// Kilometers of fallback circle radius per 15 minutes of threshold.
    pub circle_radius_scale: f64,
    /// Boundary segments approximating the fallback circle.
    pub circle_segments: u32,
}

impl Default for ContourParams {
    fn default() -> Self {
        Self {
            concave_edge: Distance::from_kilometers(1.0),
            isoline_grid: 48,
            circle_radius_scale: 0.5,
            circle_segments: 64,
        }
    }
}

/// Which stage of the fallback chain produced a boundary.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionMethod {
    Isoline,
    ConcaveHull,
    ConvexHull,
    Circle,
}

/// One closed region boundary.
#[derive(Debug, Clone)]
pub struct Contour {
    pub polygon: Polygon<f64>,
    pub method: ExtractionMethod,
}

/// The geometry operations the extraction chain composes. Every attempt
/// reports failure by returning None; only `circle` must always succeed.
pub trait GeometryStrategy {
    fn try_isoline(
        &self,
        field: &AnchoredField,
        qualifying: &[TravelTimeSample],
        threshold: f64,
        origin: Coordinate,
        params: &ContourParams,
    ) -> Option<Polygon<f64>>;

    fn try_concave_hull(
        &self,
        points: &[Coordinate],
        params: &ContourParams,
    ) -> Option<Polygon<f64>>;

    fn try_convex_hull(&self, points: &[Coordinate]) -> Option<Polygon<f64>>;

    fn circle(&self, center: Coordinate, radius: Distance, segments: u32) -> Polygon<f64>;
}

/// The built-in strategy: marching-squares isolines, triangulation-pruned
/// concave hulls, and the geo crate's convex hull.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardGeometry;

impl GeometryStrategy for StandardGeometry {
    fn try_isoline(
        &self,
        field: &AnchoredField,
        qualifying: &[TravelTimeSample],
        threshold: f64,
        origin: Coordinate,
        params: &ContourParams,
    ) -> Option<Polygon<f64>> {
        isoline::threshold_contour(field, qualifying, threshold, origin, params.isoline_grid)
    }

    fn try_concave_hull(
        &self,
        points: &[Coordinate],
        params: &ContourParams,
    ) -> Option<Polygon<f64>> {
        hull::concave_hull(points, params.concave_edge)
    }

    fn try_convex_hull(&self, points: &[Coordinate]) -> Option<Polygon<f64>> {
        hull::convex_hull(points)
    }

    fn circle(&self, center: Coordinate, radius: Distance, segments: u32) -> Polygon<f64> {
        let ring: Vec<Coord<f64>> = (0..segments)
            .map(|segment| {
                let bearing = f64::from(segment) * 360.0 / f64::from(segments);
                let point = center.destination(bearing, radius);
                Coord {
                    x: point.longitude,
                    y: point.latitude,
                }
            })
            .collect();
        Polygon::new(LineString::from(ring), Vec::new())
    }
}

/// Extracts one closed boundary for a threshold. Never fails: stages that
/// cannot produce a usable polygon hand over to the next, ending at a
/// fixed-radius circle around the origin.
pub fn extract<S: GeometryStrategy>(
    strategy: &S,
    samples: &SampleSet,
    origin: Coordinate,
    threshold_minutes: u32,
    params: &ContourParams,
) -> Contour {
    let threshold = f64::from(threshold_minutes);
    let qualifying: Vec<TravelTimeSample> = samples
        .samples()
        .iter()
        .filter(|sample| sample.minutes <= threshold)
        .copied()
        .collect();
    let points: Vec<Coordinate> = qualifying.iter().map(|sample| sample.coordinate).collect();

    // Fewer than four qualifying points cannot enclose an area; the chain
    // drops straight to the hull stages.
    if qualifying.len() > 3 {
        if let Some(field) = samples.field() {
            if let Some(polygon) =
                strategy.try_isoline(field, &qualifying, threshold, origin, params)
            {
                return Contour {
                    polygon,
                    method: ExtractionMethod::Isoline,
                };
            }
            debug!("No closed isoline at {} min, trying a concave hull", threshold_minutes);
        }

        if let Some(polygon) = strategy.try_concave_hull(&points, params) {
            return Contour {
                polygon,
                method: ExtractionMethod::ConcaveHull,
            };
        }
        debug!("No concave hull at {} min, trying a convex hull", threshold_minutes);
    }

    if let Some(polygon) = strategy.try_convex_hull(&points) {
        return Contour {
            polygon,
            method: ExtractionMethod::ConvexHull,
        };
    }

    debug!("Falling back to a fixed circle at {} min", threshold_minutes);
    let radius = Distance::from_kilometers(params.circle_radius_scale * threshold / 15.0);
    Contour {
        polygon: strategy.circle(origin, radius, params.circle_segments),
        method: ExtractionMethod::Circle,
    }
}
