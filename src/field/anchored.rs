use std::cmp::Ordering;

use tracing::debug;

use crate::{
    field::{TravelTimeSample, delaunay},
    reach::ConnectivityResult,
    schedule::ScheduleIndex,
    shared::geo::Coordinate,
};

/// Slack for the barycentric inside test, so points on a shared triangle
/// edge are claimed instead of falling through to the distance blend.
const INSIDE_EPSILON: f64 = 1e-9;

/// Piecewise-linear travel-time surface over the stops a connectivity
/// search reached.
///
/// Queries inside the triangulated extent interpolate the enclosing
/// triangle's corner times. Queries outside it blend the three nearest
/// anchors by inverse squared distance. An anchor's own coordinate always
/// returns its recorded time exactly.
#[derive(Debug, Clone)]
pub struct AnchoredField {
    anchors: Vec<TravelTimeSample>,
    planar: Vec<(f64, f64)>,
    triangles: Vec<[usize; 3]>,
    reference: Coordinate,
}

impl AnchoredField {
    /// Builds the surface from a search result: the origin at zero minutes,
    /// then one anchor per reached stop. None when the result's origin id
    /// is not in the index.
    pub fn from_connectivity(index: &ScheduleIndex, result: &ConnectivityResult) -> Option<Self> {
        let origin = index.stop_by_id(&result.origin)?;

        // Anchor order is fixed by stop index so identical searches always
        // triangulate identically.
        let mut reached: Vec<(u32, f64)> = result
            .stops()
            .filter_map(|(id, minutes)| index.stop_by_id(id).map(|stop| (stop.index, minutes)))
            .collect();
        reached.sort_unstable_by_key(|(stop_index, _)| *stop_index);

        let mut anchors = Vec::with_capacity(reached.len() + 1);
        anchors.push(TravelTimeSample {
            coordinate: origin.coordinate,
            minutes: 0.0,
        });
        anchors.extend(reached.into_iter().map(|(stop_index, minutes)| TravelTimeSample {
            coordinate: index.stops[stop_index as usize].coordinate,
            minutes,
        }));

        let reference = origin.coordinate;
        let planar: Vec<(f64, f64)> = anchors
            .iter()
            .map(|anchor| anchor.coordinate.to_local(&reference))
            .collect();
        let triangles = delaunay::triangulate(&planar);
        debug!(
            "Anchored field over {} anchors ({} triangles)",
            anchors.len(),
            triangles.len()
        );

        Some(Self {
            anchors,
            planar,
            triangles,
            reference,
        })
    }

    /// Every anchor, origin first.
    pub fn anchors(&self) -> &[TravelTimeSample] {
        &self.anchors
    }

    /// Estimated minutes from the origin to any coordinate.
    pub fn time_at(&self, coordinate: Coordinate) -> f64 {
        // Known times are never re-estimated.
        if let Some(anchor) = self
            .anchors
            .iter()
            .find(|anchor| anchor.coordinate == coordinate)
        {
            return anchor.minutes;
        }

        let point = coordinate.to_local(&self.reference);
        for triangle in &self.triangles {
            let a = self.planar[triangle[0]];
            let b = self.planar[triangle[1]];
            let c = self.planar[triangle[2]];
            if let Some((wa, wb, wc)) = delaunay::barycentric(a, b, c, point)
                && wa >= -INSIDE_EPSILON
                && wb >= -INSIDE_EPSILON
                && wc >= -INSIDE_EPSILON
            {
                return wa * self.anchors[triangle[0]].minutes
                    + wb * self.anchors[triangle[1]].minutes
                    + wc * self.anchors[triangle[2]].minutes;
            }
        }

        self.nearest_estimate(coordinate)
    }

    /// Inverse-distance-squared blend over the three nearest anchors, used
    /// outside the triangulated extent.
    fn nearest_estimate(&self, coordinate: Coordinate) -> f64 {
        let mut ranked: Vec<(f64, usize)> = self
            .anchors
            .iter()
            .enumerate()
            .map(|(position, anchor)| {
                let distance = anchor.coordinate.euclidean_distance(&coordinate);
                (distance.as_meters(), position)
            })
            .collect();
        ranked.sort_unstable_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

        let mut weight_sum = 0.0;
        let mut value_sum = 0.0;
        for (distance, position) in ranked.into_iter().take(3) {
            if distance == 0.0 {
                return self.anchors[position].minutes;
            }
            let weight = 1.0 / (distance * distance);
            weight_sum += weight;
            value_sum += weight * self.anchors[position].minutes;
        }
        if weight_sum == 0.0 {
            0.0
        } else {
            value_sum / weight_sum
        }
    }
}
