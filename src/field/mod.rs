mod anchored;
pub(crate) mod delaunay;
mod radial;

pub use anchored::*;
pub use radial::*;

use crate::shared::geo::Coordinate;

/// A geographic point tagged with an estimated or exact travel time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TravelTimeSample {
    pub coordinate: Coordinate,
    /// Minutes from the origin, never negative. The origin sample is 0.
    pub minutes: f64,
}

/// The travel-time samples backing one isochrone request.
///
/// Radial sets are synthesized geometrically; anchored sets interpolate the
/// stops a connectivity search actually reached. The two never mix.
#[derive(Debug, Clone)]
pub enum SampleSet {
    Radial(Vec<TravelTimeSample>),
    Anchored(AnchoredField),
}

impl SampleSet {
    /// Every sample in the set, origin included. The slice can be iterated
    /// any number of times.
    pub fn samples(&self) -> &[TravelTimeSample] {
        match self {
            SampleSet::Radial(samples) => samples,
            SampleSet::Anchored(field) => field.anchors(),
        }
    }

    /// The interpolating field, when this set was built from anchors.
    pub fn field(&self) -> Option<&AnchoredField> {
        match self {
            SampleSet::Radial(_) => None,
            SampleSet::Anchored(field) => Some(field),
        }
    }
}
