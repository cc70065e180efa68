mod config;
pub mod palette;

pub use config::*;
pub use crate::reach::ModeFilter;

use std::sync::Arc;

use geo::Polygon;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    contour::{self, ContourParams, ExtractionMethod, StandardGeometry},
    field::{AnchoredField, RadialParams, RadialSampler, SampleSet},
    reach::{ConnectivityResult, ReachQuery},
    schedule::ScheduleIndex,
};

/// One bounded region around the origin.
#[derive(Debug, Clone)]
pub struct IsochroneRegion {
    /// Threshold in minutes this region bounds.
    pub threshold: u32,
    pub origin: Arc<str>,
    /// Display color from the fixed four-bucket palette.
    pub color: &'static str,
    /// Which extraction stage produced the boundary.
    pub method: ExtractionMethod,
    pub polygon: Polygon<f64>,
}

impl IsochroneRegion {
    /// The exterior boundary as closed [longitude, latitude] pairs.
    pub fn exterior_ring(&self) -> Vec<[f64; 2]> {
        self.polygon
            .exterior()
            .coords()
            .map(|coord| [coord.x, coord.y])
            .collect()
    }
}

/// Serializable form of a region for rendering collaborators.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RegionFeature {
    pub threshold: u32,
    pub origin: String,
    pub color: String,
    pub method: ExtractionMethod,
    /// Closed rings of [longitude, latitude] pairs, exterior first.
    pub rings: Vec<Vec<[f64; 2]>>,
}

impl RegionFeature {
    pub fn from(region: &IsochroneRegion) -> Self {
        Self {
            threshold: region.threshold,
            origin: region.origin.to_string(),
            color: region.color.to_string(),
            method: region.method,
            rings: vec![region.exterior_ring()],
        }
    }
}

/// Everything one request produced: regions in descending threshold order,
/// plus the connectivity result they were drawn from.
#[derive(Debug, Clone)]
pub struct IsochroneSet {
    pub origin: Arc<str>,
    pub regions: Vec<IsochroneRegion>,
    pub connectivity: ConnectivityResult,
}

/// Successful sets and isolated failures of one batch run.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub sets: Vec<IsochroneSet>,
    pub failures: Vec<(Arc<str>, ConfigError)>,
}

/// Builder around one origin stop. Obtained from
/// [`ScheduleIndex::isochrones`], finished with [`compute`].
///
/// [`compute`]: IsochroneRequest::compute
pub struct IsochroneRequest<'a> {
    index: &'a ScheduleIndex,
    origin: Arc<str>,
    config: IsochroneConfig,
}

impl<'a> IsochroneRequest<'a> {
    pub fn new(index: &'a ScheduleIndex, origin: &str) -> Self {
        Self {
            index,
            origin: origin.into(),
            config: IsochroneConfig::default(),
        }
    }

    pub fn budget_minutes(mut self, minutes: u32) -> Self {
        self.config.budget_minutes = minutes;
        self
    }

    pub fn thresholds(mut self, thresholds: &[u32]) -> Self {
        self.config.thresholds = thresholds.to_vec();
        self
    }

    pub fn modes(mut self, modes: ModeFilter) -> Self {
        self.config.modes = modes;
        self
    }

    pub fn radial_params(mut self, params: RadialParams) -> Self {
        self.config.radial = params;
        self
    }

    pub fn contour_params(mut self, params: ContourParams) -> Self {
        self.config.contour = params;
        self
    }

    pub fn config(mut self, config: IsochroneConfig) -> Self {
        self.config = config;
        self
    }

    /// Runs the full pipeline. Configuration problems surface here before
    /// any work happens; every later stage recovers internally.
    pub fn compute(self) -> Result<IsochroneSet, ConfigError> {
        let thresholds = self.config.effective_thresholds()?;
        let Some(origin) = self.index.stop_by_id(&self.origin) else {
            return Err(ConfigError::UnknownOrigin);
        };

        let connectivity = ReachQuery::new(self.index, &origin.id)
            .budget_minutes(self.config.budget_minutes)
            .modes(self.config.modes)
            .run();

        // Anchors when the search reached anything, synthetic radial
        // samples when it did not.
        let samples = if !connectivity.is_empty()
            && let Some(field) = AnchoredField::from_connectivity(self.index, &connectivity)
        {
            SampleSet::Anchored(field)
        } else {
            SampleSet::Radial(RadialSampler::new(self.config.radial).sample(origin.coordinate))
        };

        debug!(
            "Extracting {} regions around {} from {} samples",
            thresholds.len(),
            origin.id,
            samples.samples().len()
        );

        let geometry = StandardGeometry;
        let regions: Vec<IsochroneRegion> = thresholds
            .par_iter()
            .map(|threshold| {
                let contour = contour::extract(
                    &geometry,
                    &samples,
                    origin.coordinate,
                    *threshold,
                    &self.config.contour,
                );
                IsochroneRegion {
                    threshold: *threshold,
                    origin: origin.id.clone(),
                    color: palette::color_for(*threshold),
                    method: contour.method,
                    polygon: contour.polygon,
                }
            })
            .collect();

        Ok(IsochroneSet {
            origin: origin.id.clone(),
            regions,
            connectivity,
        })
    }
}

/// Computes isochrone sets for many origins at once. Failures stay with
/// their origin; one bad request never aborts the rest of the batch.
pub fn compute_batch(
    index: &ScheduleIndex,
    origins: &[&str],
    config: &IsochroneConfig,
) -> BatchOutcome {
    let outcomes: Vec<(Arc<str>, Result<IsochroneSet, ConfigError>)> = origins
        .par_iter()
        .map(|origin| {
            let result = IsochroneRequest::new(index, origin)
                .config(config.clone())
                .compute();
            (Arc::from(*origin), result)
        })
        .collect();

    let mut batch = BatchOutcome::default();
    for (origin, outcome) in outcomes {
        match outcome {
            Ok(set) => batch.sets.push(set),
            Err(error) => batch.failures.push((origin, error)),
        }
    }
    batch
}
