use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::{
    field::TravelTimeSample,
    shared::geo::{Coordinate, Distance},
};

/// Shape of the synthetic field used when a search reaches nothing.
#[derive(Debug, Clone, Copy)]
pub struct RadialParams {
    /// How far out the sampled disc extends.
    pub max_distance: Distance,
    /// Evenly spaced bearings around the origin.
    pub radials: u32,
    /// Samples along each bearing, excluding the origin itself.
    pub points_per_radial: u32,
    /// Assumed straight-line travel speed used to turn distance into time.
    pub average_speed_kmh: f64,
    pub jitter: Jitter,
}

impl Default for RadialParams {
    fn default() -> Self {
        Self {
            max_distance: Distance::from_kilometers(15.0),
            radials: 24,
            points_per_radial: 10,
            average_speed_kmh: 30.0,
            jitter: Jitter::Off,
        }
    }
}

/// Optional perturbation of radial travel times, uniform over 0.7..1.3.
///
/// `Seeded` reproduces the same stream every run. `Entropy` draws a fresh
/// seed each call and is excluded from any repeatability guarantee.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Jitter {
    #[default]
    Off,
    Seeded(u64),
    Entropy,
}

/// Produces travel-time samples on concentric rings around an origin.
#[derive(Debug, Clone)]
pub struct RadialSampler {
    params: RadialParams,
}

impl RadialSampler {
    pub fn new(params: RadialParams) -> Self {
        Self { params }
    }

    /// Samples every bearing at every ring distance, origin first at zero
    /// minutes. Sample order is fixed: bearing-major, nearest ring first.
    pub fn sample(&self, origin: Coordinate) -> Vec<TravelTimeSample> {
        let params = &self.params;
        let mut rng = match params.jitter {
            Jitter::Off => None,
            Jitter::Seeded(seed) => Some(ChaCha8Rng::seed_from_u64(seed)),
            Jitter::Entropy => Some(ChaCha8Rng::from_entropy()),
        };

        let mut samples =
            Vec::with_capacity((params.radials * params.points_per_radial + 1) as usize);
        samples.push(TravelTimeSample {
            coordinate: origin,
            minutes: 0.0,
        });
        for radial in 0..params.radials {
            let bearing = f64::from(radial) * 360.0 / f64::from(params.radials);
            for ring in 1..=params.points_per_radial {
                let reach =
                    params.max_distance * (f64::from(ring) / f64::from(params.points_per_radial));
                let mut minutes = reach.as_kilometers() / params.average_speed_kmh * 60.0;
                if let Some(rng) = rng.as_mut() {
                    minutes *= rng.gen_range(0.7..1.3);
                }
                samples.push(TravelTimeSample {
                    coordinate: origin.destination(bearing, reach),
                    minutes,
                });
            }
        }
        samples
    }
}

#[test]
fn radial_sample_layout_test() {
    let origin = Coordinate::new(48.8566, 2.3522);
    let samples = RadialSampler::new(RadialParams::default()).sample(origin);

    assert_eq!(samples.len(), 241);
    assert_eq!(samples[0].coordinate, origin);
    assert_eq!(samples[0].minutes, 0.0);

    // Default speed covers 15 km in exactly 30 minutes.
    assert!((samples[10].minutes - 30.0).abs() < 1e-9);
}

#[test]
fn radial_sample_repeatable_test() {
    let origin = Coordinate::new(48.8566, 2.3522);
    let sampler = RadialSampler::new(RadialParams::default());
    assert_eq!(sampler.sample(origin), sampler.sample(origin));
}

#[test]
fn seeded_jitter_test() {
    let origin = Coordinate::new(48.8566, 2.3522);
    let params = RadialParams {
        jitter: Jitter::Seeded(7),
        ..RadialParams::default()
    };
    let sampler = RadialSampler::new(params);

    let first = sampler.sample(origin);
    let second = sampler.sample(origin);
    assert_eq!(first, second);

    // Jitter rescales times without moving sample points.
    let plain = RadialSampler::new(RadialParams::default()).sample(origin);
    for (jittered, base) in first.iter().zip(&plain).skip(1) {
        assert_eq!(jittered.coordinate, base.coordinate);
        assert!(jittered.minutes >= base.minutes * 0.7);
        assert!(jittered.minutes < base.minutes * 1.3);
    }
}
