use std::{
    cmp,
    fmt::Display,
    ops::{Add, Mul, Sub},
};

use serde::{Deserialize, Serialize};

const EARTH_RADIUS_KM: f64 = 6371.0;
pub(crate) const LONGITUDE_DISTANCE: Distance = Distance::from_meters(111_320.0);
pub(crate) const LATITUDE_DISTANCE: Distance = Distance::from_meters(110_540.0);

#[derive(Debug, Clone, Copy, Default)]
pub struct Distance(f64);

impl PartialEq for Distance {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl PartialOrd for Distance {
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
        self.0.partial_cmp(&other.0)
    }
}

impl Add for Distance {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Distance {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl Mul<f64> for Distance {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self::Output {
        Self(self.0 * rhs)
    }
}

impl Distance {
    pub const fn from_meters(distance: f64) -> Self {
        Self(distance)
    }

    pub const fn from_kilometers(distance: f64) -> Self {
        Self(distance * 1000.0)
    }

    pub const fn as_meters(&self) -> f64 {
        self.0
    }

    pub const fn as_kilometers(&self) -> f64 {
        self.0 / 1000.0
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("{}, {}", self.latitude, self.longitude))
    }
}

impl From<Coordinate> for (f64, f64) {
    fn from(value: Coordinate) -> Self {
        (value.latitude, value.longitude)
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from(value: (f64, f64)) -> Self {
        Self {
            latitude: value.0,
            longitude: value.1,
        }
    }
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn euclidean_distance(&self, coord: &Self) -> Distance {
        let dist_lat = f64::to_radians(coord.latitude - self.latitude);
        let dist_lon = f64::to_radians(coord.longitude - self.longitude);
        let a = f64::powi(f64::sin(dist_lat / 2.0), 2)
            + f64::cos(f64::to_radians(self.latitude))
                * f64::cos(f64::to_radians(coord.latitude))
                * f64::sin(dist_lon / 2.0)
                * f64::sin(dist_lon / 2.0);
        let c = 2.0 * f64::atan2(f64::sqrt(a), f64::sqrt(1.0 - a));
        Distance::from_kilometers(EARTH_RADIUS_KM * c)
    }

    /// The coordinate reached by travelling `distance` from here on a fixed
    /// bearing (degrees clockwise from north).
    pub fn destination(&self, bearing: f64, distance: Distance) -> Self {
        let delta = distance.as_kilometers() / EARTH_RADIUS_KM;
        let theta = bearing.to_radians();
        let lat = self.latitude.to_radians();
        let lon = self.longitude.to_radians();

        let dest_lat =
            f64::asin(lat.sin() * delta.cos() + lat.cos() * delta.sin() * theta.cos());
        let dest_lon = lon
            + f64::atan2(
                theta.sin() * delta.sin() * lat.cos(),
                delta.cos() - lat.sin() * dest_lat.sin(),
            );
        Self {
            latitude: dest_lat.to_degrees(),
            longitude: dest_lon.to_degrees(),
        }
    }

    /// Projects this coordinate into a flat frame centered on `reference`,
    /// returned as (east, north) meters. The per-degree scale is fixed, so the
    /// mapping stays affine and triangle interpolation over it is well defined.
    pub fn to_local(&self, reference: &Self) -> (f64, f64) {
        let east = (self.longitude - reference.longitude) * LONGITUDE_DISTANCE.as_meters();
        let north = (self.latitude - reference.latitude) * LATITUDE_DISTANCE.as_meters();
        (east, north)
    }
}

#[test]
fn distance_test() {
    let coord_a = Coordinate {
        latitude: 48.85800943005911,
        longitude: 2.3514350059357927,
    };

    let coord_b = Coordinate {
        latitude: 51.5052389927712,
        longitude: -0.12495407345099824,
    };
    let d = coord_a.euclidean_distance(&coord_b);
    assert!((d.as_kilometers() - 343.0).abs() < 2.0);
}

#[test]
fn distance_eq_test() {
    let dist_a = Distance::from_meters(1000.0);
    let dist_b = Distance::from_kilometers(1.0);
    assert_eq!(dist_a, dist_b)
}

#[test]
fn distance_cmp_test() {
    let dist_a = Distance::from_meters(1000.0);
    let dist_b = Distance::from_kilometers(0.5);
    assert!(dist_a > dist_b)
}

#[test]
fn destination_round_trip_test() {
    let origin = Coordinate::new(59.332, 18.064);
    let there = origin.destination(73.0, Distance::from_kilometers(4.5));
    let back = origin.euclidean_distance(&there);
    assert!((back.as_kilometers() - 4.5).abs() < 1e-6);
}

#[test]
fn destination_north_test() {
    let origin = Coordinate::new(10.0, 20.0);
    let north = origin.destination(0.0, Distance::from_kilometers(10.0));
    assert!(north.latitude > origin.latitude);
    assert!((north.longitude - origin.longitude).abs() < 1e-9);
}

#[test]
fn local_frame_test() {
    let reference = Coordinate::new(59.0, 18.0);
    let east = Coordinate::new(59.0, 18.1);
    let north = Coordinate::new(59.1, 18.0);
    let (x, y) = east.to_local(&reference);
    assert!(x > 0.0 && y.abs() < 1e-9);
    let (x, y) = north.to_local(&reference);
    assert!(y > 0.0 && x.abs() < 1e-9);
    assert_eq!(reference.to_local(&reference), (0.0, 0.0));
}
