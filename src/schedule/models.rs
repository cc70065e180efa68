use std::sync::Arc;

use crate::{
    schedule::records::{RouteRecord, StopRecord},
    shared::{geo::Coordinate, time::ClockTime},
};

/// Transport classification derived from the raw numeric route-type code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Tram,
    Subway,
    Rail,
    Bus,
    /// Any code outside the four supported classes.
    Other(i32),
}

impl Mode {
    pub const fn from_code(code: i32) -> Self {
        match code {
            0 => Self::Tram,
            1 => Self::Subway,
            2 => Self::Rail,
            3 => Self::Bus,
            100..=109 => Self::Rail,
            _ => Self::Other(code),
        }
    }
}

/// Wheelchair accessibility as reported by the schedule provider.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Accessibility {
    /// No information available.
    #[default]
    Unknown,
    Accessible,
    Inaccessible,
}

impl Accessibility {
    pub const fn from_code(code: Option<u8>) -> Self {
        match code {
            Some(1) => Self::Accessible,
            Some(2) => Self::Inaccessible,
            _ => Self::Unknown,
        }
    }
}

/// A physical point where passengers can board or alight from a vehicle.
#[derive(Debug, Clone)]
pub struct Stop {
    /// The global internal index used for O(1) array lookups in the index.
    pub index: u32,
    /// The unique external identifier.
    pub id: Arc<str>,
    /// Human-readable name (e.g., "Main St & 4th Ave").
    pub name: Arc<str>,
    pub coordinate: Coordinate,
    pub wheelchair: Accessibility,
}

impl From<StopRecord> for Stop {
    fn from(value: StopRecord) -> Self {
        Self {
            index: 0,
            id: value.stop_id.into(),
            name: value.stop_name.into(),
            coordinate: Coordinate::new(value.stop_lat, value.stop_lon),
            wheelchair: Accessibility::from_code(value.wheelchair_boarding),
        }
    }
}

/// A grouping of trips that riders see under a single name (e.g., "Blue Line").
#[derive(Debug, Clone)]
pub struct Route {
    pub index: u32,
    pub id: Arc<str>,
    pub agency_id: Option<Arc<str>>,
    pub short_name: Option<Arc<str>>,
    pub long_name: Option<Arc<str>>,
    /// Classification of the vehicle serving this route.
    pub mode: Mode,
}

impl From<RouteRecord> for Route {
    fn from(value: RouteRecord) -> Self {
        Self {
            index: 0,
            id: value.route_id.into(),
            agency_id: value.agency_id.map(|val| val.into()),
            short_name: value.route_short_name.map(|val| val.into()),
            long_name: value.route_long_name.map(|val| val.into()),
            mode: Mode::from_code(value.route_type),
        }
    }
}

/// A single vehicle journey through an ordered sequence of stop visits.
#[derive(Debug, Clone)]
pub struct Trip {
    pub index: u32,
    pub id: Arc<str>,
    /// Pointer to the parent [`Route`].
    pub route_idx: u32,
    /// Opaque service-calendar identifier, kept for the caller's benefit.
    pub service_id: Arc<str>,
    pub headsign: Option<Arc<str>>,
}

/// One scheduled call of a vehicle at a stop.
#[derive(Debug, Clone, Copy)]
pub struct StopVisit {
    /// Global internal index of this visit.
    pub index: u32,
    /// Internal index of the parent [`Trip`].
    pub trip_idx: u32,
    /// Internal index of the visited [`Stop`].
    pub stop_idx: u32,
    /// The order of this visit within the trip (starts from 1).
    pub sequence: u32,
    /// Scheduled arrival time (seconds since midnight).
    pub arrival_time: ClockTime,
    /// Scheduled departure time (seconds since midnight).
    pub departure_time: ClockTime,
}

#[test]
fn mode_from_code_test() {
    assert_eq!(Mode::from_code(0), Mode::Tram);
    assert_eq!(Mode::from_code(1), Mode::Subway);
    assert_eq!(Mode::from_code(2), Mode::Rail);
    assert_eq!(Mode::from_code(3), Mode::Bus);
    assert_eq!(Mode::from_code(105), Mode::Rail);
    assert_eq!(Mode::from_code(109), Mode::Rail);
    assert_eq!(Mode::from_code(110), Mode::Other(110));
    assert_eq!(Mode::from_code(7), Mode::Other(7));
}

#[test]
fn accessibility_from_code_test() {
    assert_eq!(Accessibility::from_code(None), Accessibility::Unknown);
    assert_eq!(Accessibility::from_code(Some(0)), Accessibility::Unknown);
    assert_eq!(Accessibility::from_code(Some(1)), Accessibility::Accessible);
    assert_eq!(Accessibility::from_code(Some(2)), Accessibility::Inaccessible);
}
