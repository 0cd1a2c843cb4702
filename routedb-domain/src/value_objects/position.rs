// /////////////////////////////////////////////////////////////////////////////
// routedb
// Copyright (c) 2026 The routedb Authors
// SPDX-License-Identifier: MIT
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Position Value Object
//!
//! A fixed-point geographic coordinate, stored as signed 32-bit integers
//! scaled by 10^7 (about 1 cm precision, matching the upstream OSM
//! convention). Fixed-point storage avoids floating-point equality hazards
//! when the merger compares two observations of the same summit.
//!
//! `UNDEFINED` is the reserved `(0, 0)` point — open ocean, never a real
//! climbing summit — used as a Null Object so callers don't have to special
//! case "position not yet known" everywhere.

use crate::error::RouteDbError;

const COORDINATE_SCALE: f64 = 10_000_000.0;
const MAX_LATITUDE: i32 = 90 * 10_000_000;
const MAX_LONGITUDE: i32 = 180 * 10_000_000;
const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// A geographic coordinate pair, fixed-point at 1e-7 degree precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    latitude: i32,
    longitude: i32,
}

/// The sentinel "absent" position: `(0, 0)`, a point in the open Atlantic.
pub const UNDEFINED: Position = Position {
    latitude: 0,
    longitude: 0,
};

impl Position {
    /// Creates a position from already-scaled integer coordinates.
    ///
    /// Returns `InvalidState` if `|lat| > 90e7` or `|lon| > 180e7`.
    pub fn new(latitude: i32, longitude: i32) -> Result<Self, RouteDbError> {
        if latitude.abs() > MAX_LATITUDE {
            return Err(RouteDbError::InvalidState(format!(
                "latitude {} out of range [-{}, {}]",
                latitude, MAX_LATITUDE, MAX_LATITUDE
            )));
        }
        if longitude.abs() > MAX_LONGITUDE {
            return Err(RouteDbError::InvalidState(format!(
                "longitude {} out of range [-{}, {}]",
                longitude, MAX_LONGITUDE, MAX_LONGITUDE
            )));
        }
        Ok(Self { latitude, longitude })
    }

    /// Creates a position from decimal degrees, truncating to 1e-7 precision.
    pub fn from_decimal_degrees(latitude: f64, longitude: f64) -> Result<Self, RouteDbError> {
        Self::new(
            (latitude * COORDINATE_SCALE) as i32,
            (longitude * COORDINATE_SCALE) as i32,
        )
    }

    pub fn latitude(&self) -> i32 {
        self.latitude
    }

    pub fn longitude(&self) -> i32 {
        self.longitude
    }

    pub fn latitude_decimal_degrees(&self) -> f64 {
        self.latitude as f64 / COORDINATE_SCALE
    }

    pub fn longitude_decimal_degrees(&self) -> f64 {
        self.longitude as f64 / COORDINATE_SCALE
    }

    /// True if this position is the `UNDEFINED` sentinel.
    pub fn is_undefined(&self) -> bool {
        *self == UNDEFINED
    }

    /// Haversine distance check: true iff `self` and `other` lie within
    /// `meters` of each other. `UNDEFINED` is compared like any other point —
    /// callers that must special-case "unknown position" (the merge
    /// predicate, see `Summit::positions_compatible`) do so before calling
    /// this.
    pub fn within_radius(&self, other: &Position, meters: f64) -> bool {
        self.distance_meters(other) <= meters
    }

    fn distance_meters(&self, other: &Position) -> f64 {
        let lat1 = self.latitude_decimal_degrees().to_radians();
        let lat2 = other.latitude_decimal_degrees().to_radians();
        let delta_lat = lat2 - lat1;
        let delta_lon = (other.longitude_decimal_degrees() - self.longitude_decimal_degrees()).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().asin();
        EARTH_RADIUS_METERS * c
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_latitude() {
        assert!(Position::new(900_000_001, 0).is_err());
    }

    #[test]
    fn rejects_out_of_range_longitude() {
        assert!(Position::new(0, 1_800_000_001).is_err());
    }

    #[test]
    fn zero_zero_is_undefined() {
        assert!(Position::new(0, 0).unwrap().is_undefined());
        assert_eq!(Position::new(0, 0).unwrap(), UNDEFINED);
    }

    #[test]
    fn from_decimal_degrees_round_trips_to_fixed_point_precision() {
        let p = Position::from_decimal_degrees(47.1234567, 11.7654321).unwrap();
        let back = Position::from_decimal_degrees(p.latitude_decimal_degrees(), p.longitude_decimal_degrees()).unwrap();
        assert_eq!(p, back);
    }

    #[test]
    fn within_radius_is_reflexive_and_symmetric() {
        let p = Position::from_decimal_degrees(51.0, 13.7).unwrap();
        assert!(p.within_radius(&p, 0.0));

        let q = Position::from_decimal_degrees(51.001, 13.701).unwrap();
        assert_eq!(p.within_radius(&q, 500.0), q.within_radius(&p, 500.0));
    }

    #[test]
    fn two_points_one_hundred_km_apart_are_not_within_two_hundred_meters() {
        let p = Position::from_decimal_degrees(51.0, 13.7).unwrap();
        let q = Position::from_decimal_degrees(51.9, 13.7).unwrap();
        assert!(!p.within_radius(&q, 200.0));
    }
}
