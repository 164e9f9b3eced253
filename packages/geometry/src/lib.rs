#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Geometry primitives shared by every analysis.
//!
//! Distances are great-circle (haversine) miles. Polygons use the `geo`
//! types with `x = longitude` and `y = latitude`, the same order as the
//! `GeoJSON` the data layer hands us.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use geo::{LineString, Polygon};

/// Mean Earth radius in miles.
pub const EARTH_RADIUS_MILES: f64 = 3958.8;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    /// Latitude in decimal degrees.
    pub lat: f64,
    /// Longitude in decimal degrees.
    pub lng: f64,
}

impl LatLng {
    /// Creates a point from latitude and longitude.
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Great-circle distance to `other` in miles.
    #[must_use]
    pub fn distance_to(&self, other: &Self) -> f64 {
        distance_miles(self.lat, self.lng, other.lat, other.lng)
    }
}

/// Errors produced by geometry computations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryError {
    /// The polygon's outer ring has no vertices.
    #[error("Invalid geometry: polygon outer ring is empty")]
    EmptyRing,

    /// A vertex contained NaN or an infinite coordinate.
    #[error("Invalid geometry: vertex {index} is not finite")]
    NonFinite {
        /// Position of the bad vertex in the outer ring.
        index: usize,
    },
}

/// Haversine distance between two points, in miles.
///
/// The haversine term is clamped to `[0, 1]` so floating-point drift near
/// antipodal points can't push `asin` out of its domain.
#[must_use]
pub fn distance_miles(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_MILES * a.clamp(0.0, 1.0).sqrt().asin()
}

/// Vertex mean of the polygon's outer ring.
///
/// This is not the area-weighted centroid. Every stored vertex counts,
/// including the closing vertex of a closed ring. Interior rings are
/// ignored.
///
/// # Errors
///
/// Returns [`GeometryError::EmptyRing`] if the outer ring has no vertices,
/// or [`GeometryError::NonFinite`] if a vertex isn't a finite number.
pub fn centroid(polygon: &Polygon<f64>) -> Result<LatLng, GeometryError> {
    let ring = &polygon.exterior().0;
    if ring.is_empty() {
        return Err(GeometryError::EmptyRing);
    }

    let mut sum_lat = 0.0;
    let mut sum_lng = 0.0;
    for (index, coord) in ring.iter().enumerate() {
        if !coord.x.is_finite() || !coord.y.is_finite() {
            return Err(GeometryError::NonFinite { index });
        }
        sum_lng += coord.x;
        sum_lat += coord.y;
    }

    #[allow(clippy::cast_precision_loss)]
    let n = ring.len() as f64;
    Ok(LatLng::new(sum_lat / n, sum_lng / n))
}

/// Rounds to the nearest integer with ties going toward positive infinity
/// (`-2.5` rounds to `-2`, `2.5` to `3`).
#[must_use]
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Rounds to `decimals` places after the point, ties away from zero.
#[must_use]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{Coord, LineString};

    fn square(min_lng: f64, min_lat: f64, size: f64) -> Polygon<f64> {
        Polygon::new(
            LineString::from(vec![
                (min_lng, min_lat),
                (min_lng + size, min_lat),
                (min_lng + size, min_lat + size),
                (min_lng, min_lat + size),
                (min_lng, min_lat),
            ]),
            vec![],
        )
    }

    #[test]
    fn identical_points_are_zero_apart() {
        assert!(distance_miles(38.6, -90.2, 38.6, -90.2).abs() < f64::EPSILON);
    }

    #[test]
    fn distance_is_symmetric() {
        let pairs = [
            ((38.627, -90.199), (41.878, -87.629)),
            ((0.0, 0.0), (-33.9, 151.2)),
            ((89.9, 10.0), (-89.9, -170.0)),
        ];
        for ((a_lat, a_lng), (b_lat, b_lng)) in pairs {
            let ab = distance_miles(a_lat, a_lng, b_lat, b_lng);
            let ba = distance_miles(b_lat, b_lng, a_lat, a_lng);
            assert!((ab - ba).abs() < 1e-9, "{ab} != {ba}");
        }
    }

    #[test]
    fn one_degree_of_latitude() {
        let d = distance_miles(0.0, 0.0, 1.0, 0.0);
        assert!((d - 69.093).abs() < 0.01, "got {d}");
    }

    #[test]
    fn antipodal_points_are_half_the_circumference() {
        let d = distance_miles(0.0, 0.0, 0.0, 180.0);
        assert!(d.is_finite());
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_MILES).abs() < 1e-6);
    }

    #[test]
    fn triangle_inequality_holds() {
        let points = [
            (38.627, -90.199),
            (38.661, -90.196),
            (38.563, -90.261),
            (41.878, -87.629),
            (-12.0, 45.0),
        ];
        for a in points {
            for b in points {
                for c in points {
                    let ac = distance_miles(a.0, a.1, c.0, c.1);
                    let ab = distance_miles(a.0, a.1, b.0, b.1);
                    let bc = distance_miles(b.0, b.1, c.0, c.1);
                    assert!(ac <= ab + bc + 1e-9, "{a:?} {b:?} {c:?}");
                }
            }
        }
    }

    #[test]
    fn centroid_is_vertex_mean() {
        let c = centroid(&square(-90.25, 38.60, 0.05)).unwrap();
        // The closing vertex repeats the origin, so it is weighted twice.
        assert!((c.lat - (38.60 * 5.0 + 0.1) / 5.0).abs() < 1e-9, "lat {}", c.lat);
        assert!((c.lng - (-90.25 * 5.0 + 0.1) / 5.0).abs() < 1e-9, "lng {}", c.lng);
    }

    #[test]
    fn centroid_of_empty_ring_is_an_error() {
        let polygon = Polygon::new(LineString::new(vec![]), vec![]);
        assert_eq!(centroid(&polygon), Err(GeometryError::EmptyRing));
    }

    #[test]
    fn centroid_rejects_non_finite_vertices() {
        let polygon = Polygon::new(
            LineString::new(vec![
                Coord { x: 0.0, y: 0.0 },
                Coord { x: f64::NAN, y: 1.0 },
                Coord { x: 1.0, y: 1.0 },
            ]),
            vec![],
        );
        assert!(matches!(
            centroid(&polygon),
            Err(GeometryError::NonFinite { index: 1 })
        ));
    }

    #[test]
    fn round_half_up_breaks_ties_upward() {
        assert!((round_half_up(2.5) - 3.0).abs() < f64::EPSILON);
        assert!((round_half_up(-2.5) - -2.0).abs() < f64::EPSILON);
        assert!((round_half_up(-2.6) - -3.0).abs() < f64::EPSILON);
        assert!((round_half_up(7.49) - 7.0).abs() < f64::EPSILON);
    }

    #[test]
    fn round_to_one_decimal() {
        assert!((round_to(3.04, 1) - 3.0).abs() < f64::EPSILON);
        assert!((round_to(2.96, 1) - 3.0).abs() < f64::EPSILON);
        assert!((round_to(1.25, 0) - 1.0).abs() < f64::EPSILON);
    }
}
