//! Polyline representation for route geometries.
//!
//! Internally a route path is a decoded sequence of `(lat, lon)` points.
//! Conversion from the oracle's `(lon, lat)` convention happens here, at
//! the boundary, so downstream rendering never has to think about it.

use serde::{Deserialize, Serialize};

/// A route geometry as decoded `(lat, lon)` coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    points: Vec<(f64, f64)>,
}

impl Polyline {
    /// Creates a polyline from `(lat, lon)` points.
    pub fn new(points: Vec<(f64, f64)>) -> Self {
        Self { points }
    }

    /// Creates a polyline from an oracle geometry in `(lon, lat)` order,
    /// swapping each pair into `(lat, lon)`.
    pub fn from_lon_lat(geometry: &[(f64, f64)]) -> Self {
        Self {
            points: geometry.iter().map(|&(lon, lat)| (lat, lon)).collect(),
        }
    }

    /// The `(lat, lon)` points.
    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    pub fn into_points(self) -> Vec<(f64, f64)> {
        self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
