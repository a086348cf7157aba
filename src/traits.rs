//! Core capability traits for the route matcher.
//!
//! The routing oracle is intentionally minimal so that the matcher can be
//! driven by the real OSRM adapter, the offline haversine estimator, or a
//! deterministic mock in tests.

use crate::dataset::GeoPoint;

/// The result of asking the oracle for one (origin, destination) pair.
///
/// `geometry` follows the oracle's native `(lon, lat)` point order; callers
/// that need `(lat, lon)` convert at the boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteQuote {
    /// Driving distance in meters.
    pub distance_meters: f64,
    /// Route geometry as `(lon, lat)` pairs, ordered origin to destination.
    pub geometry: Vec<(f64, f64)>,
}

/// Why a single quote failed.
///
/// The matcher skips the failing origin and keeps searching. Neither
/// variant ever aborts a run.
#[derive(Debug, Clone, thiserror::Error)]
pub enum QuoteError {
    /// Network error, timeout, or non-success response from the oracle.
    #[error("routing oracle unavailable: {0}")]
    OracleUnavailable(String),
    /// Oracle reachable but returned an empty route list for this pair.
    #[error("no route found between the given points")]
    NoRouteFound,
}

/// A routing oracle quotes a driving route between two points.
///
/// Implementations must be pure with respect to their inputs: the same
/// (origin, destination) pair yields the same quote, which is what makes
/// the matcher idempotent and safely parallelizable.
pub trait RouteOracle {
    fn quote(&self, origin: &GeoPoint, destination: &GeoPoint) -> Result<RouteQuote, QuoteError>;
}
