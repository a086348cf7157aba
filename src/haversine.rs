//! Haversine routing oracle (fallback when OSRM is unavailable).
//!
//! Quotes great-circle distance instead of a road route. Less accurate
//! than OSRM (ignores roads) but always available and fully deterministic,
//! which also makes it the natural oracle for offline tests.

use crate::dataset::GeoPoint;
use crate::traits::{QuoteError, RouteOracle, RouteQuote};

/// Earth radius in meters.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle oracle. Geometry is just the two endpoints.
#[derive(Debug, Clone, Default)]
pub struct HaversineOracle;

impl HaversineOracle {
    pub fn new() -> Self {
        Self
    }

    /// Haversine distance between two points in meters.
    fn haversine_meters(from: (f64, f64), to: (f64, f64)) -> f64 {
        let (lat1, lon1) = from;
        let (lat2, lon2) = to;

        let lat1_rad = lat1.to_radians();
        let lat2_rad = lat2.to_radians();
        let delta_lat = (lat2 - lat1).to_radians();
        let delta_lon = (lon2 - lon1).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().asin();

        EARTH_RADIUS_M * c
    }
}

impl RouteOracle for HaversineOracle {
    fn quote(&self, origin: &GeoPoint, destination: &GeoPoint) -> Result<RouteQuote, QuoteError> {
        let distance_meters =
            Self::haversine_meters((origin.lat, origin.lon), (destination.lat, destination.lon));

        Ok(RouteQuote {
            distance_meters,
            // (lon, lat), matching the oracle geometry convention.
            geometry: vec![
                (origin.lon, origin.lat),
                (destination.lon, destination.lat),
            ],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_point_is_zero() {
        let dist = HaversineOracle::haversine_meters((36.1, -115.1), (36.1, -115.1));
        assert!(dist < 1.0, "Same point should have ~0 distance");
    }

    #[test]
    fn test_known_distance() {
        // Madrid (40.4168, -3.7038) to Toledo (39.8628, -4.0273), ~68 km
        let dist = HaversineOracle::haversine_meters((40.4168, -3.7038), (39.8628, -4.0273));
        assert!(
            dist > 60_000.0 && dist < 75_000.0,
            "Madrid to Toledo should be ~68km, got {}m",
            dist
        );
    }

    #[test]
    fn test_quote_geometry_is_lon_lat_endpoints() {
        let origin = GeoPoint::new("A", 40.0, -3.0);
        let destination = GeoPoint::new("X", 41.0, -3.5);
        let quote = HaversineOracle::new().quote(&origin, &destination).unwrap();
        assert_eq!(quote.geometry, vec![(-3.0, 40.0), (-3.5, 41.0)]);
        assert!(quote.distance_meters > 0.0);
    }

    #[test]
    fn test_symmetric() {
        let a = GeoPoint::new("A", 36.1, -115.1);
        let b = GeoPoint::new("B", 36.2, -115.2);
        let oracle = HaversineOracle::new();
        let ab = oracle.quote(&a, &b).unwrap().distance_meters;
        let ba = oracle.quote(&b, &a).unwrap().distance_meters;
        assert!((ab - ba).abs() < 1e-6, "Haversine is symmetric");
    }
}
