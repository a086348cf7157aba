//! OSRM HTTP adapter for route quotes.

use serde::Deserialize;
use tracing::debug;

use crate::dataset::GeoPoint;
use crate::traits::{QuoteError, RouteOracle, RouteQuote};

#[derive(Debug, Clone)]
pub struct OsrmConfig {
    pub base_url: String,
    pub profile: String,
    pub timeout_secs: u64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://router.project-osrm.org".to_string(),
            profile: "driving".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OsrmClient {
    config: OsrmConfig,
    client: reqwest::blocking::Client,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    fn route_url(&self, origin: &GeoPoint, destination: &GeoPoint) -> String {
        // OSRM takes coordinates as lon,lat.
        format!(
            "{}/route/v1/{}/{:.6},{:.6};{:.6},{:.6}?overview=full&geometries=geojson",
            self.config.base_url,
            self.config.profile,
            origin.lon,
            origin.lat,
            destination.lon,
            destination.lat,
        )
    }
}

impl RouteOracle for OsrmClient {
    fn quote(&self, origin: &GeoPoint, destination: &GeoPoint) -> Result<RouteQuote, QuoteError> {
        let url = self.route_url(origin, destination);
        debug!(%url, "querying OSRM");

        let body = self
            .client
            .get(&url)
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json::<OsrmRouteResponse>())
            .map_err(|err| QuoteError::OracleUnavailable(err.to_string()))?;

        // First route in the response is authoritative.
        let route = body
            .routes
            .into_iter()
            .next()
            .ok_or(QuoteError::NoRouteFound)?;

        Ok(RouteQuote {
            distance_meters: route.distance,
            geometry: route
                .geometry
                .coordinates
                .into_iter()
                .map(|pair| (pair[0], pair[1]))
                .collect(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct OsrmRouteResponse {
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    distance: f64,
    geometry: OsrmGeometry,
}

#[derive(Debug, Deserialize)]
struct OsrmGeometry {
    coordinates: Vec<[f64; 2]>,
}
