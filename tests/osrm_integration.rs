//! Integration tests against a real OSRM instance.
//!
//! Requires docker: the Andorra extract is downloaded and preprocessed on
//! first run, then osrm-routed is started through testcontainers.

use std::env;

use testcontainers::core::{IntoContainerPort, Mount};
use testcontainers::runners::SyncRunner;
use testcontainers::{Container, GenericImage, ImageExt, ReuseDirective, TestcontainersError};

use route_matcher::dataset::{GeoPoint, PointSet};
use route_matcher::matcher::{match_all, MatchOptions};
use route_matcher::osrm::{OsrmClient, OsrmConfig};
use route_matcher::osrm_data::{GeofabrikRegion, OsrmDataset, OsrmDatasetConfig, TEST_REGION};
use route_matcher::traits::{QuoteError, RouteOracle};

fn osrm_container() -> Result<(Container<GenericImage>, String), TestcontainersError> {
    let data_root = env::var("OSRM_DATA_DIR").unwrap_or_else(|_| "osrm-data".to_string());
    let config = OsrmDatasetConfig::new(GeofabrikRegion::new(TEST_REGION), data_root);
    let dataset = OsrmDataset::ensure(&config)
        .map_err(|err| TestcontainersError::other(format!("OSRM prep failed: {err}")))?;

    let mtime = std::fs::metadata(dataset.osrm_base.with_extension("osrm.partition"))
        .ok()
        .and_then(|meta| meta.modified().ok())
        .and_then(|time| time.duration_since(std::time::SystemTime::UNIX_EPOCH).ok())
        .map(|duration| duration.as_secs())
        .unwrap_or(0);
    let container_name = format!("osrm-andorra-mld-{}", mtime);

    let image = GenericImage::new("osrm/osrm-backend", "latest")
        .with_exposed_port(5000.tcp())
        .with_mount(Mount::bind_mount(
            dataset.data_dir.to_string_lossy().to_string(),
            "/data",
        ))
        .with_cmd(vec![
            "osrm-routed",
            "--algorithm",
            "mld",
            "/data/andorra-latest.osrm",
        ])
        .with_container_name(container_name)
        .with_startup_timeout(std::time::Duration::from_secs(30))
        .with_reuse(ReuseDirective::Always);

    let container = image.start()?;
    let port = container.get_host_port_ipv4(5000.tcp())?;
    let base_url = format!("http://127.0.0.1:{}", port);

    Ok((container, base_url))
}

fn client_for(base_url: &str) -> OsrmClient {
    OsrmClient::new(OsrmConfig {
        base_url: base_url.to_string(),
        profile: "driving".to_string(),
        timeout_secs: 10,
    })
    .expect("build OSRM client")
}

/// Retry until osrm-routed finishes loading the dataset.
fn quote_with_retry(
    client: &OsrmClient,
    origin: &GeoPoint,
    destination: &GeoPoint,
) -> Result<route_matcher::traits::RouteQuote, QuoteError> {
    let start = std::time::Instant::now();
    loop {
        match client.quote(origin, destination) {
            Ok(quote) => return Ok(quote),
            Err(err) => {
                if start.elapsed() > std::time::Duration::from_secs(15) {
                    return Err(err);
                }
                std::thread::sleep(std::time::Duration::from_millis(500));
            }
        }
    }
}

#[test]
fn osrm_quote_returns_distance_and_geometry() {
    let (container, base_url) = osrm_container().expect("start OSRM container");
    let client = client_for(&base_url);

    // Andorra la Vella to Encamp, ~6 km by road.
    let origin = GeoPoint::new("Andorra la Vella", 42.5078, 1.5211);
    let destination = GeoPoint::new("Encamp", 42.5360, 1.5830);

    let quote = quote_with_retry(&client, &origin, &destination).expect("route quote");
    assert!(
        quote.distance_meters > 3_000.0 && quote.distance_meters < 15_000.0,
        "implausible distance {}m",
        quote.distance_meters
    );
    assert!(quote.geometry.len() >= 2);
    // Geometry is (lon, lat): longitudes in Andorra sit near 1.5.
    for &(lon, lat) in &quote.geometry {
        assert!((1.3..1.8).contains(&lon), "lon {lon} out of Andorra");
        assert!((42.4..42.7).contains(&lat), "lat {lat} out of Andorra");
    }

    drop(container);
}

#[test]
fn full_pipeline_against_osrm() {
    let (container, base_url) = osrm_container().expect("start OSRM container");
    let client = client_for(&base_url);

    let origins = PointSet::from(vec![
        GeoPoint::new("Andorra la Vella", 42.5078, 1.5211),
        GeoPoint::new("Canillo", 42.5676, 1.5976),
    ]);
    let destinations = PointSet::from(vec![
        GeoPoint::new("Escaldes-Engordany", 42.5100, 1.5347),
        GeoPoint::new("Encamp", 42.5360, 1.5830),
    ]);

    // Warm up until the router answers.
    quote_with_retry(
        &client,
        &origins.points()[0],
        &destinations.points()[0],
    )
    .expect("OSRM ready");

    let assignments = match_all(&origins, &destinations, &client, &MatchOptions::default());

    assert_eq!(assignments.len(), 2);
    // Escaldes-Engordany borders Andorra la Vella; Encamp is closest to Canillo.
    assert_eq!(
        assignments[0].chosen_origin.as_ref().unwrap().name,
        "Andorra la Vella"
    );
    for a in &assignments {
        assert!(a.distance_km.unwrap() > 0.0);
        assert!(a.cost.unwrap() > 0.0);
        let path = a.path.as_ref().unwrap();
        assert!(path.points().len() >= 2);
        // Path is (lat, lon).
        let (lat, lon) = path.points()[0];
        assert!((42.4..42.7).contains(&lat));
        assert!((1.3..1.8).contains(&lon));
    }

    let table = route_matcher::report::render_table(&assignments);
    assert!(table.contains("Escaldes-Engordany"));

    drop(container);
}
