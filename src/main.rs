use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use route_matcher::dataset::PointSet;
use route_matcher::haversine::HaversineOracle;
use route_matcher::matcher::{match_all, MatchOptions, DEFAULT_COST_PER_KM};
use route_matcher::osrm::{OsrmClient, OsrmConfig};
use route_matcher::report;

/// Find the best origin for every destination by driving distance.
#[derive(Parser)]
#[command(name = "route-matcher")]
#[command(about = "Shortest driving routes between origins and destinations (OSRM)")]
struct Cli {
    /// CSV of origins (columns: name, lat, lon).
    origins: PathBuf,

    /// CSV of destinations (columns: name, lat, lon).
    destinations: PathBuf,

    /// OSRM server base URL.
    #[arg(long, default_value = "http://router.project-osrm.org")]
    osrm_url: String,

    /// OSRM routing profile.
    #[arg(long, default_value = "driving")]
    profile: String,

    /// Per-request timeout in seconds.
    #[arg(long, default_value_t = 10)]
    timeout_secs: u64,

    /// Cost rate in euros per kilometer.
    #[arg(long, default_value_t = DEFAULT_COST_PER_KM)]
    cost_per_km: f64,

    /// Query origins in parallel for each destination.
    #[arg(long)]
    parallel: bool,

    /// Use great-circle estimates instead of OSRM (offline).
    #[arg(long)]
    haversine: bool,

    /// Write an interactive route map (HTML) to this path.
    #[arg(long)]
    map: Option<PathBuf>,

    /// Write the map features (GeoJSON) to this path.
    #[arg(long)]
    geojson: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "route_matcher=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let origins = PointSet::from_csv_path(&cli.origins)
        .with_context(|| format!("loading origins from {}", cli.origins.display()))?;
    let destinations = PointSet::from_csv_path(&cli.destinations)
        .with_context(|| format!("loading destinations from {}", cli.destinations.display()))?;

    tracing::info!(
        origins = origins.len(),
        destinations = destinations.len(),
        "datasets loaded"
    );

    let options = MatchOptions {
        cost_per_km: cli.cost_per_km,
        parallel: cli.parallel,
    };

    let assignments = if cli.haversine {
        match_all(&origins, &destinations, &HaversineOracle::new(), &options)
    } else {
        let client = OsrmClient::new(OsrmConfig {
            base_url: cli.osrm_url.clone(),
            profile: cli.profile.clone(),
            timeout_secs: cli.timeout_secs,
        })
        .context("building OSRM client")?;
        match_all(&origins, &destinations, &client, &options)
    };

    print!("{}", report::render_table(&assignments));

    if cli.map.is_some() || cli.geojson.is_some() {
        let collection = report::map_features(&origins, &destinations, &assignments);

        if let Some(path) = &cli.geojson {
            let gj = geojson::GeoJson::FeatureCollection(collection.clone());
            fs::write(path, serde_json::to_string_pretty(&gj)?)
                .with_context(|| format!("writing {}", path.display()))?;
            tracing::info!(path = %path.display(), "wrote GeoJSON");
        }

        if let Some(path) = &cli.map {
            let html = report::render_map_html(&collection)?;
            fs::write(path, html).with_context(|| format!("writing {}", path.display()))?;
            tracing::info!(path = %path.display(), "wrote route map");
        }
    }

    Ok(())
}
