//! End-to-end pipeline without the network: CSV text in, table and map
//! features out, routed by the haversine oracle.

use route_matcher::dataset::PointSet;
use route_matcher::haversine::HaversineOracle;
use route_matcher::matcher::{match_all, MatchOptions};
use route_matcher::report;

const ORIGINS_CSV: &str = "\
name,lat,lon
Madrid,40.4168,-3.7038
Zaragoza,41.6488,-0.8891
";

const DESTINATIONS_CSV: &str = "\
name,lat,lon
Toledo,39.8628,-4.0273
Huesca,42.1401,-0.4089
";

#[test]
fn csv_to_table_end_to_end() {
    let origins = PointSet::from_csv_reader(ORIGINS_CSV.as_bytes()).unwrap();
    let destinations = PointSet::from_csv_reader(DESTINATIONS_CSV.as_bytes()).unwrap();

    let assignments = match_all(
        &origins,
        &destinations,
        &HaversineOracle::new(),
        &MatchOptions::default(),
    );

    assert_eq!(assignments.len(), 2);
    // Toledo sits next to Madrid, Huesca next to Zaragoza.
    assert_eq!(assignments[0].chosen_origin.as_ref().unwrap().name, "Madrid");
    assert_eq!(
        assignments[1].chosen_origin.as_ref().unwrap().name,
        "Zaragoza"
    );

    for a in &assignments {
        let km = a.distance_km.unwrap();
        assert!(km > 10.0 && km < 200.0, "implausible distance {km}");
        let cost = a.cost.unwrap();
        assert!(cost > 0.0);
        assert!(!a.path.as_ref().unwrap().is_empty());
    }

    let table = report::render_table(&assignments);
    let lines: Vec<&str> = table.lines().collect();
    assert_eq!(lines.len(), 4, "header + separator + 2 rows:\n{table}");
    assert!(lines[2].starts_with("Toledo"));
    assert!(lines[3].starts_with("Huesca"));
    assert!(table.contains("Madrid"));
    assert!(table.contains("Zaragoza"));
}

#[test]
fn csv_to_map_features_end_to_end() {
    let origins = PointSet::from_csv_reader(ORIGINS_CSV.as_bytes()).unwrap();
    let destinations = PointSet::from_csv_reader(DESTINATIONS_CSV.as_bytes()).unwrap();

    let assignments = match_all(
        &origins,
        &destinations,
        &HaversineOracle::new(),
        &MatchOptions::default(),
    );
    let collection = report::map_features(&origins, &destinations, &assignments);

    // 2 origin markers + 2 destination markers + 2 routes.
    assert_eq!(collection.features.len(), 6);

    let html = report::render_map_html(&collection).unwrap();
    assert!(html.contains("Toledo"));
    assert!(html.contains("LineString"));
}

#[test]
fn parallel_pipeline_matches_sequential() {
    let origins = PointSet::from_csv_reader(ORIGINS_CSV.as_bytes()).unwrap();
    let destinations = PointSet::from_csv_reader(DESTINATIONS_CSV.as_bytes()).unwrap();
    let oracle = HaversineOracle::new();

    let sequential = match_all(&origins, &destinations, &oracle, &MatchOptions::default());
    let parallel = match_all(
        &origins,
        &destinations,
        &oracle,
        &MatchOptions {
            parallel: true,
            ..MatchOptions::default()
        },
    );

    assert_eq!(sequential, parallel);
}
