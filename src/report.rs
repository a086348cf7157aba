//! Report renderer: summary table and map artifact.
//!
//! Pure presentation over the assignment sequence; no routing logic here.

use geojson::{Feature, FeatureCollection, GeoJson};

use crate::dataset::PointSet;
use crate::matcher::Assignment;

const NOT_AVAILABLE: &str = "N/A";

/// Renders the summary table, one row per destination in input order.
///
/// Columns: `Destination, Best Origin, Distance (km), Cost (€)`. Absent
/// fields render as `N/A`.
pub fn render_table(assignments: &[Assignment]) -> String {
    let header = ["Destination", "Best Origin", "Distance (km)", "Cost (€)"];

    let rows: Vec<[String; 4]> = assignments
        .iter()
        .map(|a| {
            [
                a.destination.name.clone(),
                a.chosen_origin
                    .as_ref()
                    .map(|o| o.name.clone())
                    .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
                a.distance_km
                    .map(|km| format!("{:.2}", km))
                    .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
                a.cost
                    .map(|c| format!("{:.2}", c))
                    .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            ]
        })
        .collect();

    let mut widths: [usize; 4] = header.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, &header.map(String::from), &widths);
    push_row(&mut out, &widths.map(|w| "-".repeat(w)), &widths);
    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    out
}

fn push_row(out: &mut String, cells: &[String; 4], widths: &[usize; 4]) {
    let line = cells
        .iter()
        .zip(widths.iter())
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(line.trim_end());
    out.push('\n');
}

/// Builds the map overlay: one Point feature per origin and destination,
/// one LineString per routed assignment.
///
/// GeoJSON positions are `(lon, lat)` per RFC 7946, converted here from
/// the internal `(lat, lon)` storage.
pub fn map_features(
    origins: &PointSet,
    destinations: &PointSet,
    assignments: &[Assignment],
) -> FeatureCollection {
    let mut features = Vec::new();

    for origin in origins.points() {
        let mut feature = point_feature(origin.lon, origin.lat);
        feature.set_property("name", origin.name.clone());
        feature.set_property("role", "origin");
        features.push(feature);
    }

    for destination in destinations.points() {
        let mut feature = point_feature(destination.lon, destination.lat);
        feature.set_property("name", destination.name.clone());
        feature.set_property("role", "destination");
        features.push(feature);
    }

    for assignment in assignments {
        let Some(path) = &assignment.path else {
            continue;
        };
        let coordinates: Vec<Vec<f64>> = path
            .points()
            .iter()
            .map(|&(lat, lon)| vec![lon, lat])
            .collect();
        let mut feature = Feature {
            bbox: None,
            geometry: Some(geojson::Geometry::new(geojson::Value::LineString(
                coordinates,
            ))),
            id: None,
            properties: None,
            foreign_members: None,
        };
        feature.set_property("role", "route");
        feature.set_property("destination", assignment.destination.name.clone());
        if let Some(origin) = &assignment.chosen_origin {
            feature.set_property("origin", origin.name.clone());
        }
        if let Some(km) = assignment.distance_km {
            feature.set_property("distance_km", km);
        }
        features.push(feature);
    }

    FeatureCollection {
        features,
        bbox: None,
        foreign_members: None,
    }
}

fn point_feature(lon: f64, lat: f64) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(geojson::Geometry::new(geojson::Value::Point(vec![
            lon, lat,
        ]))),
        id: None,
        properties: None,
        foreign_members: None,
    }
}

/// Renders a self-contained Leaflet page with the feature collection
/// embedded: blue markers for origins, red for destinations, green route
/// polylines, view fitted to the data.
pub fn render_map_html(collection: &FeatureCollection) -> Result<String, serde_json::Error> {
    let data = serde_json::to_string(&GeoJson::FeatureCollection(collection.clone()))?;

    Ok(format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>Route map</title>
<link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css">
<script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
<style>html, body, #map {{ height: 100%; margin: 0; }}</style>
</head>
<body>
<div id="map"></div>
<script>
var data = {data};
var map = L.map('map');
L.tileLayer('https://tile.openstreetmap.org/{{z}}/{{x}}/{{y}}.png', {{
  attribution: '&copy; OpenStreetMap contributors'
}}).addTo(map);
var layer = L.geoJSON(data, {{
  style: function (feature) {{
    return {{ color: 'green', weight: 3, opacity: 0.8 }};
  }},
  pointToLayer: function (feature, latlng) {{
    var color = feature.properties.role === 'origin' ? 'blue' : 'red';
    return L.circleMarker(latlng, {{ radius: 7, color: color, fillOpacity: 0.8 }});
  }},
  onEachFeature: function (feature, layer) {{
    if (feature.properties.name) {{
      layer.bindPopup(feature.properties.role + ' ' + feature.properties.name);
    }}
  }}
}}).addTo(map);
if (layer.getBounds().isValid()) {{
  map.fitBounds(layer.getBounds(), {{ padding: [30, 30] }});
}} else {{
  map.setView([0, 0], 2);
}}
</script>
</body>
</html>
"#
    ))
}
