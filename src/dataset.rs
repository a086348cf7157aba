//! Dataset loader: named geographic points from CSV.
//!
//! Both origins and destinations use the same tabular shape: required
//! columns `name`, `lat`, `lon`, header order free, extra columns ignored.

use std::collections::HashSet;
use std::fs::File;
use std::path::Path;

use serde::Deserialize;

/// A named geographic point. Immutable once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoPoint {
    pub name: String,
    /// Latitude in decimal degrees, [-90, 90].
    pub lat: f64,
    /// Longitude in decimal degrees, [-180, 180].
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(name: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            name: name.into(),
            lat,
            lon,
        }
    }
}

/// An ordered set of points; order is input row order.
#[derive(Debug, Clone, Default)]
pub struct PointSet {
    points: Vec<GeoPoint>,
}

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// Missing required column or an undecodable record.
    #[error("malformed input: {0}")]
    MalformedInput(String),
    /// Coordinate failed to parse or is out of the valid range.
    #[error("invalid coordinate in row {row}: {detail}")]
    InvalidCoordinate { row: usize, detail: String },
    #[error("empty point name in row {row}")]
    EmptyName { row: usize },
    #[error("duplicate point name {name:?} in row {row}")]
    DuplicateName { name: String, row: usize },
}

#[derive(Deserialize)]
struct Record {
    name: String,
    lat: f64,
    lon: f64,
}

impl PointSet {
    /// Parses a point set from CSV text.
    ///
    /// Fails on the first bad row; no partial dataset is ever returned.
    pub fn from_csv_reader<R: std::io::Read>(reader: R) -> Result<Self, DatasetError> {
        let mut points = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        for (idx, rec) in csv::Reader::from_reader(reader).deserialize().enumerate() {
            // Header row is row 1, so data rows start at 2.
            let row = idx + 2;
            let rec: Record = rec.map_err(|err| decode_error(row, err))?;

            if rec.name.trim().is_empty() {
                return Err(DatasetError::EmptyName { row });
            }
            if !(-90.0..=90.0).contains(&rec.lat) {
                return Err(DatasetError::InvalidCoordinate {
                    row,
                    detail: format!("latitude {} out of [-90, 90]", rec.lat),
                });
            }
            if !(-180.0..=180.0).contains(&rec.lon) {
                return Err(DatasetError::InvalidCoordinate {
                    row,
                    detail: format!("longitude {} out of [-180, 180]", rec.lon),
                });
            }
            if !seen.insert(rec.name.clone()) {
                return Err(DatasetError::DuplicateName {
                    name: rec.name,
                    row,
                });
            }

            points.push(GeoPoint::new(rec.name, rec.lat, rec.lon));
        }

        Ok(Self { points })
    }

    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|err| DatasetError::MalformedInput(format!("{}: {}", path.display(), err)))?;
        Self::from_csv_reader(file)
    }

    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Mean (lat, lon) of the set, useful for centering a map view.
    pub fn centroid(&self) -> Option<(f64, f64)> {
        if self.points.is_empty() {
            return None;
        }
        let n = self.points.len() as f64;
        let (lat_sum, lon_sum) = self
            .points
            .iter()
            .fold((0.0, 0.0), |(la, lo), p| (la + p.lat, lo + p.lon));
        Some((lat_sum / n, lon_sum / n))
    }
}

impl From<Vec<GeoPoint>> for PointSet {
    fn from(points: Vec<GeoPoint>) -> Self {
        Self { points }
    }
}

/// Distinguish a bad float from a structurally broken record. The csv crate
/// reports both through the same error type, so match on the message.
fn decode_error(row: usize, err: csv::Error) -> DatasetError {
    let text = err.to_string();
    if text.contains("float") {
        DatasetError::InvalidCoordinate { row, detail: text }
    } else {
        DatasetError::MalformedInput(text)
    }
}
