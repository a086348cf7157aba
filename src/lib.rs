//! route-matcher core
//!
//! Best-origin routing: for every destination in a dataset, find the origin
//! with the cheapest driving route via a routing oracle, and render the
//! result as a table and a map.

pub mod dataset;
pub mod traits;
pub mod matcher;
pub mod osrm;
pub mod osrm_data;
pub mod haversine;
pub mod polyline;
pub mod report;
