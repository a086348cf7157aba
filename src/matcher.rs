//! Best-match router: cheapest origin per destination over a routing oracle.
//!
//! For every destination the matcher quotes a route from each origin and
//! keeps the minimum-distance result. A failed quote never aborts the run;
//! the origin simply drops out of the minimum for that destination.

use std::cmp::Ordering;

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::dataset::{GeoPoint, PointSet};
use crate::polyline::Polyline;
use crate::traits::{RouteOracle, RouteQuote};

/// Default cost rate in euros per kilometer.
pub const DEFAULT_COST_PER_KM: f64 = 0.29;

#[derive(Debug, Clone)]
pub struct MatchOptions {
    /// Cost rate applied to the rounded best distance.
    pub cost_per_km: f64,
    /// Fan the per-destination origin queries out on a rayon pool.
    /// The result is identical to sequential mode: minimum distance,
    /// ties broken by origin input order.
    pub parallel: bool,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            cost_per_km: DEFAULT_COST_PER_KM,
            parallel: false,
        }
    }
}

/// The per-destination result. All optional fields are `None` exactly when
/// no oracle query for this destination succeeded.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub destination: GeoPoint,
    pub chosen_origin: Option<GeoPoint>,
    /// Best driving distance, kilometers rounded to two decimals.
    pub distance_km: Option<f64>,
    /// `distance_km * cost_per_km`, rounded to two decimals.
    pub cost: Option<f64>,
    /// Route geometry in `(lat, lon)` order.
    pub path: Option<Polyline>,
}

impl Assignment {
    fn unrouted(destination: GeoPoint) -> Self {
        Self {
            destination,
            chosen_origin: None,
            distance_km: None,
            cost: None,
            path: None,
        }
    }
}

/// Computes one assignment per destination, in destination input order.
///
/// O(|origins| × |destinations|) oracle calls. Idempotent for a
/// deterministic oracle. No retry or throttling; a failed quote is a
/// permanent skip for that origin/destination pair.
pub fn match_all<O>(
    origins: &PointSet,
    destinations: &PointSet,
    oracle: &O,
    options: &MatchOptions,
) -> Vec<Assignment>
where
    O: RouteOracle + Sync,
{
    destinations
        .points()
        .iter()
        .map(|destination| match_one(origins, destination, oracle, options))
        .collect()
}

fn match_one<O>(
    origins: &PointSet,
    destination: &GeoPoint,
    oracle: &O,
    options: &MatchOptions,
) -> Assignment
where
    O: RouteOracle + Sync,
{
    let best = if options.parallel {
        best_origin_parallel(origins, destination, oracle)
    } else {
        best_origin_sequential(origins, destination, oracle)
    };

    let Some((origin_index, quote)) = best else {
        warn!(destination = %destination.name, "no origin could be routed");
        return Assignment::unrouted(destination.clone());
    };

    let distance_km = round2(quote.distance_meters / 1000.0);
    let cost = round2(distance_km * options.cost_per_km);

    Assignment {
        destination: destination.clone(),
        chosen_origin: Some(origins.points()[origin_index].clone()),
        distance_km: Some(distance_km),
        cost: Some(cost),
        path: Some(Polyline::from_lon_lat(&quote.geometry)),
    }
}

/// Sequential scan in origin input order; strict less-than keeps the
/// first-seen origin on exact distance ties.
fn best_origin_sequential<O>(
    origins: &PointSet,
    destination: &GeoPoint,
    oracle: &O,
) -> Option<(usize, RouteQuote)>
where
    O: RouteOracle,
{
    let mut best: Option<(usize, RouteQuote)> = None;

    for (index, origin) in origins.points().iter().enumerate() {
        let quote = match oracle.quote(origin, destination) {
            Ok(quote) => quote,
            Err(err) => {
                debug!(
                    origin = %origin.name,
                    destination = %destination.name,
                    %err,
                    "skipping origin"
                );
                continue;
            }
        };

        let better = match &best {
            Some((_, current)) => quote.distance_meters < current.distance_meters,
            None => true,
        };
        if better {
            best = Some((index, quote));
        }
    }

    best
}

/// Parallel fan-out over origins. Quotes complete out of order, so the
/// minimum is taken over (distance, origin index) to preserve the
/// input-order tie-break.
fn best_origin_parallel<O>(
    origins: &PointSet,
    destination: &GeoPoint,
    oracle: &O,
) -> Option<(usize, RouteQuote)>
where
    O: RouteOracle + Sync,
{
    origins
        .points()
        .par_iter()
        .enumerate()
        .filter_map(|(index, origin)| match oracle.quote(origin, destination) {
            Ok(quote) => Some((index, quote)),
            Err(err) => {
                debug!(
                    origin = %origin.name,
                    destination = %destination.name,
                    %err,
                    "skipping origin"
                );
                None
            }
        })
        .min_by(|a, b| {
            match a.1.distance_meters.partial_cmp(&b.1.distance_meters) {
                Some(Ordering::Equal) | None => a.0.cmp(&b.0),
                Some(ordering) => ordering,
            }
        })
}

/// Round to two decimal places.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
