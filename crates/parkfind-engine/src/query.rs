//! Query operations over one carpark snapshot.
//!
//! All functions here are pure over a single snapshot map; the store hands
//! them an immutable snapshot so a concurrent refresh can never change the
//! results mid-query.

use std::collections::HashMap;

use parkfind_core::carpark::{Carpark, Position};
use parkfind_core::geo;
use parkfind_core::Page;

use crate::error::QueryError;

/// Returns valid, available carparks, optionally restricted to a radius
/// around `center` and ranked by distance.
///
/// - Only entities with a position and address (`is_valid`) and at least one
///   free lot (`is_available`) are considered.
/// - When both `center` and `radius_km` are given, entities at a distance
///   strictly less than `radius_km` are kept and sorted ascending by that
///   distance. Ties keep snapshot iteration order, which is unspecified but
///   deterministic for the lifetime of one snapshot.
/// - When either is absent, no distance filter or sort is applied.
/// - A positive `limit` truncates the result; `None` or `0` means no limit.
#[must_use]
pub fn query_nearby(
    map: &HashMap<String, Carpark>,
    center: Option<Position>,
    radius_km: Option<f64>,
    limit: Option<usize>,
) -> Vec<Carpark> {
    let candidates = map
        .values()
        .filter(|cp| cp.is_valid() && cp.is_available());

    let mut results: Vec<Carpark> = if let (Some(center), Some(radius)) = (center, radius_km) {
        let mut ranked: Vec<(f64, &Carpark)> = candidates
            .filter_map(|cp| {
                // is_valid guarantees the position is present.
                let position = cp.position?;
                let distance = geo::distance_km(position, center);
                (distance < radius).then_some((distance, cp))
            })
            .collect();
        // Distances are finite (the haversine clamps), so the comparison
        // never sees NaN. Stable sort preserves snapshot order on ties.
        ranked.sort_by(|a, b| a.0.total_cmp(&b.0));
        ranked.into_iter().map(|(_, cp)| cp.clone()).collect()
    } else {
        candidates.cloned().collect()
    };

    if let Some(limit) = limit {
        if limit > 0 {
            results.truncate(limit);
        }
    }
    results
}

/// Runs [`query_nearby`] and slices one page window out of the ranked
/// results, returning the page with its `total` set.
///
/// # Errors
///
/// - [`QueryError::NoResults`] if the query matched nothing.
/// - [`QueryError::InvalidPage`] if `start >= end` or either bound falls
///   outside `[0, total]`.
pub fn query_nearby_paged(
    map: &HashMap<String, Carpark>,
    center: Option<Position>,
    radius_km: Option<f64>,
    limit: Option<usize>,
    mut page: Page,
) -> Result<(Vec<Carpark>, Page), QueryError> {
    let results = query_nearby(map, center, radius_km, limit);
    if results.is_empty() {
        return Err(QueryError::NoResults);
    }

    let total = results.len();
    page.total = Some(total);

    if page.start >= page.end || page.start > total || page.end > total {
        return Err(QueryError::InvalidPage {
            start: page.start,
            end: page.end,
            total,
        });
    }

    Ok((results[page.start..page.end].to_vec(), page))
}

/// Direct snapshot lookup by facility identifier.
///
/// # Errors
///
/// Returns [`QueryError::NotFound`] if the id is not in the snapshot.
pub fn lookup_by_id(map: &HashMap<String, Carpark>, id: &str) -> Result<Carpark, QueryError> {
    map.get(id).cloned().ok_or_else(|| QueryError::NotFound {
        id: id.to_owned(),
    })
}

#[cfg(test)]
#[path = "query_test.rs"]
mod tests;
