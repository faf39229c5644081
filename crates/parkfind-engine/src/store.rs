//! The process-wide carpark snapshot.
//!
//! One [`CarparkStore`] owns the fused map for the whole process. Readers
//! load an immutable snapshot through [`arc_swap::ArcSwap`] — lock-free, and
//! a concurrent refresh can never expose a half-built map. Refresh triggers
//! are serialized through an async mutex so there is exactly one writer at a
//! time; a second trigger arriving mid-refresh simply waits and then runs
//! against the fresher feeds.

use std::collections::HashMap;
use std::sync::Arc;

use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use parkfind_core::carpark::{Carpark, Position};
use parkfind_core::Page;
use parkfind_feeds::{FeedClient, FeedError};

use crate::error::QueryError;
use crate::query;

/// One immutable fused view of all sources. Replaced wholesale on refresh,
/// never mutated in place.
#[derive(Debug)]
pub struct Snapshot {
    pub carparks: HashMap<String, Carpark>,
    /// When this snapshot was fused; `None` only for the initial empty one.
    pub refreshed_at: Option<DateTime<Utc>>,
}

impl Snapshot {
    fn empty() -> Self {
        Self {
            carparks: HashMap::new(),
            refreshed_at: None,
        }
    }
}

/// Owner of the process-wide fused carpark map.
pub struct CarparkStore {
    snapshot: ArcSwap<Snapshot>,
    refresh_gate: Mutex<()>,
}

impl Default for CarparkStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CarparkStore {
    /// Creates a store with an empty snapshot. Queries against it return
    /// no results until the first refresh completes.
    #[must_use]
    pub fn new() -> Self {
        Self {
            snapshot: ArcSwap::from_pointee(Snapshot::empty()),
            refresh_gate: Mutex::new(()),
        }
    }

    /// Fetches all four sources, fuses them, and swaps in the new snapshot
    /// as a single atomic store. Returns the fused entity count.
    ///
    /// On any error the previous snapshot stays in place untouched.
    ///
    /// # Errors
    ///
    /// Propagates [`FeedError`] from fetching or from the fusion pass.
    pub async fn refresh(&self, client: &FeedClient) -> Result<usize, FeedError> {
        let _writer = self.refresh_gate.lock().await;

        let (info_rows, rate_rows, datamall_rows, availability_rows) = tokio::try_join!(
            client.fetch_hdb_information(),
            client.fetch_carpark_rates(),
            client.fetch_datamall_availability(),
            client.fetch_datagov_availability(),
        )?;

        let carparks = parkfind_feeds::fuse(info_rows, rate_rows, datamall_rows, availability_rows)?;
        let count = carparks.len();

        self.snapshot.store(Arc::new(Snapshot {
            carparks,
            refreshed_at: Some(Utc::now()),
        }));
        tracing::info!(count, "carpark snapshot refreshed");
        Ok(count)
    }

    /// The current snapshot. Cheap; never blocks.
    #[must_use]
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.snapshot.load_full()
    }

    /// See [`query::query_nearby`].
    #[must_use]
    pub fn query_nearby(
        &self,
        center: Option<Position>,
        radius_km: Option<f64>,
        limit: Option<usize>,
    ) -> Vec<Carpark> {
        query::query_nearby(&self.snapshot().carparks, center, radius_km, limit)
    }

    /// See [`query::query_nearby_paged`].
    ///
    /// # Errors
    ///
    /// Propagates [`QueryError::NoResults`] and [`QueryError::InvalidPage`].
    pub fn query_nearby_paged(
        &self,
        center: Option<Position>,
        radius_km: Option<f64>,
        limit: Option<usize>,
        page: Page,
    ) -> Result<(Vec<Carpark>, Page), QueryError> {
        query::query_nearby_paged(&self.snapshot().carparks, center, radius_km, limit, page)
    }

    /// See [`query::lookup_by_id`].
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::NotFound`] for an unknown identifier.
    pub fn lookup_by_id(&self, id: &str) -> Result<Carpark, QueryError> {
        query::lookup_by_id(&self.snapshot().carparks, id)
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
