//! Dataset refresh
//!
//! Downloads a jurisdiction's legislator roster, prunes profile fields per
//! the configured filter, and writes it to the cache stamped with the fetch
//! time. Only a full refresh exists; there is no incremental update.

use chrono::{Duration, Utc};
use thiserror::Error;

use crate::cache::{CacheError, CacheManager};
use crate::data::{DatasetSource, FetchError, FieldFilter, Jurisdiction, Roster, STALENESS_WINDOW_HOURS};

/// Errors that can occur while refreshing a cached roster
#[derive(Debug, Error)]
pub enum RefreshError {
    /// The remote dataset was unreachable or malformed
    #[error("Failed to fetch legislator data for '{jurisdiction}': {source}")]
    Fetch {
        jurisdiction: Jurisdiction,
        #[source]
        source: FetchError,
    },

    /// The cache could not be written
    #[error("Failed to write legislator cache for '{jurisdiction}': {source}")]
    Write {
        jurisdiction: Jurisdiction,
        #[source]
        source: CacheError,
    },
}

/// Keeps the on-disk roster cache current
#[derive(Debug, Clone)]
pub struct DatasetRefresher<S> {
    source: S,
    cache: CacheManager,
    staleness_window: Duration,
}

impl<S: DatasetSource> DatasetRefresher<S> {
    /// Creates a refresher with the default 24 hour staleness window
    pub fn new(source: S, cache: CacheManager) -> Self {
        Self {
            source,
            cache,
            staleness_window: Duration::hours(STALENESS_WINDOW_HOURS),
        }
    }

    /// Overrides the staleness window
    pub fn with_staleness_window(mut self, window: Duration) -> Self {
        self.staleness_window = window;
        self
    }

    pub fn cache(&self) -> &CacheManager {
        &self.cache
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetches, filters and caches the full roster for a jurisdiction
    ///
    /// Overwrites any previous entry. Fails without touching the cache if the
    /// fetch fails.
    pub async fn refresh(
        &self,
        jurisdiction: Jurisdiction,
        filter: &FieldFilter,
    ) -> Result<Roster, RefreshError> {
        let mut legislators = self
            .source
            .fetch_roster(jurisdiction)
            .await
            .map_err(|source| RefreshError::Fetch {
                jurisdiction,
                source,
            })?;

        for legislator in &mut legislators {
            legislator.prune(filter);
        }

        let roster = Roster::new(jurisdiction, legislators).with_field_filter(filter.clone());
        let path = self
            .cache
            .write_roster(&roster)
            .map_err(|source| RefreshError::Write {
                jurisdiction,
                source,
            })?;

        let described = filter.describe().unwrap_or_else(|| "all fields".to_string());
        tracing::info!(
            jurisdiction = %jurisdiction,
            count = roster.legislators.len(),
            path = %path.display(),
            filter = %described,
            "refreshed legislator cache"
        );
        Ok(roster)
    }

    /// Returns the cached roster, refreshing it first if missing or stale
    ///
    /// `filter` prunes a roster fetched because none was cached. A stale
    /// roster is refetched with the filter it was last pruned with, so an
    /// `update --delete-fields` choice survives automatic refreshes.
    pub async fn ensure_fresh(
        &self,
        jurisdiction: Jurisdiction,
        filter: &FieldFilter,
    ) -> Result<Roster, RefreshError> {
        match self.cache.read_roster(jurisdiction) {
            Some(roster) if roster.is_fresh_at(Utc::now(), self.staleness_window) => {
                tracing::debug!(
                    jurisdiction = %jurisdiction,
                    fetched_at = %roster.fetched_at,
                    "using cached legislator data"
                );
                Ok(roster)
            }
            Some(roster) => {
                tracing::info!(
                    jurisdiction = %jurisdiction,
                    fetched_at = %roster.fetched_at,
                    "cached legislator data is stale"
                );
                self.refresh(jurisdiction, &roster.field_filter).await
            }
            None => {
                tracing::info!(jurisdiction = %jurisdiction, "no cached legislator data");
                self.refresh(jurisdiction, filter).await
            }
        }
    }
}
