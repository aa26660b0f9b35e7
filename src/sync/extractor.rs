//! Record extraction: cache fallback or paginated remote retrieval.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::adapters::{CatalogApi, Pagination};
use crate::domain::RawRecord;
use crate::error::SyncError;
use crate::state::CacheStore;

/// Retrieves candidate records changed after the watermark, either from the
/// cache snapshot or by walking the remote catalog page by page.
pub struct Extractor<A, C> {
    api: A,
    cache: C,
    page_size: u32,
}

impl<A: CatalogApi, C: CacheStore> Extractor<A, C> {
    pub fn new(api: A, cache: C, page_size: u32) -> Self {
        Self {
            api,
            cache,
            page_size,
        }
    }

    /// Retrieve all records modified strictly after `since`
    pub async fn extract(
        &self,
        use_cache: bool,
        since: DateTime<Utc>,
    ) -> Result<Vec<RawRecord>, SyncError> {
        if use_cache {
            self.extract_cached(since).await
        } else {
            self.extract_remote(since).await
        }
    }

    async fn extract_cached(&self, since: DateTime<Utc>) -> Result<Vec<RawRecord>, SyncError> {
        info!(since = %since.to_rfc3339(), "Loading records from the cache snapshot");

        let snapshot = self.cache.read().await?;

        // Stored order is preserved; only the watermark filter applies.
        Ok(snapshot
            .into_iter()
            .filter(|record| record.last_modified_date_time > since)
            .collect())
    }

    async fn extract_remote(&self, since: DateTime<Utc>) -> Result<Vec<RawRecord>, SyncError> {
        info!(since = %since.to_rfc3339(), "Loading records from the gallery API");

        let mut records = Vec::new();
        let mut page = Pagination {
            size: self.page_size,
            index: 1,
        };

        loop {
            debug!(page = page.index, "Retrieving page");
            let items = self.api.fetch_page(page).await?;

            let mut qualifying: Vec<RawRecord> = items
                .into_iter()
                .filter(|record| record.last_modified_date_time > since)
                .collect();

            debug!(
                page = page.index,
                count = qualifying.len(),
                "Qualifying records retrieved"
            );

            // Pages arrive sorted descending on the same field the filter
            // reads, so the first page with no qualifying records ends the
            // walk. If the server ever sorts on a different key this stops
            // early; termination must not paper over that.
            if qualifying.is_empty() {
                break;
            }

            records.append(&mut qualifying);
            page.index += 1;
        }

        self.cache.write(&records).await?;

        Ok(records)
    }
}
