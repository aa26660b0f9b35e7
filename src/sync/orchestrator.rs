//! Run coordination: watermark read, extract, transform, load.
//!
//! A run is a straight line with one short-circuit: if extraction yields
//! nothing, the transform and load phases never start. A partial load still
//! ends in a completed run; only extraction failures abort.

use chrono::{DateTime, Utc};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::adapters::{CatalogApi, ItemSink};
use crate::error::SyncError;
use crate::state::{CacheStore, WatermarkStore};

use super::extractor::Extractor;
use super::loader::Loader;
use super::transformer::Transformer;

/// Outcome of one sync run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Nothing changed since the watermark; no load phase ran
    Idle,
    /// Every extracted item was accepted by the destination
    Completed,
    /// An item was rejected mid-batch; the rest syncs on the next run
    PartiallyLoaded,
}

/// Report returned to the caller after a run
#[derive(Debug, Clone)]
pub struct SyncReport {
    pub run_id: Uuid,
    pub outcome: SyncOutcome,
    /// Watermark the run filtered against
    pub watermark: DateTime<Utc>,
    /// Records that qualified for this run
    pub extracted: usize,
    /// Items for which an upsert was attempted
    pub attempted: usize,
    /// Items the destination accepted
    pub loaded: usize,
}

/// Drives one extract → transform → load pass
pub struct Orchestrator<A, C, S, W> {
    extractor: Extractor<A, C>,
    transformer: Transformer,
    loader: Loader<S>,
    watermark: W,
}

impl<A, C, S, W> Orchestrator<A, C, S, W>
where
    A: CatalogApi,
    C: CacheStore,
    S: ItemSink,
    W: WatermarkStore,
{
    pub fn new(
        extractor: Extractor<A, C>,
        transformer: Transformer,
        loader: Loader<S>,
        watermark: W,
    ) -> Self {
        Self {
            extractor,
            transformer,
            loader,
            watermark,
        }
    }

    /// Execute one sync run.
    ///
    /// `use_cache` selects cache-preferred extraction; pass `false` to force
    /// a remote walk (which also rewrites the snapshot). Extraction failures
    /// propagate; everything else resolves into the report.
    #[instrument(skip(self))]
    pub async fn run(&self, use_cache: bool) -> Result<SyncReport, SyncError> {
        let run_id = Uuid::new_v4();
        info!(%run_id, use_cache, "Starting sync run");

        let since = self.watermark.load().await;

        let records = self.extractor.extract(use_cache, since).await?;
        if records.is_empty() {
            info!(%run_id, "No new records since the watermark");
            return Ok(SyncReport {
                run_id,
                outcome: SyncOutcome::Idle,
                watermark: since,
                extracted: 0,
                attempted: 0,
                loaded: 0,
            });
        }

        let items = self.transformer.transform(&records);
        let summary = self.loader.load(&items).await;

        let outcome = if summary.complete(items.len()) {
            info!(%run_id, loaded = summary.loaded, "Sync run completed");
            SyncOutcome::Completed
        } else {
            warn!(
                %run_id,
                loaded = summary.loaded,
                total = items.len(),
                "Sync run completed with a partial load; remaining items sync on the next run"
            );
            SyncOutcome::PartiallyLoaded
        };

        Ok(SyncReport {
            run_id,
            outcome,
            watermark: since,
            extracted: records.len(),
            attempted: summary.attempted,
            loaded: summary.loaded,
        })
    }
}
