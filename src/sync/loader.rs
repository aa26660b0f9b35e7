//! Sequential fail-fast loading into the destination index.

use tracing::{error, info};

use crate::adapters::ItemSink;
use crate::domain::ExternalItem;

/// Counts from one load pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadSummary {
    /// Items for which an upsert was attempted
    pub attempted: usize,

    /// Items the destination accepted
    pub loaded: usize,
}

impl LoadSummary {
    /// Whether every item in the batch was accepted
    pub fn complete(&self, total: usize) -> bool {
        self.loaded == total
    }
}

/// Writes transformed items to the destination, one at a time
pub struct Loader<S> {
    sink: S,
}

impl<S: ItemSink> Loader<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    /// Upsert items sequentially, in order, one attempt per item.
    ///
    /// The first rejected item ends the batch; later items are not attempted
    /// and will be re-extracted on the next run, since neither the watermark
    /// nor the cache advances here. The rejection is logged with whatever
    /// diagnostic detail the destination returned, not raised to the caller.
    pub async fn load(&self, items: &[ExternalItem]) -> LoadSummary {
        let mut summary = LoadSummary {
            attempted: 0,
            loaded: 0,
        };

        for item in items {
            summary.attempted += 1;
            info!(id = %item.id, "Loading item");

            match self.sink.upsert(item).await {
                Ok(()) => summary.loaded += 1,
                Err(e) => {
                    error!(id = %item.id, error = %e, "Upsert rejected, aborting remainder of batch");
                    break;
                }
            }
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use chrono::Utc;

    use super::*;
    use crate::domain::RawRecord;
    use crate::error::SyncError;
    use crate::sync::Transformer;

    /// Records upserted ids and optionally rejects one of them
    #[derive(Clone, Default)]
    struct RecordingSink {
        upserts: Arc<Mutex<Vec<String>>>,
        reject_id: Option<String>,
    }

    impl RecordingSink {
        fn upserts(&self) -> Vec<String> {
            self.upserts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ItemSink for RecordingSink {
        async fn upsert(&self, item: &ExternalItem) -> Result<(), SyncError> {
            self.upserts.lock().unwrap().push(item.id.clone());

            if self.reject_id.as_deref() == Some(item.id.as_str()) {
                return Err(SyncError::LoadItemFailed {
                    id: item.id.clone(),
                    detail: "schema mismatch".to_string(),
                });
            }

            Ok(())
        }
    }

    fn items(ids: &[&str]) -> Vec<ExternalItem> {
        let records: Vec<RawRecord> = ids
            .iter()
            .map(|id| RawRecord::new(*id, Utc::now()))
            .collect();
        Transformer::new("https://example.com/sample/").transform(&records)
    }

    #[tokio::test]
    async fn test_all_items_loaded_in_order() {
        let sink = RecordingSink::default();
        let loader = Loader::new(sink.clone());

        let summary = loader.load(&items(&["a", "b", "c"])).await;

        assert_eq!(summary, LoadSummary { attempted: 3, loaded: 3 });
        assert!(summary.complete(3));
        assert_eq!(sink.upserts(), ["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_failure_aborts_remainder_of_batch() {
        let sink = RecordingSink {
            reject_id: Some("b".to_string()),
            ..Default::default()
        };
        let loader = Loader::new(sink.clone());

        let summary = loader.load(&items(&["a", "b", "c", "d"])).await;

        // Items after the rejected one are never attempted
        assert_eq!(summary, LoadSummary { attempted: 2, loaded: 1 });
        assert!(!summary.complete(4));
        assert_eq!(sink.upserts(), ["a", "b"]);
    }

    #[tokio::test]
    async fn test_empty_batch_is_a_noop() {
        let sink = RecordingSink::default();
        let loader = Loader::new(sink.clone());

        let summary = loader.load(&[]).await;

        assert_eq!(summary, LoadSummary { attempted: 0, loaded: 0 });
        assert!(sink.upserts().is_empty());
    }

    #[tokio::test]
    async fn test_failure_on_first_item_attempts_nothing_else() {
        let sink = RecordingSink {
            reject_id: Some("a".to_string()),
            ..Default::default()
        };
        let loader = Loader::new(sink.clone());

        let summary = loader.load(&items(&["a", "b"])).await;

        assert_eq!(summary, LoadSummary { attempted: 1, loaded: 0 });
        assert_eq!(sink.upserts(), ["a"]);
    }
}
