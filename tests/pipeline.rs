//! End-to-end pipeline tests
//!
//! Exercises the orchestrator's run states over in-memory stores and
//! adapters: the idle short-circuit, the ordered full pass, extraction
//! failures, and the fail-fast load policy.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use gallery_sync::{
    CacheStore, CatalogApi, Extractor, ExternalItem, ItemSink, Loader, Orchestrator, Pagination,
    RawRecord, SyncError, SyncOutcome, Transformer, WatermarkStore,
};

const URL_BASE: &str = "https://adoption.microsoft.com/sample-solution-gallery/sample/";

fn ts(s: &str) -> DateTime<Utc> {
    s.parse().unwrap()
}

/// Watermark pinned to a fixed instant
struct FixedWatermark(DateTime<Utc>);

#[async_trait]
impl WatermarkStore for FixedWatermark {
    async fn load(&self) -> DateTime<Utc> {
        self.0
    }

    async fn store(&self, _watermark: DateTime<Utc>) -> anyhow::Result<()> {
        unreachable!("the pipeline never writes the watermark")
    }
}

/// Serves pre-baked pages and counts requests
#[derive(Clone, Default)]
struct PagedApi {
    pages: Arc<Mutex<Vec<Vec<RawRecord>>>>,
    fetched: Arc<AtomicU32>,
}

impl PagedApi {
    fn new(pages: Vec<Vec<RawRecord>>) -> Self {
        Self {
            pages: Arc::new(Mutex::new(pages)),
            fetched: Arc::new(AtomicU32::new(0)),
        }
    }

    fn fetched(&self) -> u32 {
        self.fetched.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogApi for PagedApi {
    async fn fetch_page(&self, page: Pagination) -> Result<Vec<RawRecord>, SyncError> {
        self.fetched.fetch_add(1, Ordering::SeqCst);
        let pages = self.pages.lock().unwrap();
        Ok(pages
            .get((page.index - 1) as usize)
            .cloned()
            .unwrap_or_default())
    }
}

/// In-memory cache snapshot; `None` behaves like a missing file
#[derive(Clone, Default)]
struct MemoryCache {
    snapshot: Arc<Mutex<Option<Vec<RawRecord>>>>,
}

impl MemoryCache {
    fn with_records(records: Vec<RawRecord>) -> Self {
        Self {
            snapshot: Arc::new(Mutex::new(Some(records))),
        }
    }

    fn snapshot(&self) -> Option<Vec<RawRecord>> {
        self.snapshot.lock().unwrap().clone()
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn read(&self) -> Result<Vec<RawRecord>, SyncError> {
        self.snapshot
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| SyncError::CacheUnavailable("no snapshot".to_string()))
    }

    async fn write(&self, records: &[RawRecord]) -> Result<(), SyncError> {
        *self.snapshot.lock().unwrap() = Some(records.to_vec());
        Ok(())
    }
}

/// Records upsert order and optionally rejects one id
#[derive(Clone, Default)]
struct RecordingSink {
    upserts: Arc<Mutex<Vec<String>>>,
    reject_id: Option<String>,
}

impl RecordingSink {
    fn rejecting(id: &str) -> Self {
        Self {
            reject_id: Some(id.to_string()),
            ..Default::default()
        }
    }

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
                detail: "rejected by test sink".to_string(),
            });
        }

        Ok(())
    }
}

fn orchestrator(
    api: PagedApi,
    cache: MemoryCache,
    sink: RecordingSink,
    watermark: DateTime<Utc>,
) -> Orchestrator<PagedApi, MemoryCache, RecordingSink, FixedWatermark> {
    Orchestrator::new(
        Extractor::new(api, cache, 50),
        Transformer::new(URL_BASE),
        Loader::new(sink),
        FixedWatermark(watermark),
    )
}

#[tokio::test]
async fn test_epoch_watermark_loads_all_cached_records_in_order() {
    let cache = MemoryCache::with_records(vec![
        RawRecord::new("first", ts("2024-06-03T00:00:00Z")),
        RawRecord::new("second", ts("2024-06-02T00:00:00Z")),
        RawRecord::new("third", ts("2024-06-01T00:00:00Z")),
    ]);
    let sink = RecordingSink::default();
    let orchestrator = orchestrator(
        PagedApi::default(),
        cache,
        sink.clone(),
        DateTime::<Utc>::UNIX_EPOCH,
    );

    let report = orchestrator.run(true).await.unwrap();

    assert_eq!(report.outcome, SyncOutcome::Completed);
    assert_eq!(report.extracted, 3);
    assert_eq!(report.loaded, 3);
    // Ids pass through the transform unchanged and load in extraction order
    assert_eq!(sink.upserts(), ["first", "second", "third"]);
}

#[tokio::test]
async fn test_empty_extraction_short_circuits_before_load() {
    let watermark = ts("2024-06-01T00:00:00Z");
    let cache = MemoryCache::with_records(vec![
        RawRecord::new("stale", ts("2024-05-01T00:00:00Z")),
        RawRecord::new("also-stale", ts("2024-04-01T00:00:00Z")),
    ]);
    let sink = RecordingSink::default();
    let orchestrator = orchestrator(PagedApi::default(), cache, sink.clone(), watermark);

    let report = orchestrator.run(true).await.unwrap();

    assert_eq!(report.outcome, SyncOutcome::Idle);
    assert_eq!(report.extracted, 0);
    assert!(sink.upserts().is_empty());
}

#[tokio::test]
async fn test_missing_cache_aborts_before_transform_and_load() {
    let sink = RecordingSink::default();
    let orchestrator = orchestrator(
        PagedApi::default(),
        MemoryCache::default(),
        sink.clone(),
        DateTime::<Utc>::UNIX_EPOCH,
    );

    let err = orchestrator.run(true).await.unwrap_err();

    assert!(matches!(err, SyncError::CacheUnavailable(_)));
    assert!(sink.upserts().is_empty());
}

#[tokio::test]
async fn test_rejected_item_ends_batch_but_run_still_completes() {
    let cache = MemoryCache::with_records(vec![
        RawRecord::new("a", ts("2024-06-04T00:00:00Z")),
        RawRecord::new("b", ts("2024-06-03T00:00:00Z")),
        RawRecord::new("c", ts("2024-06-02T00:00:00Z")),
        RawRecord::new("d", ts("2024-06-01T00:00:00Z")),
    ]);
    let sink = RecordingSink::rejecting("b");
    let orchestrator = orchestrator(
        PagedApi::default(),
        cache,
        sink.clone(),
        DateTime::<Utc>::UNIX_EPOCH,
    );

    // The run resolves Ok: a rejected upsert is logged, not raised
    let report = orchestrator.run(true).await.unwrap();

    assert_eq!(report.outcome, SyncOutcome::PartiallyLoaded);
    assert_eq!(report.extracted, 4);
    assert_eq!(report.attempted, 2);
    assert_eq!(report.loaded, 1);
    // Items after the rejected one were never attempted
    assert_eq!(sink.upserts(), ["a", "b"]);
}

#[tokio::test]
async fn test_remote_run_paginates_filters_and_rewrites_snapshot() {
    let watermark = ts("2024-06-01T00:00:00Z");
    // Page 1: two qualifying and one already-synced record, sorted
    // descending by modification time; page 2 yields nothing qualifying.
    let api = PagedApi::new(vec![
        vec![
            RawRecord::new("new-1", ts("2024-06-20T00:00:00Z")),
            RawRecord::new("new-2", ts("2024-06-10T00:00:00Z")),
            RawRecord::new("seen", ts("2024-05-20T00:00:00Z")),
        ],
        vec![RawRecord::new("ancient", ts("2024-03-01T00:00:00Z"))],
    ]);
    let cache = MemoryCache::default();
    let sink = RecordingSink::default();
    let orchestrator = orchestrator(api.clone(), cache.clone(), sink.clone(), watermark);

    let report = orchestrator.run(false).await.unwrap();

    assert_eq!(report.outcome, SyncOutcome::Completed);
    assert_eq!(report.extracted, 2);
    assert_eq!(sink.upserts(), ["new-1", "new-2"]);
    // The first zero-qualifying page stopped the walk
    assert_eq!(api.fetched(), 2);

    // The snapshot now holds exactly the accumulated qualifying records
    let snapshot = cache.snapshot().unwrap();
    let ids: Vec<&str> = snapshot.iter().map(|r| r.sample_id.as_str()).collect();
    assert_eq!(ids, ["new-1", "new-2"]);
}

#[tokio::test]
async fn test_transformed_items_carry_projected_fields() {
    let record = RawRecord::new("spfx-clock", ts("2024-06-02T00:00:00Z"))
        .with_title("Clock web part")
        .with_description("Shows a clock")
        .with_author("Ada", "https://example.com/ada.png")
        .with_product("SharePoint")
        .with_metadata("CLIENT-SIDE-DEV", "TypeScript");

    let items = Transformer::new(URL_BASE).transform(&[record]);
    let item = &items[0];

    assert_eq!(item.id, "spfx-clock");
    assert_eq!(item.properties.title, "Clock web part");
    assert_eq!(item.properties.authors, ["Ada"]);
    assert_eq!(item.properties.metadata, ["CLIENT-SIDE-DEV=TypeScript"]);
    assert_eq!(
        item.properties.url,
        format!("{URL_BASE}spfx-clock/")
    );
    assert_eq!(item.content.value, "Shows a clock");
}
