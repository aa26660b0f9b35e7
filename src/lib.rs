//! gallery-sync - incremental gallery to search index connector
//!
//! Synchronizes a remote solution-gallery catalog into an external search
//! index. Each run reads the last-sync watermark, extracts the records
//! modified since then (from a local cache snapshot or the paginated gallery
//! API), projects them into the index's item shape, and upserts them one at
//! a time with fail-fast semantics.
//!
//! # Architecture
//!
//! Data flows one way through injected capabilities:
//! watermark store → extractor → transformer → loader → destination index.
//! The watermark and the cache snapshot are only read by the pipeline;
//! advancing the watermark after a successful run is an external step.
//!
//! # Modules
//!
//! - `adapters`: HTTP clients for the gallery API and the destination index
//! - `sync`: the extract/transform/load pipeline and its orchestrator
//! - `domain`: data structures (RawRecord, ExternalItem)
//! - `state`: watermark and cache snapshot stores
//! - `cli`: command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Incremental sync from the cache snapshot
//! gallery-sync sync
//!
//! # Force a full remote extraction (rewrites the snapshot)
//! gallery-sync sync --remote
//!
//! # Inspect or advance the watermark
//! gallery-sync watermark show
//! gallery-sync watermark set 2024-06-01T00:00:00Z
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod state;
pub mod sync;

// Re-export main types at crate root for convenience
pub use adapters::{CatalogApi, GalleryClient, ItemSink, Pagination, SearchIndexClient};
pub use domain::{AclEntry, Author, ExternalItem, MetadataEntry, RawRecord};
pub use error::SyncError;
pub use state::{CacheStore, FileCacheStore, FileWatermarkStore, WatermarkStore};
pub use sync::{
    Extractor, LoadSummary, Loader, Orchestrator, SyncOutcome, SyncReport, Transformer,
};
