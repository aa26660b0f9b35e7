//! Durable run state: the sync watermark and the extraction cache snapshot.
//!
//! Both are modeled as injected capabilities so the pipeline can be exercised
//! against in-memory substitutes in tests. The file-backed implementations
//! are the production ones; neither is rewritten atomically with the load
//! phase, so a crash between phases is recovered by the next run re-deriving
//! state.

pub mod cache;
pub mod watermark;

pub use cache::{CacheStore, FileCacheStore};
pub use watermark::{FileWatermarkStore, WatermarkStore};
