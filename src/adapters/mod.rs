//! Adapter interfaces for external systems.
//!
//! Adapters isolate the wire formats of the remote gallery and the
//! destination index behind narrow traits, so the pipeline can run against
//! in-memory substitutes in tests.

pub mod gallery;
pub mod search_index;

use async_trait::async_trait;
use serde::Serialize;

// Re-export the HTTP clients
pub use gallery::GalleryClient;
pub use search_index::SearchIndexClient;

use crate::domain::{ExternalItem, RawRecord};
use crate::error::SyncError;

/// Pagination state for one page request: fixed size, 1-based index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub size: u32,
    pub index: u32,
}

/// Read access to the remote gallery search endpoint
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Fetch one page of the full catalog, sorted by modification time
    /// descending. No server-side filtering is requested; the extractor
    /// filters client-side.
    async fn fetch_page(&self, page: Pagination) -> Result<Vec<RawRecord>, SyncError>;
}

/// Write access to the destination index
#[async_trait]
pub trait ItemSink: Send + Sync {
    /// Idempotent full-replace upsert keyed by the item id
    async fn upsert(&self, item: &ExternalItem) -> Result<(), SyncError>;
}
