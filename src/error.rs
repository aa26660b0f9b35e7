//! Error taxonomy for sync runs.
//!
//! There are no automatic retries anywhere; every failure surfaces to the
//! operator through the log stream, and only extraction failures abort a run.

use thiserror::Error;

/// Failures surfaced by the sync pipeline
#[derive(Debug, Error)]
pub enum SyncError {
    /// Cache mode was requested but the snapshot is missing or unreadable
    #[error("cache snapshot unavailable: {0}")]
    CacheUnavailable(String),

    /// A page fetch or parse failed mid-pagination; nothing was cached
    #[error("extraction failed on page {page}: {reason}")]
    ExtractionFailed { page: u32, reason: String },

    /// The destination rejected a single item upsert
    #[error("upsert of item '{id}' rejected: {detail}")]
    LoadItemFailed { id: String, detail: String },

    /// Configuration could not be resolved
    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Serde(#[from] serde_json::Error),
}
