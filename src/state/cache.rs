//! Cache snapshot persistence.
//!
//! The snapshot holds the full record set from the most recent successful
//! remote extraction. It is not incremental: the extractor re-applies the
//! watermark filter every time it reads the snapshot back.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;

use crate::domain::RawRecord;
use crate::error::SyncError;

/// Read/write access to the last extraction snapshot
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Read the last snapshot. A missing or corrupt snapshot is
    /// `CacheUnavailable`, propagated to the caller.
    async fn read(&self) -> Result<Vec<RawRecord>, SyncError>;

    /// Overwrite the snapshot with a full record set
    async fn write(&self, records: &[RawRecord]) -> Result<(), SyncError>;
}

/// Snapshot stored as a pretty-printed JSON array in a single file
pub struct FileCacheStore {
    path: PathBuf,
}

impl FileCacheStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl CacheStore for FileCacheStore {
    async fn read(&self) -> Result<Vec<RawRecord>, SyncError> {
        let content = fs::read_to_string(&self.path).await.map_err(|e| {
            SyncError::CacheUnavailable(format!("{}: {}", self.path.display(), e))
        })?;

        serde_json::from_str(&content).map_err(|e| {
            SyncError::CacheUnavailable(format!("{}: {}", self.path.display(), e))
        })
    }

    async fn write(&self, records: &[RawRecord]) -> Result<(), SyncError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(records)?;
        fs::write(&self.path, content).await?;

        Ok(())
    }
}
