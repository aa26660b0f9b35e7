//! Watermark persistence.
//!
//! The watermark is the timestamp boundary separating already-synchronized
//! records from candidates for the current run. The pipeline only reads it;
//! advancing it after a successful run is the operator's (or a wrapping
//! process's) job, via `gallery-sync watermark set`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::fs;
use tracing::warn;

/// Read/write access to the stored watermark
#[async_trait]
pub trait WatermarkStore: Send + Sync {
    /// Read the current watermark. A missing or unparsable value means the
    /// beginning of time, never an error.
    async fn load(&self) -> DateTime<Utc>;

    /// Overwrite the stored watermark
    async fn store(&self, watermark: DateTime<Utc>) -> Result<()>;
}

/// Watermark stored as a single RFC 3339 line in a text file
pub struct FileWatermarkStore {
    path: PathBuf,
}

impl FileWatermarkStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl WatermarkStore for FileWatermarkStore {
    async fn load(&self) -> DateTime<Utc> {
        match fs::read_to_string(&self.path).await {
            Ok(raw) => match raw.trim().parse::<DateTime<Utc>>() {
                Ok(watermark) => watermark,
                Err(_) => {
                    warn!(
                        path = %self.path.display(),
                        "Watermark file unparsable, syncing from the beginning of time"
                    );
                    DateTime::<Utc>::UNIX_EPOCH
                }
            },
            Err(_) => DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    async fn store(&self, watermark: DateTime<Utc>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        fs::write(&self.path, format!("{}\n", watermark.to_rfc3339()))
            .await
            .with_context(|| format!("Failed to write watermark: {}", self.path.display()))
    }
}
