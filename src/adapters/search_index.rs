//! HTTP client for the destination search index.
//!
//! Items are written with a full-replace PUT keyed by item id, so reloading
//! the same item is harmless. Authentication is consumed, not acquired: the
//! caller hands over a bearer token obtained elsewhere.

use async_trait::async_trait;
use serde::Deserialize;

use super::ItemSink;
use crate::domain::ExternalItem;
use crate::error::SyncError;

/// Destination index client addressing one external connection
pub struct SearchIndexClient {
    /// API base URL, without a trailing slash
    base_url: String,
    /// Connection identifier the items belong to
    connection_id: String,
    /// Bearer token for the destination API
    access_token: String,
    /// HTTP client
    client: reqwest::Client,
}

/// Error payload shape the destination returns on a rejected write
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    message: Option<String>,
    inner_error: Option<InnerError>,
}

#[derive(Debug, Deserialize)]
struct InnerError {
    message: Option<String>,
}

impl SearchIndexClient {
    /// Create a new client for one connection
    pub fn new(
        base_url: impl Into<String>,
        connection_id: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            connection_id: connection_id.into(),
            access_token: access_token.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Build the upsert URL for an item
    fn item_url(&self, id: &str) -> String {
        format!(
            "{}/external/connections/{}/items/{}",
            self.base_url, self.connection_id, id
        )
    }

    /// Pull the most specific diagnostic out of a rejection payload
    fn error_detail(status: reqwest::StatusCode, body: &str) -> String {
        let parsed: Option<ErrorBody> = serde_json::from_str::<ErrorResponse>(body)
            .ok()
            .and_then(|r| r.error);

        parsed
            .and_then(|e| e.inner_error.and_then(|i| i.message).or(e.message))
            .map(|message| format!("{status}: {message}"))
            .unwrap_or_else(|| status.to_string())
    }

    fn rejected(id: &str, detail: impl ToString) -> SyncError {
        SyncError::LoadItemFailed {
            id: id.to_string(),
            detail: detail.to_string(),
        }
    }
}

#[async_trait]
impl ItemSink for SearchIndexClient {
    async fn upsert(&self, item: &ExternalItem) -> Result<(), SyncError> {
        let url = self.item_url(&item.id);

        let response = self
            .client
            .put(&url)
            .bearer_auth(&self.access_token)
            .json(item)
            .send()
            .await
            .map_err(|e| Self::rejected(&item.id, e))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(Self::rejected(&item.id, Self::error_detail(status, &body)))
    }
}
