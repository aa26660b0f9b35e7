//! HTTP client for the gallery search API.
//!
//! The endpoint is a POST search that always receives an empty filter
//! object: the full catalog is walked page by page and filtering happens
//! client-side, so a run has full visibility into what changed.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{CatalogApi, Pagination};
use crate::domain::RawRecord;
use crate::error::SyncError;

/// Sort key requested from the server. The extractor filters on the same
/// field; termination of the pagination walk relies on the two agreeing.
pub const SORT_FIELD: &str = "lastModifiedDateTime";

/// Gallery search API client
pub struct GalleryClient {
    /// Search endpoint URL
    endpoint: String,
    /// HTTP client
    client: reqwest::Client,
}

/// POST body for the search endpoint
#[derive(Debug, Serialize)]
struct SearchRequest {
    sort: SortSpec,
    filter: SearchFilter,
    pagination: Pagination,
}

#[derive(Debug, Serialize)]
struct SortSpec {
    field: &'static str,
    descending: bool,
}

/// Filter object the endpoint requires; every field stays empty because
/// filtering happens client-side.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchFilter {
    search: String,
    product_id: Vec<String>,
    author_id: String,
    category_id: String,
    featured_only: bool,
    metadata: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<RawRecord>,
}

impl GalleryClient {
    /// Create a new client for the given search endpoint
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: reqwest::Client::new(),
        }
    }

    fn failed(page: &Pagination, e: impl ToString) -> SyncError {
        SyncError::ExtractionFailed {
            page: page.index,
            reason: e.to_string(),
        }
    }
}

#[async_trait]
impl CatalogApi for GalleryClient {
    async fn fetch_page(&self, page: Pagination) -> Result<Vec<RawRecord>, SyncError> {
        let body = SearchRequest {
            sort: SortSpec {
                field: SORT_FIELD,
                descending: true,
            },
            filter: SearchFilter::default(),
            pagination: page,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| Self::failed(&page, e))?
            .error_for_status()
            .map_err(|e| Self::failed(&page, e))?;

        let parsed: SearchResponse = response.json().await.map_err(|e| Self::failed(&page, e))?;

        Ok(parsed.items)
    }
}
