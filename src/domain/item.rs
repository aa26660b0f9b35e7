//! Destination-shaped items for the external search index.
//!
//! The destination schema is a fixed external contract; the fields here must
//! stay aligned with it but nothing validates that at runtime.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Icon shown next to synced results in the destination index
pub const ICON_URL: &str =
    "https://raw.githubusercontent.com/pnp/media/master/pnp-logos-generics/png/teal/300w/pnp-samples-teal-300.png";

/// An item in the destination index's shape, upserted as a whole
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalItem {
    /// Destination id. Must not contain `/` and must resolve back to the
    /// item's public URL so activity trackers can map URLs to ids.
    pub id: String,

    /// Schema-aligned property bag
    pub properties: ItemProperties,

    /// Body text indexed for search
    pub content: ItemContent,

    /// Access-control entries; always the single grant-to-everyone entry
    pub acl: Vec<AclEntry>,
}

/// Properties matching the declared destination schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemProperties {
    pub title: String,
    pub description: String,
    pub authors: Vec<String>,
    pub authors_pictures: Vec<String>,
    pub image_url: String,
    pub url: String,
    pub icon_url: String,
    pub created_date_time: DateTime<Utc>,
    pub last_modified_date_time: DateTime<Utc>,
    pub products: Vec<String>,
    /// Metadata pairs flattened to `key=value` strings
    pub metadata: Vec<String>,
}

/// Display/body content block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemContent {
    pub value: String,

    #[serde(rename = "type")]
    pub content_type: String,
}

impl ItemContent {
    /// Plain-text content
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            content_type: "text".to_string(),
        }
    }
}

/// An access-control grant on a destination item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AclEntry {
    pub access_type: String,

    #[serde(rename = "type")]
    pub principal_type: String,

    pub value: String,
}

impl AclEntry {
    /// The constant read grant every synced item carries
    pub fn everyone() -> Self {
        Self {
            access_type: "grant".to_string(),
            principal_type: "everyone".to_string(),
            value: "everyone".to_string(),
        }
    }
}
