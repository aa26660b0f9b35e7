//! Raw catalog records as returned by the gallery search API.
//!
//! The same shape is written to and read back from the cache snapshot,
//! so records stay camelCase on every wire and on disk.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An author entry on a gallery record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    /// Display name shown in the gallery
    pub display_name: String,

    /// Avatar image URL
    #[serde(default)]
    pub picture_url: String,
}

/// A key/value metadata pair attached to a record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataEntry {
    pub key: String,
    pub value: String,
}

/// A catalog entry retrieved from the gallery.
///
/// Immutable once retrieved; the extractor only filters and reorders
/// collections of these, it never rewrites one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRecord {
    /// Opaque gallery identifier. The source guarantees it contains no `/`,
    /// so it can double as a destination id unchanged.
    pub sample_id: String,

    /// Record title (optional in the source)
    #[serde(default)]
    pub title: Option<String>,

    /// Free-text description, plain text or HTML
    #[serde(default)]
    pub short_description: Option<String>,

    /// Authors with display names and avatar URLs
    #[serde(default)]
    pub authors: Vec<Author>,

    /// Product tags
    #[serde(default)]
    pub products: Vec<String>,

    /// Additional key/value metadata
    #[serde(default)]
    pub metadata: Vec<MetadataEntry>,

    /// When the record was created
    pub created_date_time: DateTime<Utc>,

    /// When the record was last modified; this is the incremental-sync key
    pub last_modified_date_time: DateTime<Utc>,
}

impl RawRecord {
    /// Create a minimal record with creation and modification both at `modified`
    pub fn new(sample_id: impl Into<String>, modified: DateTime<Utc>) -> Self {
        Self {
            sample_id: sample_id.into(),
            title: None,
            short_description: None,
            authors: Vec::new(),
            products: Vec::new(),
            metadata: Vec::new(),
            created_date_time: modified,
            last_modified_date_time: modified,
        }
    }

    /// Set the title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.short_description = Some(description.into());
        self
    }

    /// Add an author
    pub fn with_author(
        mut self,
        display_name: impl Into<String>,
        picture_url: impl Into<String>,
    ) -> Self {
        self.authors.push(Author {
            display_name: display_name.into(),
            picture_url: picture_url.into(),
        });
        self
    }

    /// Add a product tag
    pub fn with_product(mut self, product: impl Into<String>) -> Self {
        self.products.push(product.into());
        self
    }

    /// Add a metadata pair
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.push(MetadataEntry {
            key: key.into(),
            value: value.into(),
        });
        self
    }
}
