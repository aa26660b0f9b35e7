//! Projection of raw catalog records into destination items.
//!
//! The projection is pure and total: every record yields exactly one item,
//! in input order, and nothing here performs IO.

use crate::domain::{AclEntry, ExternalItem, ItemContent, ItemProperties, RawRecord, ICON_URL};

/// Maps records into the destination item shape
pub struct Transformer {
    /// Public URL prefix under which every gallery item is reachable; the
    /// item id is embedded verbatim so URL-to-item resolvers keep working.
    item_url_base: String,
}

impl Transformer {
    pub fn new(item_url_base: impl Into<String>) -> Self {
        Self {
            item_url_base: item_url_base.into(),
        }
    }

    /// Map records 1:1 into destination items, preserving order
    pub fn transform(&self, records: &[RawRecord]) -> Vec<ExternalItem> {
        records.iter().map(|r| self.transform_one(r)).collect()
    }

    fn transform_one(&self, record: &RawRecord) -> ExternalItem {
        // The gallery id is unique and free of path separators, so it is
        // used as the destination id unchanged.
        let id = record.sample_id.clone();
        let description = record.short_description.clone().unwrap_or_default();

        ExternalItem {
            properties: ItemProperties {
                title: record.title.clone().unwrap_or_default(),
                description: description.clone(),
                authors: record
                    .authors
                    .iter()
                    .map(|a| a.display_name.clone())
                    .collect(),
                authors_pictures: record
                    .authors
                    .iter()
                    .map(|a| a.picture_url.clone())
                    .collect(),
                image_url: String::new(),
                url: format!("{}{}/", self.item_url_base, id),
                icon_url: ICON_URL.to_string(),
                created_date_time: record.created_date_time,
                last_modified_date_time: record.last_modified_date_time,
                products: record.products.clone(),
                metadata: record
                    .metadata
                    .iter()
                    .map(|m| format!("{}={}", m.key, m.value))
                    .collect(),
            },
            content: ItemContent::text(description),
            acl: vec![AclEntry::everyone()],
            id,
        }
    }
}
