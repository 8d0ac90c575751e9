//! The loaded catalog and the dataset pool.
//!
//! A [`Catalog`] holds each named source's records exactly as loaded.
//! [`Catalog::select_pool`] hands out [`TaggedRecord`] views that pair a
//! shared record with its source; the stored collections are never touched.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value as Json;
use shelf_seeker::{Field, Seekable, Value};

use crate::error::LoadError;
use crate::record::Record;
use crate::source::{SourceFilter, SourceTag};

/// A record in the pool, tagged with the source it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct TaggedRecord {
    pub source: SourceTag,
    pub record: Arc<Record>,
}

impl TaggedRecord {
    pub fn new(source: SourceTag, record: Arc<Record>) -> Self {
        TaggedRecord { source, record }
    }
}

impl std::ops::Deref for TaggedRecord {
    type Target = Record;

    fn deref(&self) -> &Record {
        &self.record
    }
}

impl Seekable for TaggedRecord {
    fn field_value(&self, field: Field) -> Value<'_> {
        self.record.field_value(field)
    }
}

/// All loaded sources.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    sources: BTreeMap<SourceTag, Vec<Arc<Record>>>,
}

impl Catalog {
    pub fn new() -> Self {
        Catalog::default()
    }

    /// Adds (or replaces) a source's records.
    pub fn with_source(mut self, tag: SourceTag, records: Vec<Record>) -> Self {
        self.insert_source(tag, records);
        self
    }

    pub fn insert_source(&mut self, tag: SourceTag, records: Vec<Record>) {
        self.sources
            .insert(tag, records.into_iter().map(Arc::new).collect());
    }

    /// Decodes a dataset document.
    ///
    /// Accepts a bare array or `{items: [...]}` (both load as Douban), or an
    /// object keyed by source (`{douban: [...], goodreads: [...]}`) where a
    /// missing key is an empty source.
    pub fn from_slice(location: &str, bytes: &[u8]) -> Result<Self, LoadError> {
        let decode_err = |source: serde_json::Error| LoadError::Decode {
            location: location.to_string(),
            source,
        };
        let document: Json = serde_json::from_slice(bytes).map_err(decode_err)?;

        let mut catalog = Catalog::new();
        match document {
            Json::Array(items) => {
                let records = serde_json::from_value(Json::Array(items)).map_err(decode_err)?;
                catalog.insert_source(SourceTag::Douban, records);
            }
            Json::Object(mut map) => {
                if let Some(items) = map.remove("items") {
                    let records = serde_json::from_value(items).map_err(decode_err)?;
                    catalog.insert_source(SourceTag::Douban, records);
                } else {
                    for tag in SourceTag::ALL {
                        let records = match map.remove(tag.key()) {
                            Some(Json::Null) | None => Vec::new(),
                            Some(value) => serde_json::from_value(value).map_err(decode_err)?,
                        };
                        catalog.insert_source(tag, records);
                    }
                }
            }
            _ => {
                return Err(LoadError::Shape {
                    location: location.to_string(),
                })
            }
        }
        Ok(catalog)
    }

    /// Records of one source, in load order.
    pub fn records(&self, tag: SourceTag) -> &[Arc<Record>] {
        self.sources.get(&tag).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total number of records across sources.
    pub fn len(&self) -> usize {
        self.sources.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Builds the candidate pool for `filter`.
    ///
    /// Sources are concatenated in the fixed order of [`SourceTag::ALL`].
    pub fn select_pool(&self, filter: SourceFilter) -> Vec<TaggedRecord> {
        filter
            .sources()
            .flat_map(|tag| {
                self.records(tag)
                    .iter()
                    .map(move |record| TaggedRecord::new(tag, Arc::clone(record)))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titles(pool: &[TaggedRecord]) -> Vec<&str> {
        pool.iter().map(|r| r.title.as_str()).collect()
    }

    #[test]
    fn bare_array_loads_as_douban() {
        let catalog =
            Catalog::from_slice("books.json", br#"[{"title":"A"},{"title":"B"}]"#).unwrap();
        assert_eq!(catalog.records(SourceTag::Douban).len(), 2);
        assert!(catalog.records(SourceTag::Goodreads).is_empty());
    }

    #[test]
    fn items_object_loads_as_douban() {
        let doc = br#"{"generatedAt":"2024-01-01T00:00:00Z","source":"books.csv","items":[{"t":"A","r":9.1,"c":10}]}"#;
        let catalog = Catalog::from_slice("books.json", doc).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.records(SourceTag::Douban)[0].rating, 9.1);
    }

    #[test]
    fn named_sources_default_to_empty() {
        let doc = br#"{"goodreads":[{"title":"G"}]}"#;
        let catalog = Catalog::from_slice("books.json", doc).unwrap();
        assert!(catalog.records(SourceTag::Douban).is_empty());
        assert_eq!(catalog.records(SourceTag::Goodreads).len(), 1);
    }

    #[test]
    fn invalid_json_is_decode_error() {
        let err = Catalog::from_slice("books.json", b"{not json").unwrap_err();
        assert!(matches!(err, LoadError::Decode { .. }));
        assert!(err.to_string().starts_with("cannot decode books.json"));
    }

    #[test]
    fn scalar_document_is_shape_error() {
        let err = Catalog::from_slice("books.json", b"42").unwrap_err();
        assert!(matches!(err, LoadError::Shape { .. }));
    }

    #[test]
    fn bad_record_inside_items_is_reported() {
        let err = Catalog::from_slice("books.json", br#"{"items":[{"title":5}]}"#).unwrap_err();
        assert!(matches!(err, LoadError::Decode { .. }));
    }

    #[test]
    fn pool_concatenates_in_fixed_order() {
        let catalog = Catalog::new()
            .with_source(SourceTag::Goodreads, vec![Record::new("G1", 4.0, 1)])
            .with_source(
                SourceTag::Douban,
                vec![Record::new("D1", 8.0, 1), Record::new("D2", 7.0, 1)],
            );
        let pool = catalog.select_pool(SourceFilter::All);
        assert_eq!(titles(&pool), vec!["D1", "D2", "G1"]);
        assert_eq!(pool[2].source, SourceTag::Goodreads);
    }

    #[test]
    fn pool_restricted_to_one_source() {
        let catalog = Catalog::new()
            .with_source(SourceTag::Douban, vec![Record::new("D1", 8.0, 1)])
            .with_source(SourceTag::Goodreads, vec![Record::new("G1", 4.0, 1)]);
        let pool = catalog.select_pool(SourceFilter::Only(SourceTag::Goodreads));
        assert_eq!(titles(&pool), vec!["G1"]);
        assert!(pool.iter().all(|r| r.source == SourceTag::Goodreads));
    }

    #[test]
    fn pool_shares_records_without_copying() {
        let catalog =
            Catalog::new().with_source(SourceTag::Douban, vec![Record::new("D1", 8.0, 1)]);
        let pool = catalog.select_pool(SourceFilter::All);
        assert!(Arc::ptr_eq(
            &pool[0].record,
            &catalog.records(SourceTag::Douban)[0]
        ));
        drop(pool);
        assert_eq!(catalog.records(SourceTag::Douban)[0].title, "D1");
    }
}
