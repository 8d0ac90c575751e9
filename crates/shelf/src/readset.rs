//! Read-state tracking.
//!
//! The read-state document is a JSON array of `{id: ...}` entries exported
//! from the user's reading history. Membership is by the identifier's string
//! form, so `42` and `"42"` name the same record.

use std::collections::HashSet;

use serde::Deserialize;

use crate::error::LoadError;
use crate::record::{lenient_id, Record, RecordId};

#[derive(Debug, Deserialize)]
struct ReadEntry {
    #[serde(default, deserialize_with = "lenient_id")]
    id: Option<RecordId>,
}

/// Identifiers of records the user has read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadSet {
    ids: HashSet<String>,
}

impl ReadSet {
    pub fn new() -> Self {
        ReadSet::default()
    }

    /// Decodes a read-state document. Entries without an id are skipped.
    pub fn from_slice(location: &str, bytes: &[u8]) -> Result<Self, LoadError> {
        let entries: Vec<ReadEntry> =
            serde_json::from_slice(bytes).map_err(|source| LoadError::Decode {
                location: location.to_string(),
                source,
            })?;
        Ok(entries.into_iter().filter_map(|entry| entry.id).collect())
    }

    pub fn insert(&mut self, id: &RecordId) {
        self.ids.insert(id.normalized());
    }

    pub fn contains(&self, id: &RecordId) -> bool {
        self.ids.contains(&id.normalized())
    }

    /// Returns `true` if the record has an id and that id is in the set.
    pub fn has_read(&self, record: &Record) -> bool {
        record.id.as_ref().is_some_and(|id| self.contains(id))
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl FromIterator<RecordId> for ReadSet {
    fn from_iter<I: IntoIterator<Item = RecordId>>(iter: I) -> Self {
        let mut set = ReadSet::new();
        for id in iter {
            set.insert(&id);
        }
        set
    }
}

/// Restricts results by read state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Read,
    Unread,
}

impl StatusFilter {
    /// Resolves a filter name. Unrecognized names leave results unrestricted.
    pub fn from_name(name: &str) -> StatusFilter {
        match name.trim().to_lowercase().as_str() {
            "read" => StatusFilter::Read,
            "unread" => StatusFilter::Unread,
            _ => StatusFilter::All,
        }
    }

    /// Returns `true` if a record with the given read state passes.
    pub fn admits(self, read: bool) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Read => read,
            StatusFilter::Unread => !read,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Read => "read",
            StatusFilter::Unread => "unread",
        }
    }
}

impl std::str::FromStr for StatusFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(StatusFilter::from_name(s))
    }
}

impl std::fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
