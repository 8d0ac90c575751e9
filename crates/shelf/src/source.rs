//! Named dataset sources.

use serde::Serialize;

use crate::error::UnknownSource;

/// Which named source a record came from.
///
/// Variant order is the fixed pool order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum SourceTag {
    #[serde(rename = "db")]
    Douban,
    #[serde(rename = "gr")]
    Goodreads,
}

impl SourceTag {
    /// All sources in pool order.
    pub const ALL: [SourceTag; 2] = [SourceTag::Douban, SourceTag::Goodreads];

    /// Short tag shown on cards.
    pub fn tag(self) -> &'static str {
        match self {
            SourceTag::Douban => "db",
            SourceTag::Goodreads => "gr",
        }
    }

    /// Key of this source in a multi-source dataset document.
    pub fn key(self) -> &'static str {
        match self {
            SourceTag::Douban => "douban",
            SourceTag::Goodreads => "goodreads",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SourceTag::Douban => "Douban",
            SourceTag::Goodreads => "Goodreads",
        }
    }

    /// Accepts the short tag or the document key, case-insensitively.
    pub fn from_name(name: &str) -> Option<SourceTag> {
        let name = name.trim().to_lowercase();
        SourceTag::ALL
            .into_iter()
            .find(|tag| tag.tag() == name || tag.key() == name)
    }
}

impl std::fmt::Display for SourceTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// Restricts the candidate pool to one source, or none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceFilter {
    #[default]
    All,
    Only(SourceTag),
}

impl SourceFilter {
    /// Returns `true` if records from `tag` belong in the pool.
    pub fn admits(self, tag: SourceTag) -> bool {
        match self {
            SourceFilter::All => true,
            SourceFilter::Only(only) => only == tag,
        }
    }

    /// Sources admitted by this filter, in pool order.
    pub fn sources(self) -> impl Iterator<Item = SourceTag> {
        SourceTag::ALL.into_iter().filter(move |tag| self.admits(*tag))
    }
}

impl std::str::FromStr for SourceFilter {
    type Err = UnknownSource;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(SourceFilter::All);
        }
        SourceTag::from_name(s)
            .map(SourceFilter::Only)
            .ok_or_else(|| UnknownSource(s.to_string()))
    }
}

impl std::fmt::Display for SourceFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceFilter::All => write!(f, "all"),
            SourceFilter::Only(tag) => write!(f, "{tag}"),
        }
    }
}
