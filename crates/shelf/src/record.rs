//! Catalog records.
//!
//! A [`Record`] is one book as loaded from a dataset document. Datasets come
//! in two spellings: the long form (`title`, `rating`, `ratingCount`, ...) and
//! the compact form of the first dataset version (`t`, `r`, `c`, ...). Both
//! decode into the same struct.

use serde::{Deserialize, Deserializer, Serialize};
use shelf_seeker::{Field, Seekable, Value};

/// Stable record identifier. Datasets use either numbers or strings.
///
/// Integral numbers, including integral floats such as `1007305.0`, become
/// [`RecordId::Number`]. Any other number keeps its JSON text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl RecordId {
    /// String form used for read-set membership.
    pub fn normalized(&self) -> String {
        self.to_string()
    }

    /// Reads an id from a JSON value. Only numbers and strings qualify.
    pub fn from_json(value: &serde_json::Value) -> Option<RecordId> {
        match value {
            serde_json::Value::Number(n) => Some(RecordId::from_number(n)),
            serde_json::Value::String(s) => Some(RecordId::Text(s.clone())),
            _ => None,
        }
    }

    fn from_number(n: &serde_json::Number) -> RecordId {
        if let Some(i) = n.as_i64() {
            return RecordId::Number(i);
        }
        match n.as_f64() {
            Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
                RecordId::Number(f as i64)
            }
            _ => RecordId::Text(n.to_string()),
        }
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        RecordId::from_json(&value).ok_or_else(|| {
            serde::de::Error::invalid_type(
                serde::de::Unexpected::Other("non-scalar id"),
                &"a number or a string",
            )
        })
    }
}

/// Decodes an optional id. Values that cannot be ids read as absent.
pub(crate) fn lenient_id<'de, D>(deserializer: D) -> Result<Option<RecordId>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(RecordId::from_json))
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordId::Number(n) => write!(f, "{n}"),
            RecordId::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for RecordId {
    fn from(n: i64) -> Self {
        RecordId::Number(n)
    }
}

impl From<i32> for RecordId {
    fn from(n: i32) -> Self {
        RecordId::Number(n.into())
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        RecordId::Text(s.to_string())
    }
}

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(
        default,
        alias = "i",
        deserialize_with = "lenient_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,

    #[serde(default, alias = "t", deserialize_with = "nullable_text")]
    pub title: String,

    #[serde(default, alias = "a", skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    #[serde(default, alias = "r", deserialize_with = "lenient_number")]
    pub rating: f64,

    #[serde(
        default,
        rename = "ratingCount",
        alias = "c",
        deserialize_with = "lenient_count"
    )]
    pub rating_count: u64,

    #[serde(default, alias = "u", skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub img: Option<String>,
}

impl Record {
    /// Creates a record with the fields the query language looks at.
    pub fn new(title: impl Into<String>, rating: f64, rating_count: u64) -> Self {
        Record {
            id: None,
            title: title.into(),
            author: None,
            rating,
            rating_count,
            url: None,
            score: None,
            date: None,
            img: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<RecordId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

impl Seekable for Record {
    fn field_value(&self, field: Field) -> Value<'_> {
        match field {
            Field::Title => Value::Text(&self.title),
            Field::Author => self.author.as_deref().into(),
            Field::Rating => Value::Number(self.rating),
            Field::RatingCount => Value::Number(self.rating_count as f64),
        }
    }
}

fn nullable_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts numbers, numeric strings and null. Anything else reads as zero.
fn lenient_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    let n = match raw {
        Some(serde_json::Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(serde_json::Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    };
    Ok(if n.is_finite() { n } else { 0.0 })
}

fn lenient_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let n = lenient_number(deserializer)?;
    Ok(if n > 0.0 { n as u64 } else { 0 })
}
