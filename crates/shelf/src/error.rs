//! Error types for the shelf crate.

use thiserror::Error;

/// Failure to fetch or decode a dataset document.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The document could not be read.
    #[error("cannot fetch {location}: {source}")]
    Fetch {
        location: String,
        #[source]
        source: std::io::Error,
    },

    /// The document was read but is not a valid dataset.
    #[error("cannot decode {location}: {source}")]
    Decode {
        location: String,
        #[source]
        source: serde_json::Error,
    },

    /// The document does not have any recognized dataset shape.
    #[error("{location} is not a dataset document (expected an array, {{items: [...]}}, or named sources)")]
    Shape { location: String },
}

/// Failure to render a view.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Failure while converting a CSV export into a dataset document.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A source name that is neither `all` nor a known source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown source: {0} (expected all, db or gr)")]
pub struct UnknownSource(pub String);
