//! Error types for the seeker crate.

use thiserror::Error;

use crate::field::Field;

/// Errors produced while parsing query text.
///
/// Every variant carries the user's original text so the message can be
/// shown verbatim next to the query input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// Token does not have the `field:[op]value` shape.
    #[error("Cannot parse: {token}")]
    Malformed { token: String },

    /// Field name is not in the alias table.
    #[error("Unknown field: {name}")]
    UnknownField { name: String },

    /// Numeric field was given a value that is not a number.
    #[error("Invalid number for {field}: {value}")]
    InvalidNumber { field: Field, value: String },
}

/// Result type for seeker operations.
pub type Result<T> = std::result::Result<T, ParseError>;
