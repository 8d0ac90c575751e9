//! Query text tokenizer and parser.
//!
//! Query text is a whitespace-separated list of `field:[op]value` tokens.
//! Parsing is all-or-nothing: the first bad token aborts with an error that
//! names it, and no conditions are returned.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::condition::Condition;
use crate::error::{ParseError, Result};
use crate::field::{Field, FieldKind};
use crate::op::Op;
use crate::value::ConditionValue;

// Alternation order follows `Op::PRIORITY`.
static TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([^:]+):(>=|<=|=|>|<)?(.+)$").expect("token pattern is valid")
});

/// Splits query text into tokens on runs of whitespace.
pub fn tokenize(input: &str) -> impl Iterator<Item = &str> {
    input.split_whitespace()
}

/// Parses query text into an ordered list of conditions.
///
/// Empty or whitespace-only input yields an empty list, which matches
/// every record.
///
/// # Example
///
/// ```
/// use shelf_seeker::{parse, Field, Op};
///
/// let conditions = parse("rating:>=4.5 title:dune").unwrap();
/// assert_eq!(conditions.len(), 2);
/// assert_eq!(conditions[0].field, Field::Rating);
/// assert_eq!(conditions[0].op, Op::Gte);
///
/// let err = parse("rating>5").unwrap_err();
/// assert_eq!(err.to_string(), "Cannot parse: rating>5");
/// ```
pub fn parse(input: &str) -> Result<Vec<Condition>> {
    tokenize(input).map(parse_token).collect()
}

/// Parses a single `field:[op]value` token.
pub fn parse_token(token: &str) -> Result<Condition> {
    let captures = TOKEN.captures(token).ok_or_else(|| ParseError::Malformed {
        token: token.to_string(),
    })?;

    let name = &captures[1];
    let field = Field::lookup(name).ok_or_else(|| ParseError::UnknownField {
        name: name.to_string(),
    })?;

    let op = captures
        .get(2)
        .and_then(|m| Op::from_symbol(m.as_str()))
        .unwrap_or_default();

    let raw = &captures[3];
    let value = match field.kind() {
        FieldKind::Text => ConditionValue::Text(raw.to_string()),
        FieldKind::Numeric => ConditionValue::Number(parse_number(field, raw)?),
    };

    Ok(Condition { field, op, value })
}

fn parse_number(field: Field, raw: &str) -> Result<f64> {
    match raw.parse::<f64>() {
        Ok(n) if !n.is_nan() => Ok(n),
        _ => Err(ParseError::InvalidNumber {
            field,
            value: raw.to_string(),
        }),
    }
}
