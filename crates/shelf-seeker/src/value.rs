//! Runtime value types for field comparison.
//!
//! [`Value`] is what a record hands back for one of its fields.
//! [`ConditionValue`] is the owned operand stored inside a parsed condition.

use std::cmp::Ordering;

/// Runtime value for comparison, borrowed from the source record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value<'a> {
    /// Text value (borrowed).
    Text(&'a str),
    /// Numeric value.
    Number(f64),
    /// Field missing or null.
    None,
}

impl<'a> Value<'a> {
    /// Returns `true` if this is a `None` value.
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    /// Text view of the value. Missing fields read as the empty string.
    pub fn as_text(&self) -> &'a str {
        match self {
            Value::Text(s) => s,
            _ => "",
        }
    }

    /// Numeric view of the value. Missing fields read as zero.
    ///
    /// Text is parsed leniently; text that is not a number yields NaN.
    pub fn to_number(&self) -> f64 {
        match self {
            Value::Number(n) => *n,
            Value::Text(s) => {
                let s = s.trim();
                if s.is_empty() {
                    0.0
                } else {
                    s.parse().unwrap_or(f64::NAN)
                }
            }
            Value::None => 0.0,
        }
    }

    /// Compares two values numerically.
    ///
    /// Returns `None` when either side is NaN.
    pub fn compare_numeric(&self, other: &Value<'_>) -> Option<Ordering> {
        self.to_number().partial_cmp(&other.to_number())
    }
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(s: &'a str) -> Self {
        Value::Text(s)
    }
}

impl From<f64> for Value<'_> {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl<'a> From<Option<&'a str>> for Value<'a> {
    fn from(s: Option<&'a str>) -> Self {
        s.map_or(Value::None, Value::Text)
    }
}

/// Owned operand of a condition.
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionValue {
    /// Text operand, matched by containment.
    Text(String),
    /// Numeric operand.
    Number(f64),
}

impl ConditionValue {
    /// Returns the operand as text.
    pub fn as_text(&self) -> String {
        match self {
            ConditionValue::Text(s) => s.clone(),
            ConditionValue::Number(n) => n.to_string(),
        }
    }

    /// Returns the numeric operand, if this is one.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            ConditionValue::Number(n) => Some(*n),
            ConditionValue::Text(_) => None,
        }
    }
}

impl std::fmt::Display for ConditionValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConditionValue::Text(s) => write!(f, "{s}"),
            ConditionValue::Number(n) => write!(f, "{n}"),
        }
    }
}

impl From<String> for ConditionValue {
    fn from(s: String) -> Self {
        ConditionValue::Text(s)
    }
}

impl From<&str> for ConditionValue {
    fn from(s: &str) -> Self {
        ConditionValue::Text(s.to_string())
    }
}

impl From<f64> for ConditionValue {
    fn from(n: f64) -> Self {
        ConditionValue::Number(n)
    }
}

impl From<i64> for ConditionValue {
    fn from(n: i64) -> Self {
        ConditionValue::Number(n as f64)
    }
}

impl From<u64> for ConditionValue {
    fn from(n: u64) -> Self {
        ConditionValue::Number(n as f64)
    }
}
