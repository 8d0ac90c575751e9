//! Condition types for query predicates.
//!
//! A [`Condition`] is one parsed `field:[op]value` token: a field, an
//! operator, and the value to compare against.

use crate::field::{Field, FieldKind};
use crate::op::Op;
use crate::value::{ConditionValue, Value};

/// A single filter predicate.
///
/// # Example
///
/// ```
/// use shelf_seeker::{Condition, Field, Op, Value};
///
/// let condition = Condition::new(Field::Rating, Op::Gte, 4.5);
/// assert!(condition.matches(&Value::Number(4.5)));
/// assert!(!condition.matches(&Value::Number(4.4)));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    /// The field to compare.
    pub field: Field,
    /// The comparison operator. Ignored for text fields.
    pub op: Op,
    /// The value to compare against.
    pub value: ConditionValue,
}

impl Condition {
    /// Creates a new condition.
    pub fn new(field: Field, op: Op, value: impl Into<ConditionValue>) -> Self {
        Condition {
            field,
            op,
            value: value.into(),
        }
    }

    /// Evaluates this condition against a field value.
    pub fn matches(&self, field_value: &Value<'_>) -> bool {
        match self.field.kind() {
            FieldKind::Text => self.match_text(field_value.as_text()),
            FieldKind::Numeric => self.match_number(field_value),
        }
    }

    fn match_text(&self, haystack: &str) -> bool {
        let needle = self.value.as_text().to_lowercase();
        haystack.to_lowercase().contains(&needle)
    }

    fn match_number(&self, field_value: &Value<'_>) -> bool {
        let target = match &self.value {
            ConditionValue::Number(n) => Value::Number(*n),
            ConditionValue::Text(s) => Value::Text(s),
        };
        self.op.eval_ordering(field_value.compare_numeric(&target))
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.field.kind() {
            FieldKind::Text => {
                let text = self.value.to_string();
                // A leading operator character would be read back as the operator.
                if text.starts_with(['<', '>', '=']) {
                    write!(f, "{}:={}", self.field, text)
                } else {
                    write!(f, "{}:{}", self.field, text)
                }
            }
            FieldKind::Numeric => write!(f, "{}:{}{}", self.field, self.op, self.value),
        }
    }
}
