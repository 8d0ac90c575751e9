//! Comparison operators for query conditions.
//!
//! The [`Op`] enum is the closed set of operators the query language accepts.
//! Text fields ignore the operator and always use containment; numeric fields
//! evaluate it through [`Op::eval_ordering`].

use std::cmp::Ordering;

/// Comparison operator for a condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Op {
    /// Equal. The default when a token omits the operator.
    #[default]
    Eq,
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Gte,
    /// Less than.
    Lt,
    /// Less than or equal.
    Lte,
}

impl Op {
    /// Operators in the order the tokenizer tries them.
    ///
    /// Two-character operators come first so `>=` is never read as `>`
    /// followed by a value starting with `=`.
    pub const PRIORITY: [Op; 5] = [Op::Gte, Op::Lte, Op::Eq, Op::Gt, Op::Lt];

    /// Looks up an operator by its symbol.
    pub fn from_symbol(symbol: &str) -> Option<Op> {
        Op::PRIORITY.into_iter().find(|op| op.symbol() == symbol)
    }

    /// Evaluates a comparison given an ordering result.
    ///
    /// `None` (a NaN on either side) never matches.
    pub fn eval_ordering(self, ordering: Option<Ordering>) -> bool {
        let Some(ordering) = ordering else {
            return false;
        };
        match self {
            Op::Eq => ordering == Ordering::Equal,
            Op::Gt => ordering == Ordering::Greater,
            Op::Gte => ordering != Ordering::Less,
            Op::Lt => ordering == Ordering::Less,
            Op::Lte => ordering != Ordering::Greater,
        }
    }

    /// Returns the query-language symbol of this operator.
    pub fn symbol(self) -> &'static str {
        match self {
            Op::Eq => "=",
            Op::Gt => ">",
            Op::Gte => ">=",
            Op::Lt => "<",
            Op::Lte => "<=",
        }
    }
}

impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_puts_two_char_ops_first() {
        let symbols: Vec<_> = Op::PRIORITY.iter().map(|op| op.symbol()).collect();
        assert_eq!(symbols, vec![">=", "<=", "=", ">", "<"]);
    }

    #[test]
    fn from_symbol_round_trips() {
        for op in Op::PRIORITY {
            assert_eq!(Op::from_symbol(op.symbol()), Some(op));
        }
        assert_eq!(Op::from_symbol("!="), None);
        assert_eq!(Op::from_symbol(""), None);
    }

    #[test]
    fn op_eval_ordering() {
        // Equal
        assert!(Op::Eq.eval_ordering(Some(Ordering::Equal)));
        assert!(!Op::Eq.eval_ordering(Some(Ordering::Less)));
        assert!(!Op::Eq.eval_ordering(Some(Ordering::Greater)));

        // Greater than
        assert!(!Op::Gt.eval_ordering(Some(Ordering::Equal)));
        assert!(Op::Gt.eval_ordering(Some(Ordering::Greater)));

        // Greater than or equal
        assert!(Op::Gte.eval_ordering(Some(Ordering::Equal)));
        assert!(!Op::Gte.eval_ordering(Some(Ordering::Less)));
        assert!(Op::Gte.eval_ordering(Some(Ordering::Greater)));

        // Less than
        assert!(Op::Lt.eval_ordering(Some(Ordering::Less)));
        assert!(!Op::Lt.eval_ordering(Some(Ordering::Equal)));

        // Less than or equal
        assert!(Op::Lte.eval_ordering(Some(Ordering::Equal)));
        assert!(Op::Lte.eval_ordering(Some(Ordering::Less)));
        assert!(!Op::Lte.eval_ordering(Some(Ordering::Greater)));
    }

    #[test]
    fn unordered_never_matches() {
        for op in Op::PRIORITY {
            assert!(!op.eval_ordering(None));
        }
    }

    #[test]
    fn default_is_eq() {
        assert_eq!(Op::default(), Op::Eq);
        assert_eq!(Op::Lte.to_string(), "<=");
    }
}
