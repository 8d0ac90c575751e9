//! Seeker - field query language for book catalogs.
//!
//! Seeker turns short query strings such as `rating:>=4.5 title:dune` into
//! typed conditions and evaluates them against any record type that
//! implements [`Seekable`]. It supports:
//!
//! - A fixed set of fields (title, author, rating, rating count) reachable
//!   through case-insensitive aliases
//! - Comparison operators `=`, `>`, `>=`, `<`, `<=` on numeric fields
//! - Case-insensitive substring containment on text fields
//! - Deterministic multi-key ordering via [`SortMode`]
//!
//! # Quick Start
//!
//! ```rust
//! use shelf_seeker::{Field, Query, Seekable, SortMode, Value};
//!
//! struct Book {
//!     title: String,
//!     rating: f64,
//!     count: u64,
//! }
//!
//! impl Seekable for Book {
//!     fn field_value(&self, field: Field) -> Value<'_> {
//!         match field {
//!             Field::Title => Value::Text(&self.title),
//!             Field::Rating => Value::Number(self.rating),
//!             Field::RatingCount => Value::Number(self.count as f64),
//!             Field::Author => Value::None,
//!         }
//!     }
//! }
//!
//! let books = vec![
//!     Book { title: "A".into(), rating: 4.9, count: 120_000 },
//!     Book { title: "B".into(), rating: 3.2, count: 50 },
//! ];
//!
//! let query = Query::parse("rating:>=4").unwrap();
//! let results = query.filter_sorted(&books, SortMode::Rating);
//! assert_eq!(results.len(), 1);
//! assert_eq!(results[0].title, "A");
//! ```
//!
//! # Query Language
//!
//! ```text
//! query := token*                       (separated by whitespace)
//! token := field ":" op? value
//! op    := ">=" | "<=" | "=" | ">" | "<" (default "=")
//! ```
//!
//! | Field | Aliases | Kind |
//! |-------|---------|------|
//! | `title` | `title`, `t`, `标题`, `书名` | text |
//! | `author` | `author`, `a`, `作者` | text |
//! | `rating` | `rating`, `r`, `score`, `评分` | numeric |
//! | `ratingCount` | `count`, `ratingcount`, `c`, `votes`, `人数` | numeric |
//!
//! Numeric values must parse as numbers; `rating:>=abc` is rejected with
//! [`ParseError::InvalidNumber`] rather than silently matching nothing.

mod condition;
mod error;
mod field;
mod op;
mod ordering;
mod parser;
mod query;
mod traits;
mod value;

// Re-export public API
pub use condition::Condition;
pub use error::{ParseError, Result};
pub use field::{Field, FieldKind};
pub use op::Op;
pub use ordering::{compare_by_orderings, Dir, OrderBy, SortMode};
pub use parser::{parse, parse_token, tokenize};
pub use query::Query;
pub use traits::Seekable;
pub use value::{ConditionValue, Value};
