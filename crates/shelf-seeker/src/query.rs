//! Query builder and executor.
//!
//! A [`Query`] is an ordered list of conditions combined with AND. It is
//! usually produced by [`Query::parse`], but can be assembled directly with
//! the builder methods.

use crate::condition::Condition;
use crate::error::Result;
use crate::field::Field;
use crate::op::Op;
use crate::ordering::SortMode;
use crate::parser::parse;
use crate::traits::Seekable;
use crate::value::ConditionValue;

/// A conjunction of conditions.
///
/// An empty query matches everything.
///
/// # Example
///
/// ```
/// use shelf_seeker::{Field, Op, Query};
///
/// let built = Query::new()
///     .and(Field::Rating, Op::Gte, 4.0)
///     .and(Field::Title, Op::Eq, "dune");
/// let parsed = Query::parse("rating:>=4 title:dune").unwrap();
/// assert_eq!(built, parsed);
/// assert_eq!(parsed.to_string(), "rating:>=4 title:dune");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    conditions: Vec<Condition>,
}

impl Query {
    /// Creates a new empty query.
    pub fn new() -> Self {
        Query::default()
    }

    /// Parses query text. See [`parse`](crate::parse) for the grammar.
    pub fn parse(input: &str) -> Result<Self> {
        Ok(Query {
            conditions: parse(input)?,
        })
    }

    /// Wraps already-parsed conditions.
    pub fn from_conditions(conditions: Vec<Condition>) -> Self {
        Query { conditions }
    }

    /// Adds a condition.
    pub fn and(mut self, field: Field, op: Op, value: impl Into<ConditionValue>) -> Self {
        self.conditions.push(Condition::new(field, op, value));
        self
    }

    /// Returns the conditions in query order.
    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// Returns `true` if this query has no conditions (matches everything).
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    // ========================================================================
    // Execution
    // ========================================================================

    /// Tests if a single item matches every condition.
    ///
    /// Stops at the first condition that fails.
    pub fn matches<T: Seekable + ?Sized>(&self, item: &T) -> bool {
        self.conditions
            .iter()
            .all(|condition| condition.matches(&item.field_value(condition.field)))
    }

    /// Filters a slice, returning references to matching items in input order.
    pub fn filter<'a, T: Seekable>(&self, items: &'a [T]) -> Vec<&'a T> {
        items.iter().filter(|item| self.matches(*item)).collect()
    }

    /// Filters and clones matching items.
    pub fn filter_cloned<T: Seekable + Clone>(&self, items: &[T]) -> Vec<T> {
        items
            .iter()
            .filter(|item| self.matches(*item))
            .cloned()
            .collect()
    }

    /// Filters a vector in place, keeping only matching items.
    pub fn filter_mut<T: Seekable>(&self, items: &mut Vec<T>) {
        items.retain(|item| self.matches(item));
    }

    /// Filters, then orders the result by `sort`.
    pub fn filter_sorted<'a, T: Seekable>(&self, items: &'a [T], sort: SortMode) -> Vec<&'a T> {
        let mut results = self.filter(items);
        sort.sort(&mut results);
        results
    }

    /// Counts the number of matching items.
    pub fn count<T: Seekable>(&self, items: &[T]) -> usize {
        items.iter().filter(|item| self.matches(*item)).count()
    }
}

impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, condition) in self.conditions.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{condition}")?;
        }
        Ok(())
    }
}

impl std::str::FromStr for Query {
    type Err = crate::error::ParseError;

    fn from_str(s: &str) -> Result<Self> {
        Query::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[derive(Debug, Clone, PartialEq)]
    struct Book {
        title: String,
        author: Option<String>,
        rating: f64,
        count: u64,
    }

    impl Seekable for Book {
        fn field_value(&self, field: Field) -> Value<'_> {
            match field {
                Field::Title => Value::Text(&self.title),
                Field::Author => self.author.as_deref().into(),
                Field::Rating => Value::Number(self.rating),
                Field::RatingCount => Value::Number(self.count as f64),
            }
        }
    }

    fn book(title: &str, author: Option<&str>, rating: f64, count: u64) -> Book {
        Book {
            title: title.to_string(),
            author: author.map(str::to_string),
            rating,
            count,
        }
    }

    fn sample_books() -> Vec<Book> {
        vec![
            book("The Great Gatsby", Some("F. Scott Fitzgerald"), 3.9, 4_800_000),
            book("Dune", Some("Frank Herbert"), 4.3, 1_300_000),
            book("Dune Messiah", Some("Frank Herbert"), 3.9, 300_000),
            book("Untitled Draft", None, 0.0, 0),
        ]
    }

    fn titles(books: &[&Book]) -> Vec<String> {
        books.iter().map(|b| b.title.clone()).collect()
    }

    #[test]
    fn empty_query_matches_all() {
        let books = sample_books();
        let query = Query::parse("").unwrap();
        assert!(query.is_empty());
        assert_eq!(query.filter(&books).len(), 4);
    }

    #[test]
    fn single_condition() {
        let books = sample_books();
        let query = Query::parse("title:dune").unwrap();
        assert_eq!(titles(&query.filter(&books)), vec!["Dune", "Dune Messiah"]);
    }

    #[test]
    fn conditions_are_anded() {
        let books = sample_books();
        let query = Query::parse("title:dune rating:>4").unwrap();
        assert_eq!(titles(&query.filter(&books)), vec!["Dune"]);
    }

    #[test]
    fn missing_author_never_contains_text() {
        let books = sample_books();
        let query = Query::parse("author:herbert").unwrap();
        assert_eq!(query.count(&books), 2);
    }

    #[test]
    fn missing_numbers_are_zero() {
        let books = sample_books();
        let query = Query::parse("rating:=0 count:<=0").unwrap();
        assert_eq!(titles(&query.filter(&books)), vec!["Untitled Draft"]);
    }

    #[test]
    fn filter_sorted_by_rating() {
        let books = sample_books();
        let query = Query::parse("rating:>=3.9").unwrap();
        let results = query.filter_sorted(&books, SortMode::Rating);
        assert_eq!(
            titles(&results),
            vec!["Dune", "The Great Gatsby", "Dune Messiah"]
        );
    }

    #[test]
    fn filter_sorted_unsorted_keeps_input_order() {
        let books = sample_books();
        let query = Query::parse("rating:>=3.9").unwrap();
        let results = query.filter_sorted(&books, SortMode::Unsorted);
        assert_eq!(
            titles(&results),
            vec!["The Great Gatsby", "Dune", "Dune Messiah"]
        );
    }

    #[test]
    fn filter_mut_and_cloned_agree() {
        let books = sample_books();
        let query = Query::new().and(Field::RatingCount, Op::Gt, 1_000_000u64);
        let cloned = query.filter_cloned(&books);
        let mut retained = books.clone();
        query.filter_mut(&mut retained);
        assert_eq!(cloned, retained);
        assert_eq!(cloned.len(), 2);
    }

    #[test]
    fn display_round_trips() {
        let query = Query::parse("R:>=4.5 Title:dune c:<100").unwrap();
        assert_eq!(query.to_string(), "rating:>=4.5 title:dune ratingCount:<100");
        let reparsed: Query = query.to_string().parse().unwrap();
        assert_eq!(reparsed, query);
    }
}
