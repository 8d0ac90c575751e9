//! The [`Seekable`] trait connects record types to the query engine.

use crate::field::Field;
use crate::value::Value;

/// Trait for types that can be filtered and ordered by a [`Query`](crate::Query).
///
/// # Example
///
/// ```
/// use shelf_seeker::{Field, Query, Seekable, Value};
///
/// struct Book {
///     title: String,
///     rating: f64,
/// }
///
/// impl Seekable for Book {
///     fn field_value(&self, field: Field) -> Value<'_> {
///         match field {
///             Field::Title => Value::Text(&self.title),
///             Field::Rating => Value::Number(self.rating),
///             _ => Value::None,
///         }
///     }
/// }
///
/// let books = vec![
///     Book { title: "Dune".into(), rating: 4.3 },
///     Book { title: "Emma".into(), rating: 3.9 },
/// ];
/// let query = Query::parse("rating:>4").unwrap();
/// assert_eq!(query.filter(&books).len(), 1);
/// ```
pub trait Seekable {
    /// Returns the value of a field for comparison.
    ///
    /// Return [`Value::None`] for fields the record does not carry; text
    /// comparisons then see an empty string and numeric ones see zero.
    fn field_value(&self, field: Field) -> Value<'_>;
}

impl<T: Seekable + ?Sized> Seekable for &T {
    fn field_value(&self, field: Field) -> Value<'_> {
        (**self).field_value(field)
    }
}

impl<T: Seekable + ?Sized> Seekable for std::sync::Arc<T> {
    fn field_value(&self, field: Field) -> Value<'_> {
        (**self).field_value(field)
    }
}
