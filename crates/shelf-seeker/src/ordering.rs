//! Result ordering.
//!
//! [`SortMode`] is the user-facing choice; it expands to a list of
//! [`OrderBy`] keys where later keys only break ties left by earlier ones.

use std::cmp::Ordering;

use crate::field::Field;
use crate::traits::Seekable;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dir {
    /// Ascending order (smallest first).
    #[default]
    Asc,
    /// Descending order (largest first).
    Desc,
}

impl Dir {
    /// Applies this direction to an ordering.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Dir::Asc => ordering,
            Dir::Desc => ordering.reverse(),
        }
    }
}

/// A single ordering key: a numeric field and a direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderBy {
    pub field: Field,
    pub dir: Dir,
}

impl OrderBy {
    /// Creates a descending ordering for the given field.
    pub const fn desc(field: Field) -> Self {
        OrderBy {
            field,
            dir: Dir::Desc,
        }
    }

    /// Creates an ascending ordering for the given field.
    pub const fn asc(field: Field) -> Self {
        OrderBy {
            field,
            dir: Dir::Asc,
        }
    }

    /// Compares two items on this key.
    ///
    /// Returns `None` if either value is NaN.
    pub fn compare<T: Seekable>(&self, a: &T, b: &T) -> Option<Ordering> {
        let ordering = a
            .field_value(self.field)
            .compare_numeric(&b.field_value(self.field))?;
        Some(self.dir.apply(ordering))
    }
}

/// How a result set is ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortMode {
    /// Rating descending, ties broken by rating count descending.
    #[default]
    Rating,
    /// Rating count descending, ties broken by rating descending.
    Count,
    /// Keep pool order.
    Unsorted,
}

const BY_RATING: &[OrderBy] = &[
    OrderBy::desc(Field::Rating),
    OrderBy::desc(Field::RatingCount),
];
const BY_COUNT: &[OrderBy] = &[
    OrderBy::desc(Field::RatingCount),
    OrderBy::desc(Field::Rating),
];

impl SortMode {
    /// Resolves a mode name. Unrecognized names leave results unsorted.
    pub fn from_name(name: &str) -> SortMode {
        match name.trim().to_lowercase().as_str() {
            "rating" => SortMode::Rating,
            "count" => SortMode::Count,
            _ => SortMode::Unsorted,
        }
    }

    /// Returns the ordering keys for this mode.
    pub fn orderings(self) -> &'static [OrderBy] {
        match self {
            SortMode::Rating => BY_RATING,
            SortMode::Count => BY_COUNT,
            SortMode::Unsorted => &[],
        }
    }

    /// Returns the mode name.
    pub fn as_str(self) -> &'static str {
        match self {
            SortMode::Rating => "rating",
            SortMode::Count => "count",
            SortMode::Unsorted => "none",
        }
    }

    /// Sorts `items` in place. The sort is stable.
    pub fn sort<T: Seekable>(self, items: &mut [T]) {
        let orderings = self.orderings();
        if orderings.is_empty() {
            return;
        }
        items.sort_by(|a, b| compare_by_orderings(a, b, orderings));
    }
}

impl std::str::FromStr for SortMode {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(SortMode::from_name(s))
    }
}

impl std::fmt::Display for SortMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Compares two items using a list of ordering keys.
///
/// The first key decides; later keys break ties. Keys that cannot compare
/// (NaN) count as equal.
pub fn compare_by_orderings<T: Seekable>(a: &T, b: &T, orderings: &[OrderBy]) -> Ordering {
    for order_by in orderings {
        if let Some(ordering) = order_by.compare(a, b) {
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
    }
    Ordering::Equal
}
