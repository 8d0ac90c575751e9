//! Queryable fields and the alias table.
//!
//! The query language only knows four fields. Users may refer to each by
//! several names; [`Field::lookup`] resolves those names case-insensitively.

/// How a field's values are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Case-insensitive substring containment; the operator is ignored.
    Text,
    /// Numeric comparison using the condition's operator.
    Numeric,
}

/// A queryable record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    Author,
    Rating,
    RatingCount,
}

/// Accepted spellings, already lowercased.
static ALIASES: &[(&str, Field)] = &[
    ("title", Field::Title),
    ("t", Field::Title),
    ("标题", Field::Title),
    ("书名", Field::Title),
    ("author", Field::Author),
    ("a", Field::Author),
    ("作者", Field::Author),
    ("rating", Field::Rating),
    ("r", Field::Rating),
    ("score", Field::Rating),
    ("评分", Field::Rating),
    ("count", Field::RatingCount),
    ("ratingcount", Field::RatingCount),
    ("c", Field::RatingCount),
    ("votes", Field::RatingCount),
    ("人数", Field::RatingCount),
];

impl Field {
    /// All fields, in canonical order.
    pub const ALL: [Field; 4] = [
        Field::Title,
        Field::Author,
        Field::Rating,
        Field::RatingCount,
    ];

    /// Resolves a user-supplied field name through the alias table.
    pub fn lookup(name: &str) -> Option<Field> {
        let key = name.to_lowercase();
        ALIASES
            .iter()
            .find(|(alias, _)| *alias == key)
            .map(|(_, field)| *field)
    }

    /// Returns every alias that resolves to this field.
    pub fn aliases(self) -> impl Iterator<Item = &'static str> {
        ALIASES
            .iter()
            .filter(move |(_, field)| *field == self)
            .map(|(alias, _)| *alias)
    }

    /// Returns how values of this field are compared.
    pub fn kind(self) -> FieldKind {
        match self {
            Field::Title | Field::Author => FieldKind::Text,
            Field::Rating | Field::RatingCount => FieldKind::Numeric,
        }
    }

    /// Returns `true` for numeric fields.
    pub fn is_numeric(self) -> bool {
        self.kind() == FieldKind::Numeric
    }

    /// Returns the canonical name, matching the dataset's JSON key.
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Author => "author",
            Field::Rating => "rating",
            Field::RatingCount => "ratingCount",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
