//! Record abstraction consumed by the list query pipeline

use std::borrow::Cow;
use std::fmt;

use rust_decimal::Decimal;

use super::QueryOptions;

/// The value of a record field as seen by filters and sorting
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue<'a> {
    Text(Cow<'a, str>),
    Number(Decimal),
    Missing,
}

impl<'a> FieldValue<'a> {
    /// Borrowed text field; `None` is treated as missing
    pub fn text(value: Option<&'a str>) -> Self {
        match value {
            Some(v) => FieldValue::Text(Cow::Borrowed(v)),
            None => FieldValue::Missing,
        }
    }

    /// Text form used for search and lexicographic comparison.
    /// Missing fields read as the empty string.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            FieldValue::Text(s) => Cow::Borrowed(s.as_ref()),
            FieldValue::Number(n) => Cow::Owned(n.to_string()),
            FieldValue::Missing => Cow::Borrowed(""),
        }
    }
}

impl From<i64> for FieldValue<'_> {
    fn from(value: i64) -> Self {
        FieldValue::Text(Cow::Owned(value.to_string()))
    }
}

/// A record that can be listed, searched, filtered and sorted
pub trait ListRecord {
    /// Field selector, usually a fieldless enum
    type Field: Copy + Eq + fmt::Debug + 'static;

    /// The numeric id-like key, sorted as an integer
    const ID_FIELD: Self::Field;

    /// The primary date field, in `DD/MM/YYYY` display format
    const DATE_FIELD: Self::Field;

    fn field(&self, field: Self::Field) -> FieldValue<'_>;

    /// Fields scanned by free-text search
    fn search_fields() -> &'static [Self::Field];

    /// Fields holding display dates, sorted chronologically. `DATE_FIELD`
    /// is always treated as one.
    fn date_fields() -> &'static [Self::Field] {
        &[]
    }

    /// Query options applied when the caller does not supply its own
    fn default_options() -> QueryOptions {
        QueryOptions::default()
    }
}
