//! Filter stage: search, exact-match filters, then the date constraint

use super::controls::{DateConstraint, ListControls, QueryOptions};
use super::record::{FieldValue, ListRecord};
use crate::validation::{id_lookup, is_numeric_id, parse_display_datetime};

/// Keep the records that satisfy every active control, in input order
pub fn filter_records<'a, R: ListRecord>(
    records: &'a [R],
    controls: &ListControls<R::Field>,
    options: &QueryOptions,
) -> Vec<&'a R> {
    let search = SearchMode::parse(&controls.search);
    let date = controls.date.constraint(options.default_year);

    records
        .iter()
        .filter(|record| search.matches(*record))
        .filter(|record| {
            controls
                .filters
                .iter()
                .filter(|f| f.is_active())
                .all(|f| record.field(f.field).as_text() == f.value)
        })
        .filter(|record| match date {
            Some(constraint) => matches_date(*record, constraint),
            None => true,
        })
        .collect()
}

enum SearchMode {
    None,
    /// `#<digits>`: exact id equality
    Id(String),
    /// `#` followed by anything non-numeric: matches nothing
    NoMatch,
    Text(String),
}

impl SearchMode {
    fn parse(query: &str) -> Self {
        if query.is_empty() {
            return SearchMode::None;
        }
        match id_lookup(query.trim()) {
            Some(id) if is_numeric_id(id) => SearchMode::Id(id.to_string()),
            Some(_) => SearchMode::NoMatch,
            None => SearchMode::Text(query.to_lowercase()),
        }
    }

    fn matches<R: ListRecord>(&self, record: &R) -> bool {
        match self {
            SearchMode::None => true,
            SearchMode::NoMatch => false,
            SearchMode::Id(id) => record.field(R::ID_FIELD).as_text() == id.as_str(),
            SearchMode::Text(needle) => R::search_fields().iter().any(|field| {
                record
                    .field(*field)
                    .as_text()
                    .to_lowercase()
                    .contains(needle.as_str())
            }),
        }
    }
}

fn matches_date<R: ListRecord>(record: &R, constraint: DateConstraint) -> bool {
    match record.field(R::DATE_FIELD) {
        FieldValue::Text(text) => parse_display_datetime(&text)
            .map(|value| constraint.matches(value))
            .unwrap_or(false),
        FieldValue::Number(_) | FieldValue::Missing => false,
    }
}
