//! Sort stage: single-key stable comparator

use std::cmp::Ordering;

use chrono::NaiveDateTime;

use super::controls::{SortDirection, SortSpec};
use super::record::{FieldValue, ListRecord};
use crate::validation::parse_display_datetime;

/// Compare two records on `field` in ascending order.
///
/// The id field compares as integers (unparsable ids count as 0). Date fields
/// compare chronologically, with missing or unparsable dates first. Two numeric
/// values compare numerically. Everything else compares case-insensitively as
/// text, with missing values reading as the empty string.
pub fn compare_records<R: ListRecord>(a: &R, b: &R, field: R::Field) -> Ordering {
    if field == R::ID_FIELD {
        return id_number(a).cmp(&id_number(b));
    }
    if field == R::DATE_FIELD || R::date_fields().contains(&field) {
        return date_value(a, field).cmp(&date_value(b, field));
    }

    match (a.field(field), b.field(field)) {
        (FieldValue::Number(x), FieldValue::Number(y)) => x.cmp(&y),
        (x, y) => x.as_text().to_lowercase().cmp(&y.as_text().to_lowercase()),
    }
}

fn id_number<R: ListRecord>(record: &R) -> i64 {
    record
        .field(R::ID_FIELD)
        .as_text()
        .trim()
        .parse()
        .unwrap_or(0)
}

fn date_value<R: ListRecord>(record: &R, field: R::Field) -> Option<NaiveDateTime> {
    parse_display_datetime(&record.field(field).as_text())
}

/// Sort in place. `sort_by` is stable, so ties keep their filtered order in
/// both directions.
pub fn sort_records<R: ListRecord>(records: &mut [&R], sort: &SortSpec<R::Field>) {
    records.sort_by(|a, b| {
        let ordering = compare_records(*a, *b, sort.field);
        match sort.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}
