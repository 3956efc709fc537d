//! Query-string mapping for list endpoints and CSV export

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use serde::{de::DeserializeOwned, Serialize};
use shared::{parse_display_date, DateFilter, ListControls, SortDirection};

use crate::error::{AppError, AppResult};

const SEARCH: &str = "search";
const SORT: &str = "sort";
const DIRECTION: &str = "direction";
const PAGE: &str = "page";
const DATE: &str = "date";
const DATE_FROM: &str = "date_from";
const DATE_TO: &str = "date_to";

/// Build a control bundle from list query parameters.
///
/// Reserved keys are `search`, `sort`, `direction`, `page`, `date`,
/// `date_from` and `date_to`. Any other key naming a field becomes an exact
/// filter. Unknown keys, unknown sort fields and unparseable dates are
/// ignored so a stale bookmark still renders a list.
pub fn controls_from_params<F>(
    params: &HashMap<String, String>,
    default_sort: F,
    default_direction: SortDirection,
) -> ListControls<F>
where
    F: Copy + Eq + DeserializeOwned,
{
    let get = |key: &str| params.get(key).map(|v| v.trim()).filter(|v| !v.is_empty());

    let direction = match get(DIRECTION) {
        Some("asc") => SortDirection::Asc,
        Some("desc") => SortDirection::Desc,
        _ => default_direction,
    };
    let sort_field = get(SORT).and_then(parse_field::<F>).unwrap_or(default_sort);

    let mut controls = ListControls::new(sort_field, direction);

    if let Some(search) = get(SEARCH) {
        controls = controls.with_search(search);
    }

    let filters: BTreeMap<&String, &String> = params
        .iter()
        .filter(|(k, _)| !is_reserved(k))
        .collect();
    for (key, value) in filters {
        match parse_field::<F>(key) {
            Some(field) => controls = controls.with_filter(field, value.trim()),
            None => tracing::debug!(key = %key, "ignoring unknown list parameter"),
        }
    }

    let date = if let Some(on) = get(DATE).and_then(parse_param_date) {
        DateFilter::On { date: on }
    } else {
        DateFilter::Between {
            from: get(DATE_FROM).and_then(parse_param_date),
            to: get(DATE_TO).and_then(parse_param_date),
        }
    };
    if date.is_active() {
        controls = controls.with_date(date);
    }

    let page = get(PAGE).and_then(|p| p.parse::<u32>().ok()).unwrap_or(1);
    controls.with_page(page)
}

fn is_reserved(key: &str) -> bool {
    matches!(
        key,
        SEARCH | SORT | DIRECTION | PAGE | DATE | DATE_FROM | DATE_TO
    )
}

/// Field names use the record's snake_case serde names
fn parse_field<F: DeserializeOwned>(name: &str) -> Option<F> {
    serde_json::from_value(serde_json::Value::String(name.to_string())).ok()
}

/// Date inputs send `YYYY-MM-DD`; `DD/MM/YYYY` is accepted as well
fn parse_param_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_display_date(value))
}

/// Export records to CSV format
pub fn export_to_csv<T: Serialize>(data: &[T]) -> AppResult<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    for record in data {
        wtr.serialize(record)
            .map_err(|e| AppError::Export(format!("CSV serialization error: {}", e)))?;
    }
    let bytes = wtr
        .into_inner()
        .map_err(|e| AppError::Export(format!("CSV writer error: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| AppError::Export(format!("UTF-8 conversion error: {}", e)))
}
