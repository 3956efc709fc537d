//! The immutable control bundle driving a list screen

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// Filter value meaning "no constraint"
pub const ALL: &str = "all";

/// Rows per page on every list screen
pub const ITEMS_PER_PAGE: usize = 15;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flip(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SortSpec<F> {
    pub field: F,
    #[serde(default)]
    pub direction: SortDirection,
}

/// Exact-match constraint on one field
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExactFilter<F> {
    pub field: F,
    pub value: String,
}

impl<F> ExactFilter<F> {
    pub fn is_active(&self) -> bool {
        self.value != ALL
    }
}

/// Date constraint on a record's primary date field
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum DateFilter {
    #[default]
    None,
    /// Exact calendar day
    On { date: NaiveDate },
    /// Inclusive range; a missing `to` defaults to `from`, a missing `from`
    /// means no constraint
    Between {
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    },
}

/// The effective date constraint after defaults are applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DateConstraint {
    Day(NaiveDate),
    Range {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
    Year(i32),
}

impl DateConstraint {
    pub(crate) fn matches(&self, value: NaiveDateTime) -> bool {
        match *self {
            DateConstraint::Day(day) => value.date() == day,
            DateConstraint::Range { start, end } => value >= start && value <= end,
            DateConstraint::Year(year) => value.year() == year,
        }
    }
}

impl DateFilter {
    pub fn is_active(&self) -> bool {
        match self {
            DateFilter::None => false,
            DateFilter::On { .. } => true,
            DateFilter::Between { from, .. } => from.is_some(),
        }
    }

    pub(crate) fn constraint(&self, default_year: Option<i32>) -> Option<DateConstraint> {
        match *self {
            DateFilter::On { date } => Some(DateConstraint::Day(date)),
            DateFilter::Between {
                from: Some(from),
                to,
            } => {
                let to = to.unwrap_or(from);
                Some(DateConstraint::Range {
                    start: from.and_time(NaiveTime::MIN),
                    end: to.and_time(end_of_day()),
                })
            }
            _ => default_year.map(DateConstraint::Year),
        }
    }
}

/// 23:59:59.999
fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN)
}

fn default_page() -> u32 {
    1
}

/// Everything a list screen needs to derive its visible page.
///
/// Every builder method except [`ListControls::with_page`] resets the page to
/// 1 so a narrowed result never lands on an out-of-range empty page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(bound(deserialize = "F: Deserialize<'de>"))]
pub struct ListControls<F> {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub filters: Vec<ExactFilter<F>>,
    #[serde(default)]
    pub date: DateFilter,
    pub sort: SortSpec<F>,
    #[serde(default = "default_page")]
    pub page: u32,
}

impl<F: Copy + Eq> ListControls<F> {
    pub fn new(sort_field: F, direction: SortDirection) -> Self {
        Self {
            search: String::new(),
            filters: Vec::new(),
            date: DateFilter::None,
            sort: SortSpec {
                field: sort_field,
                direction,
            },
            page: 1,
        }
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self.page = 1;
        self
    }

    /// Set the exact-match filter for `field`, replacing any previous value.
    /// Passing [`ALL`] clears it.
    pub fn with_filter(mut self, field: F, value: impl Into<String>) -> Self {
        let value = value.into();
        self.filters.retain(|f| f.field != field);
        if value != ALL {
            self.filters.push(ExactFilter { field, value });
        }
        self.page = 1;
        self
    }

    pub fn with_date(mut self, date: DateFilter) -> Self {
        self.date = date;
        self.page = 1;
        self
    }

    pub fn with_sort(mut self, field: F, direction: SortDirection) -> Self {
        self.sort = SortSpec { field, direction };
        self.page = 1;
        self
    }

    /// Column-header click: the same field flips direction, a new field
    /// starts ascending
    pub fn toggle_sort(self, field: F) -> Self {
        let direction = if self.sort.field == field {
            self.sort.direction.flip()
        } else {
            SortDirection::Asc
        };
        self.with_sort(field, direction)
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    pub fn filter_value(&self, field: F) -> &str {
        self.filters
            .iter()
            .find(|f| f.field == field)
            .map(|f| f.value.as_str())
            .unwrap_or(ALL)
    }
}

/// Options fixed per list screen rather than per interaction
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct QueryOptions {
    pub items_per_page: usize,
    /// Year constraint applied when no explicit date filter is active
    pub default_year: Option<i32>,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            items_per_page: ITEMS_PER_PAGE,
            default_year: None,
        }
    }
}
