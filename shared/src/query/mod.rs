//! List query pipeline: `filter → sort → paginate`
//!
//! The pipeline is pure and total. It never mutates the snapshot it is given
//! and holds no state between calls, so it can be re-run on every control
//! change. Malformed data degrades to "excluded" or "sorts as default".

mod controls;
mod filter;
mod paginate;
mod record;
mod sort;

pub use controls::*;
pub use filter::filter_records;
pub use paginate::{page_slice, total_pages};
pub use record::{FieldValue, ListRecord};
pub use sort::{compare_records, sort_records};

use serde::Serialize;

use crate::types::{PaginatedResponse, PaginationMeta};

/// Output of one pipeline run
#[derive(Debug, Serialize)]
pub struct ListQueryResult<'a, R> {
    /// Every matching record, sorted
    pub filtered: Vec<&'a R>,
    /// The current page of `filtered`
    pub displayed: Vec<&'a R>,
    pub total_items: usize,
    pub total_pages: usize,
    pub current_page: u32,
    pub items_per_page: usize,
}

impl<R: Clone> ListQueryResult<'_, R> {
    /// Owned copy of the displayed page with pagination metadata
    pub fn page_response(&self) -> PaginatedResponse<R> {
        PaginatedResponse {
            data: self.displayed.iter().map(|r| (*r).clone()).collect(),
            pagination: self.pagination_meta(),
        }
    }
}

impl<R> ListQueryResult<'_, R> {
    pub fn pagination_meta(&self) -> PaginationMeta {
        PaginationMeta {
            page: self.current_page,
            per_page: self.items_per_page as u32,
            total_items: self.total_items as u64,
            total_pages: self.total_pages as u32,
        }
    }
}

/// Run the pipeline with the record type's default options
pub fn run_list_query<'a, R: ListRecord>(
    records: &'a [R],
    controls: &ListControls<R::Field>,
) -> ListQueryResult<'a, R> {
    run_list_query_with(records, controls, &R::default_options())
}

/// Run the pipeline with explicit options
pub fn run_list_query_with<'a, R: ListRecord>(
    records: &'a [R],
    controls: &ListControls<R::Field>,
    options: &QueryOptions,
) -> ListQueryResult<'a, R> {
    let mut filtered = filter_records(records, controls, options);
    sort_records(&mut filtered, &controls.sort);

    let per_page = options.items_per_page.max(1);
    let current_page = controls.page.max(1);
    let displayed = page_slice(&filtered, current_page, per_page).to_vec();

    ListQueryResult {
        total_items: filtered.len(),
        total_pages: total_pages(filtered.len(), per_page),
        current_page,
        items_per_page: per_page,
        displayed,
        filtered,
    }
}
