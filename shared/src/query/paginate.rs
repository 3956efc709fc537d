//! Paginate stage

/// Number of pages for `total` items, never less than 1
pub fn total_pages(total: usize, per_page: usize) -> usize {
    let per_page = per_page.max(1);
    total.div_ceil(per_page).max(1)
}

/// The slice of `items` shown on 1-based `page`; empty when out of range
pub fn page_slice<T>(items: &[T], page: u32, per_page: usize) -> &[T] {
    let per_page = per_page.max(1);
    let page = page.max(1) as usize;
    let start = (page - 1).saturating_mul(per_page).min(items.len());
    let end = start.saturating_add(per_page).min(items.len());
    &items[start..end]
}
