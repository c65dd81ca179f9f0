//! Fixed-size pagination.
//!
//! Pages are numbered from 1. Out-of-range requests are not errors; they
//! yield an empty page so a listing can render "no articles".

use serde::Serialize;

/// One page of a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<'a, T> {
    pub items: &'a [T],
    pub total_pages: usize,
    /// Requested page number
    pub current: usize,
}

/// `ceil(total / page_size)`, zero for an empty page size.
pub fn total_pages(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        0
    } else {
        total.div_ceil(page_size)
    }
}

/// Slice `[(n-1)*size, n*size)` of `items`.
pub fn paginate<T>(items: &[T], page_size: usize, page: usize) -> Page<'_, T> {
    let total_pages = total_pages(items.len(), page_size);

    let items = if page == 0 || page > total_pages {
        &items[..0]
    } else {
        let start = (page - 1) * page_size;
        let end = items.len().min(start + page_size);
        &items[start..end]
    };

    Page {
        items,
        total_pages,
        current: page,
    }
}

/// Link to one page of a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageLink {
    pub number: usize,
    pub href: String,
    pub current: bool,
}

/// Links for every page, empty when there is at most one page.
pub fn page_links(base_path: &str, total_pages: usize, current: usize) -> Vec<PageLink> {
    if total_pages <= 1 {
        return Vec::new();
    }
    (1..=total_pages)
        .map(|number| PageLink {
            number,
            href: format!("{base_path}?page={number}"),
            current: number == current,
        })
        .collect()
}

/// Read a `?page=` query value. Absent or blank means the first page;
/// anything else that is not a number means page 0, which is always empty.
pub fn parse_page_param(value: Option<&str>) -> usize {
    match value.map(str::trim) {
        None | Some("") => 1,
        Some(v) => v.parse().unwrap_or(0),
    }
}
