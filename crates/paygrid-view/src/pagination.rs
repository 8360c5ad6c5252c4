//! Server-style pagination.
//!
//! The table never slices rows when a [`Pagination`] is supplied: the caller
//! passes one page of rows and the total, and receives page changes through
//! the callback.

use std::fmt;

use serde::Serialize;

use crate::error::{GridError, Result};

type PageCallback = Box<dyn FnMut(usize, usize)>;

/// Caller-owned paging descriptor.
pub struct Pagination {
    /// Zero-based page index.
    pub page_index: usize,
    pub page_size: usize,
    /// Total row count across all pages.
    pub total: usize,
    on_change: PageCallback,
}

impl Pagination {
    pub fn new<F>(page_index: usize, page_size: usize, total: usize, on_change: F) -> Result<Self>
    where
        F: FnMut(usize, usize) + 'static,
    {
        if page_size == 0 {
            return Err(GridError::InvalidPageSize);
        }
        Ok(Pagination {
            page_index,
            page_size,
            total,
            on_change: Box::new(on_change),
        })
    }

    pub fn page_count(&self) -> usize {
        page_count(self.total, self.page_size)
    }

    /// Reports a page change to the caller.
    ///
    /// A new page size clamps the index to the last page.
    pub fn change(&mut self, page_index: usize, page_size: usize) -> Result<()> {
        if page_size == 0 {
            return Err(GridError::InvalidPageSize);
        }
        let last = page_count(self.total, page_size).saturating_sub(1);
        let page_index = page_index.min(last);
        tracing::debug!(page_index, page_size, "page change");
        (self.on_change)(page_index, page_size);
        Ok(())
    }

    pub fn info(&self) -> PageInfo {
        let start = if self.total == 0 {
            0
        } else {
            self.page_index * self.page_size + 1
        };
        let end = (self.page_index.saturating_add(1) * self.page_size).min(self.total);
        PageInfo {
            page_index: self.page_index,
            page_size: self.page_size,
            current_page: self.page_index + 1,
            page_count: self.page_count(),
            total: self.total,
            range_label: format!("{}-{} / {}", start.min(end), end, self.total),
            has_previous: self.page_index > 0,
            has_next: self.page_index + 1 < self.page_count(),
        }
    }
}

impl fmt::Debug for Pagination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pagination")
            .field("page_index", &self.page_index)
            .field("page_size", &self.page_size)
            .field("total", &self.total)
            .finish_non_exhaustive()
    }
}

/// What the pagination bar displays.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub page_index: usize,
    pub page_size: usize,
    /// One-based page number.
    pub current_page: usize,
    pub page_count: usize,
    pub total: usize,
    /// `start-end / total`, one-based and inclusive.
    pub range_label: String,
    pub has_previous: bool,
    pub has_next: bool,
}

/// `ceil(total / page_size)`; zero when there are no rows.
pub fn page_count(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size)
}

/// The rows of one page, for callers paging an in-memory dataset.
///
/// Yields `min(page_size, len - index * page_size)` rows; empty past the end.
pub fn slice_page<T>(rows: &[T], page_index: usize, page_size: usize) -> &[T] {
    let start = page_index.saturating_mul(page_size).min(rows.len());
    let end = start.saturating_add(page_size).min(rows.len());
    &rows[start..end]
}
