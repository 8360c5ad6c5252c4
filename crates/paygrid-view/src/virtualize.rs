//! Row windowing for long tables.
//!
//! Only rows that intersect the viewport, plus an overscan margin, are
//! materialized. Spacer heights above and below the window keep the scroll
//! extent equal to the full content height.

use crate::options::{DEFAULT_HEIGHT, DEFAULT_OVERSCAN, DEFAULT_ROW_HEIGHT};

/// Fixed-height row virtualizer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Virtualizer {
    pub row_height: u32,
    pub viewport: u32,
    pub overscan: usize,
}

/// Rows to render for one scroll position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Window {
    /// First rendered row, inclusive.
    pub start: usize,
    /// Last rendered row, exclusive.
    pub end: usize,
    /// Spacer height before the first rendered row.
    pub leading: u64,
    /// Spacer height after the last rendered row.
    pub trailing: u64,
    pub total_height: u64,
}

impl Window {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn range(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }
}

impl Default for Virtualizer {
    fn default() -> Self {
        Virtualizer {
            row_height: DEFAULT_ROW_HEIGHT,
            viewport: DEFAULT_HEIGHT,
            overscan: DEFAULT_OVERSCAN,
        }
    }
}

impl Virtualizer {
    pub fn new(row_height: u32, viewport: u32, overscan: usize) -> Self {
        Virtualizer {
            row_height: row_height.max(1),
            viewport,
            overscan,
        }
    }

    pub fn total_height(&self, count: usize) -> u64 {
        count as u64 * u64::from(self.row_height.max(1))
    }

    /// Computes the render window for `count` rows at `scroll` pixels.
    ///
    /// Scroll offsets past the end are clamped so the last page stays full.
    pub fn window(&self, count: usize, scroll: u64) -> Window {
        let h = u64::from(self.row_height.max(1));
        let total = self.total_height(count);
        if count == 0 {
            return Window {
                start: 0,
                end: 0,
                leading: 0,
                trailing: 0,
                total_height: 0,
            };
        }

        let viewport = u64::from(self.viewport);
        let offset = scroll.min(total.saturating_sub(viewport));
        let first = (offset / h) as usize;
        let last = ((offset + viewport.max(1) - 1) / h) as usize;
        let last = last.min(count - 1);

        let start = first.saturating_sub(self.overscan);
        let end = last.saturating_add(1).saturating_add(self.overscan).min(count);
        let leading = start as u64 * h;
        let trailing = total - end as u64 * h;

        Window {
            start,
            end,
            leading,
            trailing,
            total_height: total,
        }
    }
}
