//! Fixed-size page windows over a ranked result list.
//!
//! A [`Page`] is a half-open index range `[start, end)` plus a remembered
//! `total` set by the first query that uses the page. Navigation windows
//! never overlap and tile `[0, total)`: walking `next_page` repeatedly from
//! `Page::new(0, size)` visits every index exactly once, with the final
//! window clamped short at the tail.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PageError {
    /// A navigation operation needed `total`, but no query has set it yet.
    #[error("page total is unset; run a query before navigating")]
    UnsetTotal,
}

/// A pagination window `[start, end)` with an optional known total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub start: usize,
    pub end: usize,
    /// Total result count, set by the first paged query and fixed thereafter.
    pub total: Option<usize>,
}

impl Page {
    /// Creates a window with no total. Callers must uphold `start < end`;
    /// paged queries additionally reject windows that do not.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `start >= end`. A degenerate window has
    /// no size, so [`Self::current_page`] and [`Self::total_pages`] would
    /// divide by zero.
    #[must_use]
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start < end, "page window [{start}, {end}) is empty");
        Self {
            start,
            end,
            total: None,
        }
    }

    /// Window size in entries.
    #[must_use]
    pub fn size(&self) -> usize {
        self.end - self.start
    }

    /// Whether a further window exists after this one.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::UnsetTotal`] if no query has set the total.
    pub fn has_next(&self) -> Result<bool, PageError> {
        Ok(self.end < self.total.ok_or(PageError::UnsetTotal)?)
    }

    /// Whether a window exists before this one. Needs no total.
    #[must_use]
    pub fn has_prev(&self) -> bool {
        self.start > 0
    }

    /// The same-size window following this one, clamped at the tail — the
    /// final window may be short.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::UnsetTotal`] if no query has set the total.
    pub fn next_page(&self) -> Result<Page, PageError> {
        let total = self.total.ok_or(PageError::UnsetTotal)?;
        Ok(Page {
            start: self.end,
            end: total.min(self.end + self.size()),
            total: Some(total),
        })
    }

    /// The same-size window preceding this one, clamped at the head.
    #[must_use]
    pub fn prev_page(&self) -> Page {
        Page {
            start: self.start.saturating_sub(self.size()),
            end: self.start,
            total: self.total,
        }
    }

    /// Number of windows needed to cover the whole result list.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::UnsetTotal`] if no query has set the total.
    pub fn total_pages(&self) -> Result<usize, PageError> {
        let total = self.total.ok_or(PageError::UnsetTotal)?;
        Ok(total.div_ceil(self.size()))
    }

    /// 1-indexed ordinal of this window.
    #[must_use]
    pub fn current_page(&self) -> usize {
        self.start.div_ceil(self.size()) + 1
    }
}
