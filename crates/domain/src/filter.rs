//! Pagination and date filter for the aggregate listing.

use chrono::{DateTime, Utc};

use crate::error::DomainError;

/// Default page number when the caller supplies none.
pub const DEFAULT_PAGE: i64 = 1;

/// Default page size when the caller supplies none.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Filter for the pickup-point listing.
///
/// Pagination applies to pickup points only; the optional date range
/// restricts receptions by their creation time. The filter is a request
/// value object and is never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListFilter {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub page: i64,
    pub page_size: i64,
}

impl ListFilter {
    /// Builds a filter from optional request parameters, applying the
    /// documented defaults for page and page size.
    pub fn new(
        start_date: Option<DateTime<Utc>>,
        end_date: Option<DateTime<Utc>>,
        page: Option<i64>,
        page_size: Option<i64>,
    ) -> Self {
        Self {
            start_date,
            end_date,
            page: page.unwrap_or(DEFAULT_PAGE),
            page_size: page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        }
    }

    /// Validates the filter before any query is issued, so requests that can
    /// never match fail without a storage round-trip.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.page < 1 {
            return Err(DomainError::InvalidPage);
        }

        if self.page_size < 1 {
            return Err(DomainError::InvalidPageSize);
        }

        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if start > end {
                return Err(DomainError::InvalidDateRange);
            }
        }

        if let Some(start) = self.start_date {
            if start > Utc::now() {
                return Err(DomainError::InvalidStartDate);
            }
        }

        Ok(())
    }

    /// Returns the row offset for the requested page.
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.page_size
    }

    /// Returns true if either date bound is present.
    pub fn has_date_bounds(&self) -> bool {
        self.start_date.is_some() || self.end_date.is_some()
    }
}

impl Default for ListFilter {
    fn default() -> Self {
        Self::new(None, None, None, None)
    }
}
