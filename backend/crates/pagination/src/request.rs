//! Validated page requests.

use serde::Serialize;

/// Page returned when the caller does not specify one.
pub const DEFAULT_PAGE: u32 = 1;
/// Page size used when the caller does not specify one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Errors raised while validating raw pagination input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PaginationError {
    /// The requested page was below 1.
    #[error("page must be greater than or equal to 1 (got {page})")]
    InvalidPage {
        /// Raw value supplied by the caller.
        page: i64,
    },
    /// The requested page size was below 1.
    #[error("pageSize must be greater than or equal to 1 (got {page_size})")]
    InvalidPageSize {
        /// Raw value supplied by the caller.
        page_size: i64,
    },
}

/// A 1-based page number paired with a page size.
///
/// ## Invariants
/// - `page >= 1`
/// - `page_size >= 1`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    page: u32,
    page_size: u32,
}

impl PageRequest {
    /// Validate raw page and page size values.
    ///
    /// The page is checked first, so a request where both values are invalid
    /// reports [`PaginationError::InvalidPage`].
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError::InvalidPage`] when `page < 1` and
    /// [`PaginationError::InvalidPageSize`] when `page_size < 1`. Values above
    /// `u32::MAX` are rejected the same way.
    ///
    /// # Examples
    ///
    /// ```
    /// use pagination::{PageRequest, PaginationError};
    ///
    /// assert!(PageRequest::new(1, 10).is_ok());
    /// assert_eq!(
    ///     PageRequest::new(0, 10),
    ///     Err(PaginationError::InvalidPage { page: 0 })
    /// );
    /// ```
    pub fn new(page: i64, page_size: i64) -> Result<Self, PaginationError> {
        let validated_page = u32::try_from(page)
            .ok()
            .filter(|value| *value >= 1)
            .ok_or(PaginationError::InvalidPage { page })?;
        let validated_size = u32::try_from(page_size)
            .ok()
            .filter(|value| *value >= 1)
            .ok_or(PaginationError::InvalidPageSize { page_size })?;
        Ok(Self {
            page: validated_page,
            page_size: validated_size,
        })
    }

    /// Requested 1-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Requested number of items per page.
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Number of items preceding the requested page.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.page_size as u64
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}
