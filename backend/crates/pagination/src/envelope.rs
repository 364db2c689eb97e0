//! Page metadata and the paginated response envelope.

use serde::Serialize;

use crate::PageRequest;

/// Metadata describing where a page sits within the full result set.
///
/// `has_previous_page` and `has_next_page` are derived from the current page
/// and the total page count at construction time; they cannot be set
/// independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    current_page: u32,
    total_pages: u64,
    page_size: u32,
    total_count: u64,
    has_previous_page: bool,
    has_next_page: bool,
}

impl PageInfo {
    /// Build metadata for `request` over a result set of `total_count` items.
    ///
    /// `total_pages` is the ceiling of `total_count / page_size`, so an empty
    /// result set has zero pages.
    ///
    /// # Examples
    ///
    /// ```
    /// use pagination::{PageInfo, PageRequest};
    ///
    /// let info = PageInfo::new(PageRequest::new(1, 10).expect("valid"), 9);
    /// assert_eq!(info.total_pages(), 1);
    /// assert!(!info.has_next_page());
    /// ```
    #[must_use]
    pub const fn new(request: PageRequest, total_count: u64) -> Self {
        let current_page = request.page();
        let page_size = request.page_size();
        let total_pages = total_count.div_ceil(page_size as u64);
        Self {
            current_page,
            total_pages,
            page_size,
            total_count,
            has_previous_page: current_page > 1,
            has_next_page: (current_page as u64) < total_pages,
        }
    }

    /// The 1-based page these metadata describe.
    #[must_use]
    pub const fn current_page(&self) -> u32 {
        self.current_page
    }

    /// Total number of pages for the result set.
    #[must_use]
    pub const fn total_pages(&self) -> u64 {
        self.total_pages
    }

    /// Maximum number of items per page.
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Number of items across all pages.
    #[must_use]
    pub const fn total_count(&self) -> u64 {
        self.total_count
    }

    /// Whether a page precedes the current one.
    #[must_use]
    pub const fn has_previous_page(&self) -> bool {
        self.has_previous_page
    }

    /// Whether a page follows the current one.
    #[must_use]
    pub const fn has_next_page(&self) -> bool {
        self.has_next_page
    }

    /// Whether the requested page lies beyond the last page.
    ///
    /// Callers must use this rather than an empty slice to detect a missing
    /// page: the two outcomes are reported differently.
    #[must_use]
    pub const fn is_beyond_last_page(&self) -> bool {
        self.current_page as u64 > self.total_pages
    }
}

/// A page of items together with its [`PageInfo`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    items: Vec<T>,
    pagination: PageInfo,
}

impl<T> Paginated<T> {
    /// Items on this page, in the order they were supplied.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Metadata for this page.
    #[must_use]
    pub const fn pagination(&self) -> &PageInfo {
        &self.pagination
    }

    /// Split the envelope into items and metadata.
    #[must_use]
    pub fn into_parts(self) -> (Vec<T>, PageInfo) {
        (self.items, self.pagination)
    }

    /// Transform every item while keeping the metadata.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }
}

/// Slice an ordered collection down to the requested page.
///
/// Skips `(page - 1) * page_size` items and keeps at most `page_size`.
/// `total_count` is taken as given so callers may paginate a collection they
/// have already counted; the slice itself never reorders items.
///
/// A request past the last page yields an empty slice whose metadata reports
/// [`PageInfo::is_beyond_last_page`].
#[must_use]
pub fn paginate<T>(items: Vec<T>, request: PageRequest, total_count: u64) -> Paginated<T> {
    let skip = usize::try_from(request.offset()).unwrap_or(usize::MAX);
    let take = usize::try_from(request.page_size()).unwrap_or(usize::MAX);
    Paginated {
        items: items.into_iter().skip(skip).take(take).collect(),
        pagination: PageInfo::new(request, total_count),
    }
}

#[cfg(test)]
mod tests {
    //! Page arithmetic and slicing behaviour.
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn request(page: i64, size: i64) -> PageRequest {
        PageRequest::new(page, size).expect("valid request")
    }

    #[rstest]
    #[case(0, 10, 0)]
    #[case(9, 10, 1)]
    #[case(10, 10, 1)]
    #[case(11, 10, 2)]
    #[case(9, 2, 5)]
    #[case(1, 1, 1)]
    fn total_pages_rounds_up(#[case] count: u64, #[case] size: i64, #[case] pages: u64) {
        let info = PageInfo::new(request(1, size), count);
        assert_eq!(info.total_pages(), pages);
    }

    #[rstest]
    #[case(1, 5, false, true)]
    #[case(3, 5, true, true)]
    #[case(5, 5, true, false)]
    fn neighbour_flags_follow_current_page(
        #[case] page: i64,
        #[case] total_pages: u64,
        #[case] has_previous: bool,
        #[case] has_next: bool,
    ) {
        let info = PageInfo::new(request(page, 2), total_pages * 2);
        assert_eq!(info.has_previous_page(), has_previous);
        assert_eq!(info.has_next_page(), has_next);
    }

    #[rstest]
    fn last_partial_page_holds_the_remainder() {
        let items: Vec<u32> = (1..=9).collect();
        let page = paginate(items, request(5, 2), 9);

        assert_eq!(page.items(), &[9]);
        assert!(!page.pagination().is_beyond_last_page());
        assert!(!page.pagination().has_next_page());
    }

    #[rstest]
    fn page_past_the_end_is_flagged() {
        let items: Vec<u32> = (1..=9).collect();
        let page = paginate(items, request(6, 2), 9);

        assert!(page.items().is_empty());
        assert!(page.pagination().is_beyond_last_page());
    }

    #[rstest]
    fn empty_result_set_has_no_pages() {
        let page = paginate(Vec::<u32>::new(), request(1, 10), 0);
        assert_eq!(page.pagination().total_pages(), 0);
        assert!(page.pagination().is_beyond_last_page());
    }

    #[rstest]
    #[case(1)]
    #[case(2)]
    #[case(3)]
    #[case(4)]
    #[case(10)]
    fn walking_every_page_yields_each_item_once(#[case] size: i64) {
        let items: Vec<u32> = (1..=9).collect();
        let total_pages = PageInfo::new(request(1, size), 9).total_pages();

        let walked: Vec<u32> = (1..=total_pages)
            .flat_map(|page| {
                let page = i64::try_from(page).expect("small page number");
                paginate(items.clone(), request(page, size), 9).into_parts().0
            })
            .collect();

        assert_eq!(walked, items);
    }

    #[rstest]
    fn map_keeps_metadata() {
        let page = paginate(vec![1, 2, 3], request(1, 2), 3).map(|n| n * 10);
        assert_eq!(page.items(), &[10, 20]);
        assert_eq!(page.pagination().total_count(), 3);
    }

    #[rstest]
    fn metadata_serialises_in_camel_case() {
        let info = PageInfo::new(request(2, 2), 9);
        let value = serde_json::to_value(info).expect("serialise page info");
        assert_eq!(
            value,
            json!({
                "currentPage": 2,
                "totalPages": 5,
                "pageSize": 2,
                "totalCount": 9,
                "hasPreviousPage": true,
                "hasNextPage": true,
            })
        );
    }
}
