//! User listing pipeline: filter, sort, then paginate.
//!
//! Every stage is a pure transformation over users already fetched from the
//! store, so the pipeline can be abandoned between stages without side
//! effects.

mod filter;
mod sort;

use pagination::{DEFAULT_PAGE, DEFAULT_PAGE_SIZE, PageRequest, Paginated, paginate};
use serde_json::json;

use crate::domain::{Error, RolePriority, User};

pub use filter::{UserFilter, filter_users};
pub use sort::{SortDirection, SortKey, UserSortOrder, sort_users};

pub(crate) const NO_USERS_MESSAGE: &str = "no users";
pub(crate) const NO_MATCHES_MESSAGE: &str = "no entries matching filter";
pub(crate) const PAGE_NOT_FOUND_MESSAGE: &str = "page not found";

/// Inputs for a user listing.
///
/// Page and page size stay raw until the pipeline validates them, so an
/// empty directory is reported before a malformed page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListUsersRequest {
    pub filter: UserFilter,
    pub page: i64,
    pub page_size: i64,
    pub order: UserSortOrder,
}

impl ListUsersRequest {
    pub fn new(filter: UserFilter, page: i64, page_size: i64, order: UserSortOrder) -> Self {
        Self {
            filter,
            page,
            page_size,
            order,
        }
    }
}

impl Default for ListUsersRequest {
    fn default() -> Self {
        Self::new(
            UserFilter::default(),
            i64::from(DEFAULT_PAGE),
            i64::from(DEFAULT_PAGE_SIZE),
            UserSortOrder::default(),
        )
    }
}

/// Run the listing pipeline over the full user collection.
///
/// # Errors
/// - [`crate::domain::ErrorCode::NotFound`] when the collection is empty,
///   when nothing matches the filter, or when the page lies past the last
///   one.
/// - [`crate::domain::ErrorCode::InvalidRequest`] when page or page size
///   is below 1.
pub fn list_page(
    users: Vec<User>,
    request: &ListUsersRequest,
    priority: &RolePriority,
) -> Result<Paginated<User>, Error> {
    if users.is_empty() {
        return Err(Error::not_found(NO_USERS_MESSAGE));
    }

    let page_request = PageRequest::new(request.page, request.page_size).map_err(|err| {
        Error::invalid_request(err.to_string()).with_details(json!({
            "page": request.page,
            "pageSize": request.page_size,
        }))
    })?;

    let mut matching = filter_users(users, &request.filter);
    if matching.is_empty() {
        return Err(Error::not_found(NO_MATCHES_MESSAGE));
    }

    let total_count = u64::try_from(matching.len()).unwrap_or(u64::MAX);
    sort_users(&mut matching, request.order, priority);

    let page = paginate(matching, page_request, total_count);
    if page.pagination().is_beyond_last_page() {
        return Err(Error::not_found(PAGE_NOT_FOUND_MESSAGE).with_details(json!({
            "page": page.pagination().current_page(),
            "totalPages": page.pagination().total_pages(),
        })));
    }
    Ok(page)
}
