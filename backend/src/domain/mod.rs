//! Domain primitives, the listing pipeline and the directory service.
//!
//! Purpose: define strongly typed entities used by the HTTP and persistence
//! adapters and the pure transformations applied to them. Nothing here
//! performs I/O directly; side effects go through [`ports`].
//!
//! Public surface:
//! - Error (alias to `error::Error`): transport agnostic error payload.
//! - User, UserId, UserProfile: directory entries and their validated fields.
//! - RolePriority: injected ranking used to order roles for display.
//! - ListUsersRequest, list_page: filter, sort and paginate a listing.
//! - reconcile: diff current roles against a requested set.
//! - UserDirectoryService: implements the driving ports.

pub mod error;
pub mod ports;
pub mod role;
pub mod role_reconciliation;
pub mod trace_id;
pub mod user;
pub mod user_directory_service;
pub mod user_query;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::role::{
    DEFAULT_ROLE_PRIORITY, Role, RoleId, RoleName, RolePriority, RoleValidationError,
};
pub use self::role_reconciliation::{
    RoleChangePlan, RoleReconciliation, plan_role_changes, reconcile, role_target,
};
pub use self::trace_id::TraceId;
pub use self::user::{
    Age, Email, NewUser, User, UserId, UserName, UserProfile, UserUpdate, UserValidationError,
};
pub use self::user_directory_service::UserDirectoryService;
pub use self::user_query::{
    ListUsersRequest, SortDirection, SortKey, UserFilter, UserSortOrder, filter_users, list_page,
    sort_users,
};

/// Convenient result alias for domain operations.
pub type DomainResult<T> = Result<T, Error>;
