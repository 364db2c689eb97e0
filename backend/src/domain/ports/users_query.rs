//! Driving port for user directory queries.
//!
//! Inbound adapters (HTTP handlers) use this port to read the directory
//! without importing outbound persistence concerns.

use async_trait::async_trait;
use pagination::Paginated;

use crate::domain::{Error, ListUsersRequest, Role, User, UserId};

/// Domain use-case port for reading users and roles.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Filter, sort and paginate the directory.
    ///
    /// # Errors
    /// `NotFound` for an empty directory, an empty filter result or a page
    /// past the end; `InvalidRequest` for a malformed page request.
    async fn list_users(&self, request: ListUsersRequest) -> Result<Paginated<User>, Error>;

    /// Fetch one user with roles in priority order.
    async fn get_user(&self, id: UserId) -> Result<User, Error>;

    /// The role catalogue in priority order.
    async fn list_roles(&self) -> Result<Vec<Role>, Error>;
}
