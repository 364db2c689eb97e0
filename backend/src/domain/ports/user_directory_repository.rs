//! Driven port for the user directory store.
//!
//! The store owns users, the role catalogue and the assignment relation
//! between them. Callers check [`UserDirectoryRepository::email_exists`]
//! before writing a profile; a write that still loses a race for the same
//! address fails with [`UserDirectoryRepositoryError::DuplicateEmail`].
//! Role changes are read, diffed and applied by the store itself so
//! concurrent changes to one user are serialised.

use std::collections::BTreeSet;

use async_trait::async_trait;

use crate::domain::{Email, NewUser, Role, RoleName, RoleReconciliation, User, UserId, UserUpdate};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user directory adapters.
    pub enum UserDirectoryRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "user directory connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user directory query failed: {message}",
        /// Another user already holds the address.
        DuplicateEmail { email: String } => "user directory already holds {email}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectoryRepository: Send + Sync {
    /// Every user, each populated with its currently assigned role names.
    async fn list_users_with_roles(&self) -> Result<Vec<User>, UserDirectoryRepositoryError>;

    /// Fetch one user with its roles.
    async fn find_user(&self, id: UserId) -> Result<Option<User>, UserDirectoryRepositoryError>;

    async fn email_exists(&self, email: &Email) -> Result<bool, UserDirectoryRepositoryError>;

    /// The role catalogue in store order.
    async fn list_roles(&self) -> Result<Vec<Role>, UserDirectoryRepositoryError>;

    /// Insert a user and return it with its assigned identifier.
    async fn insert_user(&self, user: &NewUser) -> Result<User, UserDirectoryRepositoryError>;

    /// Replace a user's profile fields.
    ///
    /// Returns `None` when the user no longer exists.
    async fn update_user(
        &self,
        update: &UserUpdate,
    ) -> Result<Option<User>, UserDirectoryRepositoryError>;

    /// Delete a user and its assignments. Returns whether a row was removed.
    async fn delete_user(&self, id: UserId) -> Result<bool, UserDirectoryRepositoryError>;

    /// Move the user's assignments to exactly `target`.
    ///
    /// Implementations lock the user, read its current roles, diff them with
    /// [`crate::domain::plan_role_changes`], check every role to add against
    /// the catalogue and apply the plan, all in one unit of work. Nothing is
    /// written unless the outcome is [`RoleReconciliation::Applied`].
    async fn reconcile_roles(
        &self,
        id: UserId,
        target: &BTreeSet<RoleName>,
    ) -> Result<RoleReconciliation, UserDirectoryRepositoryError>;
}
