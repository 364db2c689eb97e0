//! Driving port for user directory mutations.

use async_trait::async_trait;

use crate::domain::{Error, NewUser, RoleName, User, UserId, UserUpdate};

/// Assignments changed by a role update, each list ordered by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleChangeOutcome {
    pub added: Vec<RoleName>,
    pub removed: Vec<RoleName>,
}

/// Domain use-case port for creating, editing and deleting users and for
/// reconciling their roles.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersCommand: Send + Sync {
    /// Create a user after checking the email is free.
    ///
    /// # Errors
    /// `Conflict` when the email is already taken.
    async fn create_user(&self, user: NewUser) -> Result<User, Error>;

    /// Replace a user's profile fields.
    ///
    /// # Errors
    /// `NotFound` for an unknown user; `Conflict` when the email changes to
    /// one already taken.
    async fn edit_user(&self, update: UserUpdate) -> Result<User, Error>;

    /// Delete a user together with its role assignments.
    async fn delete_user(&self, id: UserId) -> Result<(), Error>;

    /// Bring the user's roles to exactly `requested`.
    ///
    /// # Errors
    /// `InvalidRequest` for an empty list; `NotFound` for an unknown user or
    /// an unknown role, in which case nothing is changed.
    async fn change_roles(
        &self,
        id: UserId,
        requested: Vec<String>,
    ) -> Result<RoleChangeOutcome, Error>;
}
