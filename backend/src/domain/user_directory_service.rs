//! User directory domain service.
//!
//! Implements the driving ports on top of a [`UserDirectoryRepository`]. The
//! listing pipeline is pure; this service fetches its input and checks
//! preconditions against the store. Role changes are validated here and
//! then reconciled by the store in one unit of work. A store-side duplicate
//! email is reported as a conflict, the same as the upfront check.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::Paginated;
use serde_json::json;
use tracing::{debug, info};

use crate::domain::ports::{
    RoleChangeOutcome, UserDirectoryRepository, UserDirectoryRepositoryError, UsersCommand,
    UsersQuery,
};
use crate::domain::{
    Email, Error, ListUsersRequest, NewUser, Role, RoleName, RolePriority, RoleReconciliation,
    User, UserId, UserUpdate, list_page, role_target,
};

/// Directory service implementing [`UsersQuery`] and [`UsersCommand`].
#[derive(Clone)]
pub struct UserDirectoryService<R> {
    repo: Arc<R>,
    priority: Arc<RolePriority>,
}

impl<R> UserDirectoryService<R> {
    /// Create a service over `repo`, ranking roles with `priority`.
    pub fn new(repo: Arc<R>, priority: RolePriority) -> Self {
        Self {
            repo,
            priority: Arc::new(priority),
        }
    }
}

fn map_repository_error(error: UserDirectoryRepositoryError) -> Error {
    match error {
        UserDirectoryRepositoryError::Connection { message } => {
            Error::internal(format!("user directory unavailable: {message}"))
        }
        UserDirectoryRepositoryError::Query { message } => {
            Error::internal(format!("user directory error: {message}"))
        }
        UserDirectoryRepositoryError::DuplicateEmail { email } => email_taken(&email),
    }
}

fn role_not_found(name: &RoleName) -> Error {
    Error::not_found(format!("role {name} not found")).with_details(json!({ "role": name.as_ref() }))
}

fn user_not_found(id: UserId) -> Error {
    Error::not_found(format!("user with id {id} not found")).with_details(json!({ "userId": id.value() }))
}

fn email_taken(email: impl std::fmt::Display) -> Error {
    Error::conflict(format!("{email} has already been taken"))
        .with_details(json!({ "field": "email" }))
}

impl<R> UserDirectoryService<R>
where
    R: UserDirectoryRepository,
{
    async fn require_user(&self, id: UserId) -> Result<User, Error> {
        self.repo
            .find_user(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| user_not_found(id))
    }

    async fn ensure_email_free(&self, email: &Email) -> Result<(), Error> {
        let taken = self
            .repo
            .email_exists(email)
            .await
            .map_err(map_repository_error)?;
        if taken {
            debug!(%email, "email already taken");
            return Err(email_taken(email));
        }
        Ok(())
    }
}

#[async_trait]
impl<R> UsersQuery for UserDirectoryService<R>
where
    R: UserDirectoryRepository,
{
    async fn list_users(&self, request: ListUsersRequest) -> Result<Paginated<User>, Error> {
        let users = self
            .repo
            .list_users_with_roles()
            .await
            .map_err(map_repository_error)?;
        let fetched = users.len();

        let page = list_page(users, &request, &self.priority)?;
        info!(
            fetched,
            page = page.pagination().current_page(),
            page_size = page.pagination().page_size(),
            total_count = page.pagination().total_count(),
            order = %request.order,
            "listed users"
        );
        Ok(page)
    }

    async fn get_user(&self, id: UserId) -> Result<User, Error> {
        let user = self.require_user(id).await?;
        Ok(user.with_roles_arranged(&self.priority))
    }

    async fn list_roles(&self) -> Result<Vec<Role>, Error> {
        let mut roles = self.repo.list_roles().await.map_err(map_repository_error)?;
        self.priority.arrange_catalogue(&mut roles);
        Ok(roles)
    }
}

#[async_trait]
impl<R> UsersCommand for UserDirectoryService<R>
where
    R: UserDirectoryRepository,
{
    async fn create_user(&self, user: NewUser) -> Result<User, Error> {
        self.ensure_email_free(&user.email).await?;
        let created = self
            .repo
            .insert_user(&user)
            .await
            .map_err(map_repository_error)?;
        info!(user_id = %created.id(), "created user");
        Ok(created)
    }

    async fn edit_user(&self, update: UserUpdate) -> Result<User, Error> {
        let existing = self.require_user(update.id).await?;
        if !existing.email().eq_ignore_case(&update.profile.email) {
            self.ensure_email_free(&update.profile.email).await?;
        }

        let updated = self
            .repo
            .update_user(&update)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| user_not_found(update.id))?;
        info!(user_id = %update.id, "edited user");
        Ok(updated.with_roles_arranged(&self.priority))
    }

    async fn delete_user(&self, id: UserId) -> Result<(), Error> {
        let deleted = self
            .repo
            .delete_user(id)
            .await
            .map_err(map_repository_error)?;
        if !deleted {
            return Err(user_not_found(id));
        }
        info!(user_id = %id, "deleted user");
        Ok(())
    }

    async fn change_roles(
        &self,
        id: UserId,
        requested: Vec<String>,
    ) -> Result<RoleChangeOutcome, Error> {
        self.require_user(id).await?;
        let target = role_target(&requested)?;

        let reconciliation = self
            .repo
            .reconcile_roles(id, &target)
            .await
            .map_err(map_repository_error)?;
        let plan = match reconciliation {
            RoleReconciliation::Applied(plan) => plan,
            RoleReconciliation::UserNotFound => return Err(user_not_found(id)),
            RoleReconciliation::UnknownRole(name) => {
                debug!(user_id = %id, role = %name, "requested role does not exist");
                return Err(role_not_found(&name));
            }
        };

        if plan.is_noop() {
            debug!(user_id = %id, "roles already match request");
            return Ok(RoleChangeOutcome::default());
        }
        info!(
            user_id = %id,
            added = plan.to_add.len(),
            removed = plan.to_remove.len(),
            "changed user roles"
        );
        Ok(RoleChangeOutcome {
            added: plan.to_add.into_iter().collect(),
            removed: plan.to_remove.into_iter().collect(),
        })
    }
}

#[cfg(test)]
#[path = "user_directory_service_tests.rs"]
mod tests;
