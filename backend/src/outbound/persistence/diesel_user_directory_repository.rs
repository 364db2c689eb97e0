//! PostgreSQL-backed `UserDirectoryRepository` implementation using Diesel.
//!
//! Users, roles and assignments live in three tables. Reads assemble each
//! user's role names from the assignment join. A role reconciliation runs in
//! one transaction that first takes a row lock on the user
//! (`SELECT ... FOR UPDATE`), so concurrent reconciliations of the same user
//! queue behind each other and each diffs against committed roles.

use std::collections::{BTreeSet, HashMap, HashSet};

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use tracing::debug;

use crate::domain::ports::{UserDirectoryRepository, UserDirectoryRepositoryError};
use crate::domain::{
    Email, NewUser, Role, RoleId, RoleName, RoleReconciliation, User, UserId, UserProfile,
    UserUpdate, plan_role_changes,
};

use super::diesel_basic_error_mapping::{
    is_unique_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{NewUserRoleRow, RoleRow, UserFieldsRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::{roles, user_roles, users};

/// Diesel-backed implementation of the [`UserDirectoryRepository`] port.
#[derive(Clone)]
pub struct DieselUserDirectoryRepository {
    pool: DbPool,
}

impl DieselUserDirectoryRepository {
    /// Create a repository over `pool`.
    ///
    /// ```rust,no_run
    /// use user_directory::outbound::persistence::{
    ///     DbPool, DieselUserDirectoryRepository, PoolConfig,
    /// };
    ///
    /// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
    /// let pool = DbPool::new(PoolConfig::new("postgres://localhost/directory")).await?;
    /// let repository = DieselUserDirectoryRepository::new(pool);
    /// # let _ = repository;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserDirectoryRepositoryError {
    map_basic_pool_error(error, UserDirectoryRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> UserDirectoryRepositoryError {
    map_basic_diesel_error(
        error,
        UserDirectoryRepositoryError::query,
        UserDirectoryRepositoryError::connection,
    )
}

/// Map a failed insert or update of `email`'s owner.
///
/// `users.email` is the only unique column a profile write can violate.
fn map_profile_write_error(
    error: diesel::result::Error,
    email: &Email,
) -> UserDirectoryRepositoryError {
    if is_unique_violation(&error) {
        return UserDirectoryRepositoryError::duplicate_email(email.to_string());
    }
    map_diesel_error(error)
}

/// Failure inside the reconciliation transaction.
#[derive(Debug)]
enum ReconcileError {
    Diesel(diesel::result::Error),
    Corrupt(UserDirectoryRepositoryError),
}

impl From<diesel::result::Error> for ReconcileError {
    fn from(value: diesel::result::Error) -> Self {
        Self::Diesel(value)
    }
}

impl From<ReconcileError> for UserDirectoryRepositoryError {
    fn from(value: ReconcileError) -> Self {
        match value {
            ReconcileError::Diesel(error) => map_diesel_error(error),
            ReconcileError::Corrupt(error) => error,
        }
    }
}

fn corrupt_row(what: &str, id: i32, reason: impl std::fmt::Display) -> UserDirectoryRepositoryError {
    UserDirectoryRepositoryError::query(format!("stored {what} {id} is invalid: {reason}"))
}

fn row_to_role_name(name: String) -> Result<RoleName, UserDirectoryRepositoryError> {
    RoleName::new(name).map_err(|err| UserDirectoryRepositoryError::query(err.to_string()))
}

fn row_to_user(row: UserRow, role_names: Vec<String>) -> Result<User, UserDirectoryRepositoryError> {
    let id = UserId::new(i64::from(row.id)).map_err(|err| corrupt_row("user", row.id, err))?;
    let profile = UserProfile::try_from_parts(row.name, row.email, i64::from(row.age))
        .map_err(|err| corrupt_row("user", row.id, err))?;
    let roles = role_names
        .into_iter()
        .map(row_to_role_name)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(User::new(id, profile, roles))
}

fn fields_row(profile: &UserProfile) -> UserFieldsRow<'_> {
    UserFieldsRow {
        name: profile.name.as_ref(),
        age: profile.age.value(),
        email: profile.email.as_ref(),
    }
}

async fn load_role_names(
    conn: &mut AsyncPgConnection,
    user_id: i32,
) -> QueryResult<Vec<String>> {
    user_roles::table
        .inner_join(roles::table)
        .filter(user_roles::user_id.eq(user_id))
        .select(roles::name)
        .order(roles::id.asc())
        .load::<String>(conn)
        .await
}

#[async_trait]
impl UserDirectoryRepository for DieselUserDirectoryRepository {
    async fn list_users_with_roles(&self) -> Result<Vec<User>, UserDirectoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<UserRow> = users::table
            .select(UserRow::as_select())
            .order(users::id.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let assignments: Vec<(i32, String)> = user_roles::table
            .inner_join(roles::table)
            .select((user_roles::user_id, roles::name))
            .order((user_roles::user_id.asc(), roles::id.asc()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let mut by_user: HashMap<i32, Vec<String>> = HashMap::new();
        for (user_id, name) in assignments {
            by_user.entry(user_id).or_default().push(name);
        }

        rows.into_iter()
            .map(|row| {
                let names = by_user.remove(&row.id).unwrap_or_default();
                row_to_user(row, names)
            })
            .collect()
    }

    async fn find_user(&self, id: UserId) -> Result<Option<User>, UserDirectoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let Some(row) = users::table
            .find(id.value())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
        else {
            return Ok(None);
        };

        let names = load_role_names(&mut conn, row.id)
            .await
            .map_err(map_diesel_error)?;
        row_to_user(row, names).map(Some)
    }

    async fn email_exists(&self, email: &Email) -> Result<bool, UserDirectoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::select(diesel::dsl::exists(
            users::table.filter(users::email.eq(email.as_ref())),
        ))
        .get_result(&mut conn)
        .await
        .map_err(map_diesel_error)
    }

    async fn list_roles(&self) -> Result<Vec<Role>, UserDirectoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<RoleRow> = roles::table
            .select(RoleRow::as_select())
            .order(roles::id.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter()
            .map(|row| {
                Ok(Role {
                    id: RoleId::new(row.id),
                    name: row_to_role_name(row.name)?,
                })
            })
            .collect()
    }

    async fn insert_user(&self, user: &NewUser) -> Result<User, UserDirectoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: UserRow = diesel::insert_into(users::table)
            .values(fields_row(user))
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| map_profile_write_error(err, &user.email))?;
        debug!(user_id = row.id, "inserted user row");
        row_to_user(row, Vec::new())
    }

    async fn update_user(
        &self,
        update: &UserUpdate,
    ) -> Result<Option<User>, UserDirectoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let Some(row) = diesel::update(users::table.find(update.id.value()))
            .set(fields_row(&update.profile))
            .returning(UserRow::as_returning())
            .get_result::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(|err| map_profile_write_error(err, &update.profile.email))?
        else {
            return Ok(None);
        };

        let names = load_role_names(&mut conn, row.id)
            .await
            .map_err(map_diesel_error)?;
        row_to_user(row, names).map(Some)
    }

    async fn delete_user(&self, id: UserId) -> Result<bool, UserDirectoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let removed = diesel::delete(users::table.find(id.value()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(removed > 0)
    }

    async fn reconcile_roles(
        &self,
        id: UserId,
        target: &BTreeSet<RoleName>,
    ) -> Result<RoleReconciliation, UserDirectoryRepositoryError> {
        let user_id = id.value();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction(|conn| {
            async move {
                let locked = users::table
                    .find(user_id)
                    .select(users::id)
                    .for_update()
                    .first::<i32>(conn)
                    .await
                    .optional()?;
                if locked.is_none() {
                    return Ok(RoleReconciliation::UserNotFound);
                }

                let current = load_role_names(conn, user_id)
                    .await?
                    .into_iter()
                    .map(row_to_role_name)
                    .collect::<Result<BTreeSet<_>, _>>()
                    .map_err(ReconcileError::Corrupt)?;
                let plan = plan_role_changes(&current, target);

                let wanted: Vec<&str> = plan.to_add.iter().map(AsRef::as_ref).collect();
                let found: Vec<RoleRow> = if wanted.is_empty() {
                    Vec::new()
                } else {
                    roles::table
                        .filter(roles::name.eq_any(wanted.clone()))
                        .select(RoleRow::as_select())
                        .load(conn)
                        .await?
                };
                let known: HashSet<&str> = found.iter().map(|row| row.name.as_str()).collect();
                let unknown = plan.first_unknown_addition(|name| {
                    let name: &str = name.as_ref();
                    known.contains(name)
                });
                if let Some(missing) = unknown {
                    return Ok(RoleReconciliation::UnknownRole(missing.clone()));
                }

                if !found.is_empty() {
                    let rows: Vec<NewUserRoleRow> = found
                        .iter()
                        .map(|role| NewUserRoleRow {
                            user_id,
                            role_id: role.id,
                        })
                        .collect();
                    diesel::insert_into(user_roles::table)
                        .values(&rows)
                        .on_conflict_do_nothing()
                        .execute(conn)
                        .await?;
                }

                if !plan.to_remove.is_empty() {
                    let unwanted: Vec<&str> = plan.to_remove.iter().map(AsRef::as_ref).collect();
                    let role_ids = roles::table
                        .filter(roles::name.eq_any(unwanted))
                        .select(roles::id);
                    diesel::delete(
                        user_roles::table
                            .filter(user_roles::user_id.eq(user_id))
                            .filter(user_roles::role_id.eq_any(role_ids)),
                    )
                    .execute(conn)
                    .await?;
                }

                debug!(
                    user_id,
                    added = plan.to_add.len(),
                    removed = plan.to_remove.len(),
                    "reconciled user roles"
                );
                Ok::<_, ReconcileError>(RoleReconciliation::Applied(plan))
            }
            .scope_boxed()
        })
        .await
        .map_err(UserDirectoryRepositoryError::from)
    }
}
