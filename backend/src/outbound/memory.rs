//! In-process `UserDirectoryRepository` adapter.
//!
//! Serves the directory when no database is configured and backs the
//! behaviour tests. State sits behind one mutex and every operation holds
//! it from first read to last write, so a role reconciliation sees and
//! replaces the roles of one consistent snapshot.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{UserDirectoryRepository, UserDirectoryRepositoryError};
use crate::domain::{
    Email, NewUser, Role, RoleId, RoleName, RoleReconciliation, User, UserId, UserProfile,
    UserUpdate, plan_role_changes,
};

const SEED_ROLES: [(i32, &str); 4] = [(1, "User"), (2, "Support"), (3, "Admin"), (4, "SuperAdmin")];

const SEED_USERS: [(i32, &str, i32, &str); 9] = [
    (1, "Ivan Alexeev", 32, "i.alexeev@gmail.com"),
    (2, "Oleg Andreev", 22, "o.andreev@gmail.com"),
    (3, "Olga Petrova", 24, "o.petrova@gmail.com"),
    (4, "Elena Ivanova", 29, "e.ivanova@gmail.com"),
    (5, "Pavel Durov", 38, "p.durov@telegram.com"),
    (6, "Elon Musk", 52, "e.musk@spaceX.com"),
    (7, "Bill Gates", 67, "b.gates@microsoft.com"),
    (8, "Tim Cook", 62, "t.cook@apple.com"),
    (9, "Mark Zuckerberg", 39, "m.zuckerberg@meta.com"),
];

const SEED_ASSIGNMENTS: [(i32, i32); 12] = [
    (1, 1),
    (2, 1),
    (3, 1),
    (4, 1),
    (5, 3),
    (5, 4),
    (6, 2),
    (7, 3),
    (7, 4),
    (8, 2),
    (9, 2),
    (9, 3),
];

#[derive(Debug, Default)]
struct Directory {
    users: BTreeMap<i32, UserProfile>,
    roles: BTreeMap<i32, RoleName>,
    assignments: BTreeSet<(i32, i32)>,
    next_user_id: i32,
}

impl Directory {
    fn role_id(&self, name: &RoleName) -> Option<i32> {
        self.roles
            .iter()
            .find_map(|(id, role)| (role == name).then_some(*id))
    }

    /// Role names held by `user_id`, in role id order.
    fn role_names(&self, user_id: i32) -> Vec<RoleName> {
        self.assignments
            .range((user_id, i32::MIN)..=(user_id, i32::MAX))
            .filter_map(|(_, role_id)| self.roles.get(role_id).cloned())
            .collect()
    }

    fn user(&self, id: i32) -> Result<Option<User>, UserDirectoryRepositoryError> {
        let Some(profile) = self.users.get(&id) else {
            return Ok(None);
        };
        let user_id = UserId::new(i64::from(id))
            .map_err(|err| UserDirectoryRepositoryError::query(err.to_string()))?;
        Ok(Some(User::new(user_id, profile.clone(), self.role_names(id))))
    }

    fn email_taken(&self, email: &Email) -> bool {
        self.users.values().any(|profile| profile.email == *email)
    }

    fn duplicate(email: &Email) -> UserDirectoryRepositoryError {
        UserDirectoryRepositoryError::duplicate_email(email.to_string())
    }
}

/// Mutex-guarded directory held in memory.
#[derive(Debug, Default)]
pub struct InMemoryUserDirectoryRepository {
    state: Mutex<Directory>,
}

impl InMemoryUserDirectoryRepository {
    /// An empty directory with an empty role catalogue.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The reference data set: four roles, nine users and twelve
    /// assignments.
    ///
    /// # Errors
    ///
    /// Returns a query error if the seed data fails domain validation.
    pub fn seeded() -> Result<Self, UserDirectoryRepositoryError> {
        let invalid = |err: &dyn std::fmt::Display| {
            UserDirectoryRepositoryError::query(format!("invalid seed data: {err}"))
        };

        let mut directory = Directory::default();
        for (id, name) in SEED_ROLES {
            let name = RoleName::new(name).map_err(|err| invalid(&err))?;
            directory.roles.insert(id, name);
        }
        for (id, name, age, email) in SEED_USERS {
            let profile = UserProfile::try_from_parts(name, email, i64::from(age))
                .map_err(|err| invalid(&err))?;
            directory.users.insert(id, profile);
        }
        directory.assignments.extend(SEED_ASSIGNMENTS);
        directory.next_user_id = SEED_USERS.iter().map(|(id, ..)| *id).max().unwrap_or(0) + 1;

        Ok(Self {
            state: Mutex::new(directory),
        })
    }

    /// Add a role to the catalogue, returning its identifier.
    ///
    /// Adding a name that already exists returns the existing identifier.
    pub fn add_role(&self, name: RoleName) -> Result<RoleId, UserDirectoryRepositoryError> {
        let mut state = self.lock()?;
        if let Some(id) = state.role_id(&name) {
            return Ok(RoleId::new(id));
        }
        let id = state.roles.keys().next_back().copied().unwrap_or(0) + 1;
        state.roles.insert(id, name);
        Ok(RoleId::new(id))
    }

    fn lock(&self) -> Result<MutexGuard<'_, Directory>, UserDirectoryRepositoryError> {
        self.state
            .lock()
            .map_err(|_| UserDirectoryRepositoryError::connection("in-memory directory poisoned"))
    }
}

#[async_trait]
impl UserDirectoryRepository for InMemoryUserDirectoryRepository {
    async fn list_users_with_roles(&self) -> Result<Vec<User>, UserDirectoryRepositoryError> {
        let state = self.lock()?;
        let mut users = Vec::with_capacity(state.users.len());
        for id in state.users.keys() {
            if let Some(user) = state.user(*id)? {
                users.push(user);
            }
        }
        Ok(users)
    }

    async fn find_user(&self, id: UserId) -> Result<Option<User>, UserDirectoryRepositoryError> {
        self.lock()?.user(id.value())
    }

    async fn email_exists(&self, email: &Email) -> Result<bool, UserDirectoryRepositoryError> {
        Ok(self.lock()?.email_taken(email))
    }

    async fn list_roles(&self) -> Result<Vec<Role>, UserDirectoryRepositoryError> {
        Ok(self
            .lock()?
            .roles
            .iter()
            .map(|(id, name)| Role {
                id: RoleId::new(*id),
                name: name.clone(),
            })
            .collect())
    }

    async fn insert_user(&self, user: &NewUser) -> Result<User, UserDirectoryRepositoryError> {
        let mut state = self.lock()?;
        if state.email_taken(&user.email) {
            return Err(Directory::duplicate(&user.email));
        }
        let id = state.next_user_id.max(1);
        state.next_user_id = id + 1;
        state.users.insert(id, user.clone());
        state
            .user(id)?
            .ok_or_else(|| UserDirectoryRepositoryError::query("inserted user vanished"))
    }

    async fn update_user(
        &self,
        update: &UserUpdate,
    ) -> Result<Option<User>, UserDirectoryRepositoryError> {
        let mut state = self.lock()?;
        let id = update.id.value();
        let clashes = state
            .users
            .iter()
            .any(|(other, profile)| *other != id && profile.email == update.profile.email);
        if clashes {
            return Err(Directory::duplicate(&update.profile.email));
        }
        match state.users.get_mut(&id) {
            Some(profile) => *profile = update.profile.clone(),
            None => return Ok(None),
        }
        state.user(id)
    }

    async fn delete_user(&self, id: UserId) -> Result<bool, UserDirectoryRepositoryError> {
        let mut state = self.lock()?;
        let id = id.value();
        let removed = state.users.remove(&id).is_some();
        state.assignments.retain(|(user_id, _)| *user_id != id);
        Ok(removed)
    }

    async fn reconcile_roles(
        &self,
        id: UserId,
        target: &BTreeSet<RoleName>,
    ) -> Result<RoleReconciliation, UserDirectoryRepositoryError> {
        let mut state = self.lock()?;
        let user_id = id.value();
        if !state.users.contains_key(&user_id) {
            return Ok(RoleReconciliation::UserNotFound);
        }

        let current: BTreeSet<RoleName> = state.role_names(user_id).into_iter().collect();
        let plan = plan_role_changes(&current, target);
        if let Some(missing) = plan.first_unknown_addition(|name| state.role_id(name).is_some()) {
            return Ok(RoleReconciliation::UnknownRole(missing.clone()));
        }

        let additions: Vec<i32> = plan
            .to_add
            .iter()
            .filter_map(|name| state.role_id(name))
            .collect();
        let removals: Vec<i32> = plan
            .to_remove
            .iter()
            .filter_map(|name| state.role_id(name))
            .collect();
        for role_id in additions {
            state.assignments.insert((user_id, role_id));
        }
        for role_id in removals {
            state.assignments.remove(&(user_id, role_id));
        }
        Ok(RoleReconciliation::Applied(plan))
    }
}
