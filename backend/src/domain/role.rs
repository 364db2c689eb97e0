//! Roles and their display priority.
//!
//! The priority table is a ranking used only for presentation and sorting.
//! It plays no part in authorisation.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

/// Ranking applied when no override is configured, highest first.
pub const DEFAULT_ROLE_PRIORITY: [&str; 4] = ["SuperAdmin", "Admin", "Support", "User"];

/// Validation errors returned by [`RoleName::new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoleValidationError {
    #[error("role name must not be empty")]
    EmptyName,
}

/// Stable role identifier assigned by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RoleId(i32);

impl RoleId {
    pub fn new(id: i32) -> Self {
        Self(id)
    }

    pub fn value(self) -> i32 {
        self.0
    }
}

/// Unique role name, compared case-sensitively.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RoleName(String);

impl RoleName {
    /// Validate and construct a [`RoleName`].
    pub fn new(name: impl Into<String>) -> Result<Self, RoleValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(RoleValidationError::EmptyName);
        }
        Ok(Self(name))
    }
}

impl AsRef<str> for RoleName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for RoleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<RoleName> for String {
    fn from(value: RoleName) -> Self {
        value.0
    }
}

/// Catalogue entry for a role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    pub id: RoleId,
    pub name: RoleName,
}

/// Immutable ranking from role name to priority.
///
/// Rank 0 is the highest priority. Names missing from the table are
/// unranked and order after every ranked name; among themselves they order
/// ordinally so the outcome is stable across runs.
///
/// # Examples
/// ```
/// use std::cmp::Ordering;
/// use user_directory::domain::RolePriority;
///
/// let priority = RolePriority::default();
/// assert_eq!(priority.compare("SuperAdmin", "User"), Ordering::Less);
/// assert_eq!(priority.compare("User", "Auditor"), Ordering::Less);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RolePriority {
    ranks: HashMap<String, usize>,
}

impl RolePriority {
    /// Build a ranking from names listed highest priority first.
    ///
    /// A name listed twice keeps its first position.
    pub fn new<I, S>(ordered: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut ranks = HashMap::new();
        for (rank, name) in ordered.into_iter().enumerate() {
            ranks.entry(name.into()).or_insert(rank);
        }
        Self { ranks }
    }

    /// Rank of `name`, or `None` when unranked.
    pub fn rank(&self, name: &str) -> Option<usize> {
        self.ranks.get(name).copied()
    }

    /// Order two role names, highest priority first.
    pub fn compare(&self, left: &str, right: &str) -> Ordering {
        match (self.rank(left), self.rank(right)) {
            (Some(l), Some(r)) => l.cmp(&r),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => left.cmp(right),
        }
    }

    /// Sort role names in place, highest priority first.
    pub fn arrange<R: AsRef<str>>(&self, roles: &mut [R]) {
        roles.sort_by(|a, b| self.compare(a.as_ref(), b.as_ref()));
    }

    /// Sort catalogue entries in place, highest priority first.
    pub fn arrange_catalogue(&self, roles: &mut [Role]) {
        roles.sort_by(|a, b| self.compare(a.name.as_ref(), b.name.as_ref()));
    }
}

impl Default for RolePriority {
    fn default() -> Self {
        Self::new(DEFAULT_ROLE_PRIORITY)
    }
}
