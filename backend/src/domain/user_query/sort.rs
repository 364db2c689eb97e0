//! Sort stage of the user listing pipeline.

use std::cmp::Ordering;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use crate::domain::{RolePriority, User};

/// Field a listing is ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    Id,
    Name,
    Age,
    Email,
    Role,
}

/// Direction of a listing order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// Requested listing order. Defaults to id ascending.
///
/// Parsing is lenient and never fails: `NameDesc`, `name-descending` and
/// `name_desc` are equivalent, a key without a direction is ascending, and
/// anything unrecognised falls back to the default.
///
/// # Examples
/// ```
/// use user_directory::domain::{SortDirection, SortKey, UserSortOrder};
///
/// let order: UserSortOrder = "role-descending".parse().unwrap_or_default();
/// assert_eq!(order.key, SortKey::Role);
/// assert_eq!(order.direction, SortDirection::Descending);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UserSortOrder {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl UserSortOrder {
    pub const fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    fn parse_lenient(raw: &str) -> Self {
        let normalised: String = raw
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .flat_map(char::to_lowercase)
            .collect();

        let (rest, direction) = [
            ("descending", SortDirection::Descending),
            ("desc", SortDirection::Descending),
            ("ascending", SortDirection::Ascending),
            ("asc", SortDirection::Ascending),
        ]
        .into_iter()
        .find_map(|(suffix, direction)| {
            normalised
                .strip_suffix(suffix)
                .map(|rest| (rest.to_owned(), direction))
        })
        .unwrap_or((normalised, SortDirection::Ascending));

        let key = match rest.as_str() {
            "id" => SortKey::Id,
            "name" => SortKey::Name,
            "age" => SortKey::Age,
            "email" => SortKey::Email,
            "role" => SortKey::Role,
            _ => return Self::default(),
        };
        Self { key, direction }
    }
}

impl FromStr for UserSortOrder {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse_lenient(s))
    }
}

impl fmt::Display for UserSortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = match self.key {
            SortKey::Id => "id",
            SortKey::Name => "name",
            SortKey::Age => "age",
            SortKey::Email => "email",
            SortKey::Role => "role",
        };
        let direction = match self.direction {
            SortDirection::Ascending => "ascending",
            SortDirection::Descending => "descending",
        };
        write!(f, "{key}-{direction}")
    }
}

/// Order two users by their highest-priority role.
///
/// Roles must already be arranged by `priority`. A user without roles
/// orders after every user holding one.
fn compare_primary_role(priority: &RolePriority, left: &User, right: &User) -> Ordering {
    match (left.primary_role(), right.primary_role()) {
        (Some(l), Some(r)) => priority.compare(l.as_ref(), r.as_ref()),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn compare(key: SortKey, priority: &RolePriority, left: &User, right: &User) -> Ordering {
    match key {
        SortKey::Id => left.id().cmp(&right.id()),
        SortKey::Name => left.name().as_ref().cmp(right.name().as_ref()),
        SortKey::Age => left.age().cmp(&right.age()),
        SortKey::Email => left.email().as_ref().cmp(right.email().as_ref()),
        SortKey::Role => compare_primary_role(priority, left, right),
    }
}

/// Arrange every user's roles by priority, then order the users.
///
/// The sort is stable: users with equal keys keep their relative input
/// order in both directions.
pub fn sort_users(users: &mut [User], order: UserSortOrder, priority: &RolePriority) {
    for user in users.iter_mut() {
        user.arrange_roles(priority);
    }
    match order.direction {
        SortDirection::Ascending => {
            users.sort_by(|a, b| compare(order.key, priority, a, b));
        }
        SortDirection::Descending => {
            users.sort_by(|a, b| compare(order.key, priority, a, b).reverse());
        }
    }
}
