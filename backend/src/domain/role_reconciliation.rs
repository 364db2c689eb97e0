//! Role reconciliation: diff a user's current roles against a target set.
//!
//! Validating the request and computing the diff are pure. The store reads
//! the current roles, checks the catalogue and applies the plan in one unit
//! of work through [`crate::domain::ports::UserDirectoryRepository::reconcile_roles`],
//! reporting back a [`RoleReconciliation`].

use std::collections::BTreeSet;

use serde_json::json;

use super::{Error, RoleName};

pub(crate) const NO_ROLES_MESSAGE: &str = "no roles provided";

/// Minimal set of assignment changes moving a user to a target role set.
///
/// Both sets are ordered by name so callers iterate them deterministically.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleChangePlan {
    pub to_add: BTreeSet<RoleName>,
    pub to_remove: BTreeSet<RoleName>,
}

impl RoleChangePlan {
    /// Whether applying the plan would change nothing.
    pub fn is_noop(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }

    /// The role set that results from applying the plan to `current`.
    pub fn applied_to(&self, current: &BTreeSet<RoleName>) -> BTreeSet<RoleName> {
        current
            .difference(&self.to_remove)
            .chain(self.to_add.iter())
            .cloned()
            .collect()
    }

    /// First role to add, in name order, for which `exists` is false.
    pub fn first_unknown_addition(
        &self,
        mut exists: impl FnMut(&RoleName) -> bool,
    ) -> Option<&RoleName> {
        self.to_add.iter().find(|name| !exists(name))
    }
}

/// What the store did with a reconciliation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleReconciliation {
    /// The plan was computed against the locked current roles and applied.
    /// A no-op plan performs no writes.
    Applied(RoleChangePlan),
    /// The user does not exist; nothing was written.
    UserNotFound,
    /// A role to add is missing from the catalogue; nothing was written.
    UnknownRole(RoleName),
}

/// Validate a requested role list into the target set.
///
/// Duplicate names collapse. Removing every role is not expressible, so an
/// empty request is rejected.
///
/// # Errors
/// [`crate::domain::ErrorCode::InvalidRequest`] when `requested` is empty or
/// contains a blank name.
pub fn role_target(requested: &[String]) -> Result<BTreeSet<RoleName>, Error> {
    if requested.is_empty() {
        return Err(Error::invalid_request(NO_ROLES_MESSAGE));
    }

    requested
        .iter()
        .map(|name| {
            RoleName::new(name.as_str()).map_err(|err| {
                Error::invalid_request(err.to_string()).with_details(json!({ "role": name }))
            })
        })
        .collect()
}

/// Assignments to add and remove so `current` becomes `target`.
pub fn plan_role_changes(
    current: &BTreeSet<RoleName>,
    target: &BTreeSet<RoleName>,
) -> RoleChangePlan {
    RoleChangePlan {
        to_add: target.difference(current).cloned().collect(),
        to_remove: current.difference(target).cloned().collect(),
    }
}

/// Validate `requested` and diff it against `current`.
///
/// # Errors
/// See [`role_target`].
///
/// # Examples
/// ```
/// use std::collections::BTreeSet;
/// use user_directory::domain::{RoleName, reconcile};
///
/// let current: BTreeSet<RoleName> = [RoleName::new("User").unwrap()].into();
/// let plan = reconcile(&current, &["User".to_owned(), "Admin".to_owned()]).unwrap();
/// assert_eq!(plan.to_add.len(), 1);
/// assert!(plan.to_remove.is_empty());
/// ```
pub fn reconcile(
    current: &BTreeSet<RoleName>,
    requested: &[String],
) -> Result<RoleChangePlan, Error> {
    role_target(requested).map(|target| plan_role_changes(current, &target))
}
