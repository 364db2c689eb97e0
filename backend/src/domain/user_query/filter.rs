//! Filter stage of the user listing pipeline.
//!
//! Criteria are conjunctive and order independent. The stage only removes
//! users; the relative order of survivors is preserved.

use crate::domain::User;

/// Criteria narrowing a user listing.
///
/// Empty strings and age bounds of `0` are treated as absent. An age bound
/// of exactly zero therefore cannot be expressed.
///
/// # Examples
/// ```
/// use user_directory::domain::UserFilter;
///
/// let filter = UserFilter::default().with_age_range(30, 0);
/// assert_eq!(filter.age_from(), Some(30));
/// assert_eq!(filter.age_to(), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    role: Option<String>,
    name: Option<String>,
    email: Option<String>,
    age_from: Option<i32>,
    age_to: Option<i32>,
}

fn non_empty(value: impl Into<String>) -> Option<String> {
    Some(value.into()).filter(|value| !value.is_empty())
}

fn non_zero(value: i32) -> Option<i32> {
    (value != 0).then_some(value)
}

impl UserFilter {
    /// Keep users holding a role with exactly this name.
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = non_empty(role);
        self
    }

    /// Keep users whose name contains this substring.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = non_empty(name);
        self
    }

    /// Keep users whose email contains this substring.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = non_empty(email);
        self
    }

    /// Keep users whose age lies in `[from, to]`; `0` leaves a side open.
    pub fn with_age_range(mut self, from: i32, to: i32) -> Self {
        self.age_from = non_zero(from);
        self.age_to = non_zero(to);
        self
    }

    pub fn role(&self) -> Option<&str> {
        self.role.as_deref()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn age_from(&self) -> Option<i32> {
        self.age_from
    }

    pub fn age_to(&self) -> Option<i32> {
        self.age_to
    }

    /// Whether no criterion is set.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Whether `user` satisfies every set criterion.
    pub fn matches(&self, user: &User) -> bool {
        let role_ok = self.role().is_none_or(|role| user.has_role(role));
        let name_ok = self
            .name()
            .is_none_or(|needle| user.name().as_ref().contains(needle));
        let email_ok = self
            .email()
            .is_none_or(|needle| user.email().as_ref().contains(needle));
        let age = user.age().value();
        let from_ok = self.age_from.is_none_or(|from| age >= from);
        let to_ok = self.age_to.is_none_or(|to| age <= to);

        role_ok && name_ok && email_ok && from_ok && to_ok
    }
}

/// Drop every user that fails `filter`, keeping the input order.
pub fn filter_users(mut users: Vec<User>, filter: &UserFilter) -> Vec<User> {
    if !filter.is_empty() {
        users.retain(|user| filter.matches(user));
    }
    users
}
