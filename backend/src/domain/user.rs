//! User data model.
//!
//! Users are identified by a positive integer key assigned by the store.
//! Their role list is derived from the assignment relation and carries no
//! meaningful order until it is arranged for display with a
//! [`RolePriority`].

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use super::{RoleName, RolePriority};

/// Validation errors returned by the user value constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    InvalidId { value: i64 },
    EmptyName,
    EmptyEmail,
    InvalidEmail,
    NonPositiveAge { value: i64 },
}

impl UserValidationError {
    /// Name of the request field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidId { .. } => "id",
            Self::EmptyName => "name",
            Self::EmptyEmail | Self::InvalidEmail => "email",
            Self::NonPositiveAge { .. } => "age",
        }
    }
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidId { value } => write!(f, "user id must be a positive integer (got {value})"),
            Self::EmptyName => write!(f, "name must not be empty"),
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::InvalidEmail => write!(f, "email must be a valid e-mail address"),
            Self::NonPositiveAge { value } => {
                write!(f, "age must be greater than 0 (got {value})")
            }
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Stable user identifier assigned by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UserId(i32);

impl UserId {
    /// Validate and construct a [`UserId`].
    pub fn new(id: i64) -> Result<Self, UserValidationError> {
        i32::try_from(id)
            .ok()
            .filter(|value| *value > 0)
            .map(Self)
            .ok_or(UserValidationError::InvalidId { value: id })
    }

    /// Raw key as stored.
    pub fn value(self) -> i32 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Human readable user name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserName(String);

impl UserName {
    /// Validate and construct a [`UserName`]; it must not be blank.
    pub fn new(name: impl Into<String>) -> Result<Self, UserValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(UserValidationError::EmptyName);
        }
        Ok(Self(name))
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        let pattern = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";
        Regex::new(pattern).unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Syntactically valid e-mail address.
///
/// Uniqueness is not a property of the value; it is checked against the
/// store before any mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email(String);

impl Email {
    /// Validate and construct an [`Email`].
    pub fn new(email: impl Into<String>) -> Result<Self, UserValidationError> {
        let email = email.into();
        if email.trim().is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if !email_regex().is_match(&email) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(email))
    }

    /// ASCII case-insensitive comparison, used to decide whether an edit
    /// actually changes the address.
    pub fn eq_ignore_case(&self, other: &Email) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Strictly positive age in years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Age(i32);

impl Age {
    /// Validate and construct an [`Age`].
    pub fn new(age: i64) -> Result<Self, UserValidationError> {
        i32::try_from(age)
            .ok()
            .filter(|value| *value > 0)
            .map(Self)
            .ok_or(UserValidationError::NonPositiveAge { value: age })
    }

    /// Age in years.
    pub fn value(self) -> i32 {
        self.0
    }
}

/// Application user with the names of the roles currently assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    name: UserName,
    age: Age,
    email: Email,
    roles: Vec<RoleName>,
}

impl User {
    /// Build a [`User`] from validated components.
    pub fn new(id: UserId, profile: UserProfile, roles: Vec<RoleName>) -> Self {
        let UserProfile { name, email, age } = profile;
        Self {
            id,
            name,
            age,
            email,
            roles,
        }
    }

    /// Stable identifier.
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Display name.
    pub fn name(&self) -> &UserName {
        &self.name
    }

    /// Age in years.
    pub fn age(&self) -> Age {
        self.age
    }

    /// Contact address.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Assigned role names, in whatever order they were last arranged.
    pub fn roles(&self) -> &[RoleName] {
        &self.roles
    }

    /// Whether the user holds a role with exactly this name.
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|held| held.as_ref() == role)
    }

    /// Highest-priority role once the list has been arranged by priority.
    pub fn primary_role(&self) -> Option<&RoleName> {
        self.roles.first()
    }

    /// Reorder the role list highest priority first.
    ///
    /// Only the presentation order changes; the set of roles is untouched.
    pub fn arrange_roles(&mut self, priority: &RolePriority) {
        priority.arrange(&mut self.roles);
    }

    /// Consuming variant of [`User::arrange_roles`].
    pub fn with_roles_arranged(mut self, priority: &RolePriority) -> Self {
        self.arrange_roles(priority);
        self
    }
}

/// Editable user fields shared by create and edit payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub name: UserName,
    pub email: Email,
    pub age: Age,
}

impl UserProfile {
    /// Validate raw field values.
    ///
    /// Fields are checked in the order name, email, age; the first failure
    /// is returned.
    pub fn try_from_parts(
        name: impl Into<String>,
        email: impl Into<String>,
        age: i64,
    ) -> Result<Self, UserValidationError> {
        Ok(Self {
            name: UserName::new(name)?,
            email: Email::new(email)?,
            age: Age::new(age)?,
        })
    }
}

/// Payload for creating a user.
pub type NewUser = UserProfile;

/// Payload for replacing an existing user's profile fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserUpdate {
    pub id: UserId,
    pub profile: UserProfile,
}

#[cfg(test)]
mod tests;
