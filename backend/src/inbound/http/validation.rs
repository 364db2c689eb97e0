//! Shared validation helpers for inbound HTTP adapters.
//!
//! Field failures are reported as `invalid_request` errors whose `details`
//! name the offending field and a machine-readable code, so clients can
//! highlight the input that needs fixing.

use serde_json::json;

use crate::domain::{Error, UserId, UserValidationError};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidId,
    EmptyName,
    InvalidEmail,
    InvalidAge,
    MalformedBody,
    MalformedQuery,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidId => "invalid_id",
            ErrorCode::EmptyName => "empty_name",
            ErrorCode::InvalidEmail => "invalid_email",
            ErrorCode::InvalidAge => "invalid_age",
            ErrorCode::MalformedBody => "malformed_body",
            ErrorCode::MalformedQuery => "malformed_query",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

pub(crate) const USER_ID: FieldName = FieldName::new("userId");

/// Builder for validation errors with field context.
struct ValidationError {
    field: String,
    message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code.as_str(),
        }))
    }

    fn with_value(self, code: ErrorCode, value: impl Into<serde_json::Value>) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value.into(),
            "code": code.as_str(),
        }))
    }
}

/// Translate a user field failure into a client-facing error.
pub(crate) fn user_validation_error(err: UserValidationError) -> Error {
    let field = err.field();
    let message = err.to_string();
    match err {
        UserValidationError::InvalidId { value } => {
            ValidationError::new(USER_ID.as_str(), message).with_value(ErrorCode::InvalidId, value)
        }
        UserValidationError::EmptyName => {
            ValidationError::new(field, message).with_code(ErrorCode::EmptyName)
        }
        UserValidationError::EmptyEmail | UserValidationError::InvalidEmail => {
            ValidationError::new(field, message).with_code(ErrorCode::InvalidEmail)
        }
        UserValidationError::NonPositiveAge { value } => {
            ValidationError::new(field, message).with_value(ErrorCode::InvalidAge, value)
        }
    }
}

/// Validate a user identifier taken from the request path.
pub(crate) fn parse_user_id(raw: i64) -> Result<UserId, Error> {
    UserId::new(raw).map_err(user_validation_error)
}

/// Error for a request body that could not be deserialised.
pub(crate) fn malformed_body_error(reason: impl std::fmt::Display) -> Error {
    ValidationError::new("body", format!("malformed request body: {reason}"))
        .with_code(ErrorCode::MalformedBody)
}

/// Error for a query string or path segment that could not be parsed.
pub(crate) fn malformed_query_error(reason: impl std::fmt::Display) -> Error {
    ValidationError::new("query", format!("malformed request parameters: {reason}"))
        .with_code(ErrorCode::MalformedQuery)
}
