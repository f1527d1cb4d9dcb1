//! Use Case Failures
//!
//! Expected, user-facing failures of a mutation. These are returned as data
//! so a client can render them next to the offending inputs; they are not
//! [`PlatformError`](crate::PlatformError)s.

use serde::Serialize;

/// A problem with one input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldFailure {
    pub field: String,
    pub message: String,
}

impl FieldFailure {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Failed mutation: either a global message, a set of field failures, or both.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UseCaseError {
    pub failure_message: Option<String>,
    pub field_failures: Vec<FieldFailure>,
}

impl UseCaseError {
    /// Global failure not tied to a field.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            failure_message: Some(message.into()),
            field_failures: Vec::new(),
        }
    }

    pub fn fields(field_failures: Vec<FieldFailure>) -> Self {
        Self {
            failure_message: None,
            field_failures,
        }
    }
}

impl std::fmt::Display for UseCaseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(message) = &self.failure_message {
            write!(f, "{}", message)?;
        }
        for (i, failure) in self.field_failures.iter().enumerate() {
            if i > 0 || self.failure_message.is_some() {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", failure.field, failure.message)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(UseCaseError::message("User exists").to_string(), "User exists");

        let err = UseCaseError::fields(vec![
            FieldFailure::new("name", "Name is required"),
            FieldFailure::new("email", "Email is required"),
        ]);
        assert_eq!(err.to_string(), "name: Name is required; email: Email is required");
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(UseCaseError::fields(vec![FieldFailure::new("name", "x")])).unwrap();
        assert_eq!(json["failureMessage"], serde_json::Value::Null);
        assert_eq!(json["fieldFailures"][0]["field"], "name");
    }
}
