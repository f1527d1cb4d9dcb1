//! Use Case Result Type
//!
//! Tagged outcome of a mutation: the new value, or a [`UseCaseError`]
//! describing what the caller must fix. Infrastructure problems travel
//! separately as `PlatformError`.

use serde::Serialize;

use super::error::UseCaseError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UseCaseResult<T> {
    Success(T),
    Failure(UseCaseError),
}

impl<T> UseCaseResult<T> {
    pub fn success(value: T) -> Self {
        UseCaseResult::Success(value)
    }

    pub fn failure(error: UseCaseError) -> Self {
        UseCaseResult::Failure(error)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, UseCaseResult::Success(_))
    }

    pub fn map<U, F>(self, f: F) -> UseCaseResult<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            UseCaseResult::Success(v) => UseCaseResult::Success(f(v)),
            UseCaseResult::Failure(e) => UseCaseResult::Failure(e),
        }
    }
}
