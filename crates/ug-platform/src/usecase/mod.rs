//! Use Case Infrastructure
//!
//! - `UseCaseResult<T>` - tagged success/failure outcome of a mutation
//! - `UseCaseError` - global and field-level failures for the caller to render

pub mod result;
pub mod error;

pub use result::UseCaseResult;
pub use error::{FieldFailure, UseCaseError};
