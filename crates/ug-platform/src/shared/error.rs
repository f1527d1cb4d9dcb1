//! Platform Error Types

use thiserror::Error;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response, Json},
};

use crate::auth::impersonation::ImpersonationError;
use crate::auth::session_resolver::AuthError;

#[derive(Error, Debug)]
pub enum PlatformError {
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    #[error("{0}")]
    Auth(#[from] AuthError),

    #[error("{0}")]
    Impersonation(#[from] ImpersonationError),

    #[error("{message}")]
    Unauthorized { message: String },

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Invalid cursor: {cursor}")]
    InvalidCursor { cursor: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("{entity_type} with {field} {value} already exists")]
    Duplicate { entity_type: String, field: String, value: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl PlatformError {
    pub fn not_found(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: entity_type.into(),
            id: id.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized { message: message.into() }
    }

    pub fn invalid_cursor(cursor: impl Into<String>) -> Self {
        Self::InvalidCursor { cursor: cursor.into() }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation { message: message.into() }
    }

    pub fn duplicate(entity_type: impl Into<String>, field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Duplicate {
            entity_type: entity_type.into(),
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration { message: message.into() }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal { message: message.into() }
    }

    /// HTTP status and machine-readable code for this error.
    pub fn status(&self) -> (StatusCode, &'static str) {
        match self {
            PlatformError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            PlatformError::Auth(AuthError::Missing) => (StatusCode::UNAUTHORIZED, "MISSING_TOKEN"),
            PlatformError::Auth(AuthError::Invalid) => (StatusCode::UNAUTHORIZED, "INVALID_TOKEN"),
            PlatformError::Auth(AuthError::Expired) => (StatusCode::UNAUTHORIZED, "TOKEN_EXPIRED"),
            PlatformError::Auth(AuthError::UserNotFound) => (StatusCode::UNAUTHORIZED, "USER_NOT_FOUND"),
            PlatformError::Impersonation(ImpersonationError::SelfImpersonation) => {
                (StatusCode::BAD_REQUEST, "SELF_IMPERSONATION")
            }
            PlatformError::Impersonation(ImpersonationError::NotImpersonating) => {
                (StatusCode::UNAUTHORIZED, "NOT_IMPERSONATING")
            }
            PlatformError::Unauthorized { .. } => (StatusCode::FORBIDDEN, "UNAUTHORIZED"),
            PlatformError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS"),
            PlatformError::InvalidCursor { .. } => (StatusCode::BAD_REQUEST, "INVALID_CURSOR"),
            PlatformError::Validation { .. } => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            PlatformError::Duplicate { .. } => (StatusCode::CONFLICT, "DUPLICATE"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

pub type Result<T> = std::result::Result<T, PlatformError>;

/// Error response body
#[derive(Debug, serde::Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl IntoResponse for PlatformError {
    fn into_response(self) -> Response {
        let (status, error_type) = self.status();

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = ErrorResponse {
            error: error_type.to_string(),
            message: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
