//! Authentication
//!
//! Session tokens, credential sign-in, and impersonation.

pub mod auth_api;
pub mod impersonation;
pub mod password_service;
pub mod session_resolver;
pub mod session_service;
pub mod token_codec;

pub use impersonation::{ImpersonationError, SessionState};
pub use password_service::{Argon2Config, PasswordService};
pub use session_resolver::{AuthError, SessionResolver};
pub use session_service::SessionService;
pub use token_codec::{DecodeError, SessionClaims, TokenCodec, TokenConfig, DEFAULT_TOKEN_TTL_SECS};
