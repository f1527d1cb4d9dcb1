//! UserGate Platform
//!
//! Core platform providing:
//! - Signed, time-limited session tokens
//! - Administrator impersonation with single-hop return
//! - Cursor-paginated, role-scoped user listing
//! - Role-gated user administration (create, suspend, activate)
//!
//! ## Module Organization
//!
//! - `auth` - token codec, session resolution, sign-in, impersonation
//! - `principal` - user entity, repositories, pager, operations, API
//! - `shared` - errors, authorization context, cursors, middleware
//! - `usecase` - tagged mutation outcomes

pub mod api;
pub mod auth;
pub mod principal;
pub mod shared;
pub mod usecase;

pub use shared::authorization::{checks, AuthContext};
pub use shared::clock::{Clock, ManualClock, SystemClock};
pub use shared::error::{PlatformError, Result};
pub use shared::middleware::AppState;

pub use usecase::{FieldFailure, UseCaseError, UseCaseResult};
