//! Shared infrastructure used across aggregates.

pub mod api_common;
pub mod authorization;
pub mod clock;
pub mod connection;
pub mod cursor;
pub mod error;
pub mod middleware;
