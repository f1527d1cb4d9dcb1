//! UserGate Common
//!
//! Cross-cutting utilities shared by the platform crate and the server binary.

pub mod logging;

pub use logging::{init_logging, LogFormat};
