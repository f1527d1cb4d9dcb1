//! Principal Operations
//!
//! Role-gated mutations on user records.

pub mod activate;
pub mod create;
pub mod suspend;

pub use activate::ActivateUserUseCase;
pub use create::{CreateUserCommand, CreateUserUseCase};
pub use suspend::SuspendUserUseCase;
