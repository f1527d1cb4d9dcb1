//! Principal Aggregate
//!
//! User records, their storage, listing, and administration.

pub mod api;
pub mod entity;
pub mod operations;
pub mod pager;
pub mod postgres;
pub mod repository;

pub use entity::{NewPrincipal, Principal, Role};
pub use pager::{ListScope, PrincipalPager, DEFAULT_PAGE_SIZE};
pub use postgres::PgPrincipalRepository;
pub use repository::{InMemoryPrincipalRepository, PrincipalFilter, PrincipalRepository};
