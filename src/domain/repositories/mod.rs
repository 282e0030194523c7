//! Repository trait definitions for the domain layer.
//!
//! Traits define the data contracts; implementations live in
//! `crate::infrastructure::persistence`. Mock implementations are generated
//! with `mockall` for unit tests.
//!
//! # Available Repositories
//!
//! - [`UrlRepository`] - Short link storage and ownership-scoped listing
//! - [`VisitRepository`] - Visit recording and window aggregation
//! - [`UserRepository`] - Users created on sign-in

pub mod url_repository;
pub mod user_repository;
pub mod visit_repository;

pub use url_repository::UrlRepository;
pub use user_repository::UserRepository;
pub use visit_repository::{VisitRepository, VisitWindowStats};

#[cfg(test)]
pub use url_repository::MockUrlRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
#[cfg(test)]
pub use visit_repository::MockVisitRepository;
