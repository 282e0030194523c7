//! Repository implementations.
//!
//! Concrete implementations of domain repository traits: PostgreSQL via SQLx,
//! and a process-local store for development and tests.
//!
//! # Repositories
//!
//! - [`PgUrlRepository`] - Short link storage and listing
//! - [`PgVisitRepository`] - Visit recording and monthly aggregates
//! - [`PgUserRepository`] - Users created on sign-in
//! - [`InMemoryStore`] - All of the above, kept in memory

pub mod memory;
pub mod pg_url_repository;
pub mod pg_user_repository;
pub mod pg_visit_repository;

pub use memory::InMemoryStore;
pub use pg_url_repository::PgUrlRepository;
pub use pg_user_repository::PgUserRepository;
pub use pg_visit_repository::PgVisitRepository;
