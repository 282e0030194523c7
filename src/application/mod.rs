//! Application layer services implementing business logic.
//!
//! Services consume repository traits and provide a clean API for HTTP
//! handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Shortening, resolution, listing and deletion
//! - [`services::analytics_service::AnalyticsService`] - Monthly visit and link analytics
//! - [`services::auth_service::AuthService`] - Session signing and sign-in
pub mod services;
