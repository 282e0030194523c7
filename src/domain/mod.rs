//! Domain layer containing business entities and rules.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`guest_quota`] - Cookie-carried link quota for unauthenticated users
//! - [`visit_tracker`] - Detached, best-effort visit recording
//!
//! The domain layer has no dependency on the HTTP or persistence layers.
//!
//! # Visit Flow
//!
//! 1. The redirect handler resolves a short code and answers with a redirect
//! 2. A [`entities::NewVisit`] is handed to [`visit_tracker::VisitTracker::track`]
//! 3. A spawned task persists it via [`repositories::VisitRepository`]

pub mod entities;
pub mod guest_quota;
pub mod repositories;
pub mod visit_tracker;
