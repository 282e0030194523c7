//! Core domain entities.
//!
//! # Entity Types
//!
//! - [`Url`] - A short code to long URL mapping
//! - [`Visit`] - One resolved redirect
//! - [`User`] - An authenticated link owner
//!
//! Creation inputs live next to their entity (`NewUrl`, `NewVisit`, `NewUser`).

pub mod url;
pub mod user;
pub mod visit;

pub use url::{NewUrl, Owner, Url, UrlWithVisits};
pub use user::{NewUser, User};
pub use visit::{NewVisit, Visit};
