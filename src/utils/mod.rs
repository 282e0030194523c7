//! Utility functions used across the application.
//!
//! - [`code_generator`] - Short code and guest token generation
//! - [`url_validator`] - Long URL validation
//! - [`client_info`] - Visitor metadata from HTTP headers
//! - [`db_error`] - Database error classification

pub mod client_info;
pub mod code_generator;
pub mod db_error;
pub mod url_validator;
