//! # Taskdeck Shared Library
//!
//! Shared types and business logic for the Taskdeck API server.
//!
//! ## Module Organization
//!
//! - `models`: Database models (users, tasks) and their CRUD operations
//! - `auth`: Password hashing, JWT tokens, and the authorization policy
//! - `validation`: Task write validation
//! - `db`: Connection pool and migration runner

pub mod auth;
pub mod db;
pub mod models;
pub mod validation;

/// Current version of the shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
