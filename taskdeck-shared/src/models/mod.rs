/// Database models
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `user`: User accounts with roles
/// - `task`: Tasks owned by users, with a status lifecycle
pub mod task;
pub mod user;
