/// API route handlers
///
/// Organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Login and token refresh
/// - `users`: Registration and user management
/// - `tasks`: Task CRUD and completion
pub mod auth;
pub mod health;
pub mod tasks;
pub mod users;
