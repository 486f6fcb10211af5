/// HTTP route handlers
///
/// Handlers are organized by resource:
///
/// - `tasks`: Task list, forms and mutations
/// - `auth`: Signup, login and logout
/// - `health`: Health check endpoint

pub mod auth;
pub mod health;
pub mod tasks;
