/// Authentication utilities
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing
/// - [`jwt`]: Signed session tokens
/// - [`session`]: Reading and writing the session cookie
/// - [`context`]: The per-request caller identity handed to handlers

pub mod context;
pub mod jwt;
pub mod password;
pub mod session;
