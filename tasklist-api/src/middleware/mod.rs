/// Middleware for the web server
///
/// - `security`: Security headers on every response

pub mod security;
