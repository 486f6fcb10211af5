//! # TaskList Shared Library
//!
//! Types and business logic behind the TaskList web application: models,
//! storage, authentication primitives and the task service.
//!
//! ## Module Organization
//!
//! - `models`: Plain data structs (users, tasks, pages)
//! - `store`: Storage traits with PostgreSQL and in-memory implementations
//! - `services`: Ownership-checked task operations
//! - `auth`: Password hashing, session tokens, request identity
//! - `db`: Connection pool and migrations
//! - `validation`: Field-level validation messages

pub mod auth;
pub mod db;
pub mod models;
pub mod services;
pub mod store;
pub mod validation;

/// Current version of the TaskList shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
