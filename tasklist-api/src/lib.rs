//! # TaskList Web Server
//!
//! Server-rendered task list: users sign up, log in and manage their own
//! tasks through HTML forms.
//!
//! ## Modules
//!
//! - `app`: Application state, router and session middleware
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `middleware`: Security headers
//! - `routes`: Route handlers
//! - `views`: HTML templates

pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod views;
