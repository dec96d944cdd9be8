//! # TaskDeck Shared Library
//!
//! Shared types, models, and auth utilities used by the TaskDeck API server.
//!
//! ## Module Organization
//!
//! - `models`: Database models and CRUD operations
//! - `auth`: Password hashing, JWT tokens, auth middleware, tenant authorization
//! - `db`: Connection pooling and migrations
//! - `board`: Task board filtering

pub mod auth;
pub mod board;
pub mod db;
pub mod models;

/// Current version of the TaskDeck shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
