/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Authentication endpoints (register, login, refresh)
/// - `organizations`: Organization CRUD
/// - `projects`: Project CRUD and password unlock
/// - `tasks`: Task CRUD within a project

pub mod auth;
pub mod health;
pub mod organizations;
pub mod projects;
pub mod tasks;
