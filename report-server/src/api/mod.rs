//! API route modules
//!
//! - [`auth`] - login and session info
//! - [`health`] - health check
//! - [`reports`] - daily report CRUD, lifecycle, line items, export
//! - [`venues`] - venue management
//! - [`users`] - user management
//! - [`analytics`] - cached summary figures

pub mod analytics;
pub mod auth;
pub mod health;
pub mod reports;
pub mod users;
pub mod venues;

// Re-export common types for handlers
pub use crate::utils::{AppError, AppResult};
