//! Shared types for the Utarg reporting service
//!
//! DTOs used by both the report server and its clients, plus small
//! time utilities.

pub mod client;
pub mod report;
pub mod util;

pub use serde::{Deserialize, Serialize};
