//! Service layer
//!
//! - [`TtlCache`] - expiring in-memory cache for analytics summaries
//! - [`Mailer`] - outbound mail notifications

pub mod cache;
pub mod mailer;

pub use cache::TtlCache;
pub use mailer::Mailer;
