//! Database models

pub mod line_item;
pub mod report;
pub mod serde_helpers;
pub mod user;
pub mod venue;

pub use line_item::{LineItem, LineItemKind};
pub use report::{
    DailyReport, DailyReportCreate, DailyReportUpdate, ReportForm, ReportId, StatusChange,
};
pub use user::{User, UserCreate, UserId, UserRole, UserUpdate};
pub use venue::{Venue, VenueCreate, VenueId, VenueUpdate};
