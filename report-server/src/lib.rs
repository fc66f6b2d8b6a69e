//! Venue daily-sales reporting server
//!
//! # Architecture
//!
//! - **Reconciliation engine** (`recon`): pure decimal arithmetic over
//!   the daily form, validation and derived figures
//! - **Database** (`db`): embedded SurrealDB storage and repositories
//! - **Auth** (`auth`): JWT + Argon2, two-level role model
//! - **HTTP API** (`api`): RESTful interface
//! - **Services** (`services`): TTL cache, mail notifications
//!
//! # Module layout
//!
//! ```text
//! report-server/src/
//! ├── core/          # config, state, server
//! ├── auth/          # JWT, middleware
//! ├── recon/         # reconciliation engine
//! ├── db/            # models and repositories
//! ├── api/           # routes and handlers
//! ├── services/      # cache, mailer
//! └── utils/         # errors, logging, validation
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod recon;
pub mod services;
pub mod utils;

pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult};

pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - supports tracing format specifiers
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// Load .env, prepare the work directory and initialize logging
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    config.ensure_work_dir_structure()?;

    let logs_dir = config.logs_dir();
    init_logger_with_file(None, logs_dir.to_str());

    Ok(())
}
