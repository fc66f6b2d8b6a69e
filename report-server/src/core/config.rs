use std::path::PathBuf;

use crate::auth::JwtConfig;

/// Server configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | WORK_DIR | /var/lib/utarg | Work directory (database, logs) |
/// | HTTP_PORT | 3000 | HTTP API port |
/// | ENVIRONMENT | development | Runtime environment |
/// | ANALYTICS_CACHE_TTL_SECS | 300 | Analytics summary cache TTL |
/// | MAIL_API_URL | (unset) | Mail API endpoint, disables mail when unset |
/// | MAIL_API_KEY | (unset) | Mail API key |
/// | MAIL_FROM | reports@localhost | Sender address |
/// | MAIL_ADMIN_TO | (unset) | Comma-separated admin recipients |
/// | OWNER_USERNAME | owner | Bootstrap owner account username |
/// | OWNER_PASSWORD | (unset) | Bootstrap owner password, required on first run in production |
///
/// JWT settings (`JWT_SECRET`, `JWT_EXPIRATION_MINUTES`, `JWT_ISSUER`,
/// `JWT_AUDIENCE`) are read by [`JwtConfig`].
#[derive(Debug, Clone)]
pub struct Config {
    /// Work directory holding the database and log files
    pub work_dir: String,
    /// HTTP API service port
    pub http_port: u16,
    /// JWT configuration
    pub jwt: JwtConfig,
    /// Runtime environment: development | staging | production
    pub environment: String,
    /// Analytics summary cache TTL in seconds
    pub analytics_cache_ttl_secs: u64,

    // === Mail notification ===
    pub mail_api_url: Option<String>,
    pub mail_api_key: Option<String>,
    pub mail_from: String,
    /// Comma-separated admin addresses notified on report submission
    pub mail_admin_to: Option<String>,

    // === Bootstrap owner account ===
    pub owner_username: String,
    pub owner_password: Option<String>,
}

impl Config {
    /// Load configuration from environment variables, falling back to
    /// defaults
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/utarg".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            jwt: JwtConfig::default(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            analytics_cache_ttl_secs: std::env::var("ANALYTICS_CACHE_TTL_SECS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(300),
            mail_api_url: std::env::var("MAIL_API_URL").ok(),
            mail_api_key: std::env::var("MAIL_API_KEY").ok(),
            mail_from: std::env::var("MAIL_FROM").unwrap_or_else(|_| "reports@localhost".into()),
            mail_admin_to: std::env::var("MAIL_ADMIN_TO").ok(),
            owner_username: std::env::var("OWNER_USERNAME").unwrap_or_else(|_| "owner".into()),
            owner_password: std::env::var("OWNER_PASSWORD").ok(),
        }
    }

    /// Override the paths and port, used by tests
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    pub fn logs_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }

    /// Create the work directory layout if missing
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.database_dir())?;
        std::fs::create_dir_all(self.logs_dir())?;
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
