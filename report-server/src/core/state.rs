use std::sync::Arc;
use std::time::Duration;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::db::models::{UserCreate, UserRole};
use crate::db::repository::report::AnalyticsSummary;
use crate::db::repository::{
    DailyReportRepository, LineItemRepository, UserRepository, VenueRepository,
};
use crate::services::{Mailer, TtlCache};

/// Server state - shared handles to every service
///
/// Cloning is cheap, everything inside is an Arc or a cheap handle.
///
/// | Field | Type | Purpose |
/// |-------|------|---------|
/// | config | Config | Configuration (immutable) |
/// | db | Surreal<Db> | Embedded database |
/// | jwt_service | Arc<JwtService> | Token issuing and validation |
/// | analytics_cache | Arc<TtlCache> | Expiring analytics summaries |
/// | mailer | Mailer | Outbound notifications |
#[derive(Clone, Debug)]
pub struct ServerState {
    pub config: Config,
    pub db: Surreal<Db>,
    pub jwt_service: Arc<JwtService>,
    pub analytics_cache: Arc<TtlCache<String, AnalyticsSummary>>,
    pub mailer: Mailer,
}

impl ServerState {
    /// Initialize the full server state
    ///
    /// 1. Work directory layout
    /// 2. Embedded database (work_dir/database/reports.db)
    /// 3. JWT service, analytics cache, mailer
    /// 4. Bootstrap owner account on first run
    ///
    /// # Panics
    ///
    /// Panics when the work directory or database cannot be initialized.
    pub async fn initialize(config: &Config) -> Self {
        config
            .ensure_work_dir_structure()
            .expect("Failed to create work directory structure");

        let db_path = config.database_dir().join("reports.db");
        let db_service = DbService::new(&db_path.to_string_lossy())
            .await
            .expect("Failed to initialize database");
        let db = db_service.db;

        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let analytics_cache = Arc::new(TtlCache::new(Duration::from_secs(
            config.analytics_cache_ttl_secs,
        )));
        let mailer = Mailer::from_config(config);

        let state = Self {
            config: config.clone(),
            db,
            jwt_service,
            analytics_cache,
            mailer,
        };

        state.seed_owner_account().await;

        state
    }

    /// Create the owner account on first run so the instance is usable
    async fn seed_owner_account(&self) {
        let users = self.users();
        let username = self.config.owner_username.clone();

        match users.find_by_username(&username).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                let password = match &self.config.owner_password {
                    Some(p) => p.clone(),
                    None if self.config.is_development() => {
                        tracing::warn!(
                            "OWNER_PASSWORD not set, using development default 'change-me'"
                        );
                        "change-me".to_string()
                    }
                    None => {
                        tracing::error!(
                            "No owner account exists and OWNER_PASSWORD is not set; \
                             logins will fail until one is configured"
                        );
                        return;
                    }
                };

                match users
                    .create(UserCreate {
                        username: username.clone(),
                        password,
                        display_name: Some("Owner".to_string()),
                        email: None,
                        role: UserRole::Owner,
                    })
                    .await
                {
                    Ok(_) => tracing::info!(username = %username, "owner account created"),
                    Err(e) => tracing::error!(error = %e, "failed to create owner account"),
                }
            }
            Err(e) => tracing::error!(error = %e, "failed to check for owner account"),
        }
    }

    pub fn jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }

    pub fn reports(&self) -> DailyReportRepository {
        DailyReportRepository::new(self.db.clone())
    }

    pub fn line_items(&self) -> LineItemRepository {
        LineItemRepository::new(self.db.clone())
    }

    pub fn venues(&self) -> VenueRepository {
        VenueRepository::new(self.db.clone())
    }

    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.db.clone())
    }
}
