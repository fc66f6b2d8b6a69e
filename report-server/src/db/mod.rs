//! Database Module
//!
//! Embedded SurrealDB (RocksDB engine). Repositories own all queries;
//! parent/child writes that must stay consistent run as single
//! multi-statement transactions.

pub mod models;
pub mod repository;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

use crate::utils::AppError;

/// Database service owning the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the database at the given path and apply schema
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let db: Surreal<Db> = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        db.use_ns("utarg")
            .use_db("reports")
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        Self::define_schema(&db).await?;

        tracing::info!(path = %db_path, "Database opened (SurrealDB/RocksDB)");
        Ok(Self { db })
    }

    /// Apply index definitions (idempotent)
    async fn define_schema(db: &Surreal<Db>) -> Result<(), AppError> {
        db.query(
            r#"
            DEFINE INDEX IF NOT EXISTS daily_report_venue_date
                ON TABLE daily_report COLUMNS venue, for_date UNIQUE;
            DEFINE INDEX IF NOT EXISTS user_username
                ON TABLE user COLUMNS username UNIQUE;
            "#,
        )
        .await
        .map_err(|e| AppError::database(format!("Failed to define schema: {e}")))?;
        Ok(())
    }
}
