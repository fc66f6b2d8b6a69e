//! Line Item Repository
//!
//! Child rows are only ever written together with the parent mirror: a
//! replace is one transaction that swaps the rows, overwrites the mirror
//! field and stores the freshly computed derived snapshot. The mirror can
//! therefore never observably diverge from its rows.

use rust_decimal::Decimal;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{DailyReport, LineItem, LineItemKind};
use shared::report::LineItemInput;
use shared::util::now_millis;

#[derive(Clone)]
pub struct LineItemRepository {
    base: BaseRepository,
}

impl LineItemRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Rows of one kind for a report, oldest first
    pub async fn list(&self, report_id: &str, kind: LineItemKind) -> RepoResult<Vec<LineItem>> {
        let record_id = self.base.parse_id(report_id)?;

        let mut result = self
            .base
            .db()
            .query(format!(
                "SELECT * FROM {} WHERE report = $report ORDER BY created_at ASC",
                kind.table()
            ))
            .bind(("report", record_id.to_string()))
            .await?;

        let items: Vec<LineItem> = result.take(0)?;
        Ok(items)
    }

    /// Sum of one kind's rows, straight from the database
    pub async fn sum(&self, report_id: &str, kind: LineItemKind) -> RepoResult<Decimal> {
        let record_id = self.base.parse_id(report_id)?;

        let mut result = self
            .base
            .db()
            .query(format!(
                "RETURN math::sum((SELECT VALUE amount FROM {} WHERE report = $report)) OR 0",
                kind.table()
            ))
            .bind(("report", record_id.to_string()))
            .await?;

        let sum: Option<f64> = result.take(0)?;
        Decimal::try_from(sum.unwrap_or(0.0))
            .map_err(|e| RepoError::Database(format!("Bad sum value: {e}")))
    }

    /// Replace a report's rows of one kind and persist the updated parent
    /// (mirror + derived snapshot) in a single transaction.
    ///
    /// `parent` must already carry the new mirror value and derived
    /// snapshot; this method only guarantees the write is atomic.
    pub async fn replace(
        &self,
        parent: &DailyReport,
        kind: LineItemKind,
        rows: &[LineItemInput],
    ) -> RepoResult<Vec<LineItem>> {
        let report_id = parent
            .id
            .clone()
            .ok_or_else(|| RepoError::Validation("Report has no id".to_string()))?;

        let created_at = now_millis();
        let items: Vec<LineItem> = rows
            .iter()
            .map(|row| LineItem {
                id: None,
                report: report_id.clone(),
                amount: row.amount,
                reason: row.reason.clone(),
                created_at: Some(created_at),
            })
            .collect();

        let mut parent = parent.clone();
        parent.updated_at = Some(created_at);

        // MERGE with an id-less payload: the record id is immutable
        let mut data = serde_json::to_value(&parent)
            .map_err(|e| RepoError::Database(format!("Serialize failed: {e}")))?;
        if let Some(obj) = data.as_object_mut() {
            obj.remove("id");
        }

        let sql = format!(
            r#"
            BEGIN TRANSACTION;
            DELETE {table} WHERE report = $report_str;
            INSERT INTO {table} $rows;
            UPDATE $report MERGE $parent;
            COMMIT TRANSACTION;
            "#,
            table = kind.table()
        );

        let mut result = self
            .base
            .db()
            .query(sql)
            .bind(("report_str", report_id.to_string()))
            .bind(("report", report_id))
            .bind(("rows", items))
            .bind(("parent", data))
            .await?;

        // INSERT is the second statement inside the transaction
        let inserted: Vec<LineItem> = result.take(1)?;
        Ok(inserted)
    }
}
