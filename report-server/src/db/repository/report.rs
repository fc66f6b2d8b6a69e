//! Daily Report Repository

use chrono::Days;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::DailyReport;
use shared::report::ReportStatus;
use shared::util::now_millis;

/// Validate date format (YYYY-MM-DD)
fn validate_date(date: &str) -> RepoResult<chrono::NaiveDate> {
    chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| RepoError::Validation(format!("Invalid date format: {date}")))
}

/// List filter for reports
#[derive(Debug, Clone, Default)]
pub struct ReportFilter {
    pub venue: Option<RecordId>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub status: Option<ReportStatus>,
}

/// Aggregated figures for the analytics endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsSummary {
    #[serde(default, with = "rust_decimal::serde::float")]
    pub gross_revenue: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub net_revenue: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub reconciliation_diff: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub cash: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub card: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub delivery: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub tips: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub withdrawals: Decimal,
    pub total_reports: i64,
    pub draft: i64,
    pub submitted: i64,
    pub approved: i64,
    pub locked: i64,
}

#[derive(Clone)]
pub struct DailyReportRepository {
    base: BaseRepository,
}

impl DailyReportRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Create a draft; (venue, for_date) must be free
    pub async fn create(&self, mut report: DailyReport) -> RepoResult<DailyReport> {
        validate_date(&report.for_date)?;

        if self
            .find_by_venue_and_date(&report.venue, &report.for_date)
            .await?
            .is_some()
        {
            return Err(RepoError::Duplicate(format!(
                "Report for {} on {} already exists",
                report.venue, report.for_date
            )));
        }

        report.created_at = Some(now_millis());
        report.updated_at = Some(now_millis());

        let created: Option<DailyReport> = self
            .base
            .db()
            .create("daily_report")
            .content(report)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create report".to_string()))
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<DailyReport>> {
        let record_id = self.base.parse_id(id)?;
        let report: Option<DailyReport> = self.base.db().select(record_id).await?;
        Ok(report)
    }

    pub async fn find_by_venue_and_date(
        &self,
        venue: &RecordId,
        date: &str,
    ) -> RepoResult<Option<DailyReport>> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM daily_report WHERE venue = $venue AND for_date = $date LIMIT 1",
            )
            .bind(("venue", venue.to_string()))
            .bind(("date", date.to_string()))
            .await?;

        let reports: Vec<DailyReport> = result.take(0)?;
        Ok(reports.into_iter().next())
    }

    /// Carryover lookup: the immediately preceding calendar day's counted
    /// drawer cash for the same venue, or zero when that day has no report.
    pub async fn previous_day_cash(&self, venue: &RecordId, date: &str) -> RepoResult<Decimal> {
        let parsed = validate_date(date)?;
        let Some(prev) = parsed.checked_sub_days(Days::new(1)) else {
            return Ok(Decimal::ZERO);
        };
        let prev_str = prev.format("%Y-%m-%d").to_string();

        Ok(self
            .find_by_venue_and_date(venue, &prev_str)
            .await?
            .map(|r| r.left_in_drawer)
            .unwrap_or(Decimal::ZERO))
    }

    /// Filtered, paginated listing (newest first)
    pub async fn find_filtered(
        &self,
        filter: &ReportFilter,
        limit: i64,
        offset: i64,
    ) -> RepoResult<Vec<DailyReport>> {
        if let Some(from) = &filter.from {
            validate_date(from)?;
        }
        if let Some(to) = &filter.to {
            validate_date(to)?;
        }

        let mut conditions = vec!["true"];
        if filter.venue.is_some() {
            conditions.push("venue = $venue");
        }
        if filter.from.is_some() {
            conditions.push("for_date >= $from");
        }
        if filter.to.is_some() {
            conditions.push("for_date <= $to");
        }
        if filter.status.is_some() {
            conditions.push("status = $status");
        }

        let sql = format!(
            "SELECT * FROM daily_report WHERE {} ORDER BY for_date DESC LIMIT $limit START $offset",
            conditions.join(" AND ")
        );

        let mut query = self
            .base
            .db()
            .query(sql)
            .bind(("limit", limit))
            .bind(("offset", offset));
        if let Some(venue) = &filter.venue {
            query = query.bind(("venue", venue.to_string()));
        }
        if let Some(from) = &filter.from {
            query = query.bind(("from", from.clone()));
        }
        if let Some(to) = &filter.to {
            query = query.bind(("to", to.clone()));
        }
        if let Some(status) = filter.status {
            query = query.bind(("status", status));
        }

        let mut result = query.await?;
        let reports: Vec<DailyReport> = result.take(0)?;
        Ok(reports)
    }

    /// Persist the full record (form fields, mirrors, derived snapshot,
    /// status and provenance)
    pub async fn update(&self, report: DailyReport) -> RepoResult<DailyReport> {
        let id = report
            .id
            .clone()
            .ok_or_else(|| RepoError::Validation("Report has no id".to_string()))?;

        let mut report = report;
        report.updated_at = Some(now_millis());

        // MERGE with an id-less payload: the record id is immutable
        let mut data = serde_json::to_value(&report)
            .map_err(|e| RepoError::Database(format!("Serialize failed: {e}")))?;
        if let Some(obj) = data.as_object_mut() {
            obj.remove("id");
        }

        let mut result = self
            .base
            .db()
            .query("UPDATE $thing MERGE $data")
            .bind(("thing", id))
            .bind(("data", data))
            .await?;

        let updated: Vec<DailyReport> = result.take(0)?;
        updated
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound("Report not found".to_string()))
    }

    /// Delete a report and all of its child line items in one transaction
    pub async fn delete_with_children(&self, id: &str) -> RepoResult<bool> {
        let record_id = self.base.parse_id(id)?;

        let mut result = self
            .base
            .db()
            .query(
                r#"
                BEGIN TRANSACTION;
                LET $existing = (SELECT VALUE id FROM $report)[0];
                DELETE withdrawal_entry WHERE report = $report_str;
                DELETE representacja_entry WHERE report = $report_str;
                DELETE serwis_k_entry WHERE report = $report_str;
                DELETE strata_entry WHERE report = $report_str;
                DELETE $report;
                RETURN $existing != NONE;
                COMMIT TRANSACTION;
                "#,
            )
            .bind(("report_str", record_id.to_string()))
            .bind(("report", record_id))
            .await?;

        let deleted: Option<bool> = result.take(result.num_statements() - 1)?;
        Ok(deleted.unwrap_or(false))
    }

    pub async fn count_by_creator(&self, creator: &RecordId) -> RepoResult<u64> {
        let mut result = self
            .base
            .db()
            .query("RETURN count(SELECT VALUE id FROM daily_report WHERE created_by = $creator)")
            .bind(("creator", creator.to_string()))
            .await?;
        let count: Option<u64> = result.take(0)?;
        Ok(count.unwrap_or(0))
    }

    /// Date-range aggregation for the analytics endpoint
    pub async fn analytics_summary(
        &self,
        venue: Option<RecordId>,
        from: &str,
        to: &str,
    ) -> RepoResult<AnalyticsSummary> {
        validate_date(from)?;
        validate_date(to)?;

        let venue_cond = if venue.is_some() {
            "AND venue = $venue"
        } else {
            ""
        };

        let sql = format!(
            r#"
            LET $reports = SELECT * FROM daily_report
                WHERE for_date >= $from AND for_date <= $to {venue_cond};
            LET $draft = SELECT * FROM $reports WHERE status = 'DRAFT';
            LET $submitted = SELECT * FROM $reports WHERE status = 'SUBMITTED';
            LET $approved = SELECT * FROM $reports WHERE status = 'APPROVED';
            LET $locked = SELECT * FROM $reports WHERE status = 'LOCKED';
            RETURN {{
                gross_revenue: math::sum($reports.gross_revenue) OR 0,
                net_revenue: math::sum($reports.net_revenue) OR 0,
                reconciliation_diff: math::sum($reports.reconciliation_diff) OR 0,
                cash: math::sum($reports.cash) OR 0,
                card: (math::sum($reports.card_1) OR 0) + (math::sum($reports.card_2) OR 0),
                delivery: (math::sum($reports.przelew) OR 0)
                    + (math::sum($reports.glovo) OR 0)
                    + (math::sum($reports.uber) OR 0)
                    + (math::sum($reports.wolt) OR 0)
                    + (math::sum($reports.pyszne) OR 0)
                    + (math::sum($reports.bolt) OR 0),
                tips: (math::sum($reports.tips_cash) OR 0) + (math::sum($reports.tips_card) OR 0),
                withdrawals: math::sum($reports.withdrawal) OR 0,
                total_reports: count($reports),
                draft: count($draft),
                submitted: count($submitted),
                approved: count($approved),
                locked: count($locked)
            }};
            "#
        );

        let mut query = self
            .base
            .db()
            .query(sql)
            .bind(("from", from.to_string()))
            .bind(("to", to.to_string()));
        if let Some(venue) = venue {
            query = query.bind(("venue", venue.to_string()));
        }

        let mut result = query.await?;
        let summary: Option<AnalyticsSummary> = result.take(result.num_statements() - 1)?;
        summary.ok_or_else(|| RepoError::Database("Failed to aggregate analytics".to_string()))
    }
}
