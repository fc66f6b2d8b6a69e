//! CSV export of daily reports (admin)

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::models::DailyReport;
use crate::db::repository::ReportFilter;
use crate::utils::AppError;

/// Hard cap so an unbounded export cannot exhaust memory
const EXPORT_LIMIT: i64 = 10_000;

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    pub venue: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

/// GET /api/reports/export?venue&from&to (admin)
///
/// Streams the filtered reports as a CSV attachment.
pub async fn export_csv(
    State(state): State<ServerState>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, AppError> {
    let venue = match &query.venue {
        Some(v) => Some(
            v.parse()
                .map_err(|_| AppError::invalid(format!("Invalid venue id: {v}")))?,
        ),
        None => None,
    };

    let filter = ReportFilter {
        venue,
        from: query.from.clone(),
        to: query.to.clone(),
        status: None,
    };

    let reports = state.reports().find_filtered(&filter, EXPORT_LIMIT, 0).await?;
    let body = reports_to_csv(&reports)?;

    let filename = match (&query.from, &query.to) {
        (Some(from), Some(to)) => format!("reports_{}_{}.csv", from, to),
        _ => "reports.csv".to_string(),
    };

    Ok((
        [
            (http::header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                http::header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    )
        .into_response())
}

fn reports_to_csv(reports: &[DailyReport]) -> Result<String, AppError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record([
            "date",
            "venue",
            "status",
            "card_1",
            "card_2",
            "cash",
            "przelew",
            "glovo",
            "uber",
            "wolt",
            "pyszne",
            "bolt",
            "special_payment",
            "total_sale_gross",
            "withdrawals",
            "serwis_k",
            "representacja",
            "strata",
            "deposit",
            "left_in_drawer",
            "cash_previous_day",
            "calculated_cash_expected",
            "reconciliation_diff",
            "gross_revenue",
            "net_revenue",
        ])
        .map_err(|e| AppError::internal(format!("CSV write failed: {e}")))?;

    for r in reports {
        writer
            .write_record([
                r.for_date.clone(),
                r.venue.to_string(),
                r.status.to_string(),
                r.card_1.to_string(),
                r.card_2.to_string(),
                r.cash.to_string(),
                r.przelew.to_string(),
                r.glovo.to_string(),
                r.uber.to_string(),
                r.wolt.to_string(),
                r.pyszne.to_string(),
                r.bolt.to_string(),
                r.total_sale_with_special_payment.to_string(),
                r.total_sale_gross.to_string(),
                r.withdrawal.to_string(),
                r.serwis_k.to_string(),
                r.representacja.to_string(),
                r.strata_loss.to_string(),
                r.deposit.to_string(),
                r.left_in_drawer.to_string(),
                r.cash_previous_day.to_string(),
                r.calculated_cash_expected.to_string(),
                r.reconciliation_diff.to_string(),
                r.gross_revenue.to_string(),
                r.net_revenue.to_string(),
            ])
            .map_err(|e| AppError::internal(format!("CSV write failed: {e}")))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::internal(format!("CSV flush failed: {e}")))?;
    String::from_utf8(bytes).map_err(|e| AppError::internal(format!("CSV encoding failed: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::DailyReport;
    use rust_decimal::Decimal;

    #[test]
    fn csv_has_header_and_one_row_per_report() {
        let venue: surrealdb::RecordId = "venue:centrum".parse().unwrap();
        let user: surrealdb::RecordId = "user:ana".parse().unwrap();
        let mut report = DailyReport::new_draft(venue, "2026-03-14".to_string(), user);
        report.cash = Decimal::new(12345, 2);

        let csv = reports_to_csv(&[report]).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("date,venue,status"));
        assert!(lines[1].contains("2026-03-14"));
        assert!(lines[1].contains("123.45"));
    }
}
