//! Daily Report API Handlers

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{
    DailyReport, DailyReportCreate, DailyReportUpdate, LineItem, LineItemKind, StatusChange,
};
use crate::db::repository::ReportFilter;
use crate::recon::{self, DerivedValues, ValidationResult};
use crate::utils::time::parse_not_future_date;
use crate::utils::validation::{MAX_REASON_LEN, validate_amount, validate_required_text};
use crate::utils::{AppError, AppResult};
use shared::report::{LineItemInput, ReportStatus};
use shared::util::now_millis;

/// Query params for listing reports
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
    pub venue: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub status: Option<ReportStatus>,
}

fn default_limit() -> i64 {
    50
}

/// GET /api/reports
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<DailyReport>>> {
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
        status: query.status,
    };

    let limit = query.limit.clamp(1, 500);
    let reports = state
        .reports()
        .find_filtered(&filter, limit, query.offset.max(0))
        .await?;
    Ok(Json(reports))
}

/// GET /api/reports/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<DailyReport>> {
    let report = find_report(&state, &id).await?;
    Ok(Json(report))
}

/// POST /api/reports
///
/// Creates a draft. The form must pass the reconciliation rules and the
/// derived snapshot is stored alongside the raw figures.
pub async fn create(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<DailyReportCreate>,
) -> AppResult<Json<DailyReport>> {
    parse_not_future_date(&payload.for_date)?;
    validate_form_amounts(&payload.form)?;

    let venue = state
        .venues()
        .find_by_id(&payload.venue.to_string())
        .await?
        .ok_or_else(|| AppError::not_found(format!("Venue {} not found", payload.venue)))?;
    if !venue.is_active {
        return Err(AppError::business_rule("Venue is deactivated"));
    }

    let created_by = user
        .id
        .parse()
        .map_err(|_| AppError::internal("Malformed user id in token"))?;

    let mut report = DailyReport::new_draft(payload.venue, payload.for_date, created_by);
    report.apply_form(&payload.form);

    reconcile(&state, &mut report).await?;

    let created = state.reports().create(report).await?;
    state.analytics_cache.invalidate_all();

    Ok(Json(created))
}

/// PUT /api/reports/:id
///
/// Full-form resubmission. Creator while draft, admin at any status.
pub async fn update(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(payload): Json<DailyReportUpdate>,
) -> AppResult<Json<DailyReport>> {
    validate_form_amounts(&payload.form)?;

    let mut report = find_report(&state, &id).await?;
    ensure_can_edit(&report, &user)?;

    report.apply_form(&payload.form);
    reconcile(&state, &mut report).await?;

    let updated = state.reports().update(report).await?;
    state.analytics_cache.invalidate_all();

    Ok(Json(updated))
}

/// POST /api/reports/:id/submit
///
/// Draft -> Submitted, by the creator or an admin. Notifies the
/// configured admin addresses.
pub async fn submit(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<DailyReport>> {
    let mut report = find_report(&state, &id).await?;

    if !user.is_admin() && !is_creator(&report, &user) {
        return Err(AppError::forbidden("Only the creator can submit"));
    }
    if !report
        .status
        .can_transition(ReportStatus::Submitted, user.is_admin())
    {
        return Err(AppError::business_rule(format!(
            "Cannot submit a report in status {}",
            report.status
        )));
    }

    // Submission re-runs the rules so a stale draft cannot slip through
    reconcile(&state, &mut report).await?;

    report.status = ReportStatus::Submitted;
    report.submitted_at = Some(now_millis());

    let updated = state.reports().update(report).await?;
    state.analytics_cache.invalidate_all();

    if let Ok(Some(venue)) = state.venues().find_by_id(&updated.venue.to_string()).await {
        state
            .mailer
            .notify_submitted(&venue.name, &updated.for_date, &user.display_name);
    }

    Ok(Json(updated))
}

/// POST /api/reports/:id/status (admin)
///
/// Admins may move a report to any status. Moving to Approved stamps
/// the approver.
pub async fn change_status(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(payload): Json<StatusChange>,
) -> AppResult<Json<DailyReport>> {
    let mut report = find_report(&state, &id).await?;

    if report.status == payload.status {
        return Ok(Json(report));
    }

    report.status = payload.status;
    match payload.status {
        ReportStatus::Submitted if report.submitted_at.is_none() => {
            report.submitted_at = Some(now_millis());
        }
        ReportStatus::Approved => {
            let approver = user
                .id
                .parse()
                .map_err(|_| AppError::internal("Malformed user id in token"))?;
            report.approved_by = Some(approver);
            report.approved_at = Some(now_millis());
        }
        ReportStatus::Draft => {
            // Reopened for editing, the old approval no longer stands
            report.approved_by = None;
            report.approved_at = None;
        }
        _ => {}
    }

    let updated = state.reports().update(report).await?;
    state.analytics_cache.invalidate_all();

    if updated.status == ReportStatus::Approved {
        notify_creator_approved(&state, &updated).await;
    }

    Ok(Json(updated))
}

/// DELETE /api/reports/:id (admin)
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let deleted = state.reports().delete_with_children(&id).await?;
    if deleted {
        state.analytics_cache.invalidate_all();
    }
    Ok(Json(deleted))
}

/// Preview payload: validation outcome plus the figures the engine
/// would store
#[derive(Debug, Serialize)]
pub struct ReconciliationPreview {
    pub validation: ValidationResult,
    pub derived: DerivedValues,
}

/// GET /api/reports/:id/reconciliation
///
/// Runs the engine without persisting anything.
pub async fn reconciliation(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ReconciliationPreview>> {
    let report = find_report(&state, &id).await?;

    let figures = report.figures();
    let validation = recon::validate(&figures);

    let previous = state
        .reports()
        .previous_day_cash(&report.venue, &report.for_date)
        .await?;
    let derived = recon::compute_derived(&figures, &report.child_totals(), previous);

    Ok(Json(ReconciliationPreview {
        validation,
        derived,
    }))
}

/// GET /api/reports/:id/entries/:kind
pub async fn list_entries(
    State(state): State<ServerState>,
    Path((id, kind)): Path<(String, String)>,
) -> AppResult<Json<Vec<LineItem>>> {
    let kind = parse_kind(&kind)?;
    // 404 for an unknown report instead of an empty list
    find_report(&state, &id).await?;

    let items = state.line_items().list(&id, kind).await?;
    Ok(Json(items))
}

/// PUT /api/reports/:id/entries/:kind
///
/// Replaces the rows of one kind. The parent mirror field and the
/// derived snapshot are updated in the same transaction as the rows.
pub async fn replace_entries(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path((id, kind)): Path<(String, String)>,
    Json(rows): Json<Vec<LineItemInput>>,
) -> AppResult<Json<Vec<LineItem>>> {
    let kind = parse_kind(&kind)?;

    for (i, row) in rows.iter().enumerate() {
        validate_amount(row.amount, kind.mirror_field())?;
        validate_required_text(&row.reason, "reason", MAX_REASON_LEN)
            .map_err(|_| AppError::validation(format!("Row {}: reason is required", i + 1)))?;
    }

    let mut report = find_report(&state, &id).await?;
    ensure_can_edit(&report, &user)?;

    let sum: Decimal = rows.iter().map(|r| r.amount).sum();
    report.set_mirror(kind, sum);
    reconcile(&state, &mut report).await?;

    let items = state.line_items().replace(&report, kind, &rows).await?;
    state.analytics_cache.invalidate_all();

    Ok(Json(items))
}

// ========== Shared handler plumbing ==========

async fn find_report(state: &ServerState, id: &str) -> Result<DailyReport, AppError> {
    state
        .reports()
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Report {} not found", id)))
}

fn is_creator(report: &DailyReport, user: &CurrentUser) -> bool {
    report.created_by.to_string() == user.id
}

/// Creator while draft, admin at any status
fn ensure_can_edit(report: &DailyReport, user: &CurrentUser) -> Result<(), AppError> {
    if user.is_admin() {
        return Ok(());
    }
    if !is_creator(report, user) {
        return Err(AppError::forbidden("Not the creator of this report"));
    }
    if !report.status.is_editable_by_creator() {
        return Err(AppError::business_rule(format!(
            "Report in status {} is no longer editable",
            report.status
        )));
    }
    Ok(())
}

/// Boundary check on every monetary form field
fn validate_form_amounts(form: &crate::db::models::ReportForm) -> Result<(), AppError> {
    for (name, value) in form.amounts() {
        validate_amount(value, name)?;
    }
    Ok(())
}

/// Run the engine over the report and store the derived snapshot.
/// Validation failures become a 422 with the full field list.
async fn reconcile(state: &ServerState, report: &mut DailyReport) -> Result<(), AppError> {
    let figures = report.figures();

    let validation = recon::validate(&figures);
    if !validation.is_valid() {
        return Err(AppError::Reconciliation(validation.errors));
    }

    let previous = state
        .reports()
        .previous_day_cash(&report.venue, &report.for_date)
        .await?;
    let derived = recon::compute_derived(&figures, &report.child_totals(), previous);
    report.apply_derived(&derived);

    Ok(())
}

fn parse_kind(segment: &str) -> Result<LineItemKind, AppError> {
    LineItemKind::from_path(segment).ok_or_else(|| {
        AppError::invalid(format!(
            "Unknown entry kind '{}', expected one of: withdrawals, representacja, serwis-k, strata",
            segment
        ))
    })
}

async fn notify_creator_approved(state: &ServerState, report: &DailyReport) {
    let Ok(Some(creator)) = state
        .users()
        .find_by_id(&report.created_by.to_string())
        .await
    else {
        return;
    };
    let Some(email) = creator.email.as_deref() else {
        return;
    };
    if let Ok(Some(venue)) = state.venues().find_by_id(&report.venue.to_string()).await {
        state
            .mailer
            .notify_approved(email, &venue.name, &report.for_date);
    }
}
