//! End-to-end repository flow over a temporary embedded database.
//! Run: cargo test -p report-server --test report_flow

use rust_decimal::Decimal;
use surrealdb::RecordId;

use report_server::db::DbService;
use report_server::db::models::{
    DailyReport, LineItemKind, ReportForm, UserCreate, UserRole, VenueCreate,
};
use report_server::db::repository::{
    DailyReportRepository, LineItemRepository, RepoError, UserRepository, VenueRepository,
};
use report_server::recon;
use shared::report::LineItemInput;

fn d(s: &str) -> Decimal {
    s.parse().unwrap()
}

struct TestEnv {
    _tmp: tempfile::TempDir,
    reports: DailyReportRepository,
    line_items: LineItemRepository,
    venues: VenueRepository,
    users: UserRepository,
}

async fn setup() -> TestEnv {
    let tmp = tempfile::tempdir().unwrap();
    let service = DbService::new(&tmp.path().join("test.db").to_string_lossy())
        .await
        .unwrap();
    let db = service.db;

    TestEnv {
        _tmp: tmp,
        reports: DailyReportRepository::new(db.clone()),
        line_items: LineItemRepository::new(db.clone()),
        venues: VenueRepository::new(db.clone()),
        users: UserRepository::new(db),
    }
}

async fn seed_venue_and_user(env: &TestEnv) -> (RecordId, RecordId) {
    let venue = env
        .venues
        .create(VenueCreate {
            name: "Centrum".to_string(),
            address: None,
        })
        .await
        .unwrap();
    let user = env
        .users
        .create(UserCreate {
            username: "ana".to_string(),
            password: "s3cret-pass".to_string(),
            display_name: Some("Ana".to_string()),
            email: None,
            role: UserRole::Staff,
        })
        .await
        .unwrap();
    (venue.id.unwrap(), user.id.unwrap())
}

/// A form whose channel sum matches the declared gross exactly
fn balanced_form(cash: &str, left_in_drawer: &str) -> ReportForm {
    ReportForm {
        card_1: d("400.00"),
        cash: d(cash),
        glovo: d("50.00"),
        total_sale_gross: d("400.00") + d(cash) + d("50.00"),
        left_in_drawer: d(left_in_drawer),
        ..Default::default()
    }
}

/// Build a report the way the create handler does: apply the form,
/// validate, and store the derived snapshot.
fn draft_with_derived(
    venue: &RecordId,
    date: &str,
    user: &RecordId,
    form: &ReportForm,
    previous_cash: Decimal,
) -> DailyReport {
    let mut report = DailyReport::new_draft(venue.clone(), date.to_string(), user.clone());
    report.apply_form(form);

    let figures = report.figures();
    let validation = recon::validate(&figures);
    assert!(validation.is_valid(), "errors: {:?}", validation.errors);

    let derived = recon::compute_derived(&figures, &report.child_totals(), previous_cash);
    report.apply_derived(&derived);
    report
}

#[tokio::test]
async fn create_fetch_and_duplicate_rejection() {
    let env = setup().await;
    let (venue, user) = seed_venue_and_user(&env).await;

    let form = balanced_form("250.00", "250.00");
    let report = draft_with_derived(&venue, "2026-03-10", &user, &form, Decimal::ZERO);
    let created = env.reports.create(report).await.unwrap();
    assert!(created.id.is_some());
    assert_eq!(created.cash, d("250.00"));

    let fetched = env
        .reports
        .find_by_venue_and_date(&venue, "2026-03-10")
        .await
        .unwrap()
        .expect("report should be stored");
    assert_eq!(fetched.id, created.id);

    // Same venue and date again
    let form = balanced_form("1.00", "1.00");
    let dup = draft_with_derived(&venue, "2026-03-10", &user, &form, Decimal::ZERO);
    match env.reports.create(dup).await {
        Err(RepoError::Duplicate(_)) => {}
        other => panic!("expected Duplicate, got {:?}", other.map(|r| r.id)),
    }
}

#[tokio::test]
async fn previous_day_cash_follows_the_chain() {
    let env = setup().await;
    let (venue, user) = seed_venue_and_user(&env).await;

    // Day 1 closes with 90 in the drawer
    let form = balanced_form("90.00", "90.00");
    let day1 = draft_with_derived(&venue, "2026-03-10", &user, &form, Decimal::ZERO);
    env.reports.create(day1).await.unwrap();

    let prev = env
        .reports
        .previous_day_cash(&venue, "2026-03-11")
        .await
        .unwrap();
    assert_eq!(prev, d("90.00"));

    // No report the day before: carryover is zero, not the latest one
    let prev_gap = env
        .reports
        .previous_day_cash(&venue, "2026-03-13")
        .await
        .unwrap();
    assert_eq!(prev_gap, Decimal::ZERO);

    // Day 2 uses day 1's drawer as its opening balance
    let form2 = balanced_form("120.00", "205.00");
    let day2 = draft_with_derived(&venue, "2026-03-11", &user, &form2, prev);
    let day2 = env.reports.create(day2).await.unwrap();
    assert_eq!(day2.cash_previous_day, d("90.00"));
    // 90 + (120 cash movement) = 210 expected, 205 left => diff 5
    assert_eq!(day2.calculated_cash_expected, d("210.00"));
    assert_eq!(day2.reconciliation_diff, d("5.00"));
}

#[tokio::test]
async fn entries_replace_keeps_mirror_and_rows_consistent() {
    let env = setup().await;
    let (venue, user) = seed_venue_and_user(&env).await;

    let form = balanced_form("300.00", "100.00");
    let report = draft_with_derived(&venue, "2026-03-10", &user, &form, Decimal::ZERO);
    let mut report = env.reports.create(report).await.unwrap();
    let report_id = report.id.clone().unwrap();

    let rows = vec![
        LineItemInput {
            amount: d("120.00"),
            reason: "produce delivery".to_string(),
        },
        LineItemInput {
            amount: d("80.00"),
            reason: "cleaning".to_string(),
        },
    ];
    let sum: Decimal = rows.iter().map(|r| r.amount).sum();

    // Mirror + derived first, then the transactional replace (handler order)
    report.set_mirror(LineItemKind::Withdrawal, sum);
    let derived = recon::compute_derived(&report.figures(), &report.child_totals(), Decimal::ZERO);
    report.apply_derived(&derived);

    let inserted = env
        .line_items
        .replace(&report, LineItemKind::Withdrawal, &rows)
        .await
        .unwrap();
    assert_eq!(inserted.len(), 2);

    let stored = env
        .reports
        .find_by_id(&report_id.to_string())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.withdrawal, d("200.00"));

    let db_sum = env
        .line_items
        .sum(&report_id.to_string(), LineItemKind::Withdrawal)
        .await
        .unwrap();
    assert_eq!(db_sum, stored.withdrawal);

    // Replacing again drops the old rows
    let rows2 = vec![LineItemInput {
        amount: d("10.00"),
        reason: "stamps".to_string(),
    }];
    report.set_mirror(LineItemKind::Withdrawal, d("10.00"));
    let derived = recon::compute_derived(&report.figures(), &report.child_totals(), Decimal::ZERO);
    report.apply_derived(&derived);

    let inserted = env
        .line_items
        .replace(&report, LineItemKind::Withdrawal, &rows2)
        .await
        .unwrap();
    assert_eq!(inserted.len(), 1);

    let listed = env
        .line_items
        .list(&report_id.to_string(), LineItemKind::Withdrawal)
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].reason, "stamps");

    let stored = env
        .reports
        .find_by_id(&report_id.to_string())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.withdrawal, d("10.00"));
}

#[tokio::test]
async fn report_delete_cascades_children() {
    let env = setup().await;
    let (venue, user) = seed_venue_and_user(&env).await;

    let form = balanced_form("50.00", "50.00");
    let mut report = draft_with_derived(&venue, "2026-03-10", &user, &form, Decimal::ZERO);
    report = env.reports.create(report).await.unwrap();
    let report_id = report.id.clone().unwrap();

    let rows = vec![LineItemInput {
        amount: d("5.00"),
        reason: "loss".to_string(),
    }];
    report.set_mirror(LineItemKind::Strata, d("5.00"));
    env.line_items
        .replace(&report, LineItemKind::Strata, &rows)
        .await
        .unwrap();

    let deleted = env
        .reports
        .delete_with_children(&report_id.to_string())
        .await
        .unwrap();
    assert!(deleted);

    let items = env
        .line_items
        .list(&report_id.to_string(), LineItemKind::Strata)
        .await
        .unwrap();
    assert!(items.is_empty());

    // Second delete reports nothing to do
    let deleted_again = env
        .reports
        .delete_with_children(&report_id.to_string())
        .await
        .unwrap();
    assert!(!deleted_again);
}

#[tokio::test]
async fn deleting_a_user_transfers_their_reports() {
    let env = setup().await;
    let (venue, staff) = seed_venue_and_user(&env).await;

    let admin = env
        .users
        .create(UserCreate {
            username: "boss".to_string(),
            password: "s3cret-pass".to_string(),
            display_name: Some("Boss".to_string()),
            email: None,
            role: UserRole::Admin,
        })
        .await
        .unwrap();
    let admin_id = admin.id.unwrap();

    let form = balanced_form("70.00", "70.00");
    let report = draft_with_derived(&venue, "2026-03-10", &staff, &form, Decimal::ZERO);
    env.reports.create(report).await.unwrap();

    // Refused without a transfer target
    match env
        .users
        .delete_with_transfer(&staff.to_string(), None)
        .await
    {
        Err(RepoError::Validation(_)) => {}
        other => panic!("expected Validation error, got {:?}", other),
    }

    let moved = env
        .users
        .delete_with_transfer(&staff.to_string(), Some(&admin_id.to_string()))
        .await
        .unwrap();
    assert_eq!(moved, 1);

    assert!(
        env.users
            .find_by_username("ana")
            .await
            .unwrap()
            .is_none()
    );
    assert_eq!(env.reports.count_by_creator(&admin_id).await.unwrap(), 1);
    assert_eq!(env.reports.count_by_creator(&staff).await.unwrap(), 0);
}

#[tokio::test]
async fn reports_cannot_be_transferred_to_staff() {
    let env = setup().await;
    let (venue, staff) = seed_venue_and_user(&env).await;

    let other_staff = env
        .users
        .create(UserCreate {
            username: "berta".to_string(),
            password: "s3cret-pass".to_string(),
            display_name: Some("Berta".to_string()),
            email: None,
            role: UserRole::Staff,
        })
        .await
        .unwrap();
    let other_id = other_staff.id.unwrap();

    let form = balanced_form("70.00", "70.00");
    let report = draft_with_derived(&venue, "2026-03-10", &staff, &form, Decimal::ZERO);
    env.reports.create(report).await.unwrap();

    // Only an admin may receive the reports
    match env
        .users
        .delete_with_transfer(&staff.to_string(), Some(&other_id.to_string()))
        .await
    {
        Err(RepoError::Validation(_)) => {}
        other => panic!("expected Validation error, got {:?}", other),
    }

    // Nothing was deleted or moved
    assert!(env.users.find_by_username("ana").await.unwrap().is_some());
    assert_eq!(env.reports.count_by_creator(&staff).await.unwrap(), 1);
    assert_eq!(env.reports.count_by_creator(&other_id).await.unwrap(), 0);
}

#[tokio::test]
async fn owner_account_cannot_be_deleted() {
    let env = setup().await;

    let owner = env
        .users
        .create(UserCreate {
            username: "owner".to_string(),
            password: "s3cret-pass".to_string(),
            display_name: None,
            email: None,
            role: UserRole::Owner,
        })
        .await
        .unwrap();

    match env
        .users
        .delete_with_transfer(&owner.id.unwrap().to_string(), None)
        .await
    {
        Err(RepoError::Validation(_)) => {}
        other => panic!("expected Validation error, got {:?}", other),
    }
}

#[tokio::test]
async fn analytics_summary_counts_by_status() {
    let env = setup().await;
    let (venue, user) = seed_venue_and_user(&env).await;

    let form = balanced_form("100.00", "100.00");
    let day1 = draft_with_derived(&venue, "2026-03-10", &user, &form, Decimal::ZERO);
    let day1 = env.reports.create(day1).await.unwrap();

    let form2 = balanced_form("40.00", "140.00");
    let mut day2 = draft_with_derived(&venue, "2026-03-11", &user, &form2, d("100.00"));
    day2.status = shared::report::ReportStatus::Submitted;
    env.reports.create(day2).await.unwrap();

    let summary = env
        .reports
        .analytics_summary(Some(venue.clone()), "2026-03-01", "2026-03-31")
        .await
        .unwrap();

    assert_eq!(summary.total_reports, 2);
    assert_eq!(summary.draft, 1);
    assert_eq!(summary.submitted, 1);
    assert_eq!(
        summary.gross_revenue,
        day1.gross_revenue + env
            .reports
            .find_by_venue_and_date(&venue, "2026-03-11")
            .await
            .unwrap()
            .unwrap()
            .gross_revenue
    );
}
