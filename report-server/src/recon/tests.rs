use super::*;

fn d(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn base_report() -> ReportFigures {
    ReportFigures {
        venue: Some("venue:centrum".to_string()),
        for_date: NaiveDate::from_ymd_opt(2024, 3, 14),
        ..Default::default()
    }
}

// ========================================================================
// validate
// ========================================================================

#[test]
fn exact_channel_sum_passes() {
    let mut r = base_report();
    r.card_1 = d("120.00");
    r.card_2 = d("30.00");
    r.cash = d("50.00");
    r.total_sale_gross = d("200.00");

    let result = validate(&r);
    assert!(result.is_valid(), "unexpected errors: {:?}", result.errors);
}

#[test]
fn deviation_within_tolerance_passes() {
    let mut r = base_report();
    r.cash = d("100.50");
    r.total_sale_gross = d("100.00");

    assert!(validate(&r).is_valid());
}

#[test]
fn deviation_just_over_tolerance_fails() {
    let mut r = base_report();
    r.cash = d("100.51");
    r.total_sale_gross = d("100.00");

    let result = validate(&r);
    let err = result.field("total_sale_gross").expect("mismatch error");
    match &err.kind {
        ErrorKind::ReconciliationMismatch { difference, .. } => {
            assert_eq!(*difference, d("0.51"));
        }
        other => panic!("expected mismatch, got {:?}", other),
    }
}

#[test]
fn seed_data_sample_is_flagged() {
    // Channels 2346 + 441 + 104 = 2891.00 against a declared gross of
    // 2703.00. With the special payment channel included in the sum (here
    // zero), the report must be flagged with a difference of 188.00.
    let mut r = base_report();
    r.card_1 = d("2346");
    r.card_2 = d("441");
    r.glovo = d("104");
    r.total_sale_gross = d("2703.00");

    let result = validate(&r);
    assert_eq!(result.errors.len(), 1);
    match &result.errors[0].kind {
        ErrorKind::ReconciliationMismatch {
            channel_total,
            declared_total,
            difference,
        } => {
            assert_eq!(*channel_total, d("2891.00"));
            assert_eq!(*declared_total, d("2703.00"));
            assert_eq!(*difference, d("188.00"));
        }
        other => panic!("expected mismatch, got {:?}", other),
    }
}

#[test]
fn special_payment_counts_toward_channel_sum() {
    let mut r = base_report();
    r.card_1 = d("100.00");
    r.total_sale_with_special_payment = d("50.00");
    r.total_sale_gross = d("150.00");

    assert!(validate(&r).is_valid());
}

#[test]
fn all_errors_reported_at_once() {
    // No venue, no date, zero gross: three errors, none short-circuited
    let r = ReportFigures::default();

    let result = validate(&r);
    assert_eq!(result.errors.len(), 3);
    assert!(matches!(
        result.field("venue").unwrap().kind,
        ErrorKind::MissingField
    ));
    assert!(matches!(
        result.field("for_date").unwrap().kind,
        ErrorKind::MissingField
    ));
    assert!(matches!(
        result.field("total_sale_gross").unwrap().kind,
        ErrorKind::InvalidAmount
    ));
}

#[test]
fn blank_venue_counts_as_missing() {
    let mut r = base_report();
    r.venue = Some("   ".to_string());
    r.total_sale_gross = d("10.00");
    r.cash = d("10.00");

    let result = validate(&r);
    assert!(matches!(
        result.field("venue").unwrap().kind,
        ErrorKind::MissingField
    ));
}

#[test]
fn non_positive_gross_suppresses_mismatch() {
    // One field carries at most one error: the InvalidAmount on the gross
    // replaces the mismatch that would otherwise also fire.
    let mut r = base_report();
    r.cash = d("500.00");
    r.total_sale_gross = Decimal::ZERO;

    let result = validate(&r);
    assert_eq!(result.errors.len(), 1);
    assert!(matches!(
        result.errors[0].kind,
        ErrorKind::InvalidAmount
    ));
}

// ========================================================================
// compute_derived
// ========================================================================

#[test]
fn service_pool_split_example() {
    // (53 + 13) * 0.75 = 49.50
    let mut r = base_report();
    r.serwis = d("13");
    let children = ChildTotals {
        serwis_k: d("53"),
        ..Default::default()
    };

    let derived = compute_derived(&r, &children, Decimal::ZERO);
    assert_eq!(derived.total_service, d("49.50"));
}

#[test]
fn delivery_income_example() {
    // 104 * 0.70 = 72.80
    let mut r = base_report();
    r.glovo = d("104");

    let derived = compute_derived(&r, &ChildTotals::default(), Decimal::ZERO);
    assert_eq!(derived.total_delivery_income, d("72.80"));
}

#[test]
fn gross_and_net_revenue() {
    let mut r = base_report();
    r.card_1 = d("200.00");
    r.card_2 = d("100.00");
    r.cash = d("150.00");
    r.deposit = d("20.00");
    r.total_sale_with_special_payment = d("30.00");
    r.glovo = d("100.00");
    r.serwis = d("10.00");
    let children = ChildTotals {
        withdrawals: d("40.00"),
        serwis_k: d("30.00"),
        ..Default::default()
    };

    let derived = compute_derived(&r, &children, Decimal::ZERO);

    // cards 300 + delivery 70 + special 30 + cash 150 + deposit 20
    assert_eq!(derived.gross_revenue, d("570.00"));
    // service pool: (30 + 10) * 0.75 = 30
    assert_eq!(derived.total_service, d("30.00"));
    // 570 - 40 - 30
    assert_eq!(derived.net_revenue, d("500.00"));
}

#[test]
fn cash_movement_includes_drawer_and_flavour() {
    let mut r = base_report();
    r.cash = d("100.00");
    r.flavour = d("5.00");
    r.deposit = d("10.00");
    r.total_sale_with_special_payment = d("15.00");
    r.drawer = d("20.00");
    r.serwis = d("4.00");
    let children = ChildTotals {
        withdrawals: d("25.00"),
        ..Default::default()
    };

    let derived = compute_derived(&r, &children, Decimal::ZERO);
    // 100 + 5 + 10 + 15 + 20 - 25 - 3.00
    assert_eq!(derived.total_cash, d("122.00"));
}

#[test]
fn carryover_chain_over_three_days() {
    // Three consecutive days; each day's expected cash must equal the
    // previous day's counted drawer plus that day's cash movement.
    let mut carryover = Decimal::ZERO;
    let mut expected_chain = Vec::new();

    let days = [
        (d("100.00"), d("10.00"), d("95.00")), // cash, withdrawals, counted
        (d("250.00"), d("50.00"), d("290.00")),
        (d("80.00"), d("0.00"), d("370.00")),
    ];

    for (cash, withdrawals, counted) in days {
        let mut r = base_report();
        r.cash = cash;
        r.left_in_drawer = counted;
        let children = ChildTotals {
            withdrawals,
            ..Default::default()
        };

        let derived = compute_derived(&r, &children, carryover);
        assert_eq!(
            derived.calculated_cash_expected,
            derived.cash_previous_day + derived.total_cash
        );
        assert_eq!(
            derived.reconciliation_diff,
            derived.calculated_cash_expected - counted
        );
        expected_chain.push(derived.calculated_cash_expected);

        // Next day opens with what was actually counted tonight
        carryover = counted;
    }

    // Manual summation of the same chain
    assert_eq!(expected_chain[0], d("90.00")); // 0 + (100 - 10)
    assert_eq!(expected_chain[1], d("295.00")); // 95 + (250 - 50)
    assert_eq!(expected_chain[2], d("370.00")); // 290 + 80
}

#[test]
fn derived_is_idempotent() {
    let mut r = base_report();
    r.card_1 = d("123.45");
    r.cash = d("67.89");
    r.glovo = d("33.33");
    r.serwis = d("7.77");
    r.left_in_drawer = d("42.00");
    let children = ChildTotals {
        withdrawals: d("11.11"),
        serwis_k: d("22.22"),
        representacja: d("1.00"),
        strata: d("2.00"),
    };
    let carryover = d("55.55");

    let first = compute_derived(&r, &children, carryover);
    let second = compute_derived(&r, &children, carryover);

    assert_eq!(first, second);
    // Bit-identical: same mantissa and scale, not just numeric equality
    assert_eq!(
        format!("{:?}", first),
        format!("{:?}", second)
    );
}

#[test]
fn rounding_applies_only_at_the_edge() {
    // 33.333... style intermediate: (1 + 0) * 0.75 = 0.75, then delivery
    // 0.33 * 0.70 = 0.231 rounds half-up to 0.23 at the edge.
    let mut r = base_report();
    r.glovo = d("0.33");

    let derived = compute_derived(&r, &ChildTotals::default(), Decimal::ZERO);
    assert_eq!(derived.total_delivery_income, d("0.23"));

    // Half-up at the boundary: 0.35 * 0.70 = 0.245 -> 0.25 (away from zero)
    let mut r2 = base_report();
    r2.glovo = d("0.35");
    let derived2 = compute_derived(&r2, &ChildTotals::default(), Decimal::ZERO);
    assert_eq!(derived2.total_delivery_income, d("0.25"));
}
