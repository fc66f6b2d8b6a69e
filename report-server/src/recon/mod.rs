//! Daily-report reconciliation engine
//!
//! Pure decimal arithmetic over a single report's figures: validation of
//! the payment-channel sum against the declared gross, and computation of
//! the derived financial summary (service pool, cash movement, revenue,
//! cash-carryover chain).
//!
//! All calculations are done in `Decimal`; rounding to 2 decimal places
//! happens only on the output edge, never mid-formula. No I/O, no clock,
//! no hidden state: identical inputs always produce identical outputs.

use chrono::NaiveDate;
use rust_decimal::prelude::*;
use serde::Serialize;

#[cfg(test)]
mod tests;

/// Monetary values are rounded to 2 decimal places, half-up
const DECIMAL_PLACES: u32 = 2;

/// Allowed deviation between the channel sum and the declared gross (0.50)
pub const PAYMENT_SUM_TOLERANCE: Decimal = Decimal::from_parts(50, 0, 0, false, 2);

/// Share of the service pool retained by the venue (0.75)
pub const SERVICE_POOL_RETAINED: Decimal = Decimal::from_parts(75, 0, 0, false, 2);

/// Venue's net share of delivery-platform revenue after commission (0.70)
pub const DELIVERY_NET_SHARE: Decimal = Decimal::from_parts(70, 0, 0, false, 2);

/// Round a monetary value for storage/display
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Raw figures of one daily report, as entered on the form
///
/// Only the fields the engine reads are here. The mirrored child sums
/// (`withdrawal`, `serwis_k`, …) arrive separately through [`ChildTotals`]
/// so the engine always works from the authoritative line items.
#[derive(Debug, Clone, Default)]
pub struct ReportFigures {
    /// Venue identifier, required
    pub venue: Option<String>,
    /// Business date, required
    pub for_date: Option<NaiveDate>,

    // Payment channels
    pub card_1: Decimal,
    pub card_2: Decimal,
    pub cash: Decimal,
    pub przelew: Decimal,
    pub glovo: Decimal,
    pub uber: Decimal,
    pub wolt: Decimal,
    pub pyszne: Decimal,
    pub bolt: Decimal,
    pub total_sale_with_special_payment: Decimal,

    /// Declared gross, checked against the channel sum
    pub total_sale_gross: Decimal,

    // Cash handling fields entering the derived formulas
    pub flavour: Decimal,
    pub deposit: Decimal,
    pub drawer: Decimal,
    /// Flat 10%-service amount entered on the form
    pub serwis: Decimal,
    /// Cash counted in the drawer at close
    pub left_in_drawer: Decimal,
}

impl ReportFigures {
    /// Sum of every payment channel, special payment included
    pub fn channel_total(&self) -> Decimal {
        self.card_1
            + self.card_2
            + self.cash
            + self.przelew
            + self.glovo
            + self.uber
            + self.wolt
            + self.pyszne
            + self.bolt
            + self.total_sale_with_special_payment
    }
}

/// Child line-item sums, aggregated by the persistence layer
#[derive(Debug, Clone, Copy, Default)]
pub struct ChildTotals {
    pub withdrawals: Decimal,
    pub serwis_k: Decimal,
    pub representacja: Decimal,
    pub strata: Decimal,
}

/// Validation error kinds, field-scoped
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum ErrorKind {
    MissingField,
    InvalidAmount,
    ReconciliationMismatch {
        channel_total: Decimal,
        declared_total: Decimal,
        difference: Decimal,
    },
}

/// One validation error, scoped to a single field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    #[serde(flatten)]
    pub kind: ErrorKind,
    pub message: String,
}

/// Outcome of [`validate`]: every error at once, never just the first
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationResult {
    pub errors: Vec<FieldError>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Error for a given field, if any (at most one per field)
    pub fn field(&self, name: &str) -> Option<&FieldError> {
        self.errors.iter().find(|e| e.field == name)
    }
}

/// Derived financial summary of one report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DerivedValues {
    /// Retained service pool: `(serwis_k_sum + serwis) * 0.75`
    pub total_service: Decimal,
    pub total_card_payment: Decimal,
    /// Net cash movement of the day
    pub total_cash: Decimal,
    /// Delivery revenue net of the 30% platform commission
    pub total_delivery_income: Decimal,
    pub gross_revenue: Decimal,
    pub net_revenue: Decimal,
    /// Carryover used as the opening cash balance
    pub cash_previous_day: Decimal,
    /// `cash_previous_day + total_cash`
    pub calculated_cash_expected: Decimal,
    /// `calculated_cash_expected - left_in_drawer`
    pub reconciliation_diff: Decimal,
}

/// Validate a report's figures
///
/// Rules, in order:
/// 1. venue and date must be present (`MissingField`)
/// 2. `total_sale_gross` must be positive (`InvalidAmount`)
/// 3. the channel sum must match the declared gross within
///    [`PAYMENT_SUM_TOLERANCE`] (`ReconciliationMismatch`, carrying both
///    totals and their absolute difference)
///
/// Every failed rule is collected; a field carries at most one error, so a
/// non-positive gross suppresses the mismatch check on the same field.
pub fn validate(report: &ReportFigures) -> ValidationResult {
    let mut errors = Vec::new();

    if report.venue.as_deref().is_none_or(|v| v.trim().is_empty()) {
        errors.push(FieldError {
            field: "venue",
            kind: ErrorKind::MissingField,
            message: "venue is required".to_string(),
        });
    }

    if report.for_date.is_none() {
        errors.push(FieldError {
            field: "for_date",
            kind: ErrorKind::MissingField,
            message: "report date is required".to_string(),
        });
    }

    if report.total_sale_gross <= Decimal::ZERO {
        errors.push(FieldError {
            field: "total_sale_gross",
            kind: ErrorKind::InvalidAmount,
            message: format!(
                "total gross sale must be positive, got {}",
                report.total_sale_gross
            ),
        });
    } else {
        let channel_total = report.channel_total();
        let difference = (channel_total - report.total_sale_gross).abs();
        if difference > PAYMENT_SUM_TOLERANCE {
            errors.push(FieldError {
                field: "total_sale_gross",
                kind: ErrorKind::ReconciliationMismatch {
                    channel_total: round_money(channel_total),
                    declared_total: round_money(report.total_sale_gross),
                    difference: round_money(difference),
                },
                message: format!(
                    "payment channels sum to {} but declared gross is {} (off by {})",
                    round_money(channel_total),
                    round_money(report.total_sale_gross),
                    round_money(difference),
                ),
            });
        }
    }

    ValidationResult { errors }
}

/// Compute the derived financial summary
///
/// `previous_day_cash` is the prior report's `left_in_drawer` for the same
/// venue, or zero when no prior report exists. All intermediate math stays
/// unrounded; each output field is rounded once at the end.
pub fn compute_derived(
    report: &ReportFigures,
    children: &ChildTotals,
    previous_day_cash: Decimal,
) -> DerivedValues {
    let total_service = (children.serwis_k + report.serwis) * SERVICE_POOL_RETAINED;

    let total_card_payment = report.card_1 + report.card_2;

    let total_cash = report.cash
        + report.flavour
        + report.deposit
        + report.total_sale_with_special_payment
        + report.drawer
        - children.withdrawals
        - total_service;

    let delivery_gross =
        report.przelew + report.glovo + report.uber + report.wolt + report.pyszne + report.bolt;
    let total_delivery_income = delivery_gross * DELIVERY_NET_SHARE;

    let gross_revenue = total_card_payment
        + total_delivery_income
        + report.total_sale_with_special_payment
        + report.cash
        + report.deposit;

    let net_revenue = gross_revenue - children.withdrawals - total_service;

    let calculated_cash_expected = previous_day_cash + total_cash;
    let reconciliation_diff = calculated_cash_expected - report.left_in_drawer;

    DerivedValues {
        total_service: round_money(total_service),
        total_card_payment: round_money(total_card_payment),
        total_cash: round_money(total_cash),
        total_delivery_income: round_money(total_delivery_income),
        gross_revenue: round_money(gross_revenue),
        net_revenue: round_money(net_revenue),
        cash_previous_day: round_money(previous_day_cash),
        calculated_cash_expected: round_money(calculated_cash_expected),
        reconciliation_diff: round_money(reconciliation_diff),
    }
}
