//! Daily Report Model
//!
//! One row per (venue, date). Payment channels and cash-handling figures
//! are entered on the form; the four mirror fields are maintained
//! transactionally from the child line items; the derived snapshot is
//! recomputed by the reconciliation engine on every save and stored for
//! audit.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;
use crate::recon::{ChildTotals, ReportFigures};
use shared::report::ReportStatus;

pub type ReportId = RecordId;

/// Client-editable figures of the daily form
///
/// The mirror fields (`withdrawal`, `serwis_k`, `representacja`,
/// `strata_loss`) are deliberately absent: they are derived from child
/// rows and never accepted from the client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportForm {
    // ========== Payment channels ==========
    #[serde(default, with = "rust_decimal::serde::float")]
    pub card_1: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub card_2: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub cash: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub przelew: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub glovo: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub uber: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub wolt: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub pyszne: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub bolt: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub total_sale_with_special_payment: Decimal,

    /// Declared gross; must match the channel sum within 0.50
    #[serde(default, with = "rust_decimal::serde::float")]
    pub total_sale_gross: Decimal,

    // ========== Cash handling ==========
    #[serde(default, with = "rust_decimal::serde::float")]
    pub locker_withdrawal: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub deposit: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub staff_cost: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub tips_cash: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub tips_card: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub cash_in_envelope_after_tips: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub left_in_drawer: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub total_cash_in_locker: Decimal,
    /// Cash float adjustment added to the drawer during the day
    #[serde(default, with = "rust_decimal::serde::float")]
    pub drawer: Decimal,

    // ========== Service / adjustments ==========
    /// Flat 10%-service amount; pooled with the serwis-kwotowy items
    #[serde(default, with = "rust_decimal::serde::float")]
    pub serwis: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub company: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub voids: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub flavour: Decimal,
}

impl ReportForm {
    /// Every monetary field with its name, for request-boundary validation
    pub fn amounts(&self) -> [(&'static str, Decimal); 24] {
        [
            ("card_1", self.card_1),
            ("card_2", self.card_2),
            ("cash", self.cash),
            ("przelew", self.przelew),
            ("glovo", self.glovo),
            ("uber", self.uber),
            ("wolt", self.wolt),
            ("pyszne", self.pyszne),
            ("bolt", self.bolt),
            (
                "total_sale_with_special_payment",
                self.total_sale_with_special_payment,
            ),
            ("total_sale_gross", self.total_sale_gross),
            ("locker_withdrawal", self.locker_withdrawal),
            ("deposit", self.deposit),
            ("staff_cost", self.staff_cost),
            ("tips_cash", self.tips_cash),
            ("tips_card", self.tips_card),
            (
                "cash_in_envelope_after_tips",
                self.cash_in_envelope_after_tips,
            ),
            ("left_in_drawer", self.left_in_drawer),
            ("total_cash_in_locker", self.total_cash_in_locker),
            ("drawer", self.drawer),
            ("serwis", self.serwis),
            ("company", self.company),
            ("voids", self.voids),
            ("flavour", self.flavour),
        ]
    }
}

/// Daily report entity matching the SurrealDB schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyReport {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<ReportId>,

    #[serde(with = "serde_helpers::record_id")]
    pub venue: RecordId,

    /// Business date (YYYY-MM-DD)
    pub for_date: String,

    #[serde(default)]
    pub status: ReportStatus,

    // ========== Payment channels ==========
    #[serde(default, with = "rust_decimal::serde::float")]
    pub card_1: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub card_2: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub cash: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub przelew: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub glovo: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub uber: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub wolt: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub pyszne: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub bolt: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub total_sale_with_special_payment: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub total_sale_gross: Decimal,

    // ========== Mirrors of the child line items (never client-edited) ==========
    #[serde(default, with = "rust_decimal::serde::float")]
    pub withdrawal: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub serwis_k: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub representacja: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub strata_loss: Decimal,

    // ========== Cash handling ==========
    #[serde(default, with = "rust_decimal::serde::float")]
    pub locker_withdrawal: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub deposit: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub staff_cost: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub tips_cash: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub tips_card: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub cash_in_envelope_after_tips: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub left_in_drawer: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub total_cash_in_locker: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub drawer: Decimal,

    // ========== Service / adjustments ==========
    #[serde(default, with = "rust_decimal::serde::float")]
    pub serwis: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub company: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub voids: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub flavour: Decimal,

    // ========== Derived snapshot (computed on every save, stored for audit) ==========
    #[serde(default, with = "rust_decimal::serde::float")]
    pub cash_previous_day: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub calculated_cash_expected: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub reconciliation_diff: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub gross_revenue: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub net_revenue: Decimal,

    // ========== Provenance ==========
    #[serde(with = "serde_helpers::record_id")]
    pub created_by: RecordId,
    pub submitted_at: Option<i64>,
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub approved_by: Option<RecordId>,
    pub approved_at: Option<i64>,
    pub created_at: Option<i64>,
    pub updated_at: Option<i64>,
}

impl DailyReport {
    /// Build a fresh draft from a create payload
    pub fn new_draft(venue: RecordId, for_date: String, created_by: RecordId) -> Self {
        Self {
            id: None,
            venue,
            for_date,
            status: ReportStatus::Draft,
            card_1: Decimal::ZERO,
            card_2: Decimal::ZERO,
            cash: Decimal::ZERO,
            przelew: Decimal::ZERO,
            glovo: Decimal::ZERO,
            uber: Decimal::ZERO,
            wolt: Decimal::ZERO,
            pyszne: Decimal::ZERO,
            bolt: Decimal::ZERO,
            total_sale_with_special_payment: Decimal::ZERO,
            total_sale_gross: Decimal::ZERO,
            withdrawal: Decimal::ZERO,
            serwis_k: Decimal::ZERO,
            representacja: Decimal::ZERO,
            strata_loss: Decimal::ZERO,
            locker_withdrawal: Decimal::ZERO,
            deposit: Decimal::ZERO,
            staff_cost: Decimal::ZERO,
            tips_cash: Decimal::ZERO,
            tips_card: Decimal::ZERO,
            cash_in_envelope_after_tips: Decimal::ZERO,
            left_in_drawer: Decimal::ZERO,
            total_cash_in_locker: Decimal::ZERO,
            drawer: Decimal::ZERO,
            serwis: Decimal::ZERO,
            company: Decimal::ZERO,
            voids: Decimal::ZERO,
            flavour: Decimal::ZERO,
            cash_previous_day: Decimal::ZERO,
            calculated_cash_expected: Decimal::ZERO,
            reconciliation_diff: Decimal::ZERO,
            gross_revenue: Decimal::ZERO,
            net_revenue: Decimal::ZERO,
            created_by,
            submitted_at: None,
            approved_by: None,
            approved_at: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// Copy the client-editable fields from a submitted form
    pub fn apply_form(&mut self, form: &ReportForm) {
        self.card_1 = form.card_1;
        self.card_2 = form.card_2;
        self.cash = form.cash;
        self.przelew = form.przelew;
        self.glovo = form.glovo;
        self.uber = form.uber;
        self.wolt = form.wolt;
        self.pyszne = form.pyszne;
        self.bolt = form.bolt;
        self.total_sale_with_special_payment = form.total_sale_with_special_payment;
        self.total_sale_gross = form.total_sale_gross;
        self.locker_withdrawal = form.locker_withdrawal;
        self.deposit = form.deposit;
        self.staff_cost = form.staff_cost;
        self.tips_cash = form.tips_cash;
        self.tips_card = form.tips_card;
        self.cash_in_envelope_after_tips = form.cash_in_envelope_after_tips;
        self.left_in_drawer = form.left_in_drawer;
        self.total_cash_in_locker = form.total_cash_in_locker;
        self.drawer = form.drawer;
        self.serwis = form.serwis;
        self.company = form.company;
        self.voids = form.voids;
        self.flavour = form.flavour;
    }

    /// The engine's view of this report
    pub fn figures(&self) -> ReportFigures {
        ReportFigures {
            venue: Some(self.venue.to_string()),
            for_date: chrono::NaiveDate::parse_from_str(&self.for_date, "%Y-%m-%d").ok(),
            card_1: self.card_1,
            card_2: self.card_2,
            cash: self.cash,
            przelew: self.przelew,
            glovo: self.glovo,
            uber: self.uber,
            wolt: self.wolt,
            pyszne: self.pyszne,
            bolt: self.bolt,
            total_sale_with_special_payment: self.total_sale_with_special_payment,
            total_sale_gross: self.total_sale_gross,
            flavour: self.flavour,
            deposit: self.deposit,
            drawer: self.drawer,
            serwis: self.serwis,
            left_in_drawer: self.left_in_drawer,
        }
    }

    /// Mirror sums as engine child totals
    pub fn child_totals(&self) -> ChildTotals {
        ChildTotals {
            withdrawals: self.withdrawal,
            serwis_k: self.serwis_k,
            representacja: self.representacja,
            strata: self.strata_loss,
        }
    }

    /// Write one mirror field from a freshly computed child-row sum
    pub fn set_mirror(&mut self, kind: super::LineItemKind, sum: Decimal) {
        match kind {
            super::LineItemKind::Withdrawal => self.withdrawal = sum,
            super::LineItemKind::SerwisK => self.serwis_k = sum,
            super::LineItemKind::Representacja => self.representacja = sum,
            super::LineItemKind::Strata => self.strata_loss = sum,
        }
    }

    /// Store the engine's derived snapshot
    pub fn apply_derived(&mut self, derived: &crate::recon::DerivedValues) {
        self.cash_previous_day = derived.cash_previous_day;
        self.calculated_cash_expected = derived.calculated_cash_expected;
        self.reconciliation_diff = derived.reconciliation_diff;
        self.gross_revenue = derived.gross_revenue;
        self.net_revenue = derived.net_revenue;
    }
}

/// Create report payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyReportCreate {
    #[serde(with = "serde_helpers::record_id")]
    pub venue: RecordId,
    /// Business date (YYYY-MM-DD)
    pub for_date: String,
    #[serde(flatten)]
    pub form: ReportForm,
}

/// Update report payload; the full form is resubmitted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyReportUpdate {
    #[serde(flatten)]
    pub form: ReportForm,
}

/// Admin status override payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusChange {
    pub status: ReportStatus,
}
