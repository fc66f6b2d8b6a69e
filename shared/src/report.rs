//! Daily report types shared between server and client

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Daily report lifecycle status
///
/// Transitions are monotonic for staff (draft → submitted). Admins may set
/// any status, including moving a report backwards to reopen it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportStatus {
    Draft,
    Submitted,
    Approved,
    Locked,
}

impl Default for ReportStatus {
    fn default() -> Self {
        Self::Draft
    }
}

impl ReportStatus {
    /// Whether a transition from `self` to `to` is allowed.
    ///
    /// Staff may only move a draft to submitted. Admins may set any status
    /// (the admin override required for corrections and locking).
    pub fn can_transition(self, to: ReportStatus, is_admin: bool) -> bool {
        if is_admin {
            return true;
        }
        self == Self::Draft && to == Self::Submitted
    }

    /// Whether the report is still editable by its creator
    pub fn is_editable_by_creator(self) -> bool {
        self == Self::Draft
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Draft => "DRAFT",
            Self::Submitted => "SUBMITTED",
            Self::Approved => "APPROVED",
            Self::Locked => "LOCKED",
        };
        f.write_str(s)
    }
}

/// One itemized child row of a report (withdrawal, representacja,
/// serwis-kwotowy or strata entry)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItemInput {
    pub amount: Decimal,
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staff_can_only_submit_drafts() {
        assert!(ReportStatus::Draft.can_transition(ReportStatus::Submitted, false));
        assert!(!ReportStatus::Draft.can_transition(ReportStatus::Approved, false));
        assert!(!ReportStatus::Draft.can_transition(ReportStatus::Locked, false));
        assert!(!ReportStatus::Submitted.can_transition(ReportStatus::Draft, false));
        assert!(!ReportStatus::Approved.can_transition(ReportStatus::Submitted, false));
    }

    #[test]
    fn admin_may_set_any_status() {
        for from in [
            ReportStatus::Draft,
            ReportStatus::Submitted,
            ReportStatus::Approved,
            ReportStatus::Locked,
        ] {
            for to in [
                ReportStatus::Draft,
                ReportStatus::Submitted,
                ReportStatus::Approved,
                ReportStatus::Locked,
            ] {
                assert!(from.can_transition(to, true));
            }
        }
    }

    #[test]
    fn only_drafts_are_creator_editable() {
        assert!(ReportStatus::Draft.is_editable_by_creator());
        assert!(!ReportStatus::Submitted.is_editable_by_creator());
        assert!(!ReportStatus::Locked.is_editable_by_creator());
    }
}
