//! Line-item child entities
//!
//! Four one-to-many tables hang off a report, each row `{report, amount,
//! reason}`: withdrawals, representacja entries, serwis-kwotowy entries
//! and strata (loss) entries. The matching parent field always mirrors
//! the sum of the rows; the mirror is written in the same transaction as
//! the rows themselves.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

/// The four kinds of itemized entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineItemKind {
    Withdrawal,
    Representacja,
    SerwisK,
    Strata,
}

impl LineItemKind {
    /// Database table holding rows of this kind
    pub fn table(self) -> &'static str {
        match self {
            Self::Withdrawal => "withdrawal_entry",
            Self::Representacja => "representacja_entry",
            Self::SerwisK => "serwis_k_entry",
            Self::Strata => "strata_entry",
        }
    }

    /// Parent report field mirroring the sum of this kind's rows
    pub fn mirror_field(self) -> &'static str {
        match self {
            Self::Withdrawal => "withdrawal",
            Self::Representacja => "representacja",
            Self::SerwisK => "serwis_k",
            Self::Strata => "strata_loss",
        }
    }

    /// URL path segment used by the entries API
    pub fn from_path(segment: &str) -> Option<Self> {
        match segment {
            "withdrawals" => Some(Self::Withdrawal),
            "representacja" => Some(Self::Representacja),
            "serwis-k" => Some(Self::SerwisK),
            "strata" => Some(Self::Strata),
            _ => None,
        }
    }

    pub const ALL: [LineItemKind; 4] = [
        Self::Withdrawal,
        Self::Representacja,
        Self::SerwisK,
        Self::Strata,
    ];
}

/// One stored line item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub report: RecordId,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub reason: String,
    pub created_at: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_segments_map_to_kinds() {
        assert_eq!(
            LineItemKind::from_path("withdrawals"),
            Some(LineItemKind::Withdrawal)
        );
        assert_eq!(
            LineItemKind::from_path("serwis-k"),
            Some(LineItemKind::SerwisK)
        );
        assert_eq!(LineItemKind::from_path("nope"), None);
    }

    #[test]
    fn tables_and_mirrors_are_distinct() {
        let tables: Vec<_> = LineItemKind::ALL.iter().map(|k| k.table()).collect();
        let mirrors: Vec<_> = LineItemKind::ALL.iter().map(|k| k.mirror_field()).collect();
        for set in [&tables, &mirrors] {
            let mut dedup = set.clone();
            dedup.sort();
            dedup.dedup();
            assert_eq!(dedup.len(), 4);
        }
    }
}
