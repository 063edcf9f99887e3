//! Ledger entity types
//!
//! `HistoryEntry` is the immutable fact; `TotalsSnapshot` is what queries
//! hand back. For any bucket key, the totals row must equal the sum and
//! count of its history rows.

use crate::amounts::Currency;
use crate::shift::Shift;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// One recorded contribution. Appended on every parsed amount, never
/// mutated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub chat_id: i64,
    pub recorded_at: NaiveDateTime,
    pub business_date: NaiveDate,
    pub shift: Shift,
    pub currency: Currency,
    pub amount: f64,
}

impl HistoryEntry {
    /// Serialize to a single JSONL line, the format the audit export uses.
    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse a HistoryEntry back from a JSONL line.
    pub fn from_jsonl(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}

/// Accumulated total and contribution count for one currency.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BucketTotals {
    pub total: f64,
    pub invoices: i64,
}

/// Per-currency totals for one query scope (a single shift or a whole
/// business day). Both supported currencies are always present,
/// zero-filled when inactive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TotalsSnapshot {
    pub usd: BucketTotals,
    pub khr: BucketTotals,
}

impl TotalsSnapshot {
    pub fn get(&self, currency: Currency) -> BucketTotals {
        match currency {
            Currency::Usd => self.usd,
            Currency::Khr => self.khr,
        }
    }

    pub(crate) fn get_mut(&mut self, currency: Currency) -> &mut BucketTotals {
        match currency {
            Currency::Usd => &mut self.usd,
            Currency::Khr => &mut self.khr,
        }
    }
}

/// One row of the totals relation, as consumed by the export renderer.
#[derive(Debug, Clone, Serialize)]
pub struct TotalRow {
    pub chat_id: i64,
    pub business_date: NaiveDate,
    pub shift: Shift,
    pub currency: Currency,
    pub total: f64,
    pub invoices: i64,
}
