//! Storage trait and error taxonomy
//!
//! Collaborators (chat transport, export renderer) depend on `LedgerStore`,
//! not on the SQLite implementation behind it.

use super::types::{TotalRow, TotalsSnapshot};
use crate::amounts::Currency;
use crate::shift::Shift;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};

#[derive(Debug)]
pub enum LedgerError {
    /// Malformed input, rejected before any write. Not worth retrying.
    Validation(String),
    /// I/O, timeout or transaction conflict. The whole call may be retried.
    Storage(String),
}

impl From<rusqlite::Error> for LedgerError {
    fn from(err: rusqlite::Error) -> Self {
        LedgerError::Storage(err.to_string())
    }
}

impl std::fmt::Display for LedgerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LedgerError::Validation(msg) => write!(f, "Validation error: {}", msg),
            LedgerError::Storage(msg) => write!(f, "Storage error: {}", msg),
        }
    }
}

impl std::error::Error for LedgerError {}

impl LedgerError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, LedgerError::Storage(_))
    }
}

#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Append one history entry and fold the amount into its
    /// (chat, business date, shift, currency) bucket, as one atomic unit.
    /// Either both writes commit or neither does.
    async fn record(
        &self,
        chat_id: i64,
        currency: Currency,
        amount: f64,
        at: NaiveDateTime,
    ) -> Result<(), LedgerError>;

    /// Totals for one shift, or summed across all shifts of the business
    /// day when `shift` is `None`. Read-only; never creates rows.
    async fn totals(
        &self,
        chat_id: i64,
        business_date: NaiveDate,
        shift: Option<Shift>,
    ) -> Result<TotalsSnapshot, LedgerError>;

    /// Every totals row across all chats, for the export renderer.
    async fn dump_totals(&self) -> Result<Vec<TotalRow>, LedgerError>;
}
