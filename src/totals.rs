//! Shift-scoped and day-scoped totals queries
//!
//! Thin composition over the resolver and the store: callers hand in
//! "now" and get back the matching bucket totals plus the scope they
//! were computed for.

use crate::ledger_core::{LedgerError, LedgerStore, TotalsSnapshot};
use crate::shift::{self, Shift};
use chrono::{NaiveDate, NaiveDateTime};
use std::sync::Arc;

/// A totals snapshot labelled with the scope it was computed for.
/// `shift` is `None` for whole-business-day queries.
#[derive(Debug, Clone)]
pub struct ScopedTotals {
    pub business_date: NaiveDate,
    pub shift: Option<Shift>,
    pub snapshot: TotalsSnapshot,
}

pub struct TotalsFacade {
    store: Arc<dyn LedgerStore>,
}

impl TotalsFacade {
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self { store }
    }

    /// Totals for the shift `now` falls into.
    pub async fn current_shift(
        &self,
        chat_id: i64,
        now: NaiveDateTime,
    ) -> Result<ScopedTotals, LedgerError> {
        let (shift, business_date) = shift::resolve(now);
        let snapshot = self
            .store
            .totals(chat_id, business_date, Some(shift))
            .await?;
        Ok(ScopedTotals {
            business_date,
            shift: Some(shift),
            snapshot,
        })
    }

    /// Totals for the whole business day `now` falls into, all shifts
    /// summed.
    pub async fn business_day(
        &self,
        chat_id: i64,
        now: NaiveDateTime,
    ) -> Result<ScopedTotals, LedgerError> {
        let (_, business_date) = shift::resolve(now);
        let snapshot = self.store.totals(chat_id, business_date, None).await?;
        Ok(ScopedTotals {
            business_date,
            shift: None,
            snapshot,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amounts::Currency;
    use crate::ledger_core::SqliteLedgerStore;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn at(d: u32, h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, d)
            .unwrap()
            .and_hms_opt(h, mi, 0)
            .unwrap()
    }

    #[tokio::test]
    async fn test_current_shift_scope() {
        let dir = tempdir().unwrap();
        let store = Arc::new(SqliteLedgerStore::new(dir.path().join("test.db")).unwrap());
        let facade = TotalsFacade::new(store.clone());

        store
            .record(1, Currency::Usd, 4.0, at(10, 9, 0))
            .await
            .unwrap();
        store
            .record(1, Currency::Usd, 6.0, at(10, 15, 0))
            .await
            .unwrap();

        // Morning query only sees the morning bucket
        let scoped = facade.current_shift(1, at(10, 10, 0)).await.unwrap();
        assert_eq!(scoped.shift, Some(Shift::First));
        assert_eq!(scoped.business_date, NaiveDate::from_ymd_opt(2025, 3, 10).unwrap());
        assert_eq!(scoped.snapshot.usd.total, 4.0);
    }

    #[tokio::test]
    async fn test_business_day_sums_shifts() {
        let dir = tempdir().unwrap();
        let store = Arc::new(SqliteLedgerStore::new(dir.path().join("test.db")).unwrap());
        let facade = TotalsFacade::new(store.clone());

        store
            .record(1, Currency::Usd, 4.0, at(10, 9, 0))
            .await
            .unwrap();
        store
            .record(1, Currency::Usd, 6.0, at(10, 15, 0))
            .await
            .unwrap();
        store
            .record(1, Currency::Usd, 2.5, at(10, 22, 0))
            .await
            .unwrap();

        let scoped = facade.business_day(1, at(10, 22, 30)).await.unwrap();
        assert_eq!(scoped.shift, None);
        assert_eq!(scoped.snapshot.usd.total, 12.5);
        assert_eq!(scoped.snapshot.usd.invoices, 3);
    }

    #[tokio::test]
    async fn test_early_morning_queries_previous_business_day() {
        let dir = tempdir().unwrap();
        let store = Arc::new(SqliteLedgerStore::new(dir.path().join("test.db")).unwrap());
        let facade = TotalsFacade::new(store.clone());

        store
            .record(1, Currency::Khr, 8000.0, at(10, 23, 0))
            .await
            .unwrap();

        // 03:00 on the 11th is still business date 2025-03-10
        let scoped = facade.current_shift(1, at(11, 3, 0)).await.unwrap();
        assert_eq!(scoped.business_date, NaiveDate::from_ymd_opt(2025, 3, 10).unwrap());
        assert_eq!(scoped.shift, Some(Shift::Third));
        assert_eq!(scoped.snapshot.khr.total, 8000.0);
    }
}
