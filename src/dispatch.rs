//! Inbound message handling and reply formatting
//!
//! The chat transport hands each message to `MessageDispatcher::handle`
//! and sends whatever reply text comes back. Command routing, keyboard
//! rendering and delivery stay on the transport side.

use crate::amounts::{self, Currency};
use crate::ledger_core::{LedgerError, LedgerStore, TotalsSnapshot};
use crate::totals::TotalsFacade;
use chrono::NaiveDateTime;
use std::sync::Arc;

pub const CMD_SHIFT_TOTAL: &str = "📊 Total";
pub const CMD_DAY_TOTAL: &str = "📊 Total All";

pub struct MessageDispatcher {
    store: Arc<dyn LedgerStore>,
    facade: TotalsFacade,
}

impl MessageDispatcher {
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        let facade = TotalsFacade::new(store.clone());
        Self { store, facade }
    }

    /// Handle one inbound chat message. Returns the reply text, or `None`
    /// when the message carries neither a command nor an amount.
    pub async fn handle(
        &self,
        chat_id: i64,
        text: &str,
        at: NaiveDateTime,
    ) -> Result<Option<String>, LedgerError> {
        let text = text.trim();

        if text == CMD_SHIFT_TOTAL {
            let scoped = self.facade.current_shift(chat_id, at).await?;
            return Ok(Some(format_reply(&scoped.snapshot)));
        }

        if text == CMD_DAY_TOTAL {
            let scoped = self.facade.business_day(chat_id, at).await?;
            return Ok(Some(format_reply(&scoped.snapshot)));
        }

        let parsed = amounts::parse_amounts(text);
        if parsed.is_empty() {
            return Ok(None);
        }

        for (amount, currency) in parsed {
            self.store.record(chat_id, currency, amount, at).await?;
        }

        let scoped = self.facade.current_shift(chat_id, at).await?;
        Ok(Some(format_reply(&scoped.snapshot)))
    }
}

/// `USD: 12.50$ | KHR: 3,000៛` — dollars with cents, riel whole with
/// thousands separators.
pub fn format_reply(snapshot: &TotalsSnapshot) -> String {
    format!(
        "USD: {:.2}{} | KHR: {}{}",
        snapshot.get(Currency::Usd).total,
        Currency::Usd.symbol(),
        group_thousands(snapshot.get(Currency::Khr).total),
        Currency::Khr.symbol(),
    )
}

fn group_thousands(value: f64) -> String {
    let whole = value.round() as i64;
    let digits = whole.abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if whole < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger_core::{BucketTotals, SqliteLedgerStore};
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn at(h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 10)
            .unwrap()
            .and_hms_opt(h, mi, 0)
            .unwrap()
    }

    fn make_dispatcher(dir: &tempfile::TempDir) -> MessageDispatcher {
        let store = Arc::new(SqliteLedgerStore::new(dir.path().join("test.db")).unwrap());
        MessageDispatcher::new(store)
    }

    #[tokio::test]
    async fn test_amount_message_records_and_replies() {
        let dir = tempdir().unwrap();
        let dispatcher = make_dispatcher(&dir);

        let reply = dispatcher
            .handle(1, "$12.50 and 3000 khr", at(9, 0))
            .await
            .unwrap();
        assert_eq!(reply, Some("USD: 12.50$ | KHR: 3,000៛".to_string()));
    }

    #[tokio::test]
    async fn test_plain_chatter_is_ignored() {
        let dir = tempdir().unwrap();
        let dispatcher = make_dispatcher(&dir);

        let reply = dispatcher.handle(1, "hello", at(9, 0)).await.unwrap();
        assert_eq!(reply, None);
    }

    #[tokio::test]
    async fn test_shift_total_command() {
        let dir = tempdir().unwrap();
        let dispatcher = make_dispatcher(&dir);

        dispatcher.handle(1, "$10", at(9, 0)).await.unwrap();
        dispatcher.handle(1, "$5", at(15, 0)).await.unwrap();

        // Morning command only reports the morning shift
        let reply = dispatcher.handle(1, "📊 Total", at(10, 0)).await.unwrap();
        assert_eq!(reply, Some("USD: 10.00$ | KHR: 0៛".to_string()));
    }

    #[tokio::test]
    async fn test_day_total_command_sums_shifts() {
        let dir = tempdir().unwrap();
        let dispatcher = make_dispatcher(&dir);

        dispatcher.handle(1, "$10", at(9, 0)).await.unwrap();
        dispatcher.handle(1, "$5", at(15, 0)).await.unwrap();

        let reply = dispatcher
            .handle(1, "📊 Total All", at(16, 0))
            .await
            .unwrap();
        assert_eq!(reply, Some("USD: 15.00$ | KHR: 0៛".to_string()));
    }

    #[tokio::test]
    async fn test_chats_are_isolated() {
        let dir = tempdir().unwrap();
        let dispatcher = make_dispatcher(&dir);

        dispatcher.handle(1, "$10", at(9, 0)).await.unwrap();
        let reply = dispatcher.handle(2, "📊 Total", at(9, 30)).await.unwrap();
        assert_eq!(reply, Some("USD: 0.00$ | KHR: 0៛".to_string()));
    }

    #[test]
    fn test_format_reply() {
        let snapshot = TotalsSnapshot {
            usd: BucketTotals { total: 1234.5, invoices: 3 },
            khr: BucketTotals { total: 1_250_000.0, invoices: 2 },
        };
        assert_eq!(format_reply(&snapshot), "USD: 1234.50$ | KHR: 1,250,000៛");

        assert_eq!(
            format_reply(&TotalsSnapshot::default()),
            "USD: 0.00$ | KHR: 0៛"
        );
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0.0), "0");
        assert_eq!(group_thousands(999.0), "999");
        assert_eq!(group_thousands(1000.0), "1,000");
        assert_eq!(group_thousands(4000.4), "4,000");
        assert_eq!(group_thousands(12_345_678.0), "12,345,678");
    }
}
