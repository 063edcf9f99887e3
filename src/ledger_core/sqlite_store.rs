//! SQLite implementation of the ledger store
//!
//! One connection behind a mutex; every `record` runs as a single
//! transaction so the history append and the bucket upsert commit
//! together or not at all. The bucket accumulation itself is a
//! database-native `ON CONFLICT DO UPDATE`, so interleaved writers for
//! the same key cannot lose contributions.

use super::store::{LedgerError, LedgerStore};
use super::types::{BucketTotals, HistoryEntry, TotalRow, TotalsSnapshot};
use crate::amounts::Currency;
use crate::shift::{self, Shift};
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

const DATE_FMT: &str = "%Y-%m-%d";
const TIMESTAMP_FMT: &str = "%Y-%m-%d %H:%M:%S";

/// Upper bound on waiting for a locked database before surfacing a
/// retryable storage error instead of hanging.
const BUSY_TIMEOUT_MS: u64 = 5_000;

pub struct SqliteLedgerStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteLedgerStore {
    pub fn new(db_path: impl AsRef<Path>) -> Result<Self, LedgerError> {
        if let Some(parent) = db_path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    LedgerError::Storage(format!(
                        "Failed to create database directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let conn = Connection::open(db_path)?;

        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.busy_timeout(Duration::from_millis(BUSY_TIMEOUT_MS))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS totals (
                chat_id INTEGER NOT NULL,
                business_date TEXT NOT NULL,
                shift TEXT NOT NULL,
                currency TEXT NOT NULL,
                total REAL NOT NULL,
                invoices INTEGER NOT NULL,
                PRIMARY KEY (chat_id, business_date, shift, currency)
            )",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS history (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                chat_id INTEGER NOT NULL,
                recorded_at TEXT NOT NULL,
                business_date TEXT NOT NULL,
                shift TEXT NOT NULL,
                currency TEXT NOT NULL,
                amount REAL NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_history_bucket
             ON history(chat_id, business_date, shift)",
            [],
        )?;

        log::info!("✅ SQLite ledger initialized with WAL mode");

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }
}

#[async_trait]
impl LedgerStore for SqliteLedgerStore {
    async fn record(
        &self,
        chat_id: i64,
        currency: Currency,
        amount: f64,
        at: NaiveDateTime,
    ) -> Result<(), LedgerError> {
        if !amount.is_finite() {
            return Err(LedgerError::Validation(format!(
                "amount is not a finite number: {}",
                amount
            )));
        }
        if amount < 0.0 {
            return Err(LedgerError::Validation(format!(
                "amount must not be negative: {}",
                amount
            )));
        }

        let (shift, business_date) = shift::resolve(at);
        let entry = HistoryEntry {
            chat_id,
            recorded_at: at,
            business_date,
            shift,
            currency,
            amount,
        };

        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;

        tx.execute(
            "INSERT INTO history (chat_id, recorded_at, business_date, shift, currency, amount)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                entry.chat_id,
                entry.recorded_at.format(TIMESTAMP_FMT).to_string(),
                entry.business_date.format(DATE_FMT).to_string(),
                entry.shift.as_str(),
                entry.currency.as_str(),
                entry.amount,
            ],
        )?;

        tx.execute(
            "INSERT INTO totals (chat_id, business_date, shift, currency, total, invoices)
             VALUES (?1, ?2, ?3, ?4, ?5, 1)
             ON CONFLICT(chat_id, business_date, shift, currency) DO UPDATE SET
                 total = total + excluded.total,
                 invoices = invoices + 1",
            params![
                entry.chat_id,
                entry.business_date.format(DATE_FMT).to_string(),
                entry.shift.as_str(),
                entry.currency.as_str(),
                entry.amount,
            ],
        )?;

        tx.commit()?;

        log::debug!(
            "✅ Recorded {} {} for chat {} ({} {})",
            amount,
            currency.as_str(),
            chat_id,
            shift.as_str(),
            business_date
        );

        Ok(())
    }

    async fn totals(
        &self,
        chat_id: i64,
        business_date: NaiveDate,
        shift: Option<Shift>,
    ) -> Result<TotalsSnapshot, LedgerError> {
        let conn = self.conn.lock().unwrap();
        let date = business_date.format(DATE_FMT).to_string();
        let mut snapshot = TotalsSnapshot::default();

        match shift {
            Some(shift) => {
                let mut stmt = conn.prepare(
                    "SELECT currency, total, invoices FROM totals
                     WHERE chat_id = ?1 AND business_date = ?2 AND shift = ?3",
                )?;
                let rows = stmt.query_map(params![chat_id, date, shift.as_str()], |row| {
                    let code: String = row.get(0)?;
                    let currency =
                        Currency::from_code(&code).ok_or(rusqlite::Error::InvalidQuery)?;
                    Ok((currency, row.get::<_, f64>(1)?, row.get::<_, i64>(2)?))
                })?;
                for row in rows {
                    let (currency, total, invoices) = row?;
                    *snapshot.get_mut(currency) = BucketTotals { total, invoices };
                }
            }
            None => {
                let mut stmt = conn.prepare(
                    "SELECT currency, SUM(total), SUM(invoices) FROM totals
                     WHERE chat_id = ?1 AND business_date = ?2
                     GROUP BY currency",
                )?;
                let rows = stmt.query_map(params![chat_id, date], |row| {
                    let code: String = row.get(0)?;
                    let currency =
                        Currency::from_code(&code).ok_or(rusqlite::Error::InvalidQuery)?;
                    Ok((currency, row.get::<_, f64>(1)?, row.get::<_, i64>(2)?))
                })?;
                for row in rows {
                    let (currency, total, invoices) = row?;
                    *snapshot.get_mut(currency) = BucketTotals { total, invoices };
                }
            }
        }

        Ok(snapshot)
    }

    async fn dump_totals(&self) -> Result<Vec<TotalRow>, LedgerError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT chat_id, business_date, shift, currency, total, invoices FROM totals
             ORDER BY chat_id, business_date, shift, currency",
        )?;

        let rows = stmt.query_map([], |row| {
            let date_str: String = row.get(1)?;
            let shift_str: String = row.get(2)?;
            let code: String = row.get(3)?;

            let business_date = NaiveDate::parse_from_str(&date_str, DATE_FMT)
                .map_err(|_| rusqlite::Error::InvalidQuery)?;
            let shift = Shift::from_str(&shift_str).ok_or(rusqlite::Error::InvalidQuery)?;
            let currency = Currency::from_code(&code).ok_or(rusqlite::Error::InvalidQuery)?;

            Ok(TotalRow {
                chat_id: row.get(0)?,
                business_date,
                shift,
                currency,
                total: row.get(4)?,
                invoices: row.get(5)?,
            })
        })?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }
}
