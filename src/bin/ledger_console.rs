//! Console runtime - local stand-in for the chat transport
//!
//! Reads `<chat_id> <message text>` lines from stdin, dispatches them
//! through the ledger, and prints the reply summary.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release --bin ledger_console
//! ```
//!
//! ## Environment Variables
//!
//! - LEDGER_DB_PATH - SQLite database path (default: data/ledger.db)
//! - ADMIN_IDS - comma-separated chat ids allowed to trigger exports
//! - RUST_LOG - Logging level (optional, default: info)

use chrono::Local;
use shiftledger::config::Config;
use shiftledger::dispatch::MessageDispatcher;
use shiftledger::ledger_core::SqliteLedgerStore;
use std::io::{self, BufRead};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let config = Config::from_env()?;
    let store = Arc::new(SqliteLedgerStore::new(&config.db_path)?);
    let dispatcher = MessageDispatcher::new(store);

    log::info!("🚀 Ledger console ready (db: {})", config.db_path);

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let Some((chat_id, text)) = split_line(&line) else {
            log::warn!("Skipping malformed line (expected '<chat_id> <text>')");
            continue;
        };

        match dispatcher
            .handle(chat_id, text, Local::now().naive_local())
            .await
        {
            Ok(Some(reply)) => println!("{}", reply),
            Ok(None) => {}
            Err(e) if e.is_retryable() => {
                log::warn!("⏳ Transient storage failure, resend the message: {}", e)
            }
            Err(e) => println!("⚠️ {}", e),
        }
    }

    Ok(())
}

fn split_line(line: &str) -> Option<(i64, &str)> {
    let (id, rest) = line.trim().split_once(' ')?;
    Some((id.parse().ok()?, rest))
}
