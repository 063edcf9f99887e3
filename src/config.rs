//! Configuration loaded from environment variables

use std::collections::HashSet;
use std::env;

pub struct Config {
    pub db_path: String,
    /// Chat ids allowed to trigger privileged operations (cross-chat
    /// export). Enforcement happens at the transport boundary.
    pub admins: HashSet<i64>,
    pub rust_log: Option<String>,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidValue(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidValue(msg) => write!(f, "Invalid configuration value: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    /// Load configuration from environment variables
    ///
    /// - LEDGER_DB_PATH - SQLite database path (default: data/ledger.db)
    /// - ADMIN_IDS - comma-separated chat ids (optional)
    pub fn from_env() -> Result<Self, ConfigError> {
        let db_path =
            env::var("LEDGER_DB_PATH").unwrap_or_else(|_| "data/ledger.db".to_string());

        let admins = match env::var("ADMIN_IDS") {
            Ok(raw) => parse_admin_ids(&raw)?,
            Err(_) => HashSet::new(),
        };

        let rust_log = env::var("RUST_LOG").ok();

        Ok(Self {
            db_path,
            admins,
            rust_log,
        })
    }

    pub fn is_admin(&self, chat_id: i64) -> bool {
        self.admins.contains(&chat_id)
    }
}

fn parse_admin_ids(raw: &str) -> Result<HashSet<i64>, ConfigError> {
    let mut admins = HashSet::new();
    for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let id = entry.parse::<i64>().map_err(|_| {
            ConfigError::InvalidValue(format!("ADMIN_IDS entry is not a chat id: {}", entry))
        })?;
        admins.insert(id);
    }
    Ok(admins)
}
