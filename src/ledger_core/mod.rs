pub mod sqlite_store;
pub mod store;
pub mod types;

pub use sqlite_store::SqliteLedgerStore;
pub use store::{LedgerError, LedgerStore};
pub use types::{BucketTotals, HistoryEntry, TotalRow, TotalsSnapshot};
