
pub mod amounts;
pub mod config;
pub mod dispatch;
pub mod ledger_core;
pub mod shift;
pub mod totals;

pub use amounts::{parse_amounts, Currency};
pub use dispatch::MessageDispatcher;
pub use ledger_core::{LedgerError, LedgerStore, SqliteLedgerStore, TotalsSnapshot};
pub use shift::Shift;
pub use totals::TotalsFacade;
