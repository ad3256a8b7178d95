//! Ledger entries, running totals, and the persisted store that owns them.

pub mod entry;
pub mod snapshot;
pub mod store;

pub use entry::{EntryCategory, LedgerEntry};
pub use snapshot::{Aggregates, LedgerSnapshot};
pub use store::{LedgerStore, LoadReport};
