//! Key-value persistence providers backing the ledger store.

pub mod json_backend;
pub mod memory;

use crate::errors::LedgerError;

pub use json_backend::JsonFileStorage;
pub use memory::MemoryStorage;

pub type Result<T> = std::result::Result<T, LedgerError>;

/// Keys written by the ledger store.
pub mod keys {
    pub const TOTAL_SPENDING: &str = "totalSpending";
    pub const FRIVOLOUS_SPENDING: &str = "frivolousSpending";
    pub const NON_FRIVOLOUS_SPENDING: &str = "nonFrivolousSpending";
    pub const TOTAL_SAVINGS: &str = "totalSavings";
    pub const SPENDING_HISTORY: &str = "spendingHistory";

    pub const ALL: [&str; 5] = [
        TOTAL_SPENDING,
        FRIVOLOUS_SPENDING,
        NON_FRIVOLOUS_SPENDING,
        TOTAL_SAVINGS,
        SPENDING_HISTORY,
    ];
}

/// Synchronous, string-valued key-value storage.
///
/// Writes are expected to be durable once the call returns. Batch helpers
/// default to per-key calls; backends that can commit several keys at once
/// should override them.
pub trait PersistenceProvider: Send {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;

    fn set_many(&mut self, pairs: &[(&str, String)]) -> Result<()> {
        for (key, value) in pairs {
            self.set(key, value)?;
        }
        Ok(())
    }

    fn remove_many(&mut self, keys: &[&str]) -> Result<()> {
        for key in keys {
            self.remove(key)?;
        }
        Ok(())
    }
}

impl<P: PersistenceProvider + ?Sized> PersistenceProvider for Box<P> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        (**self).remove(key)
    }

    fn set_many(&mut self, pairs: &[(&str, String)]) -> Result<()> {
        (**self).set_many(pairs)
    }

    fn remove_many(&mut self, keys: &[&str]) -> Result<()> {
        (**self).remove_many(keys)
    }
}
