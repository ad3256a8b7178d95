use std::str::FromStr;

use rust_decimal::Decimal;

use crate::{
    errors::LedgerError,
    storage::{keys, PersistenceProvider},
};

use super::{
    entry::LedgerEntry,
    snapshot::{Aggregates, LedgerSnapshot},
};

/// Outcome of reading the persisted ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// One message per field that fell back to its zero value.
    pub warnings: Vec<String>,
    /// Whether the stored totals agree with the stored history.
    pub consistent: bool,
}

/// Sole owner of the aggregates and history, and of their persisted form.
pub struct LedgerStore {
    snapshot: LedgerSnapshot,
    provider: Box<dyn PersistenceProvider>,
}

impl LedgerStore {
    /// Creates a store over `provider` and loads whatever it holds.
    pub fn open(provider: Box<dyn PersistenceProvider>) -> (Self, LoadReport) {
        let mut store = Self {
            snapshot: LedgerSnapshot::default(),
            provider,
        };
        let report = store.load();
        (store, report)
    }

    pub fn snapshot(&self) -> &LedgerSnapshot {
        &self.snapshot
    }

    /// Re-reads every persisted field independently. A missing field reads as
    /// zero (or an empty history); an unreadable one does too, with a warning.
    pub fn load(&mut self) -> LoadReport {
        let mut warnings = Vec::new();
        let aggregates = Aggregates {
            total_spending: self.read_total(keys::TOTAL_SPENDING, &mut warnings),
            frivolous_spending: self.read_total(keys::FRIVOLOUS_SPENDING, &mut warnings),
            non_frivolous_spending: self.read_total(keys::NON_FRIVOLOUS_SPENDING, &mut warnings),
            total_savings: self.read_total(keys::TOTAL_SAVINGS, &mut warnings),
        };
        let history = self.read_history(&mut warnings);

        self.snapshot = LedgerSnapshot::from_parts(aggregates, history);
        let consistent = self.snapshot.is_consistent();
        if !consistent {
            tracing::warn!("stored totals disagree with stored history");
        }
        tracing::debug!(
            entries = self.snapshot.entry_count(),
            warnings = warnings.len(),
            "ledger loaded"
        );
        LoadReport {
            warnings,
            consistent,
        }
    }

    /// Appends `entry`, folds it into the totals, then persists.
    ///
    /// If persisting fails the in-memory ledger keeps the entry and the error
    /// is returned; the next successful write catches storage up.
    ///
    /// An entry that would push a total past the supported range is rejected
    /// with [`LedgerError::InvalidAmount`] and nothing is recorded.
    pub fn record_entry(&mut self, entry: LedgerEntry) -> Result<(), LedgerError> {
        tracing::info!(
            category = %entry.category(),
            amount = %entry.amount(),
            savings = %entry.savings_contribution(),
            "recording ledger entry"
        );
        self.snapshot.push(entry)?;
        self.persist()
    }

    /// Writes every aggregate and the full history.
    pub fn persist(&mut self) -> Result<(), LedgerError> {
        let totals = self.snapshot.aggregates();
        let history = serde_json::to_string(self.snapshot.history())?;
        let pairs = [
            (keys::TOTAL_SPENDING, encode_decimal(totals.total_spending)),
            (keys::FRIVOLOUS_SPENDING, encode_decimal(totals.frivolous_spending)),
            (
                keys::NON_FRIVOLOUS_SPENDING,
                encode_decimal(totals.non_frivolous_spending),
            ),
            (keys::TOTAL_SAVINGS, encode_decimal(totals.total_savings)),
            (keys::SPENDING_HISTORY, history),
        ];
        self.provider.set_many(&pairs).map_err(|err| {
            tracing::error!(error = %err, "failed to persist ledger");
            err
        })
    }

    /// Removes every stored key, then clears the in-memory ledger.
    ///
    /// Confirmation is the caller's job. When storage cannot be cleared the
    /// in-memory ledger is left untouched.
    pub fn reset(&mut self) -> Result<(), LedgerError> {
        self.provider.remove_many(&keys::ALL)?;
        let removed = self.snapshot.entry_count();
        self.snapshot.clear();
        tracing::info!(removed, "ledger cleared");
        Ok(())
    }

    /// Recomputes the totals from history and persists them if they changed.
    /// Returns whether a repair was needed.
    pub fn reconcile(&mut self) -> Result<bool, LedgerError> {
        let before = *self.snapshot.aggregates();
        if !self.snapshot.recompute()? {
            return Ok(false);
        }
        tracing::warn!(
            ?before,
            after = ?self.snapshot.aggregates(),
            "ledger totals rebuilt from history"
        );
        self.persist()?;
        Ok(true)
    }

    fn read_total(&self, key: &str, warnings: &mut Vec<String>) -> Decimal {
        let raw = match self.provider.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Decimal::ZERO,
            Err(err) => {
                warnings.push(fallback_warning(key, &err.to_string()));
                return Decimal::ZERO;
            }
        };
        match decode_decimal(&raw) {
            Some(value) => value,
            None => {
                warnings.push(fallback_warning(key, &format!("unparseable value `{raw}`")));
                Decimal::ZERO
            }
        }
    }

    fn read_history(&self, warnings: &mut Vec<String>) -> Vec<LedgerEntry> {
        let raw = match self.provider.get(keys::SPENDING_HISTORY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(err) => {
                warnings.push(fallback_warning(keys::SPENDING_HISTORY, &err.to_string()));
                return Vec::new();
            }
        };
        let parsed: Vec<LedgerEntry> = match serde_json::from_str(&raw) {
            Ok(history) => history,
            Err(err) => {
                warnings.push(fallback_warning(keys::SPENDING_HISTORY, &err.to_string()));
                return Vec::new();
            }
        };

        let mut history = Vec::with_capacity(parsed.len());
        for (index, entry) in parsed.into_iter().enumerate() {
            match entry.validate() {
                Ok(()) => history.push(entry),
                Err(reason) => {
                    tracing::warn!(index, %reason, "stored history entry dropped");
                    warnings.push(format!(
                        "`{}` entry #{} was dropped ({reason})",
                        keys::SPENDING_HISTORY,
                        index + 1
                    ));
                }
            }
        }

        if Aggregates::from_history(&history).is_none() {
            warnings.push(fallback_warning(
                keys::SPENDING_HISTORY,
                "its totals exceed the supported range",
            ));
            return Vec::new();
        }
        history
    }
}

fn fallback_warning(key: &str, reason: &str) -> String {
    tracing::warn!(key, reason, "stored field unreadable; using zero value");
    format!("`{key}` could not be read ({reason}); reset to zero")
}

fn encode_decimal(value: Decimal) -> String {
    value.normalize().to_string()
}

/// Totals are never negative; anything else is treated as corruption.
fn decode_decimal(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    let value = Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()?;
    (!value.is_sign_negative() || value.is_zero()).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStorage, Result as StorageResult};
    use chrono::Utc;

    struct ReadOnlyStorage(MemoryStorage);

    impl PersistenceProvider for ReadOnlyStorage {
        fn get(&self, key: &str) -> StorageResult<Option<String>> {
            self.0.get(key)
        }

        fn set(&mut self, _key: &str, _value: &str) -> StorageResult<()> {
            Err(LedgerError::Persistence("disk full".into()))
        }

        fn remove(&mut self, _key: &str) -> StorageResult<()> {
            Err(LedgerError::Persistence("disk full".into()))
        }
    }

    fn open_memory() -> (LedgerStore, MemoryStorage) {
        let storage = MemoryStorage::new();
        let (store, _) = LedgerStore::open(Box::new(storage.clone()));
        (store, storage)
    }

    #[test]
    fn fresh_store_is_empty() {
        let (store, _) = open_memory();
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn record_entry_writes_every_key() {
        let (mut store, storage) = open_memory();
        store
            .record_entry(LedgerEntry::frivolous(
                Utc::now(),
                Decimal::from(200),
                Decimal::new(2000, 2),
            ))
            .unwrap();

        for key in keys::ALL {
            assert!(storage.contains(key), "missing key {key}");
        }
        assert_eq!(
            storage.get(keys::TOTAL_SAVINGS).unwrap().as_deref(),
            Some("20")
        );
        assert_eq!(
            storage.get(keys::NON_FRIVOLOUS_SPENDING).unwrap().as_deref(),
            Some("0")
        );
    }

    #[test]
    fn write_failure_keeps_memory_mutation() {
        let (mut store, _) = LedgerStore::open(Box::new(ReadOnlyStorage(MemoryStorage::new())));
        let err = store
            .record_entry(LedgerEntry::non_frivolous(Utc::now(), Decimal::from(50)))
            .expect_err("write must fail");
        assert!(err.is_persistence());
        assert_eq!(store.snapshot().entry_count(), 1);
        assert_eq!(
            store.snapshot().aggregates().total_spending,
            Decimal::from(50)
        );
    }

    #[test]
    fn failed_reset_leaves_memory_untouched() {
        let mut seeded = MemoryStorage::new();
        seeded.set(keys::TOTAL_SPENDING, "5").unwrap();
        let (mut store, _) = LedgerStore::open(Box::new(ReadOnlyStorage(seeded)));
        assert!(store.reset().is_err());
        assert_eq!(store.snapshot().aggregates().total_spending, Decimal::from(5));
    }

    #[test]
    fn negative_and_garbage_totals_fall_back_to_zero() {
        let mut storage = MemoryStorage::new();
        storage.set(keys::TOTAL_SPENDING, "-3").unwrap();
        storage.set(keys::TOTAL_SAVINGS, "NaN").unwrap();
        storage.set(keys::FRIVOLOUS_SPENDING, "1e1").unwrap();
        let (store, report) = LedgerStore::open(Box::new(storage));

        let totals = store.snapshot().aggregates();
        assert_eq!(totals.total_spending, Decimal::ZERO);
        assert_eq!(totals.total_savings, Decimal::ZERO);
        assert_eq!(totals.frivolous_spending, Decimal::from(10));
        assert_eq!(report.warnings.len(), 2);
        assert!(!report.consistent);
    }

    fn history_json(entries: &[(&str, &str, &str)]) -> String {
        let entries: Vec<serde_json::Value> = entries
            .iter()
            .map(|(amount, category, savings)| {
                serde_json::json!({
                    "date": "2025-03-05T12:00:00Z",
                    "amount": amount,
                    "type": category,
                    "savings": savings,
                })
            })
            .collect();
        serde_json::Value::Array(entries).to_string()
    }

    #[test]
    fn invalid_history_entries_are_dropped_with_warning() {
        let mut storage = MemoryStorage::new();
        let history = history_json(&[
            ("12", "Non-Frivolous", "0"),
            ("-5", "Non-Frivolous", "0"),
            ("10", "Frivolous", "11"),
            ("8", "Frivolous", "-1"),
        ]);
        storage.set(keys::SPENDING_HISTORY, &history).unwrap();
        let (mut store, report) = LedgerStore::open(Box::new(storage.clone()));

        assert_eq!(report.warnings.len(), 3);
        assert!(report.warnings[0].contains("#2"));
        assert_eq!(store.snapshot().entry_count(), 1);
        assert_eq!(store.snapshot().history()[0].amount(), Decimal::from(12));

        assert!(store.reconcile().unwrap());
        let report = store.load();
        assert!(report.warnings.is_empty(), "{:?}", report.warnings);
        assert!(report.consistent);
        assert_eq!(
            storage.get(keys::TOTAL_SPENDING).unwrap().as_deref(),
            Some("12")
        );
    }

    #[test]
    fn overflowing_history_loads_empty_with_warning() {
        let mut storage = MemoryStorage::new();
        let max = Decimal::MAX.to_string();
        let history = history_json(&[
            (max.as_str(), "Non-Frivolous", "0"),
            (max.as_str(), "Non-Frivolous", "0"),
        ]);
        storage.set(keys::SPENDING_HISTORY, &history).unwrap();
        storage.set(keys::TOTAL_SAVINGS, "4").unwrap();

        let (store, report) = LedgerStore::open(Box::new(storage));
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains(keys::SPENDING_HISTORY));
        assert!(store.snapshot().history().is_empty());
        assert_eq!(store.snapshot().aggregates().total_savings, Decimal::from(4));
    }

    #[test]
    fn overflowing_entry_is_not_recorded_or_persisted() {
        let (mut store, storage) = open_memory();
        store
            .record_entry(LedgerEntry::manual_savings(Utc::now(), Decimal::MAX))
            .unwrap();
        let stored_before = storage.get(keys::SPENDING_HISTORY).unwrap();

        let err = store
            .record_entry(LedgerEntry::manual_savings(Utc::now(), Decimal::ONE))
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidAmount(_)));
        assert!(!err.is_persistence());
        assert_eq!(store.snapshot().entry_count(), 1);
        assert_eq!(storage.get(keys::SPENDING_HISTORY).unwrap(), stored_before);
    }

    #[test]
    fn reconcile_rebuilds_and_persists_totals() {
        let (mut store, mut storage) = open_memory();
        store
            .record_entry(LedgerEntry::manual_savings(Utc::now(), Decimal::from(30)))
            .unwrap();
        storage.remove(keys::TOTAL_SAVINGS).unwrap();
        let report = store.load();
        assert!(!report.consistent);

        assert!(store.reconcile().unwrap());
        assert_eq!(
            storage.get(keys::TOTAL_SAVINGS).unwrap().as_deref(),
            Some("30")
        );
        assert!(!store.reconcile().unwrap());
    }
}
