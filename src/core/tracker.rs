//! Facade tying the purchase workflow to the ledger store.

use std::time::{Duration, Instant};

use crate::{
    errors::LedgerError,
    ledger::{EntryCategory, LedgerEntry, LedgerSnapshot, LedgerStore, LoadReport},
    storage::PersistenceProvider,
    workflow::{manual_entry, PurchaseType, PurchaseWorkflow, Transition, WorkflowState},
};

use super::{
    clear::{ClearDebouncer, ClearOutcome, ClearReport},
    clock::{Clock, SystemClock},
};

/// Runs the guided workflow, manual entries, and the destructive clear against
/// a single ledger store.
///
/// Completed workflow transitions are recorded before the call returns. When
/// recording fails to persist, the error is returned but the entry stays in
/// the in-memory ledger and the workflow stays complete. When the ledger
/// rejects the entry outright, the workflow step is rolled back.
pub struct SpendTracker {
    workflow: PurchaseWorkflow,
    store: LedgerStore,
    clock: Box<dyn Clock>,
    debouncer: ClearDebouncer,
}

impl SpendTracker {
    /// Opens a tracker over `provider` with the system clock.
    pub fn open(provider: Box<dyn PersistenceProvider>) -> (Self, LoadReport) {
        Self::with_clock(provider, Box::new(SystemClock))
    }

    pub fn with_clock(
        provider: Box<dyn PersistenceProvider>,
        clock: Box<dyn Clock>,
    ) -> (Self, LoadReport) {
        let (store, report) = LedgerStore::open(provider);
        for warning in &report.warnings {
            tracing::warn!("{warning}");
        }
        let tracker = Self {
            workflow: PurchaseWorkflow::new(),
            store,
            clock,
            debouncer: ClearDebouncer::default(),
        };
        (tracker, report)
    }

    /// Overrides the quiet period used to collapse repeated clears.
    pub fn with_clear_window(mut self, window: Duration) -> Self {
        self.set_clear_window(window);
        self
    }

    pub fn set_clear_window(&mut self, window: Duration) {
        self.debouncer = ClearDebouncer::new(window);
    }

    pub fn workflow(&self) -> &WorkflowState {
        self.workflow.state()
    }

    pub fn snapshot(&self) -> &LedgerSnapshot {
        self.store.snapshot()
    }

    pub fn select_type(&mut self, purchase_type: PurchaseType) -> Transition {
        self.workflow.select_type(purchase_type)
    }

    pub fn submit_amount(&mut self, raw: &str) -> Result<Transition, LedgerError> {
        let previous = self.workflow.clone();
        let transition = self.workflow.submit_amount(raw, self.clock.as_ref());
        self.commit(transition, previous)
    }

    pub fn confirm_savings(&mut self, confirmed: bool) -> Result<Transition, LedgerError> {
        let previous = self.workflow.clone();
        let transition = self.workflow.confirm_savings(confirmed, self.clock.as_ref());
        self.commit(transition, previous)
    }

    pub fn reset_workflow(&mut self) -> Transition {
        self.workflow.reset()
    }

    pub fn cancel_workflow(&mut self) -> Transition {
        self.workflow.cancel()
    }

    /// Records a manual entry regardless of the workflow step.
    pub fn manual_add(
        &mut self,
        category: EntryCategory,
        raw_amount: &str,
    ) -> Result<LedgerEntry, LedgerError> {
        let entry = manual_entry(category, raw_amount, self.clock.as_ref())?;
        self.store.record_entry(entry.clone())?;
        Ok(entry)
    }

    /// Rebuilds stored totals from history. Returns whether anything changed.
    pub fn reconcile(&mut self) -> Result<bool, LedgerError> {
        self.store.reconcile()
    }

    /// Clears all stored data.
    ///
    /// Steps run strictly in order: repeated requests inside the quiet period
    /// are dropped, `confirm` gates the rest, storage is cleared, memory is
    /// cleared, and finally `acknowledge` receives the report.
    pub fn clear_all(
        &mut self,
        confirm: impl FnOnce() -> bool,
        acknowledge: impl FnOnce(&ClearReport),
    ) -> Result<ClearOutcome, LedgerError> {
        if !self.debouncer.admit(Instant::now()) {
            tracing::debug!("clear request collapsed into previous one");
            return Ok(ClearOutcome::Suppressed);
        }
        if !confirm() {
            return Ok(ClearOutcome::Declined);
        }
        let report = ClearReport {
            removed_entries: self.store.snapshot().entry_count(),
            previous_totals: *self.store.snapshot().aggregates(),
        };
        self.store.reset()?;
        acknowledge(&report);
        Ok(ClearOutcome::Cleared(report))
    }

    fn commit(
        &mut self,
        transition: Transition,
        previous: PurchaseWorkflow,
    ) -> Result<Transition, LedgerError> {
        if let Transition::Completed(entry) = &transition {
            if let Err(err) = self.store.record_entry(entry.clone()) {
                if !err.is_persistence() {
                    self.workflow = previous;
                }
                return Err(err);
            }
        }
        Ok(transition)
    }
}
