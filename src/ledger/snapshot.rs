use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::LedgerError;

use super::entry::{EntryCategory, LedgerEntry};

/// Running totals persisted alongside the history.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Aggregates {
    pub total_spending: Decimal,
    pub frivolous_spending: Decimal,
    pub non_frivolous_spending: Decimal,
    pub total_savings: Decimal,
}

impl Aggregates {
    /// Totals derived from scratch out of `history`, or `None` when a sum
    /// does not fit in a `Decimal`.
    pub fn from_history(history: &[LedgerEntry]) -> Option<Self> {
        history
            .iter()
            .try_fold(Self::default(), |totals, entry| totals.checked_apply(entry))
    }

    /// Totals with `entry` folded in, or `None` on overflow.
    pub fn checked_apply(&self, entry: &LedgerEntry) -> Option<Self> {
        let mut next = *self;
        match entry.category() {
            EntryCategory::Frivolous => {
                next.total_spending = next.total_spending.checked_add(entry.amount())?;
                next.frivolous_spending = next.frivolous_spending.checked_add(entry.amount())?;
            }
            EntryCategory::NonFrivolous => {
                next.total_spending = next.total_spending.checked_add(entry.amount())?;
                next.non_frivolous_spending =
                    next.non_frivolous_spending.checked_add(entry.amount())?;
            }
            EntryCategory::ManualSavings => {}
        }
        next.total_savings = next.total_savings.checked_add(entry.savings_contribution())?;
        Some(next)
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

/// Aggregates plus the full, insertion-ordered entry history.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerSnapshot {
    aggregates: Aggregates,
    history: Vec<LedgerEntry>,
}

impl LedgerSnapshot {
    /// Builds a snapshot whose totals are derived from `history`.
    pub fn from_history(history: Vec<LedgerEntry>) -> Option<Self> {
        Some(Self {
            aggregates: Aggregates::from_history(&history)?,
            history,
        })
    }

    /// Reassembles a snapshot from independently stored parts. The parts are
    /// taken as-is, even if they disagree; see [`LedgerSnapshot::is_consistent`].
    pub fn from_parts(aggregates: Aggregates, history: Vec<LedgerEntry>) -> Self {
        Self {
            aggregates,
            history,
        }
    }

    pub fn aggregates(&self) -> &Aggregates {
        &self.aggregates
    }

    pub fn history(&self) -> &[LedgerEntry] {
        &self.history
    }

    pub fn entry_count(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty() && self.aggregates.is_zero()
    }

    /// True when the stored totals equal the totals derived from history.
    pub fn is_consistent(&self) -> bool {
        Aggregates::from_history(&self.history) == Some(self.aggregates)
    }

    /// Appends `entry` and folds it into the totals as one step. An entry that
    /// would overflow a total is rejected and nothing changes.
    pub(crate) fn push(&mut self, entry: LedgerEntry) -> Result<(), LedgerError> {
        self.aggregates = self
            .aggregates
            .checked_apply(&entry)
            .ok_or_else(|| overflow(&entry))?;
        self.history.push(entry);
        Ok(())
    }

    /// Replaces the totals with the ones derived from history, returning
    /// whether anything changed.
    pub(crate) fn recompute(&mut self) -> Result<bool, LedgerError> {
        let derived = Aggregates::from_history(&self.history).ok_or_else(|| {
            LedgerError::InvalidAmount("history totals exceed the supported range".into())
        })?;
        if derived == self.aggregates {
            return Ok(false);
        }
        self.aggregates = derived;
        Ok(true)
    }

    pub(crate) fn clear(&mut self) {
        self.aggregates = Aggregates::default();
        self.history.clear();
    }
}

fn overflow(entry: &LedgerEntry) -> LedgerError {
    LedgerError::InvalidAmount(format!(
        "adding {} would exceed the largest supported total",
        entry.amount()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_history() -> Vec<LedgerEntry> {
        let now = Utc::now();
        vec![
            LedgerEntry::frivolous(now, Decimal::from(200), Decimal::from(20)),
            LedgerEntry::non_frivolous(now, Decimal::new(4999, 2)),
            LedgerEntry::manual_savings(now, Decimal::from(30)),
            LedgerEntry::frivolous(now, Decimal::from(15), Decimal::ZERO),
        ]
    }

    #[test]
    fn aggregates_follow_history() {
        let totals = Aggregates::from_history(&sample_history()).unwrap();
        assert_eq!(totals.total_spending, Decimal::new(26499, 2));
        assert_eq!(totals.frivolous_spending, Decimal::from(215));
        assert_eq!(totals.non_frivolous_spending, Decimal::new(4999, 2));
        assert_eq!(totals.total_savings, Decimal::from(50));
        assert_eq!(
            totals.frivolous_spending + totals.non_frivolous_spending,
            totals.total_spending
        );
    }

    #[test]
    fn push_keeps_snapshot_consistent() {
        let mut snapshot = LedgerSnapshot::default();
        for entry in sample_history() {
            snapshot.push(entry).unwrap();
            assert!(snapshot.is_consistent());
        }
        assert_eq!(snapshot.entry_count(), 4);
    }

    #[test]
    fn recompute_repairs_diverged_totals() {
        let history = sample_history();
        let mut snapshot = LedgerSnapshot::from_parts(Aggregates::default(), history);
        assert!(!snapshot.is_consistent());
        assert!(snapshot.recompute().unwrap());
        assert!(snapshot.is_consistent());
        assert!(!snapshot.recompute().unwrap());
    }

    #[test]
    fn overflowing_entry_is_rejected_without_changes() {
        let now = Utc::now();
        let mut snapshot = LedgerSnapshot::default();
        snapshot
            .push(LedgerEntry::non_frivolous(now, Decimal::MAX))
            .unwrap();

        let err = snapshot
            .push(LedgerEntry::non_frivolous(now, Decimal::MAX))
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidAmount(_)));
        assert_eq!(snapshot.entry_count(), 1);
        assert_eq!(snapshot.aggregates().total_spending, Decimal::MAX);
        assert!(snapshot.is_consistent());
    }

    #[test]
    fn overflowing_history_has_no_totals() {
        let now = Utc::now();
        let history = vec![
            LedgerEntry::manual_savings(now, Decimal::MAX),
            LedgerEntry::manual_savings(now, Decimal::ONE),
        ];
        assert_eq!(Aggregates::from_history(&history), None);
        assert!(!LedgerSnapshot::from_parts(Aggregates::default(), history).is_consistent());
    }

    #[test]
    fn clear_empties_everything() {
        let mut snapshot = LedgerSnapshot::from_history(sample_history()).unwrap();
        snapshot.clear();
        assert!(snapshot.is_empty());
        assert_eq!(snapshot, LedgerSnapshot::default());
    }
}
