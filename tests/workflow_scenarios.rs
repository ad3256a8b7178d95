mod common;

use rust_decimal::Decimal;
use spend_to_save::{
    core::{ClearOutcome, SpendTracker},
    errors::LedgerError,
    ledger::{EntryCategory, LedgerSnapshot},
    storage::{keys, MemoryStorage},
    workflow::{PurchaseType, Step, Transition},
};

fn fresh_tracker() -> (SpendTracker, MemoryStorage) {
    let storage = MemoryStorage::new();
    let (tracker, report) =
        SpendTracker::with_clock(Box::new(storage.clone()), Box::new(common::fixed_clock()));
    assert!(report.warnings.is_empty());
    (tracker, storage)
}

fn assert_invariants(snapshot: &LedgerSnapshot) {
    let history = snapshot.history();
    let spending: Decimal = history
        .iter()
        .filter(|entry| entry.category().is_spending())
        .map(|entry| entry.amount())
        .sum();
    let savings: Decimal = history.iter().map(|entry| entry.savings_contribution()).sum();
    let totals = snapshot.aggregates();
    assert_eq!(totals.total_spending, spending);
    assert_eq!(totals.total_savings, savings);
    assert_eq!(
        totals.frivolous_spending + totals.non_frivolous_spending,
        totals.total_spending
    );
}

#[test]
fn frivolous_purchase_stops_at_savings_suggestion() {
    let (mut tracker, _) = fresh_tracker();
    tracker.select_type(PurchaseType::Frivolous);
    let transition = tracker.submit_amount("200").unwrap();

    assert_eq!(transition, Transition::Moved(Step::ShowSavings));
    assert_eq!(tracker.workflow().step(), Step::ShowSavings);
    assert_eq!(
        tracker.workflow().suggested_savings(),
        Some(Decimal::new(2000, 2))
    );
    assert!(tracker.snapshot().is_empty());
}

#[test]
fn confirming_savings_records_the_purchase() {
    let (mut tracker, _) = fresh_tracker();
    tracker.select_type(PurchaseType::Frivolous);
    tracker.submit_amount("200").unwrap();
    tracker.confirm_savings(true).unwrap();

    let snapshot = tracker.snapshot();
    assert_eq!(snapshot.aggregates().total_savings, Decimal::from(20));
    assert_eq!(snapshot.aggregates().frivolous_spending, Decimal::from(200));
    assert_eq!(snapshot.history().len(), 1);
    let entry = &snapshot.history()[0];
    assert_eq!(entry.amount(), Decimal::from(200));
    assert_eq!(entry.category(), EntryCategory::Frivolous);
    assert_eq!(entry.savings_contribution(), Decimal::from(20));
    assert_eq!(tracker.workflow().step(), Step::Complete);
    assert_invariants(snapshot);
}

#[test]
fn non_frivolous_purchase_skips_savings_step() {
    let (mut tracker, _) = fresh_tracker();
    tracker.select_type(PurchaseType::NonFrivolous);
    let transition = tracker.submit_amount("50").unwrap();

    assert!(transition.entry().is_some());
    let totals = tracker.snapshot().aggregates();
    assert_eq!(totals.total_spending, Decimal::from(50));
    assert_eq!(totals.non_frivolous_spending, Decimal::from(50));
    assert_eq!(totals.total_savings, Decimal::ZERO);
    assert_eq!(tracker.workflow().step(), Step::Complete);
}

#[test]
fn invalid_amounts_leave_everything_untouched() {
    let (mut tracker, storage) = fresh_tracker();
    tracker.select_type(PurchaseType::Frivolous);
    for raw in ["-5", "abc"] {
        let transition = tracker.submit_amount(raw).unwrap();
        assert!(transition.is_ignored());
        assert_eq!(tracker.workflow().step(), Step::EnterAmount);
        assert_eq!(tracker.workflow().suggested_savings(), None);
    }
    assert!(tracker.snapshot().is_empty());
    assert!(storage.is_empty());
}

#[test]
fn manual_savings_are_tagged_apart_from_workflow_savings() {
    let (mut tracker, _) = fresh_tracker();
    tracker.manual_add(EntryCategory::ManualSavings, "30").unwrap();
    tracker.select_type(PurchaseType::Frivolous);
    tracker.submit_amount("10").unwrap();
    tracker.confirm_savings(true).unwrap();

    let snapshot = tracker.snapshot();
    assert_eq!(snapshot.aggregates().total_savings, Decimal::from(31));
    assert_eq!(snapshot.aggregates().total_spending, Decimal::from(10));
    let categories: Vec<_> = snapshot.history().iter().map(|e| e.category()).collect();
    assert_eq!(
        categories,
        vec![EntryCategory::ManualSavings, EntryCategory::Frivolous]
    );
    assert_invariants(snapshot);
}

#[test]
fn manual_entry_reports_invalid_amounts() {
    let (mut tracker, _) = fresh_tracker();
    for raw in ["", "0", "-3", "ten"] {
        let err = tracker
            .manual_add(EntryCategory::NonFrivolous, raw)
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidAmount(_)));
    }
    assert!(tracker.snapshot().is_empty());
}

#[test]
fn clearing_after_activity_empties_memory_and_storage() {
    let (mut tracker, storage) = fresh_tracker();
    tracker.manual_add(EntryCategory::Frivolous, "12.5").unwrap();
    tracker.manual_add(EntryCategory::ManualSavings, "4").unwrap();
    tracker.select_type(PurchaseType::NonFrivolous);
    tracker.submit_amount("7.25").unwrap();

    let report = match tracker.clear_all(|| true, |_| {}).unwrap() {
        ClearOutcome::Cleared(report) => report,
        other => panic!("expected clear to run, got {other:?}"),
    };
    assert_eq!(report.removed_entries, 3);
    assert_eq!(report.previous_totals.total_spending, Decimal::new(1975, 2));

    assert!(tracker.snapshot().aggregates().is_zero());
    assert!(tracker.snapshot().history().is_empty());
    for key in keys::ALL {
        assert!(!storage.contains(key), "`{key}` still stored");
    }
}

#[test]
fn clearing_twice_matches_clearing_once() {
    let (tracker, storage) = fresh_tracker();
    let mut tracker = tracker.with_clear_window(std::time::Duration::ZERO);
    tracker.manual_add(EntryCategory::NonFrivolous, "9").unwrap();

    tracker.clear_all(|| true, |_| {}).unwrap();
    let once = tracker.snapshot().clone();
    tracker.clear_all(|| true, |_| {}).unwrap();

    assert_eq!(tracker.snapshot(), &once);
    assert!(storage.is_empty());
}

#[test]
fn workflow_stays_usable_after_clear() {
    let (mut tracker, _) = fresh_tracker();
    tracker.select_type(PurchaseType::Frivolous);
    tracker.submit_amount("40").unwrap();
    tracker.clear_all(|| true, |_| {}).unwrap();

    // The purchase in progress is not ledger data and survives the clear.
    assert_eq!(tracker.workflow().step(), Step::ShowSavings);
    tracker.confirm_savings(true).unwrap();
    assert_eq!(tracker.snapshot().aggregates().total_savings, Decimal::from(4));
}

#[test]
fn long_session_keeps_totals_consistent() {
    let (mut tracker, _) = fresh_tracker();
    let amounts = ["0.01", "19.99", "250", "3.333", "1e2"];
    for (index, raw) in amounts.iter().enumerate() {
        if index % 2 == 0 {
            tracker.select_type(PurchaseType::Frivolous);
            tracker.submit_amount(raw).unwrap();
            tracker.confirm_savings(false).unwrap();
            tracker.confirm_savings(true).unwrap();
        } else {
            tracker.select_type(PurchaseType::NonFrivolous);
            tracker.submit_amount(raw).unwrap();
        }
        assert_eq!(tracker.reset_workflow(), Transition::Moved(Step::AskPurchaseType));
        assert_invariants(tracker.snapshot());
    }
    tracker.manual_add(EntryCategory::ManualSavings, "5").unwrap();
    assert_invariants(tracker.snapshot());
    assert_eq!(tracker.snapshot().entry_count(), amounts.len() + 1);
}
