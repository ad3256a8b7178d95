use rust_decimal::Decimal;
use spend_to_save::{
    core::SpendTracker,
    init,
    ledger::EntryCategory,
    storage::MemoryStorage,
    workflow::PurchaseType,
};

#[test]
fn tracker_smoke() {
    init();

    let (mut tracker, report) = SpendTracker::open(Box::new(MemoryStorage::new()));
    assert!(report.consistent);

    tracker.select_type(PurchaseType::Frivolous);
    tracker.submit_amount("12.34").unwrap();
    tracker.confirm_savings(true).unwrap();
    tracker.manual_add(EntryCategory::ManualSavings, "1").unwrap();

    let totals = tracker.snapshot().aggregates();
    assert_eq!(totals.total_spending, Decimal::new(1234, 2));
    assert_eq!(totals.total_savings, Decimal::new(2234, 3));
}
