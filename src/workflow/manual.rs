//! Manual entries recorded outside the guided workflow.

use rust_decimal::Decimal;

use crate::{
    core::clock::Clock,
    currency::parse_amount,
    errors::LedgerError,
    ledger::{EntryCategory, LedgerEntry},
};

/// Builds an entry for an out-of-band manual addition.
///
/// Unlike the guided workflow, an invalid amount is reported back as
/// [`LedgerError::InvalidAmount`]. Savings deposits count their whole amount
/// as savings; purchases carry no savings.
pub fn manual_entry(
    category: EntryCategory,
    raw_amount: &str,
    clock: &dyn Clock,
) -> Result<LedgerEntry, LedgerError> {
    let amount = parse_amount(raw_amount).ok_or_else(|| {
        LedgerError::InvalidAmount(format!(
            "`{}` is not a positive number",
            raw_amount.trim()
        ))
    })?;
    let now = clock.now();
    Ok(match category {
        EntryCategory::Frivolous => LedgerEntry::frivolous(now, amount, Decimal::ZERO),
        EntryCategory::NonFrivolous => LedgerEntry::non_frivolous(now, amount),
        EntryCategory::ManualSavings => LedgerEntry::manual_savings(now, amount),
    })
}
