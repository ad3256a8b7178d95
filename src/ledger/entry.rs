use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Classification of a recorded entry.
///
/// The serialized names match the labels stored in `spendingHistory`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum EntryCategory {
    #[serde(rename = "Frivolous")]
    Frivolous,
    #[serde(rename = "Non-Frivolous")]
    NonFrivolous,
    #[serde(rename = "Manual Savings")]
    ManualSavings,
}

impl EntryCategory {
    pub fn label(&self) -> &'static str {
        match self {
            EntryCategory::Frivolous => "Frivolous",
            EntryCategory::NonFrivolous => "Non-Frivolous",
            EntryCategory::ManualSavings => "Manual Savings",
        }
    }

    /// Whether entries of this category count towards `totalSpending`.
    pub fn is_spending(&self) -> bool {
        matches!(
            self,
            EntryCategory::Frivolous | EntryCategory::NonFrivolous
        )
    }
}

impl fmt::Display for EntryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for EntryCategory {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "frivolous" => Ok(EntryCategory::Frivolous),
            "non-frivolous" | "nonfrivolous" | "non_frivolous" => Ok(EntryCategory::NonFrivolous),
            "savings" | "manual-savings" | "manual savings" | "manualsavings" => {
                Ok(EntryCategory::ManualSavings)
            }
            other => Err(format!(
                "unknown entry type `{other}` (expected frivolous, non-frivolous or savings)"
            )),
        }
    }
}

/// One immutable recorded transaction: a spend, a savings contribution, or both.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LedgerEntry {
    #[serde(rename = "date")]
    timestamp: DateTime<Utc>,
    amount: Decimal,
    #[serde(rename = "type")]
    category: EntryCategory,
    #[serde(rename = "savings", default)]
    savings_contribution: Decimal,
}

impl LedgerEntry {
    /// Builds an entry without validation; callers are expected to have
    /// checked that `amount` is positive and `0 <= savings <= amount`.
    pub fn new(
        timestamp: DateTime<Utc>,
        amount: Decimal,
        category: EntryCategory,
        savings_contribution: Decimal,
    ) -> Self {
        Self {
            timestamp,
            amount,
            category,
            savings_contribution,
        }
    }

    /// A confirmed frivolous purchase together with the savings set aside for it.
    pub fn frivolous(timestamp: DateTime<Utc>, amount: Decimal, savings: Decimal) -> Self {
        Self::new(timestamp, amount, EntryCategory::Frivolous, savings)
    }

    pub fn non_frivolous(timestamp: DateTime<Utc>, amount: Decimal) -> Self {
        Self::new(timestamp, amount, EntryCategory::NonFrivolous, Decimal::ZERO)
    }

    /// A direct deposit: the whole amount counts as savings.
    pub fn manual_savings(timestamp: DateTime<Utc>, amount: Decimal) -> Self {
        Self::new(timestamp, amount, EntryCategory::ManualSavings, amount)
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn category(&self) -> EntryCategory {
        self.category
    }

    pub fn savings_contribution(&self) -> Decimal {
        self.savings_contribution
    }

    /// Checks the rules every recorded entry obeys: a positive amount and a
    /// savings contribution between zero and the amount.
    pub fn validate(&self) -> Result<(), String> {
        if self.amount <= Decimal::ZERO {
            return Err(format!("amount {} is not positive", self.amount));
        }
        if self.savings_contribution < Decimal::ZERO {
            return Err(format!("savings {} is negative", self.savings_contribution));
        }
        if self.savings_contribution > self.amount {
            return Err(format!(
                "savings {} exceed amount {}",
                self.savings_contribution, self.amount
            ));
        }
        Ok(())
    }

    /// Amount that counts towards spending totals (zero for deposits).
    pub fn spending(&self) -> Decimal {
        if self.category.is_spending() {
            self.amount
        } else {
            Decimal::ZERO
        }
    }
}
