//! The guided purchase workflow.
//!
//! A purchase moves through `AskPurchaseType → EnterAmount → ShowSavings →
//! Complete`; non-frivolous purchases skip `ShowSavings`. Inputs that make no
//! sense in the current step are ignored. When a purchase is finished the
//! workflow hands back a [`LedgerEntry`] for the ledger store to record; it
//! never touches persisted state itself.

pub mod manual;

use std::{fmt, str::FromStr};

use rust_decimal::Decimal;

use crate::{
    core::clock::Clock,
    currency::{parse_amount, suggested_savings},
    ledger::LedgerEntry,
};

pub use manual::manual_entry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Step {
    #[default]
    AskPurchaseType,
    EnterAmount,
    ShowSavings,
    Complete,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Step::AskPurchaseType => "ask purchase type",
            Step::EnterAmount => "enter amount",
            Step::ShowSavings => "show savings",
            Step::Complete => "complete",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseType {
    Frivolous,
    NonFrivolous,
}

impl fmt::Display for PurchaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PurchaseType::Frivolous => f.write_str("Frivolous"),
            PurchaseType::NonFrivolous => f.write_str("Non-Frivolous"),
        }
    }
}

impl FromStr for PurchaseType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "frivolous" => Ok(PurchaseType::Frivolous),
            "non-frivolous" | "nonfrivolous" | "non_frivolous" => Ok(PurchaseType::NonFrivolous),
            other => Err(format!(
                "unknown purchase type `{other}` (expected frivolous or non-frivolous)"
            )),
        }
    }
}

/// Ephemeral state of the purchase in progress. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkflowState {
    step: Step,
    purchase_type: Option<PurchaseType>,
    amount_input: String,
    amount: Option<Decimal>,
    suggested_savings: Option<Decimal>,
    encouragement_visible: bool,
}

impl WorkflowState {
    pub fn step(&self) -> Step {
        self.step
    }

    pub fn purchase_type(&self) -> Option<PurchaseType> {
        self.purchase_type
    }

    /// Last text submitted as the amount, valid or not.
    pub fn amount_input(&self) -> &str {
        &self.amount_input
    }

    /// Accepted purchase amount, once one has been submitted.
    pub fn amount(&self) -> Option<Decimal> {
        self.amount
    }

    /// Full-precision savings suggestion for a frivolous purchase.
    pub fn suggested_savings(&self) -> Option<Decimal> {
        self.suggested_savings
    }

    pub fn encouragement_visible(&self) -> bool {
        self.encouragement_visible
    }
}

/// Result of feeding one input to the workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// The input is not accepted in the current step; nothing changed.
    Ignored,
    /// The workflow is now in (or stayed in) the given step.
    Moved(Step),
    /// The purchase is finished; the entry must be recorded.
    Completed(LedgerEntry),
}

impl Transition {
    pub fn is_ignored(&self) -> bool {
        matches!(self, Transition::Ignored)
    }

    pub fn entry(&self) -> Option<&LedgerEntry> {
        match self {
            Transition::Completed(entry) => Some(entry),
            _ => None,
        }
    }
}

/// Finite-state purchase workflow.
#[derive(Debug, Clone, Default)]
pub struct PurchaseWorkflow {
    state: WorkflowState,
}

impl PurchaseWorkflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    pub fn step(&self) -> Step {
        self.state.step
    }

    /// `AskPurchaseType` → `EnterAmount`.
    pub fn select_type(&mut self, purchase_type: PurchaseType) -> Transition {
        if self.state.step != Step::AskPurchaseType {
            return self.ignore("select_type");
        }
        self.state.purchase_type = Some(purchase_type);
        self.move_to(Step::EnterAmount)
    }

    /// Accepts the purchase amount as raw text.
    ///
    /// Text that is not a finite positive number keeps the workflow in
    /// `EnterAmount` without any other effect.
    pub fn submit_amount(&mut self, raw: &str, clock: &dyn Clock) -> Transition {
        if self.state.step != Step::EnterAmount {
            return self.ignore("submit_amount");
        }
        self.state.amount_input = raw.to_string();
        let Some(amount) = parse_amount(raw) else {
            tracing::debug!(raw, "amount rejected");
            return Transition::Ignored;
        };
        match self.state.purchase_type {
            Some(PurchaseType::NonFrivolous) => {
                self.state.amount = Some(amount);
                let entry = LedgerEntry::non_frivolous(clock.now(), amount);
                self.complete(entry)
            }
            Some(PurchaseType::Frivolous) => {
                self.state.amount = Some(amount);
                self.state.suggested_savings = Some(suggested_savings(amount));
                self.state.encouragement_visible = false;
                self.move_to(Step::ShowSavings)
            }
            None => self.ignore("submit_amount"),
        }
    }

    /// Answers "did you set the savings aside?".
    ///
    /// `true` finishes the purchase with the suggested savings attached;
    /// `false` stays put and shows the encouragement.
    pub fn confirm_savings(&mut self, confirmed: bool, clock: &dyn Clock) -> Transition {
        if self.state.step != Step::ShowSavings {
            return self.ignore("confirm_savings");
        }
        let (Some(amount), Some(savings)) = (self.state.amount, self.state.suggested_savings)
        else {
            return self.ignore("confirm_savings");
        };
        if !confirmed {
            self.state.encouragement_visible = true;
            return Transition::Moved(Step::ShowSavings);
        }
        self.state.encouragement_visible = false;
        self.complete(LedgerEntry::frivolous(clock.now(), amount, savings))
    }

    /// `Complete` → `AskPurchaseType`, dropping everything about the last purchase.
    pub fn reset(&mut self) -> Transition {
        if self.state.step != Step::Complete {
            return self.ignore("reset");
        }
        self.state = WorkflowState::default();
        Transition::Moved(Step::AskPurchaseType)
    }

    /// Abandons the purchase in progress from any step. Nothing is recorded.
    pub fn cancel(&mut self) -> Transition {
        if self.state == WorkflowState::default() {
            return Transition::Ignored;
        }
        tracing::debug!(from = %self.state.step, "purchase cancelled");
        self.state = WorkflowState::default();
        Transition::Moved(Step::AskPurchaseType)
    }

    fn complete(&mut self, entry: LedgerEntry) -> Transition {
        self.state.step = Step::Complete;
        tracing::debug!(category = %entry.category(), "purchase complete");
        Transition::Completed(entry)
    }

    fn move_to(&mut self, step: Step) -> Transition {
        tracing::debug!(from = %self.state.step, to = %step, "workflow transition");
        self.state.step = step;
        Transition::Moved(step)
    }

    fn ignore(&self, input: &'static str) -> Transition {
        tracing::debug!(input, step = %self.state.step, "input ignored in current step");
        Transition::Ignored
    }
}
