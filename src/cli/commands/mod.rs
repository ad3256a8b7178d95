pub mod config;
pub mod entries;
pub mod purchase;
pub mod system;

use crate::cli::registry::{CommandEntry, CommandRegistry};
use crate::config::Config;
use crate::workflow::Step;

const ROOT_COMMAND_ORDER: &[&str] = &[
    "purchase",
    "amount",
    "saved",
    "again",
    "cancel",
    "step",
    "add",
    "totals",
    "history",
    "reconcile",
    "clear",
    "config",
    "help",
    "version",
    "exit",
];

/// Workflow commands that only apply at one or two purchase steps.
const STEP_BOUND: &[&str] = &["purchase", "amount", "saved", "again", "cancel"];

/// Workflow commands accepted at `step`.
pub(crate) fn available_in(step: Step) -> &'static [&'static str] {
    match step {
        Step::AskPurchaseType => &["purchase"],
        Step::EnterAmount => &["amount", "cancel"],
        Step::ShowSavings => &["saved", "cancel"],
        Step::Complete => &["again"],
    }
}

pub(crate) fn is_step_bound(command: &str) -> bool {
    STEP_BOUND.contains(&command)
}

/// Fixed values accepted by `command` for the argument following `previous`.
pub(crate) fn argument_choices(command: &str, previous: &[&str]) -> &'static [&'static str] {
    match (command, previous) {
        ("purchase", []) => &["frivolous", "non-frivolous"],
        ("saved", []) => &["yes", "no"],
        ("add", []) => &["frivolous", "non-frivolous", "savings"],
        ("history", []) => &["show", "hide"],
        ("clear", []) => &["--yes"],
        ("config", []) => &["show", "set"],
        ("config", [action]) if action.eq_ignore_ascii_case("set") => &Config::KEYS,
        _ => &[],
    }
}

pub(crate) fn all_entries() -> Vec<CommandEntry> {
    let mut commands = Vec::new();
    commands.extend(purchase::definitions());
    commands.extend(entries::definitions());
    commands.extend(config::definitions());
    commands.extend(system::definitions());
    commands
}

pub(crate) fn register_all(registry: &mut CommandRegistry) {
    let mut entries = all_entries();
    entries.sort_by_key(|entry| {
        ROOT_COMMAND_ORDER
            .iter()
            .position(|name| entry.name.eq_ignore_ascii_case(name))
            .unwrap_or(ROOT_COMMAND_ORDER.len())
    });
    for entry in entries {
        registry.register(entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_entry_is_ordered() {
        for entry in all_entries() {
            assert!(
                ROOT_COMMAND_ORDER.contains(&entry.name),
                "`{}` missing from command order",
                entry.name
            );
        }
    }

    #[test]
    fn registry_follows_command_order() {
        let mut registry = CommandRegistry::new();
        register_all(&mut registry);
        let names: Vec<_> = registry.names().collect();
        assert_eq!(names, ROOT_COMMAND_ORDER);
    }

    #[test]
    fn every_step_offers_a_way_forward() {
        for step in [
            Step::AskPurchaseType,
            Step::EnterAmount,
            Step::ShowSavings,
            Step::Complete,
        ] {
            let commands = available_in(step);
            assert!(!commands.is_empty());
            assert!(commands.iter().all(|name| is_step_bound(name)));
        }
        assert!(!is_step_bound("add"));
    }

    #[test]
    fn argument_choices_follow_position() {
        assert_eq!(argument_choices("saved", &[]), &["yes", "no"]);
        assert_eq!(argument_choices("add", &["savings"]), &[] as &[&str]);
        assert!(argument_choices("config", &["set"]).contains(&"currency_symbol"));
        assert!(argument_choices("amount", &[]).is_empty());
    }
}
