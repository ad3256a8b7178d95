use crate::cli::commands;
use crate::cli::output;
use crate::cli::registry::{CommandEntry, CommandRegistry};
use crate::workflow::Step;

/// Lists every command, marking the workflow commands accepted at `step`.
pub fn print_overview(registry: &CommandRegistry, step: Step) {
    output::section("Available commands");
    let current = commands::available_in(step);
    for entry in registry.list() {
        let marker = if current.contains(&entry.name) { '*' } else { ' ' };
        output::info(format!("{marker} {:<10} {}", entry.name, entry.description));
    }
    output::info(format!("* accepted while the purchase is at `{step}`"));
    output::hint("Use `help <command>` for details.");
}

pub fn print_command(entry: &CommandEntry, step: Step) {
    output::section(format!("Help: {}", entry.name));
    output::info(format!("  {}", entry.description));
    output::info(format!("  Usage: {}", entry.usage));
    if commands::is_step_bound(entry.name) && !commands::available_in(step).contains(&entry.name) {
        output::hint(format!(
            "Not accepted at `{step}`; try one of: {}",
            commands::available_in(step).join(", ")
        ));
    }
}
