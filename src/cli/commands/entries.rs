use rust_decimal::Decimal;

use crate::cli::core::{CliMode, CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::prompts;
use crate::cli::registry::CommandEntry;
use crate::core::ClearOutcome;
use crate::currency::format_entry_date;
use crate::ledger::{EntryCategory, LedgerEntry};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "add",
            "Record a purchase or savings directly",
            "add [frivolous|non-frivolous|savings] [amount]",
            cmd_add,
        ),
        CommandEntry::new("totals", "Show spending and savings totals", "totals", cmd_totals),
        CommandEntry::new(
            "history",
            "Show or hide the spending and savings history",
            "history [show|hide]",
            cmd_history,
        ),
        CommandEntry::new(
            "reconcile",
            "Rebuild totals from the recorded history",
            "reconcile",
            cmd_reconcile,
        ),
        CommandEntry::new(
            "clear",
            "Erase all stored spending and savings data",
            "clear [--yes]",
            cmd_clear,
        ),
    ]
}

const ADD_USAGE: &str = "add <frivolous|non-frivolous|savings> <amount>";

const MANUAL_CHOICES: [EntryCategory; 3] = [
    EntryCategory::Frivolous,
    EntryCategory::NonFrivolous,
    EntryCategory::ManualSavings,
];

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let category = prompts::resolve_arg(
        context,
        args.first().copied(),
        ADD_USAGE,
        |raw| raw.parse::<EntryCategory>().map_err(CommandError::InvalidArguments),
        |theme| prompts::choose(theme, "Entry type", &MANUAL_CHOICES),
    )?;
    let raw_amount = prompts::resolve_arg(
        context,
        args.get(1).copied(),
        ADD_USAGE,
        |raw| Ok(raw.to_string()),
        |theme| prompts::amount(theme, "Amount"),
    )?;

    match context.tracker.manual_add(category, &raw_amount) {
        Ok(entry) => {
            output::success(format!(
                "Successfully added {} to {}.",
                context.money(entry.amount()),
                entry.category()
            ));
            Ok(())
        }
        Err(err) if !err.is_persistence() => {
            output::error("Please enter a valid amount.");
            output::hint(err);
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

fn cmd_totals(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let totals = *context.tracker.snapshot().aggregates();
    output::section("Totals");
    output::info(format!("  Total Spending        : {}", context.money(totals.total_spending)));
    output::info(format!(
        "  Frivolous Spending    : {}",
        context.money(totals.frivolous_spending)
    ));
    output::info(format!(
        "  Non-Frivolous Spending: {}",
        context.money(totals.non_frivolous_spending)
    ));
    output::info(format!("  Total Savings         : {}", context.money(totals.total_savings)));
    if context.show_history {
        print_history(context);
    }
    Ok(())
}

fn cmd_history(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    context.show_history = match args.first().map(|arg| arg.to_ascii_lowercase()) {
        None => !context.show_history,
        Some(arg) if arg == "show" => true,
        Some(arg) if arg == "hide" => false,
        Some(other) => {
            return Err(CommandError::InvalidArguments(format!(
                "unknown option `{other}` (expected show or hide)"
            )))
        }
    };
    if context.show_history {
        print_history(context);
    } else {
        output::info("History hidden.");
    }
    Ok(())
}

fn cmd_reconcile(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if context.tracker.reconcile()? {
        output::success("Totals rebuilt from history.");
    } else {
        output::info("Totals already match the history.");
    }
    Ok(())
}

fn cmd_clear(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let pre_confirmed = args.iter().any(|arg| matches!(*arg, "--yes" | "-y"));
    let interactive = context.mode() == CliMode::Interactive;

    let mut prompt_error = None;
    let theme = &context.theme;
    let outcome = context.tracker.clear_all(
        || {
            if pre_confirmed {
                return true;
            }
            if !interactive {
                output::warning("Refusing to clear without confirmation. Use `clear --yes`.");
                return false;
            }
            match prompts::yes_no(
                theme,
                "Are you sure you want to clear all your data? This action cannot be undone.",
                false,
            ) {
                Ok(answer) => answer,
                Err(err) => {
                    prompt_error = Some(err);
                    false
                }
            }
        },
        |_| output::success("All data has been cleared."),
    )?;
    if let Some(err) = prompt_error {
        return Err(err);
    }

    match outcome {
        ClearOutcome::Suppressed => output::info("A clear was just requested; ignoring repeat."),
        ClearOutcome::Declined => output::info("Nothing was cleared."),
        ClearOutcome::Cleared(report) => tracing::info!(
            removed = report.removed_entries,
            "ledger cleared"
        ),
    }
    Ok(())
}

fn print_history(context: &ShellContext) {
    output::section("Spending and Savings History");
    let history = context.tracker.snapshot().history();
    if history.is_empty() {
        output::info("No entries recorded yet.");
        return;
    }
    for entry in history {
        output::info(format!("  {}", history_line(context, entry)));
    }
}

fn history_line(context: &ShellContext, entry: &LedgerEntry) -> String {
    let mut line = format!(
        "{}: {} ({})",
        format_entry_date(entry.timestamp()),
        context.money(entry.amount()),
        entry.category()
    );
    if entry.savings_contribution() > Decimal::ZERO {
        line.push_str(&format!(
            " - Saved: {}",
            context.money(entry.savings_contribution())
        ));
    }
    line
}
