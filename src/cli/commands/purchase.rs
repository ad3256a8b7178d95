use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::prompts;
use crate::cli::registry::CommandEntry;
use crate::workflow::{PurchaseType, Step, Transition};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "purchase",
            "Start logging a purchase",
            "purchase [frivolous|non-frivolous]",
            cmd_purchase,
        ),
        CommandEntry::new(
            "amount",
            "Enter how much the purchase cost",
            "amount [value]",
            cmd_amount,
        ),
        CommandEntry::new(
            "saved",
            "Answer whether the suggested savings were set aside",
            "saved [yes|no]",
            cmd_saved,
        ),
        CommandEntry::new(
            "again",
            "Record another purchase after finishing one",
            "again",
            cmd_again,
        ),
        CommandEntry::new(
            "cancel",
            "Abandon the purchase in progress",
            "cancel",
            cmd_cancel,
        ),
        CommandEntry::new("step", "Show where the current purchase stands", "step", cmd_step),
    ]
}

const PURCHASE_CHOICES: [PurchaseType; 2] = [PurchaseType::Frivolous, PurchaseType::NonFrivolous];

fn cmd_purchase(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if context.tracker.workflow().step() != Step::AskPurchaseType {
        return not_now(context, "purchase");
    }
    let purchase_type = prompts::resolve_arg(
        context,
        args.first().copied(),
        "purchase <frivolous|non-frivolous>",
        |raw| raw.parse::<PurchaseType>().map_err(CommandError::InvalidArguments),
        |theme| prompts::choose(theme, "What type of purchase did you make?", &PURCHASE_CHOICES),
    )?;
    context.tracker.select_type(purchase_type);
    render_step(context);
    Ok(())
}

fn cmd_amount(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if context.tracker.workflow().step() != Step::EnterAmount {
        return not_now(context, "amount");
    }
    let raw = prompts::resolve_arg(
        context,
        args.first().copied(),
        "amount <value>",
        |raw| Ok(raw.to_string()),
        |theme| prompts::amount(theme, "How much did you spend?"),
    )?;

    let transition = context.tracker.submit_amount(&raw)?;
    if transition.is_ignored() {
        output::hint("Enter the amount as a positive number, for example `amount 12.50`.");
        return Ok(());
    }
    render_step(context);
    Ok(())
}

fn cmd_saved(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if context.tracker.workflow().step() != Step::ShowSavings {
        return not_now(context, "saved");
    }
    let confirmed = prompts::resolve_arg(
        context,
        args.first().copied(),
        "saved <yes|no>",
        parse_answer,
        |theme| prompts::yes_no(theme, "Did you set aside this savings?", true),
    )?;

    context.tracker.confirm_savings(confirmed)?;
    render_step(context);
    Ok(())
}

fn cmd_again(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if context.tracker.reset_workflow().is_ignored() {
        return not_now(context, "again");
    }
    render_step(context);
    Ok(())
}

fn cmd_cancel(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    match context.tracker.cancel_workflow() {
        Transition::Ignored => output::info("No purchase in progress."),
        _ => {
            output::info("Purchase cancelled. Nothing was recorded.");
            render_step(context);
        }
    }
    Ok(())
}

fn cmd_step(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    render_step(context);
    Ok(())
}

fn parse_answer(raw: &str) -> Result<bool, CommandError> {
    match raw.to_ascii_lowercase().as_str() {
        "yes" | "y" | "true" => Ok(true),
        "no" | "n" | "not-yet" | "false" => Ok(false),
        other => Err(CommandError::InvalidArguments(format!(
            "`{other}` is not an answer (expected yes or no)"
        ))),
    }
}

fn not_now(context: &ShellContext, command: &str) -> CommandResult {
    output::warning(format!(
        "`{command}` does not apply while the purchase is at `{}`.",
        context.tracker.workflow().step()
    ));
    render_step(context);
    Ok(())
}

/// Prints the screen for the current workflow step.
pub(crate) fn render_step(context: &ShellContext) {
    let state = context.tracker.workflow();
    match state.step() {
        Step::AskPurchaseType => {
            output::section("What type of purchase did you make?");
            output::hint("purchase frivolous | purchase non-frivolous");
        }
        Step::EnterAmount => {
            output::section("How much did you spend?");
            output::hint("amount <value>");
        }
        Step::ShowSavings => {
            let (Some(amount), Some(savings)) = (state.amount(), state.suggested_savings()) else {
                return;
            };
            output::section("Time to save!");
            output::info(format!(
                "Based on your frivolous purchase of {}, you should save at least:",
                context.money(amount)
            ));
            output::info(format!("  {}", context.money(savings)));
            output::info("This is 10% of your purchase amount.");
            if state.encouragement_visible() {
                output::info(
                    "Every bit of savings helps! Setting aside this amount now can make a big \
                     difference in the long run. Why not take a moment to transfer it to your \
                     savings account?",
                );
            }
            output::hint("Did you set aside this savings? saved yes | saved no");
        }
        Step::Complete => {
            output::section("Great job!");
            output::success("You're on your way to better financial health.");
            output::hint("again to record another purchase");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answers_accept_common_spellings() {
        assert!(parse_answer("Y").unwrap());
        assert!(!parse_answer("not-yet").unwrap());
        assert!(parse_answer("maybe").is_err());
    }
}
