//! Interactive fallbacks for commands entered without their arguments.

use std::fmt;

use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};

use crate::cli::core::{CliMode, CommandError, ShellContext};

/// Resolves one command argument. A given `arg` is parsed; a missing one is
/// asked for in interactive mode and is a usage error in script mode.
pub(crate) fn resolve_arg<T>(
    context: &ShellContext,
    arg: Option<&str>,
    usage: &str,
    parse: impl FnOnce(&str) -> Result<T, CommandError>,
    ask: impl FnOnce(&ColorfulTheme) -> Result<T, CommandError>,
) -> Result<T, CommandError> {
    match arg {
        Some(raw) => parse(raw),
        None if context.mode() == CliMode::Interactive => ask(context.theme()),
        None => Err(CommandError::InvalidArguments(format!("usage: {usage}"))),
    }
}

/// Picks one of `choices`, listed by their display labels.
pub(crate) fn choose<T: Copy + fmt::Display>(
    theme: &ColorfulTheme,
    prompt: &str,
    choices: &[T],
) -> Result<T, CommandError> {
    let labels: Vec<String> = choices.iter().map(ToString::to_string).collect();
    let index = Select::with_theme(theme)
        .with_prompt(prompt)
        .items(&labels)
        .default(0)
        .interact()?;
    Ok(choices[index])
}

/// Raw amount text; validation stays with the ledger and workflow.
pub(crate) fn amount(theme: &ColorfulTheme, prompt: &str) -> Result<String, CommandError> {
    Ok(Input::<String>::with_theme(theme)
        .with_prompt(prompt)
        .interact_text()?)
}

pub(crate) fn yes_no(
    theme: &ColorfulTheme,
    prompt: &str,
    default: bool,
) -> Result<bool, CommandError> {
    Ok(Confirm::with_theme(theme)
        .with_prompt(prompt)
        .default(default)
        .interact()?)
}
