use std::{
    borrow::Cow,
    collections::HashMap,
    io::{self, BufRead},
};

use colored::Colorize;
use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::Validator,
    Cmd, Context as ReadlineContext, Editor, Helper, KeyEvent,
};

use crate::cli::commands::{self, purchase::render_step};
use crate::cli::core::{CliError, CliMode, CommandError, LoopControl, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandRegistry;
use crate::workflow::Step;

const SCRIPT_ENV: &str = "SPEND_TO_SAVE_CLI_SCRIPT";

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    let mut context = ShellContext::new(mode)?;
    match mode {
        CliMode::Interactive => run_interactive(&mut context),
        CliMode::Script => run_script(&mut context),
    }
}

fn run_interactive(context: &mut ShellContext) -> Result<(), CliError> {
    let mut editor = Editor::<CommandHelper, DefaultHistory>::new()?;
    editor.set_helper(Some(CommandHelper::new(
        &context.registry,
        context.tracker.workflow().step(),
    )));
    editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);

    output::section("Spend to Save");
    output::info("All data is stored locally on this device. Type `help` for commands.");
    render_step(context);

    while context.running {
        if let Some(helper) = editor.helper_mut() {
            helper.step = context.tracker.workflow().step();
        }
        match editor.readline(&context.prompt()) {
            Ok(line) => {
                let entered = line.trim();
                if entered.is_empty() {
                    continue;
                }
                editor.add_history_entry(entered).ok();
                run_line(context, entered)?;
            }
            Err(ReadlineError::Interrupted) => {
                if context.confirm_exit()? {
                    break;
                }
            }
            Err(ReadlineError::Eof) => {
                output::info("Exiting shell.");
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}

/// Reads one command per stdin line until `exit` or end of input.
fn run_script(context: &mut ShellContext) -> Result<(), CliError> {
    for (index, line) in io::stdin().lock().lines().enumerate() {
        if !context.running {
            break;
        }
        let line = line?;
        tracing::debug!(line = index + 1, command = %line.trim(), "script command");
        run_line(context, &line)?;
    }
    Ok(())
}

fn run_line(context: &mut ShellContext, line: &str) -> Result<(), CliError> {
    match handle_line(context, line) {
        Ok(LoopControl::Continue) => Ok(()),
        Ok(LoopControl::Exit) => {
            context.running = false;
            Ok(())
        }
        Err(err) => context.report_error(err),
    }
}

fn handle_line(context: &mut ShellContext, line: &str) -> Result<LoopControl, CommandError> {
    let tokens = match parse_command_line(line) {
        Ok(tokens) => tokens,
        Err(err) => {
            context.print_warning(&format!("Could not read `{}`: {err}", line.trim()));
            return Ok(LoopControl::Continue);
        }
    };
    let Some((raw, rest)) = tokens.split_first() else {
        return Ok(LoopControl::Continue);
    };
    let args: Vec<&str> = rest.iter().map(String::as_str).collect();
    context.dispatch(&raw.to_lowercase(), raw, &args)
}

pub(crate) fn parse_command_line(input: &str) -> Result<Vec<String>, shell_words::ParseError> {
    shell_words::split(input)
}

/// Completion and usage hints for the interactive prompt.
///
/// The purchase step is refreshed before every read so that completing an
/// empty line offers the commands that move the current purchase forward.
struct CommandHelper {
    commands: Vec<&'static str>,
    usages: HashMap<&'static str, &'static str>,
    step: Step,
}

impl CommandHelper {
    fn new(registry: &CommandRegistry, step: Step) -> Self {
        let entries = registry.list();
        Self {
            commands: entries.iter().map(|entry| entry.name).collect(),
            usages: entries
                .iter()
                .map(|entry| (entry.name, entry.usage))
                .collect(),
            step,
        }
    }

    fn command_candidates(&self, needle: &str) -> Vec<&'static str> {
        if needle.is_empty() {
            let anytime = self
                .commands
                .iter()
                .copied()
                .filter(|name| !commands::is_step_bound(name));
            return commands::available_in(self.step)
                .iter()
                .copied()
                .chain(anytime)
                .collect();
        }
        self.commands
            .iter()
            .copied()
            .filter(|name| name.starts_with(needle))
            .collect()
    }

    fn argument_candidates(
        &self,
        command: &str,
        previous: &[&str],
        needle: &str,
    ) -> Vec<&'static str> {
        let choices = match (command, previous) {
            ("help", []) => self.commands.as_slice(),
            _ => commands::argument_choices(command, previous),
        };
        choices
            .iter()
            .copied()
            .filter(|choice| choice.starts_with(needle))
            .collect()
    }

    fn candidates(&self, prefix: &str) -> (usize, Vec<&'static str>) {
        let start = prefix
            .rfind(char::is_whitespace)
            .map_or(0, |idx| idx + 1);
        let needle = prefix[start..].to_ascii_lowercase();
        let words: Vec<String> = prefix[..start]
            .split_whitespace()
            .map(str::to_ascii_lowercase)
            .collect();
        let candidates = match words.split_first() {
            None => self.command_candidates(&needle),
            Some((command, previous)) => {
                let previous: Vec<&str> = previous.iter().map(String::as_str).collect();
                self.argument_candidates(command, &previous, &needle)
            }
        };
        (start, candidates)
    }

    /// Remaining usage for a command name followed by a single space.
    fn usage_hint(&self, line: &str) -> Option<String> {
        let command = line.strip_suffix(' ')?.trim_start();
        if command.is_empty() || command.contains(char::is_whitespace) {
            return None;
        }
        let usage = self.usages.get(command.to_ascii_lowercase().as_str())?;
        let (_, arguments) = usage.split_once(' ')?;
        Some(arguments.to_string())
    }
}

impl Helper for CommandHelper {}

impl Completer for CommandHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let (start, candidates) = self.candidates(&line[..pos]);
        let pairs = candidates
            .into_iter()
            .map(|name| Pair {
                display: name.to_string(),
                replacement: name.to_string(),
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Hinter for CommandHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &ReadlineContext<'_>) -> Option<String> {
        if pos < line.len() {
            return None;
        }
        self.usage_hint(line)
    }
}

impl Highlighter for CommandHelper {
    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Owned(hint.dimmed().to_string())
    }
}

impl Validator for CommandHelper {}
