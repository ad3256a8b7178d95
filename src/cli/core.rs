//! Core CLI loop, dispatch, and shell context helpers.

use std::{io, path::PathBuf};

use dialoguer::theme::ColorfulTheme;
use rust_decimal::Decimal;
use strsim::levenshtein;

use crate::{
    config::ConfigManager,
    core::{utils::PathResolver, SpendTracker},
    errors::LedgerError,
    ledger::LoadReport,
    storage::JsonFileStorage,
};

pub use crate::errors::CliError;

use super::commands;
use super::output;
use super::prompts;
use super::registry::{CommandEntry, CommandRegistry};
pub use super::shell_context::{CliMode, ShellContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        Self::with_base_dir(mode, PathResolver::base_dir())
    }

    /// Opens the ledger and configuration stored under `base`.
    pub fn with_base_dir(mode: CliMode, base: PathBuf) -> Result<Self, CliError> {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let config_manager = ConfigManager::with_base_dir(base.clone())?;
        let config = config_manager.load()?;

        let ledger_path = PathResolver::ledger_file_in(&base);
        let storage = JsonFileStorage::open(&ledger_path)?;
        let storage_warnings = storage.warnings().to_vec();
        let (tracker, report) = SpendTracker::open(Box::new(storage));
        let tracker = tracker.with_clear_window(config.clear_window());

        let app = ShellContext {
            mode,
            registry,
            tracker,
            theme: ColorfulTheme::default(),
            config_manager,
            config,
            ledger_path,
            show_history: false,
            running: true,
        };

        for warning in &storage_warnings {
            output::warning(warning);
        }
        app.report_load(&report);
        Ok(app)
    }

    pub(crate) fn mode(&self) -> CliMode {
        self.mode
    }

    pub(crate) fn theme(&self) -> &ColorfulTheme {
        &self.theme
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub(crate) fn prompt(&self) -> String {
        format!("spend-to-save [{}]> ", self.tracker.workflow().step())
    }

    /// Formats a money value with the configured currency settings.
    pub(crate) fn money(&self, value: Decimal) -> String {
        self.config.currency_format().format(value)
    }

    pub(crate) fn persist_config(&self) -> CommandResult {
        self.config_manager
            .save(&self.config)
            .map_err(CommandError::from_core)
    }

    /// Pushes runtime-relevant settings into the tracker.
    pub(crate) fn apply_config(&mut self) {
        self.tracker.set_clear_window(self.config.clear_window());
    }

    fn report_load(&self, report: &LoadReport) {
        for warning in &report.warnings {
            output::warning(warning);
        }
        if !report.consistent {
            output::warning("Stored totals do not match the spending history.");
            output::hint("Run `reconcile` to rebuild totals from history.");
        }
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    #[cfg(test)]
    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = match crate::cli::shell::parse_command_line(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                self.print_warning(&err.to_string());
                return Ok(LoopControl::Continue);
            }
        };

        if tokens.is_empty() {
            return Ok(LoopControl::Continue);
        }

        let command = tokens[0].to_lowercase();
        let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();
        self.dispatch(&command, &tokens[0], &args)
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let mut suggestions: Vec<_> = self
            .registry
            .names()
            .map(|key| (levenshtein(key, input), key))
            .collect();
        suggestions.sort_by_key(|(distance, _)| *distance);

        if let Some((distance, best)) = suggestions.first() {
            if *distance <= 3 {
                output::info(format!("Suggestion: `{}`?", best));
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        prompts::yes_no(&self.theme, "Exit shell?", true).map_err(CliError::from)
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                self.print_error(&message);
                self.print_hint("Use `help <command>` for usage details.");
                Ok(())
            }
            CommandError::Core(err) if err.is_persistence() => {
                self.print_error(&format!("Could not save your data: {err}"));
                self.print_hint("The change is kept for this session only.");
                Ok(())
            }
            other => {
                self.print_error(&other.to_string());
                Ok(())
            }
        }
    }

    pub(crate) fn print_error(&self, message: &str) {
        output::error(message);
    }

    pub(crate) fn print_warning(&self, message: &str) {
        output::warning(message);
    }

    pub(crate) fn print_hint(&self, message: &str) {
        output::hint(message);
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Core(#[from] LedgerError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl CommandError {
    pub(crate) fn from_core(error: LedgerError) -> Self {
        CommandError::Core(error)
    }
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        match err {
            CommandError::Core(inner) => CliError::Core(inner),
            other => CliError::Command(other.to_string()),
        }
    }
}

#[cfg(test)]
pub(crate) fn process_script(base: PathBuf, lines: &[&str]) -> Result<ShellContext, CliError> {
    let mut app = ShellContext::with_base_dir(CliMode::Script, base)?;
    for line in lines {
        let outcome = match app.process_line(line) {
            Ok(outcome) => outcome,
            Err(err) => {
                app.report_error(err)?;
                LoopControl::Continue
            }
        };
        if outcome == LoopControl::Exit {
            break;
        }
    }
    Ok(app)
}
