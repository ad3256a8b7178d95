use std::path::PathBuf;

use dialoguer::theme::ColorfulTheme;

use crate::{
    config::{Config, ConfigManager},
    core::SpendTracker,
};

use super::registry::CommandRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub tracker: SpendTracker,
    pub theme: ColorfulTheme,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub ledger_path: PathBuf,
    /// Whether `totals` also lists the spending history.
    pub show_history: bool,
    pub running: bool,
}
