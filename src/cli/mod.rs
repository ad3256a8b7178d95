pub mod commands;
mod core;
mod help;
pub mod output;
mod prompts;
mod registry;
mod shell;
mod shell_context;

pub use self::core::{CliMode, CommandError, ShellContext};
pub use shell::run_cli;
