use thiserror::Error;

/// Error type that captures ledger, storage, and validation failures.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Persistence error: {0}")]
    Persistence(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

impl LedgerError {
    /// True when the failure came from the persistence layer rather than from user input.
    pub fn is_persistence(&self) -> bool {
        matches!(
            self,
            LedgerError::Io(_) | LedgerError::Serde(_) | LedgerError::Persistence(_)
        )
    }
}

/// Errors surfaced by the interactive shell.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] LedgerError),
    #[error("Invalid input: {0}")]
    Input(String),
    #[error("Command failed: {0}")]
    Command(String),
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Core(LedgerError::Io(err))
    }
}

impl From<rustyline::error::ReadlineError> for CliError {
    fn from(err: rustyline::error::ReadlineError) -> Self {
        CliError::Input(err.to_string())
    }
}
