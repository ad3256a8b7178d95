use dirs::home_dir;
use std::{
    env, fs, io,
    path::{Path, PathBuf},
};

const DEFAULT_DIR_NAME: &str = ".spend_to_save";
const HOME_ENV: &str = "SPEND_TO_SAVE_HOME";
const LEDGER_FILE: &str = "ledger.json";
const CONFIG_FILE: &str = "config.json";

/// Resolves on-disk locations for the ledger and configuration files.
pub struct PathResolver;

impl PathResolver {
    /// Application data directory: `$SPEND_TO_SAVE_HOME`, else `~/.spend_to_save`.
    pub fn base_dir() -> PathBuf {
        if let Some(custom) = env::var_os(HOME_ENV) {
            return PathBuf::from(custom);
        }
        home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DEFAULT_DIR_NAME)
    }

    pub fn ledger_file_in(base: &Path) -> PathBuf {
        base.join(LEDGER_FILE)
    }

    pub fn config_file_in(base: &Path) -> PathBuf {
        base.join(CONFIG_FILE)
    }
}

/// Creates `path` and its parents if they do not exist yet.
pub fn ensure_dir(path: &Path) -> io::Result<()> {
    if path.as_os_str().is_empty() || path.exists() {
        return Ok(());
    }
    fs::create_dir_all(path)
}
