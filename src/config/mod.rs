use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{
    core::{
        clear::DEFAULT_CLEAR_WINDOW,
        utils::{ensure_dir, PathResolver},
    },
    currency::CurrencyFormat,
    errors::LedgerError,
};

const TMP_SUFFIX: &str = "tmp";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub currency_symbol: String,
    pub decimal_separator: char,
    pub grouping_separator: char,
    /// Quiet period, in milliseconds, that collapses repeated `clear` requests.
    pub clear_debounce_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        let format = CurrencyFormat::default();
        Self {
            currency_symbol: format.symbol,
            decimal_separator: format.decimal_separator,
            grouping_separator: format.grouping_separator,
            clear_debounce_ms: DEFAULT_CLEAR_WINDOW.as_millis() as u64,
        }
    }
}

impl Config {
    pub const KEYS: [&'static str; 4] = [
        "currency_symbol",
        "decimal_separator",
        "grouping_separator",
        "clear_debounce_ms",
    ];

    pub fn currency_format(&self) -> CurrencyFormat {
        CurrencyFormat {
            symbol: self.currency_symbol.clone(),
            decimal_separator: self.decimal_separator,
            grouping_separator: self.grouping_separator,
        }
    }

    pub fn clear_window(&self) -> Duration {
        Duration::from_millis(self.clear_debounce_ms)
    }

    /// Updates one setting from its textual form. On error nothing changes.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), LedgerError> {
        let mut next = self.clone();
        match key {
            "currency_symbol" => {
                let symbol = value.trim();
                if symbol.is_empty() {
                    return Err(LedgerError::Config("currency symbol cannot be empty".into()));
                }
                next.currency_symbol = symbol.to_string();
            }
            "decimal_separator" => next.decimal_separator = single_char(key, value)?,
            "grouping_separator" => next.grouping_separator = single_char(key, value)?,
            "clear_debounce_ms" => {
                next.clear_debounce_ms = value.trim().parse().map_err(|_| {
                    LedgerError::Config(format!("`{value}` is not a whole number of milliseconds"))
                })?;
            }
            other => {
                return Err(LedgerError::Config(format!(
                    "unknown setting `{other}` (expected one of: {})",
                    Self::KEYS.join(", ")
                )))
            }
        }
        if next.decimal_separator == next.grouping_separator {
            return Err(LedgerError::Config(
                "decimal and grouping separators must differ".into(),
            ));
        }
        *self = next;
        Ok(())
    }

    /// Current value of a setting, rendered as text.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "currency_symbol" => Some(self.currency_symbol.clone()),
            "decimal_separator" => Some(self.decimal_separator.to_string()),
            "grouping_separator" => Some(self.grouping_separator.to_string()),
            "clear_debounce_ms" => Some(self.clear_debounce_ms.to_string()),
            _ => None,
        }
    }
}

fn single_char(key: &str, value: &str) -> Result<char, LedgerError> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Ok(ch),
        _ => Err(LedgerError::Config(format!(
            "`{key}` must be a single character"
        ))),
    }
}

/// Loads and saves [`Config`] as JSON next to the ledger file.
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, LedgerError> {
        Self::with_base_dir(PathResolver::base_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, LedgerError> {
        ensure_dir(&base)?;
        Ok(Self {
            path: PathResolver::config_file_in(&base),
        })
    }

    /// Reads the configuration, falling back to defaults when no file exists.
    pub fn load(&self) -> Result<Config, LedgerError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), LedgerError> {
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), LedgerError> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        assert_eq!(manager.load().unwrap(), Config::default());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        let mut config = Config::default();
        config.set("currency_symbol", "€").unwrap();
        config.set("clear_debounce_ms", "0").unwrap();
        manager.save(&config).unwrap();

        let loaded = manager.load().unwrap();
        assert_eq!(loaded.currency_symbol, "€");
        assert_eq!(loaded.clear_window(), Duration::ZERO);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        fs::write(manager.path(), r#"{"currency_symbol":"£"}"#).unwrap();
        let loaded = manager.load().unwrap();
        assert_eq!(loaded.currency_symbol, "£");
        assert_eq!(loaded.clear_debounce_ms, 300);
    }

    #[test]
    fn rejects_bad_settings() {
        let mut config = Config::default();
        assert!(config.set("theme", "dark").is_err());
        assert!(config.set("clear_debounce_ms", "soon").is_err());
        assert!(config.set("decimal_separator", "..").is_err());
        assert!(config.set("decimal_separator", ",").is_err());
        assert_eq!(config, Config::default());
    }
}
