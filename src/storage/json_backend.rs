use std::{
    collections::BTreeMap,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use serde_json::Value;

use crate::core::utils::ensure_dir;

use super::{PersistenceProvider, Result};

const TMP_SUFFIX: &str = "tmp";
const CORRUPT_SUFFIX: &str = "corrupt";

/// Key-value storage kept as a single JSON object on disk.
///
/// Every write rewrites the whole file through a temporary sibling followed by
/// a rename, so a failed write leaves the previous file untouched. Values are
/// cached in memory and only updated after the file write succeeded.
#[derive(Debug)]
pub struct JsonFileStorage {
    path: PathBuf,
    values: BTreeMap<String, String>,
    warnings: Vec<String>,
}

impl JsonFileStorage {
    /// Opens (or prepares to create) the storage file at `path`.
    ///
    /// An unreadable or malformed file does not fail the open: it is moved
    /// aside to `<file>.corrupt` and the key space starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            ensure_dir(parent)?;
        }
        let mut warnings = Vec::new();
        let values = if path.exists() {
            match read_values(&path) {
                Ok(values) => values,
                Err(reason) => {
                    let aside = unused_aside_path(&path);
                    tracing::warn!(
                        path = %path.display(),
                        %reason,
                        "storage file unreadable; starting empty"
                    );
                    fs::rename(&path, &aside)?;
                    warnings.push(format!(
                        "storage file `{}` could not be read ({}); moved to `{}`",
                        path.display(),
                        reason,
                        aside.display()
                    ));
                    BTreeMap::new()
                }
            }
        } else {
            BTreeMap::new()
        };
        Ok(Self {
            path,
            values,
            warnings,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Problems found while opening the file.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    fn commit(&mut self, values: BTreeMap<String, String>) -> Result<()> {
        let json = serde_json::to_string_pretty(&values)?;
        let tmp = sibling_path(&self.path, TMP_SUFFIX);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        self.values = values;
        Ok(())
    }
}

impl PersistenceProvider for JsonFileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.set_many(&[(key, value.to_string())])
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.remove_many(&[key])
    }

    fn set_many(&mut self, pairs: &[(&str, String)]) -> Result<()> {
        let mut next = self.values.clone();
        for (key, value) in pairs {
            next.insert((*key).to_string(), value.clone());
        }
        self.commit(next)
    }

    fn remove_many(&mut self, keys: &[&str]) -> Result<()> {
        if !keys.iter().any(|key| self.values.contains_key(*key)) {
            return Ok(());
        }
        let mut next = self.values.clone();
        for key in keys {
            next.remove(*key);
        }
        self.commit(next)
    }
}

/// Reads the key space, keeping non-string values as their JSON text.
fn read_values(path: &Path) -> std::result::Result<BTreeMap<String, String>, String> {
    let data = fs::read_to_string(path).map_err(|err| err.to_string())?;
    if data.trim().is_empty() {
        return Ok(BTreeMap::new());
    }
    let raw: BTreeMap<String, Value> = serde_json::from_str(&data).map_err(|err| err.to_string())?;
    Ok(raw
        .into_iter()
        .map(|(key, value)| match value {
            Value::String(text) => (key, text),
            other => (key, other.to_string()),
        })
        .collect())
}

fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let mut sibling = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, suffix),
        None => suffix.to_string(),
    };
    sibling.set_extension(ext);
    sibling
}

/// `<file>.corrupt`, or `<file>.corrupt.N` with the first free `N` so earlier
/// copies are never overwritten.
fn unused_aside_path(path: &Path) -> PathBuf {
    let first = sibling_path(path, CORRUPT_SUFFIX);
    if !first.exists() {
        return first;
    }
    (1u32..)
        .map(|n| sibling_path(path, &format!("{CORRUPT_SUFFIX}.{n}")))
        .find(|candidate| !candidate.exists())
        .unwrap_or(first)
}

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    file.sync_all()?;
    Ok(())
}
