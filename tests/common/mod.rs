#![allow(dead_code)]

use std::{
    path::{Path, PathBuf},
    sync::Mutex,
};

use chrono::{TimeZone, Utc};
use once_cell::sync::Lazy;
use spend_to_save::{
    core::{FixedClock, SpendTracker},
    ledger::LoadReport,
    storage::JsonFileStorage,
};
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates a unique directory that outlives the calling test.
pub fn test_dir() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

pub fn fixed_clock() -> FixedClock {
    FixedClock(Utc.with_ymd_and_hms(2025, 3, 14, 12, 0, 0).unwrap())
}

/// Opens a tracker over the JSON ledger file at `path` with a fixed clock.
pub fn open_tracker(path: &Path) -> (SpendTracker, LoadReport) {
    let storage = JsonFileStorage::open(path).expect("open json storage");
    SpendTracker::with_clock(Box::new(storage), Box::new(fixed_clock()))
}
