//! Persistent per-category sequence counters
//!
//! The whole mapping lives behind one mutex; every mutation is written to
//! disk (temp file + fsync + rename) before the lock is released. A failed
//! write restores the previous in-memory value, so memory and disk agree.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use thiserror::Error;
use tracing::{info, warn};

use crate::utils::AppError;

/// Target name that clears every counter (case-insensitive)
pub const RESET_ALL: &str = "all";

/// Category → last issued sequence number
pub type Counters = BTreeMap<String, u64>;

#[derive(Debug, Error)]
pub enum CounterError {
    #[error("Invalid category: {0}")]
    InvalidCategory(String),

    #[error("Counter not found: {0}")]
    NotFound(String),

    #[error("Counter storage error: {0}")]
    Storage(String),
}

pub type CounterResult<T> = Result<T, CounterError>;

impl From<CounterError> for AppError {
    fn from(err: CounterError) -> Self {
        match err {
            CounterError::InvalidCategory(msg) => AppError::Validation(msg),
            CounterError::NotFound(category) => {
                AppError::NotFound(format!("Counter '{}'", category))
            }
            CounterError::Storage(msg) => AppError::Storage(msg),
        }
    }
}

fn normalize(category: &str) -> CounterResult<&str> {
    let category = category.trim();
    if category.is_empty() {
        return Err(CounterError::InvalidCategory(
            "Category must not be empty".to_string(),
        ));
    }
    Ok(category)
}

/// Read a persisted mapping
///
/// A missing file is an empty mapping.
pub fn load(path: &Path) -> CounterResult<Counters> {
    if !path.exists() {
        return Ok(Counters::new());
    }

    let raw = std::fs::read_to_string(path)
        .map_err(|e| CounterError::Storage(format!("read {}: {}", path.display(), e)))?;
    if raw.trim().is_empty() {
        return Ok(Counters::new());
    }

    serde_json::from_str(&raw)
        .map_err(|e| CounterError::Storage(format!("parse {}: {}", path.display(), e)))
}

/// Persistent counter store
#[derive(Debug)]
pub struct CounterStore {
    path: PathBuf,
    counters: Mutex<Counters>,
}

impl CounterStore {
    /// Open the store at `path`
    ///
    /// Unreadable data is moved aside to `<name>.corrupt` and the store starts
    /// empty. The parent directory is not created.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();

        let counters = match load(&path) {
            Ok(counters) => {
                info!(path = %path.display(), categories = counters.len(), "Counters loaded");
                counters
            }
            Err(e) => {
                let aside = corrupt_path(&path);
                warn!(error = %e, moved_to = %aside.display(), "Counter file unreadable, starting empty");
                if let Err(e) = std::fs::rename(&path, &aside) {
                    warn!(error = %e, "Failed to move corrupt counter file aside");
                }
                Counters::new()
            }
        };

        Self {
            path,
            counters: Mutex::new(counters),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Increment `category` and return the new count
    ///
    /// An absent category starts at 0, so the first call returns 1.
    pub fn increment(&self, category: &str) -> CounterResult<u64> {
        let category = normalize(category)?;
        let mut counters = self.counters.lock();

        let previous = counters.get(category).copied();
        let next = previous.unwrap_or(0) + 1;
        counters.insert(category.to_string(), next);

        if let Err(e) = self.persist(&counters) {
            match previous {
                Some(value) => counters.insert(category.to_string(), value),
                None => counters.remove(category),
            };
            return Err(e);
        }

        Ok(next)
    }

    /// Reset one category, or every category when `target` is `"all"`
    ///
    /// Returns the categories that were cleared.
    pub fn reset(&self, target: &str) -> CounterResult<Vec<String>> {
        let target = normalize(target)?;
        let mut counters = self.counters.lock();

        if target.eq_ignore_ascii_case(RESET_ALL) {
            let previous = std::mem::take(&mut *counters);
            if let Err(e) = self.persist(&counters) {
                *counters = previous;
                return Err(e);
            }
            return Ok(previous.into_keys().collect());
        }

        let Some(value) = counters.remove(target) else {
            return Err(CounterError::NotFound(target.to_string()));
        };
        if let Err(e) = self.persist(&counters) {
            counters.insert(target.to_string(), value);
            return Err(e);
        }
        Ok(vec![target.to_string()])
    }

    /// Current count for `category` (0 when absent)
    pub fn get(&self, category: &str) -> u64 {
        self.counters
            .lock()
            .get(category.trim())
            .copied()
            .unwrap_or(0)
    }

    pub fn snapshot(&self) -> Counters {
        self.counters.lock().clone()
    }

    /// Atomically replace the counter file with `counters`
    fn persist(&self, counters: &Counters) -> CounterResult<()> {
        let storage = |e: &dyn std::fmt::Display| {
            CounterError::Storage(format!("persist {}: {}", self.path.display(), e))
        };

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let json = serde_json::to_vec_pretty(counters).map_err(|e| storage(&e))?;
        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| storage(&e))?;
        tmp.write_all(&json).map_err(|e| storage(&e))?;
        tmp.as_file().sync_all().map_err(|e| storage(&e))?;
        tmp.persist(&self.path).map_err(|e| storage(&e.error))?;

        Ok(())
    }
}

fn corrupt_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "counters".into());
    name.push(".corrupt");
    path.with_file_name(name)
}
