use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tempfile::NamedTempFile;
use tracing::{debug, error, info, warn};

use crate::error::StoreError;
use crate::models::Task;

/// Fixed key of the storage slot; the file is named after it.
pub const STORAGE_KEY: &str = "weekday-app-tasks";

/// Environment variable overriding the storage file location.
pub const DB_ENV: &str = "WEEKPLAN_DB";

/// Returns the default path of the tasks file.
///
/// The path is determined in the following order:
/// 1. `WEEKPLAN_DB` environment variable.
/// 2. `~/.local/share/weekplan/weekday-app-tasks.json` (on Linux).
/// 3. `./weekday-app-tasks.json` (fallback).
pub fn default_path() -> PathBuf {
    std::env::var(DB_ENV).map(PathBuf::from).unwrap_or_else(|_| {
        let file = format!("{}.json", STORAGE_KEY);
        match dirs::data_local_dir() {
            Some(mut p) => {
                p.push("weekplan");
                if !p.exists() {
                    let _ = fs::create_dir_all(&p);
                }
                p.push(file);
                p
            }
            None => PathBuf::from(file),
        }
    })
}

/// Durable slot holding the whole task collection as JSON.
///
/// `save`, `load` and `clear` are best-effort: failures are logged and the
/// caller gets a safe default. Single-writer; concurrent processes race with
/// last-write-wins.
#[derive(Debug, Clone)]
pub struct TaskStore {
    path: PathBuf,
}

impl TaskStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        TaskStore { path: path.into() }
    }

    /// Store at [`default_path`].
    pub fn from_env() -> Self {
        TaskStore::new(default_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates the directory the slot lives in, if it is missing.
    pub fn create_parent_dir(&self) -> Result<(), StoreError> {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() && !dir.exists() => {
                fs::create_dir_all(dir)?;
                info!(dir = %dir.display(), "created task store directory");
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Writes the collection to the slot. Never fails to the caller.
    #[tracing::instrument(skip(self, tasks), fields(count = tasks.len()))]
    pub fn save(&self, tasks: &[Task]) {
        if let Err(e) = self.try_save(tasks) {
            error!(path = %self.path.display(), error = %e, "Failed to save tasks");
        }
    }

    fn try_save(&self, tasks: &[Task]) -> Result<(), StoreError> {
        let serialized = serde_json::to_string(tasks)?;
        write_atomic(&self.path, &serialized)?;
        debug!(path = %self.path.display(), "saved tasks");
        Ok(())
    }

    /// Reads the collection from the slot.
    ///
    /// Returns an empty collection if the slot does not exist or its
    /// contents cannot be read or parsed.
    #[tracing::instrument(skip(self))]
    pub fn load(&self) -> Vec<Task> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no stored tasks");
            return Vec::new();
        }
        let raw = match fs::read_to_string(&self.path) {
            Ok(s) => s,
            Err(e) => {
                error!(path = %self.path.display(), error = %e, "Failed to load tasks");
                return Vec::new();
            }
        };
        if raw.trim().is_empty() {
            return Vec::new();
        }
        match serde_json::from_str::<Vec<Task>>(&raw) {
            Ok(tasks) => {
                debug!(count = tasks.len(), "loaded tasks");
                tasks
            }
            Err(e) => {
                error!(path = %self.path.display(), error = %e, "Failed to load tasks");
                Vec::new()
            }
        }
    }

    /// Removes the slot. Never fails to the caller.
    #[tracing::instrument(skip(self))]
    pub fn clear(&self) {
        if !self.path.exists() {
            return;
        }
        match fs::remove_file(&self.path) {
            Ok(()) => info!(path = %self.path.display(), "cleared stored tasks"),
            Err(e) => warn!(path = %self.path.display(), error = %e, "Failed to clear tasks"),
        }
    }
}

/// Pretty-printed JSON of the collection, timestamps in canonical form.
pub fn export_tasks(tasks: &[Task]) -> Result<String, StoreError> {
    Ok(serde_json::to_string_pretty(tasks)?)
}

/// Parses an exported (or stored) collection.
///
/// The top-level value must be an array; each record is decoded into a
/// typed [`Task`]. Ids must be unique and titles non-blank. Errors are
/// returned to the caller.
pub fn import_tasks(text: &str) -> Result<Vec<Task>, StoreError> {
    let parsed: Value = serde_json::from_str(text).map_err(|e| {
        error!(error = %e, "Failed to import tasks");
        StoreError::Parse(e)
    })?;
    if !parsed.is_array() {
        error!("Failed to import tasks: top-level value is not an array");
        return Err(StoreError::InvalidFormat);
    }
    let tasks: Vec<Task> = serde_json::from_value(parsed).map_err(|e| {
        error!(error = %e, "Failed to import tasks");
        StoreError::Parse(e)
    })?;
    validate_records(&tasks).map_err(|e| {
        error!(error = %e, "Failed to import tasks");
        e
    })?;
    info!(count = tasks.len(), "imported tasks");
    Ok(tasks)
}

fn validate_records(tasks: &[Task]) -> Result<(), StoreError> {
    let mut seen = HashSet::with_capacity(tasks.len());
    for task in tasks {
        if task.title.trim().is_empty() {
            return Err(StoreError::BlankTitle(task.id.clone()));
        }
        if !seen.insert(task.id.as_str()) {
            return Err(StoreError::DuplicateId(task.id.clone()));
        }
    }
    Ok(())
}

/// Writes [`export_tasks`] output to a file.
pub fn export_to_path(tasks: &[Task], path: &Path) -> Result<(), StoreError> {
    let text = export_tasks(tasks)?;
    write_atomic(path, &text)
}

/// Reads a file and runs it through [`import_tasks`].
pub fn import_from_path(path: &Path) -> Result<Vec<Task>, StoreError> {
    let text = fs::read_to_string(path)?;
    import_tasks(&text)
}

fn write_atomic(path: &Path, contents: &str) -> Result<(), StoreError> {
    let dir = match path.parent() {
        Some(d) if !d.as_os_str().is_empty() => d,
        _ => Path::new("."),
    };
    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(contents.as_bytes())?;
    temp.flush()?;
    temp.persist(path).map_err(|e| StoreError::Persist {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    Ok(())
}
