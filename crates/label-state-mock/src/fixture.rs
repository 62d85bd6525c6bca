//! Fixture-directory label store
//!
//! Reads the issue's labels from `labels.json` and writes them back on replace, so a
//! sequence of CLI invocations against the same directory behaves like a live issue.

use label_state_core::{Label, LabelStore, Result, StateError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use thiserror::Error;
use tracing::debug;

use crate::call_log::{issue_args, repo_args, CallKind, CallLogEntry};
use crate::failures::Failures;

const LABELS_FILE: &str = "labels.json";
const FAILURES_FILE: &str = "failures.json";
const DELETED_FILE: &str = "deleted_labels.json";
const CALL_LOG_FILE: &str = "call_log.jsonl";

/// Errors reading or writing fixture files
#[derive(Error, Debug)]
pub enum FixtureError {
    #[error("Failed to access fixture file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse fixture file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl From<FixtureError> for StateError {
    fn from(err: FixtureError) -> Self {
        match err {
            FixtureError::Io { .. } => StateError::Io(err.to_string()),
            FixtureError::Parse { .. } => StateError::Parse(err.to_string()),
        }
    }
}

/// A label store backed by JSON files in a directory
pub struct FixtureStore {
    /// Root directory containing the fixture
    dir: PathBuf,

    /// Failures loaded from `failures.json`
    failures: Failures,

    /// Call log file writer
    log_writer: Mutex<Option<BufWriter<File>>>,
}

impl FixtureStore {
    /// Open a fixture directory
    pub fn new(dir: impl AsRef<Path>) -> std::result::Result<Self, FixtureError> {
        let dir = dir.as_ref().to_path_buf();

        let failures_path = dir.join(FAILURES_FILE);
        let failures = if failures_path.exists() {
            read_json(&failures_path)?
        } else {
            Failures::default()
        };

        let log_file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(dir.join(CALL_LOG_FILE))
            .ok();

        Ok(Self {
            dir,
            failures,
            log_writer: Mutex::new(log_file.map(BufWriter::new)),
        })
    }

    /// Read the call log entries written so far
    pub fn read_call_log(&self) -> Vec<CallLogEntry> {
        let content = std::fs::read_to_string(self.dir.join(CALL_LOG_FILE)).unwrap_or_default();

        content
            .lines()
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect()
    }

    /// Label definitions deleted through this fixture
    pub fn deleted_labels(&self) -> std::result::Result<Vec<String>, FixtureError> {
        let path = self.dir.join(DELETED_FILE);
        if !path.exists() {
            return Ok(Vec::new());
        }
        read_json(&path)
    }

    fn log_call(&self, entry: &CallLogEntry) {
        let mut writer = self.log_writer.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(w) = writer.as_mut() {
            if let Ok(json) = serde_json::to_string(entry) {
                let _ = writeln!(w, "{}", json);
                let _ = w.flush();
            }
        }
    }
}

impl LabelStore for FixtureStore {
    fn list_labels(&self, owner: &str, repo: &str, issue_number: u64) -> Result<Vec<Label>> {
        let entry = CallLogEntry::new(CallKind::ListLabels, issue_args(owner, repo, issue_number));

        if let Some(failure) = &self.failures.list {
            self.log_call(&entry.failed(&failure.message));
            return Err(failure.to_error());
        }
        self.log_call(&entry);

        let path = self.dir.join(LABELS_FILE);
        debug!(path = %path.display(), "Reading fixture labels");
        if !path.exists() {
            return Ok(Vec::new());
        }
        Ok(read_json(&path)?)
    }

    fn replace_labels(
        &self,
        owner: &str,
        repo: &str,
        issue_number: u64,
        names: &[String],
    ) -> Result<Vec<Label>> {
        let mut args = issue_args(owner, repo, issue_number);
        args.insert("labels".to_string(), serde_json::json!(names));
        let entry = CallLogEntry::new(CallKind::ReplaceLabels, args);

        if let Some(failure) = &self.failures.replace {
            self.log_call(&entry.failed(&failure.message));
            return Err(failure.to_error());
        }
        self.log_call(&entry);

        let path = self.dir.join(LABELS_FILE);
        let previous: Vec<Label> = if path.exists() {
            read_json(&path)?
        } else {
            Vec::new()
        };
        let labels: Vec<Label> = names
            .iter()
            .map(|name| {
                previous
                    .iter()
                    .find(|l| &l.name == name)
                    .cloned()
                    .unwrap_or_else(|| Label::named(name))
            })
            .collect();

        write_json(&path, &labels)?;
        Ok(labels)
    }

    fn delete_label_definition(&self, owner: &str, repo: &str, name: &str) -> Result<()> {
        let mut args = repo_args(owner, repo);
        args.insert("name".to_string(), serde_json::json!(name));
        let entry = CallLogEntry::new(CallKind::DeleteLabelDefinition, args);

        if let Some(failure) = &self.failures.delete {
            self.log_call(&entry.failed(&failure.message));
            return Err(failure.to_error());
        }
        self.log_call(&entry);

        let mut deleted = self.deleted_labels()?;
        deleted.push(name.to_string());
        write_json(&self.dir.join(DELETED_FILE), &deleted)?;
        Ok(())
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> std::result::Result<T, FixtureError> {
    let content = std::fs::read_to_string(path).map_err(|source| FixtureError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| FixtureError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> std::result::Result<(), FixtureError> {
    let content = serde_json::to_string_pretty(value).map_err(|source| FixtureError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, content).map_err(|source| FixtureError::Io {
        path: path.to_path_buf(),
        source,
    })
}
