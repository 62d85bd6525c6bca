//! In-memory label store
//!
//! Mirrors the platform's behavior closely enough for handler tests: replacing an
//! issue's labels implicitly defines any new label in the repository, and deleting
//! an undefined label fails with 404.

use label_state_core::{Label, LabelStore, Result, StateError};
use std::collections::{BTreeSet, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::call_log::{issue_args, repo_args, CallKind, CallLogEntry};
use crate::failures::Failures;

type IssueKey = (String, String, u64);
type RepoKey = (String, String);

#[derive(Default)]
struct Inner {
    issues: HashMap<IssueKey, Vec<Label>>,
    definitions: HashMap<RepoKey, BTreeSet<String>>,
    deleted: Vec<String>,
    calls: Vec<CallLogEntry>,
}

/// Label store held entirely in memory
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
    failures: Failures,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an issue with labels, defining them in the repository
    pub fn with_issue(self, owner: &str, repo: &str, issue_number: u64, names: &[&str]) -> Self {
        {
            let mut inner = self.lock();
            let labels: Vec<Label> = names.iter().map(|n| Label::named(*n)).collect();
            inner
                .definitions
                .entry((owner.to_string(), repo.to_string()))
                .or_default()
                .extend(labels.iter().map(|l| l.name.clone()));
            inner
                .issues
                .insert((owner.to_string(), repo.to_string(), issue_number), labels);
        }
        self
    }

    /// Inject failures for subsequent calls
    pub fn with_failures(mut self, failures: Failures) -> Self {
        self.failures = failures;
        self
    }

    /// Current label names on an issue
    pub fn label_names(&self, owner: &str, repo: &str, issue_number: u64) -> Vec<String> {
        self.lock()
            .issues
            .get(&(owner.to_string(), repo.to_string(), issue_number))
            .map(|labels| labels.iter().map(|l| l.name.clone()).collect())
            .unwrap_or_default()
    }

    /// Whether a label is defined in the repository
    pub fn is_defined(&self, owner: &str, repo: &str, name: &str) -> bool {
        self.lock()
            .definitions
            .get(&(owner.to_string(), repo.to_string()))
            .is_some_and(|defs| defs.contains(name))
    }

    /// Label definitions deleted so far, in call order
    pub fn deleted_definitions(&self) -> Vec<String> {
        self.lock().deleted.clone()
    }

    /// Every gateway call made so far
    pub fn calls(&self) -> Vec<CallLogEntry> {
        self.lock().calls.clone()
    }

    /// Number of calls that changed the store (or tried to)
    pub fn write_count(&self) -> usize {
        self.lock().calls.iter().filter(|c| c.is_write()).count()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl LabelStore for MemoryStore {
    fn list_labels(&self, owner: &str, repo: &str, issue_number: u64) -> Result<Vec<Label>> {
        let mut inner = self.lock();
        let entry = CallLogEntry::new(CallKind::ListLabels, issue_args(owner, repo, issue_number));

        if let Some(failure) = &self.failures.list {
            inner.calls.push(entry.failed(&failure.message));
            return Err(failure.to_error());
        }
        inner.calls.push(entry);

        inner
            .issues
            .get(&(owner.to_string(), repo.to_string(), issue_number))
            .cloned()
            .ok_or_else(|| StateError::NotFound(format!("{}/{}#{}", owner, repo, issue_number)))
    }

    fn replace_labels(
        &self,
        owner: &str,
        repo: &str,
        issue_number: u64,
        names: &[String],
    ) -> Result<Vec<Label>> {
        let mut inner = self.lock();
        let mut args = issue_args(owner, repo, issue_number);
        args.insert("labels".to_string(), serde_json::json!(names));
        let entry = CallLogEntry::new(CallKind::ReplaceLabels, args);

        if let Some(failure) = &self.failures.replace {
            inner.calls.push(entry.failed(&failure.message));
            return Err(failure.to_error());
        }
        inner.calls.push(entry);

        let key = (owner.to_string(), repo.to_string(), issue_number);
        let previous = inner.issues.get(&key).cloned().unwrap_or_default();
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

        inner
            .definitions
            .entry((owner.to_string(), repo.to_string()))
            .or_default()
            .extend(names.iter().cloned());
        inner.issues.insert(key, labels.clone());

        Ok(labels)
    }

    fn delete_label_definition(&self, owner: &str, repo: &str, name: &str) -> Result<()> {
        let mut inner = self.lock();
        let mut args = repo_args(owner, repo);
        args.insert("name".to_string(), serde_json::json!(name));
        let entry = CallLogEntry::new(CallKind::DeleteLabelDefinition, args);

        if let Some(failure) = &self.failures.delete {
            inner.calls.push(entry.failed(&failure.message));
            return Err(failure.to_error());
        }

        let removed = inner
            .definitions
            .get_mut(&(owner.to_string(), repo.to_string()))
            .is_some_and(|defs| defs.remove(name));
        if !removed {
            inner.calls.push(entry.failed("Not Found"));
            return Err(StateError::Api {
                status: 404,
                message: "Not Found".to_string(),
            });
        }

        inner.calls.push(entry);
        inner.deleted.push(name.to_string());
        Ok(())
    }
}
