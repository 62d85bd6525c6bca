use crate::error::Result;
use crate::models::{Label, StateConfig};
use crate::traits::LabelStore;

/// Per-invocation handle on one issue's labels
#[derive(Clone, Copy)]
pub struct OperationContext<'a> {
    store: &'a dyn LabelStore,
    owner: &'a str,
    repo: &'a str,
    issue_number: u64,
    config: &'a StateConfig,
}

impl<'a> OperationContext<'a> {
    pub fn new(
        store: &'a dyn LabelStore,
        owner: &'a str,
        repo: &'a str,
        issue_number: u64,
        config: &'a StateConfig,
    ) -> Self {
        Self {
            store,
            owner,
            repo,
            issue_number,
            config,
        }
    }

    pub fn owner(&self) -> &str {
        self.owner
    }

    pub fn repo(&self) -> &str {
        self.repo
    }

    pub fn issue_number(&self) -> u64 {
        self.issue_number
    }

    pub fn config(&self) -> &StateConfig {
        self.config
    }

    /// Fetch the issue's current labels
    pub fn fetch_labels(&self) -> Result<Vec<Label>> {
        self.store.list_labels(self.owner, self.repo, self.issue_number)
    }

    /// Replace the issue's label set
    pub fn commit_labels(&self, names: &[String]) -> Result<Vec<Label>> {
        self.store.replace_labels(self.owner, self.repo, self.issue_number, names)
    }

    /// Delete a label definition from the repository
    pub fn delete_definition(&self, name: &str) -> Result<()> {
        self.store.delete_label_definition(self.owner, self.repo, name)
    }
}

impl std::fmt::Debug for OperationContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperationContext")
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("issue_number", &self.issue_number)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
