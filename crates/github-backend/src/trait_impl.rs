//! Implementation of the label-state-core gateway for GitHubClient

use label_state_core::{Label, LabelStore, Result, StateError};

use crate::client::GitHubClient;

impl LabelStore for GitHubClient {
    fn list_labels(&self, owner: &str, repo: &str, issue_number: u64) -> Result<Vec<Label>> {
        self.list_issue_labels(owner, repo, issue_number)
            .map(|labels| labels.into_iter().map(Into::into).collect())
            .map_err(StateError::from)
    }

    fn replace_labels(
        &self,
        owner: &str,
        repo: &str,
        issue_number: u64,
        names: &[String],
    ) -> Result<Vec<Label>> {
        self.set_issue_labels(owner, repo, issue_number, names)
            .map(|labels| labels.into_iter().map(Into::into).collect())
            .map_err(StateError::from)
    }

    fn delete_label_definition(&self, owner: &str, repo: &str, name: &str) -> Result<()> {
        self.delete_label(owner, repo, name).map_err(StateError::from)
    }
}
