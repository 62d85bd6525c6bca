use crate::error::Result;
use crate::models::Label;

/// Label collection backend consumed by the operation handlers
///
/// Each backend (GitHub, fixtures, in-memory) provides its own implementation.
pub trait LabelStore: Send + Sync {
    /// List the labels currently attached to an issue or pull request, in platform order
    fn list_labels(&self, owner: &str, repo: &str, issue_number: u64) -> Result<Vec<Label>>;

    /// Replace the full label set of an issue (not additive)
    fn replace_labels(
        &self,
        owner: &str,
        repo: &str,
        issue_number: u64,
        names: &[String],
    ) -> Result<Vec<Label>>;

    /// Delete a label definition from the repository
    fn delete_label_definition(&self, owner: &str, repo: &str, name: &str) -> Result<()>;
}
