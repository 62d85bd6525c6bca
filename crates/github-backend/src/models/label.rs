use label_state_core::Label;
use serde::{Deserialize, Serialize};

/// GitHub label
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GitHubLabel {
    pub id: u64,
    pub name: String,
    /// Color hex string WITHOUT `#` prefix (e.g., "fc2929")
    pub color: Option<String>,
    pub description: Option<String>,
}

impl From<GitHubLabel> for Label {
    fn from(label: GitHubLabel) -> Self {
        Label {
            name: label.name,
            color: label.color,
            description: label.description,
        }
    }
}

/// Request body for replacing all labels on an issue
#[derive(Debug, Clone, Serialize)]
pub struct SetGitHubIssueLabels {
    pub labels: Vec<String>,
}
