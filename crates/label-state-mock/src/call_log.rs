use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Gateway method invoked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallKind {
    ListLabels,
    ReplaceLabels,
    DeleteLabelDefinition,
}

/// A single call log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallLogEntry {
    /// Timestamp of the call
    pub timestamp: DateTime<Utc>,

    /// Method called
    pub method: CallKind,

    /// Arguments passed
    pub args: BTreeMap<String, serde_json::Value>,

    /// Error message (if call failed)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CallLogEntry {
    pub(crate) fn new(method: CallKind, args: BTreeMap<String, serde_json::Value>) -> Self {
        Self {
            timestamp: Utc::now(),
            method,
            args,
            error: None,
        }
    }

    pub(crate) fn failed(mut self, error: &str) -> Self {
        self.error = Some(error.to_string());
        self
    }

    /// Whether this call changed the store
    pub fn is_write(&self) -> bool {
        !matches!(self.method, CallKind::ListLabels)
    }
}

pub(crate) fn issue_args(owner: &str, repo: &str, issue_number: u64) -> BTreeMap<String, serde_json::Value> {
    BTreeMap::from([
        ("owner".to_string(), serde_json::json!(owner)),
        ("repo".to_string(), serde_json::json!(repo)),
        ("issue_number".to_string(), serde_json::json!(issue_number)),
    ])
}

pub(crate) fn repo_args(owner: &str, repo: &str) -> BTreeMap<String, serde_json::Value> {
    BTreeMap::from([
        ("owner".to_string(), serde_json::json!(owner)),
        ("repo".to_string(), serde_json::json!(repo)),
    ])
}
