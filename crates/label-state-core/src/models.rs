use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::StateError;

/// Default label prefix applied by the invocation layer
pub const DEFAULT_PREFIX: &str = "state";

/// Default separator applied by the invocation layer
pub const DEFAULT_SEPARATOR: &str = "::";

/// A label attached to an issue or pull request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Label {
    /// A label with only a name, as created implicitly by the platform
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: None,
            description: None,
        }
    }
}

/// A key-value pair decoded from a state label name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateEntry {
    pub key: String,
    pub value: String,
}

/// Label grammar configuration: `<prefix><separator><key><separator><value>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateConfig {
    pub prefix: String,
    pub separator: String,
}

impl StateConfig {
    /// Build a config, rejecting an empty prefix or separator
    pub fn new(prefix: impl Into<String>, separator: impl Into<String>) -> Result<Self, StateError> {
        let config = Self {
            prefix: prefix.into(),
            separator: separator.into(),
        };
        if config.prefix.is_empty() {
            return Err(StateError::InvalidInput("prefix must not be empty".to_string()));
        }
        if config.separator.is_empty() {
            return Err(StateError::InvalidInput(
                "separator must not be empty".to_string(),
            ));
        }
        Ok(config)
    }
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            separator: DEFAULT_SEPARATOR.to_string(),
        }
    }
}

/// The four supported operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Operation {
    Set,
    Get,
    GetAll,
    Remove,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Set => "set",
            Operation::Get => "get",
            Operation::GetAll => "get-all",
            Operation::Remove => "remove",
        }
    }

    /// Whether the operation addresses a single key
    pub fn requires_key(&self) -> bool {
        !matches!(self, Operation::GetAll)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = StateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "set" => Ok(Operation::Set),
            "get" => Ok(Operation::Get),
            "get-all" => Ok(Operation::GetAll),
            "remove" => Ok(Operation::Remove),
            other => Err(StateError::InvalidInput(format!(
                "Invalid operation: '{}'. Must be one of: set, get, get-all, remove",
                other
            ))),
        }
    }
}

/// A validated operation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Set { key: String, value: String },
    Get { key: String },
    GetAll,
    Remove { key: String },
}

impl Request {
    pub fn operation(&self) -> Operation {
        match self {
            Request::Set { .. } => Operation::Set,
            Request::Get { .. } => Operation::Get,
            Request::GetAll => Operation::GetAll,
            Request::Remove { .. } => Operation::Remove,
        }
    }
}

/// Result payload of an operation
///
/// `success` and `message` are always populated. `value` is only meaningful for
/// get, `state` only for get-all. A `success == false` outcome is a soft miss,
/// not an operational failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// Label names committed to the issue by set/remove
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
}

impl Outcome {
    pub fn succeeded(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            value: None,
            state: None,
            labels: None,
        }
    }

    /// Soft miss for an absent key
    pub fn key_not_found(key: &str) -> Self {
        Self {
            success: false,
            message: format!("Key '{}' not found", key),
            value: None,
            state: None,
            labels: None,
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    pub fn with_labels(mut self, labels: Vec<String>) -> Self {
        self.labels = Some(labels);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_round_trips_through_str() {
        for op in [
            Operation::Set,
            Operation::Get,
            Operation::GetAll,
            Operation::Remove,
        ] {
            assert_eq!(op.as_str().parse::<Operation>().unwrap(), op);
        }
    }

    #[test]
    fn test_invalid_operation_is_rejected() {
        let err = "delete".parse::<Operation>().unwrap_err();
        assert!(err.to_string().contains("Invalid operation: 'delete'"));
    }

    #[test]
    fn test_state_config_rejects_empty_parts() {
        assert!(StateConfig::new("", "::").is_err());
        assert!(StateConfig::new("state", "").is_err());
        assert_eq!(StateConfig::new("state", "::").unwrap(), StateConfig::default());
    }

    #[test]
    fn test_outcome_serialization_skips_absent_fields() {
        let json = serde_json::to_value(Outcome::key_not_found("step")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"success": false, "message": "Key 'step' not found"})
        );
    }

    #[test]
    fn test_label_deserializes_without_optional_fields() {
        let label: Label = serde_json::from_str(r#"{"name": "bug"}"#).unwrap();
        assert_eq!(label, Label::named("bug"));
    }
}
