use indexmap::IndexMap;
use serde::Serialize;

use crate::codec::decode;
use crate::error::{Result, StateError};
use crate::models::{Label, StateConfig};

/// Key-value state materialized from a label list.
///
/// Iteration follows the order in which keys were first seen in the label list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct State {
    entries: IndexMap<String, String>,
}

impl State {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Compact JSON object, `{}` when empty
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(&self.entries).map_err(|e| StateError::Parse(e.to_string()))
    }
}

/// Anything carrying a label name
pub trait LabelName {
    fn label_name(&self) -> &str;
}

impl LabelName for Label {
    fn label_name(&self) -> &str {
        &self.name
    }
}

impl LabelName for String {
    fn label_name(&self) -> &str {
        self
    }
}

impl LabelName for str {
    fn label_name(&self) -> &str {
        self
    }
}

impl<T: LabelName + ?Sized> LabelName for &T {
    fn label_name(&self) -> &str {
        (**self).label_name()
    }
}

/// Build state from labels, skipping anything that does not decode.
///
/// A later label for an already-seen key overwrites its value.
pub fn extract_state<I>(labels: I, config: &StateConfig) -> State
where
    I: IntoIterator,
    I::Item: LabelName,
{
    let mut entries = IndexMap::new();
    for label in labels {
        if let Some(entry) = decode(label.label_name(), config) {
            entries.insert(entry.key, entry.value);
        }
    }
    State { entries }
}
