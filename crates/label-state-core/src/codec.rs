//! Label name encoding for key-value state
//!
//! A state label is named `<prefix><separator><key><separator><value>`. The key ends
//! at the first separator after the prefix, so a value may contain the separator but
//! a key may not. Nothing is escaped.

use crate::models::{StateConfig, StateEntry};

/// Whether a label name belongs to the configured state namespace
pub fn is_state_label(name: &str, config: &StateConfig) -> bool {
    name.strip_prefix(config.prefix.as_str())
        .is_some_and(|rest| rest.starts_with(config.separator.as_str()))
}

/// Decode a label name into a state entry.
///
/// Returns `None` for foreign labels and for malformed state labels whose
/// remainder has no key/value separator.
pub fn decode(name: &str, config: &StateConfig) -> Option<StateEntry> {
    let rest = name
        .strip_prefix(config.prefix.as_str())?
        .strip_prefix(config.separator.as_str())?;
    let (key, value) = rest.split_once(config.separator.as_str())?;

    Some(StateEntry {
        key: key.to_string(),
        value: value.to_string(),
    })
}

/// Encode a key-value pair as a label name
pub fn encode(key: &str, value: &str, config: &StateConfig) -> String {
    format!(
        "{}{}{}{}{}",
        config.prefix, config.separator, key, config.separator, value
    )
}

/// Canonicalize integer-looking values.
///
/// A value is only treated as numeric when its canonical decimal form is
/// identical to the input, so `"007"`, `"+5"` and `"-0"` stay opaque strings.
pub fn normalize_value(raw: &str) -> String {
    match raw.parse::<i64>() {
        Ok(n) if n.to_string() == raw => n.to_string(),
        _ => raw.to_string(),
    }
}
