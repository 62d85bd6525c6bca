//! Operation handlers
//!
//! Each handler reconciles the issue's current labels against the requested change.
//! Writes happen in two phases: the replace-all commit, whose errors propagate, and
//! an optional cleanup of the stale label definition, whose errors are only logged.

use tracing::{debug, warn};

use crate::codec::{decode, encode, normalize_value};
use crate::context::OperationContext;
use crate::error::Result;
use crate::models::{Label, Outcome, Request};
use crate::state::extract_state;

/// Fetch the issue's labels and run a request against them
pub fn execute(ctx: &OperationContext<'_>, request: &Request) -> Result<Outcome> {
    debug!(
        operation = %request.operation(),
        owner = ctx.owner(),
        repo = ctx.repo(),
        issue = ctx.issue_number(),
        "Fetching current labels"
    );
    let labels = ctx.fetch_labels()?;

    match request {
        Request::Set { key, value } => set(ctx, key, value, &labels),
        Request::Get { key } => Ok(get(ctx, key, &labels)),
        Request::GetAll => get_all(ctx, &labels),
        Request::Remove { key } => remove(ctx, key, &labels),
    }
}

/// Read a single key
pub fn get(ctx: &OperationContext<'_>, key: &str, labels: &[Label]) -> Outcome {
    let state = extract_state(labels, ctx.config());

    match state.get(key) {
        Some(value) => Outcome::succeeded(format!("Retrieved value for key '{}'", key))
            .with_value(value),
        None => Outcome::key_not_found(key),
    }
}

/// Read every key as a JSON object
pub fn get_all(ctx: &OperationContext<'_>, labels: &[Label]) -> Result<Outcome> {
    let state = extract_state(labels, ctx.config());
    let json = state.to_json()?;

    Ok(Outcome::succeeded(format!("Retrieved {} state values", state.len())).with_state(json))
}

/// Create or overwrite a key
pub fn set(
    ctx: &OperationContext<'_>,
    key: &str,
    raw_value: &str,
    labels: &[Label],
) -> Result<Outcome> {
    let config = ctx.config();
    let value = normalize_value(raw_value);
    let new_name = encode(key, &value, config);

    let existing = find_state_label(labels, key, ctx);
    let mut names = names_without_key(labels, key, ctx);
    names.push(new_name.clone());

    debug!(key, label = %new_name, replaced = ?existing.map(|l| &l.name), "Committing labels");
    ctx.commit_labels(&names)?;

    if let Some(old) = existing {
        if old.name != new_name {
            cleanup_definition(ctx, &old.name);
        }
    }

    Ok(Outcome::succeeded(format!("Set state: {}={}", key, value)).with_labels(names))
}

/// Delete a key
pub fn remove(ctx: &OperationContext<'_>, key: &str, labels: &[Label]) -> Result<Outcome> {
    let Some(existing) = find_state_label(labels, key, ctx) else {
        return Ok(Outcome::key_not_found(key));
    };

    let names = names_without_key(labels, key, ctx);

    debug!(key, label = %existing.name, "Committing labels");
    ctx.commit_labels(&names)?;

    cleanup_definition(ctx, &existing.name);

    Ok(Outcome::succeeded(format!("Removed state key: {}", key)).with_labels(names))
}

fn decodes_to_key(label: &Label, key: &str, ctx: &OperationContext<'_>) -> bool {
    decode(&label.name, ctx.config()).is_some_and(|entry| entry.key == key)
}

fn find_state_label<'l>(
    labels: &'l [Label],
    key: &str,
    ctx: &OperationContext<'_>,
) -> Option<&'l Label> {
    labels.iter().find(|label| decodes_to_key(label, key, ctx))
}

/// Every label name except those encoding `key`, in their original order
fn names_without_key(labels: &[Label], key: &str, ctx: &OperationContext<'_>) -> Vec<String> {
    labels
        .iter()
        .filter(|label| !decodes_to_key(label, key, ctx))
        .map(|label| label.name.clone())
        .collect()
}

/// Best-effort removal of a label definition that is no longer attached
fn cleanup_definition(ctx: &OperationContext<'_>, name: &str) {
    if let Err(e) = ctx.delete_definition(name) {
        warn!(label = name, error = %e, "Failed to delete label definition");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StateError;
    use crate::models::StateConfig;
    use crate::traits::LabelStore;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        List,
        Replace(Vec<String>),
        Delete(String),
    }

    /// Records gateway calls against a fixed label list
    #[derive(Default)]
    struct RecordingStore {
        labels: Vec<Label>,
        calls: Mutex<Vec<Call>>,
        fail_list: bool,
        fail_replace: bool,
        fail_delete: bool,
    }

    impl RecordingStore {
        fn with_labels(names: &[&str]) -> Self {
            Self {
                labels: names.iter().map(|n| Label::named(*n)).collect(),
                ..Default::default()
            }
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn writes(&self) -> Vec<Call> {
            self.calls()
                .into_iter()
                .filter(|c| !matches!(c, Call::List))
                .collect()
        }
    }

    impl LabelStore for RecordingStore {
        fn list_labels(&self, _owner: &str, _repo: &str, _issue: u64) -> Result<Vec<Label>> {
            self.calls.lock().unwrap().push(Call::List);
            if self.fail_list {
                return Err(StateError::Http("connection refused".to_string()));
            }
            Ok(self.labels.clone())
        }

        fn replace_labels(
            &self,
            _owner: &str,
            _repo: &str,
            _issue: u64,
            names: &[String],
        ) -> Result<Vec<Label>> {
            self.calls.lock().unwrap().push(Call::Replace(names.to_vec()));
            if self.fail_replace {
                return Err(StateError::Api {
                    status: 403,
                    message: "Resource not accessible by integration".to_string(),
                });
            }
            Ok(names.iter().map(Label::named).collect())
        }

        fn delete_label_definition(&self, _owner: &str, _repo: &str, name: &str) -> Result<()> {
            self.calls.lock().unwrap().push(Call::Delete(name.to_string()));
            if self.fail_delete {
                return Err(StateError::Api {
                    status: 404,
                    message: "Not Found".to_string(),
                });
            }
            Ok(())
        }
    }

    const SCENARIO: [&str; 4] = ["bug", "state::step::1", "state::status::pending", "enhancement"];

    fn strings(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn run(store: &RecordingStore, request: Request) -> Result<Outcome> {
        let config = StateConfig::default();
        let ctx = OperationContext::new(store, "owner", "repo", 7, &config);
        execute(&ctx, &request)
    }

    #[test]
    fn test_get_all_scenario() {
        let store = RecordingStore::with_labels(&SCENARIO);
        let outcome = run(&store, Request::GetAll).unwrap();

        assert!(outcome.success);
        assert_eq!(outcome.message, "Retrieved 2 state values");
        assert_eq!(outcome.state.as_deref(), Some(r#"{"step":"1","status":"pending"}"#));
        assert_eq!(store.calls(), vec![Call::List]);
    }

    #[test]
    fn test_get_all_with_only_foreign_labels() {
        let store = RecordingStore::with_labels(&["bug", "enhancement"]);
        let outcome = run(&store, Request::GetAll).unwrap();

        assert!(outcome.success);
        assert_eq!(outcome.message, "Retrieved 0 state values");
        assert_eq!(outcome.state.as_deref(), Some("{}"));
    }

    #[test]
    fn test_get_all_skips_malformed() {
        let store = RecordingStore::with_labels(&["state::", "state::key", "state::valid::value"]);
        let outcome = run(&store, Request::GetAll).unwrap();

        assert_eq!(outcome.state.as_deref(), Some(r#"{"valid":"value"}"#));
        assert_eq!(outcome.message, "Retrieved 1 state values");
    }

    #[test]
    fn test_get_present_key() {
        let store = RecordingStore::with_labels(&SCENARIO);
        let outcome = run(&store, Request::Get { key: "step".to_string() }).unwrap();

        assert!(outcome.success);
        assert_eq!(outcome.message, "Retrieved value for key 'step'");
        assert_eq!(outcome.value.as_deref(), Some("1"));
        assert!(store.writes().is_empty());
    }

    #[test]
    fn test_get_absent_key_is_soft_miss() {
        let store = RecordingStore::with_labels(&SCENARIO);
        let outcome = run(&store, Request::Get { key: "missing".to_string() }).unwrap();

        assert!(!outcome.success);
        assert_eq!(outcome.message, "Key 'missing' not found");
        assert_eq!(outcome.value, None);
    }

    #[test]
    fn test_set_replaces_existing_key() {
        let store = RecordingStore::with_labels(&SCENARIO);
        let outcome = run(
            &store,
            Request::Set {
                key: "step".to_string(),
                value: "2".to_string(),
            },
        )
        .unwrap();

        assert!(outcome.success);
        assert_eq!(outcome.message, "Set state: step=2");
        assert_eq!(
            store.writes(),
            vec![
                Call::Replace(strings(&[
                    "bug",
                    "state::status::pending",
                    "enhancement",
                    "state::step::2"
                ])),
                Call::Delete("state::step::1".to_string()),
            ]
        );
    }

    #[test]
    fn test_set_absent_key_appends_without_cleanup() {
        let store = RecordingStore::with_labels(&SCENARIO);
        run(
            &store,
            Request::Set {
                key: "owner".to_string(),
                value: "alice".to_string(),
            },
        )
        .unwrap();

        assert_eq!(
            store.writes(),
            vec![Call::Replace(strings(&[
                "bug",
                "state::step::1",
                "state::status::pending",
                "enhancement",
                "state::owner::alice"
            ]))]
        );
    }

    #[test]
    fn test_set_same_value_skips_cleanup() {
        let store = RecordingStore::with_labels(&SCENARIO);
        let outcome = run(
            &store,
            Request::Set {
                key: "step".to_string(),
                value: "1".to_string(),
            },
        )
        .unwrap();

        assert!(outcome.success);
        assert_eq!(
            store.writes(),
            vec![Call::Replace(strings(&[
                "bug",
                "state::status::pending",
                "enhancement",
                "state::step::1"
            ]))]
        );
    }

    #[test]
    fn test_set_keeps_non_canonical_numbers_verbatim() {
        let store = RecordingStore::with_labels(&[]);
        let outcome = run(
            &store,
            Request::Set {
                key: "build".to_string(),
                value: "007".to_string(),
            },
        )
        .unwrap();

        assert_eq!(outcome.message, "Set state: build=007");
        assert_eq!(outcome.labels, Some(strings(&["state::build::007"])));
    }

    #[test]
    fn test_set_drops_duplicate_stale_labels() {
        let store = RecordingStore::with_labels(&["state::step::1", "bug", "state::step::5"]);
        run(
            &store,
            Request::Set {
                key: "step".to_string(),
                value: "6".to_string(),
            },
        )
        .unwrap();

        assert_eq!(
            store.writes(),
            vec![
                Call::Replace(strings(&["bug", "state::step::6"])),
                Call::Delete("state::step::1".to_string()),
            ]
        );
    }

    #[test]
    fn test_set_leaves_malformed_labels_untouched() {
        let store = RecordingStore::with_labels(&["state::step", "state::step::1"]);
        run(
            &store,
            Request::Set {
                key: "step".to_string(),
                value: "2".to_string(),
            },
        )
        .unwrap();

        assert_eq!(
            store.writes()[0],
            Call::Replace(strings(&["state::step", "state::step::2"]))
        );
    }

    #[test]
    fn test_set_cleanup_failure_is_not_fatal() {
        let store = RecordingStore {
            fail_delete: true,
            ..RecordingStore::with_labels(&SCENARIO)
        };
        let outcome = run(
            &store,
            Request::Set {
                key: "step".to_string(),
                value: "2".to_string(),
            },
        )
        .unwrap();

        assert!(outcome.success);
        assert_eq!(outcome.message, "Set state: step=2");
    }

    #[test]
    fn test_set_commit_failure_propagates() {
        let store = RecordingStore {
            fail_replace: true,
            ..RecordingStore::with_labels(&SCENARIO)
        };
        let err = run(
            &store,
            Request::Set {
                key: "step".to_string(),
                value: "2".to_string(),
            },
        )
        .unwrap_err();

        assert!(err.to_string().contains("Resource not accessible by integration"));
        // No cleanup after a failed commit
        assert_eq!(store.writes().len(), 1);
    }

    #[test]
    fn test_fetch_failure_propagates() {
        let store = RecordingStore {
            fail_list: true,
            ..Default::default()
        };
        let err = run(&store, Request::GetAll).unwrap_err();

        assert!(matches!(err, StateError::Http(_)));
        assert_eq!(store.calls(), vec![Call::List]);
    }

    #[test]
    fn test_remove_present_key() {
        let store = RecordingStore::with_labels(&["bug", "state::step::1", "state::status::pending"]);
        let outcome = run(&store, Request::Remove { key: "step".to_string() }).unwrap();

        assert!(outcome.success);
        assert_eq!(outcome.message, "Removed state key: step");
        assert_eq!(
            store.writes(),
            vec![
                Call::Replace(strings(&["bug", "state::status::pending"])),
                Call::Delete("state::step::1".to_string()),
            ]
        );
    }

    #[test]
    fn test_remove_absent_key_makes_no_writes() {
        let store = RecordingStore::with_labels(&SCENARIO);
        let outcome = run(&store, Request::Remove { key: "nope".to_string() }).unwrap();

        assert!(!outcome.success);
        assert_eq!(outcome.message, "Key 'nope' not found");
        assert!(store.writes().is_empty());
    }

    #[test]
    fn test_remove_cleanup_failure_is_not_fatal() {
        let store = RecordingStore {
            fail_delete: true,
            ..RecordingStore::with_labels(&SCENARIO)
        };
        let outcome = run(&store, Request::Remove { key: "status".to_string() }).unwrap();

        assert!(outcome.success);
        assert_eq!(outcome.labels, Some(strings(&["bug", "state::step::1", "enhancement"])));
    }

    #[test]
    fn test_handlers_use_configured_grammar() {
        let config = StateConfig::new("wf", "/").unwrap();
        let store = RecordingStore::with_labels(&["wf/phase/build", "state::phase::old"]);
        let ctx = OperationContext::new(&store, "o", "r", 1, &config);

        let outcome = get(&ctx, "phase", &store.labels);
        assert_eq!(outcome.value.as_deref(), Some("build"));

        set(&ctx, "phase", "deploy", &store.labels).unwrap();
        assert_eq!(
            store.writes(),
            vec![
                Call::Replace(strings(&["state::phase::old", "wf/phase/deploy"])),
                Call::Delete("wf/phase/build".to_string()),
            ]
        );
    }
}
