//! Label stores for label-state testing and offline runs
//!
//! Two implementations of `LabelStore` are provided:
//!
//! 1. **`MemoryStore`**: labels held in memory, with failure injection and a call
//!    record for assertions in unit tests.
//! 2. **`FixtureStore`**: labels read from and written back to a fixture directory,
//!    so the CLI can be exercised end-to-end without a GitHub instance.
//!
//! # Usage
//!
//! Set the `LABEL_STATE_MOCK_DIR` environment variable to point to a fixture directory:
//!
//! ```bash
//! LABEL_STATE_MOCK_DIR=./fixtures/issue-7 label-state --operation get-all \
//!     --issue-number 7 --repository owner/repo
//! ```
//!
//! # Fixture Structure
//!
//! ```text
//! fixtures/issue-7/
//! ├── labels.json          # Current issue labels (rewritten on replace)
//! ├── failures.json        # Optional injected failures per call
//! ├── deleted_labels.json  # Label definitions deleted so far (written by FixtureStore)
//! └── call_log.jsonl       # Runtime log (written by FixtureStore)
//! ```

mod call_log;
mod failures;
mod fixture;
mod memory;

pub use call_log::{CallKind, CallLogEntry};
pub use failures::{FailureSpec, Failures};
pub use fixture::{FixtureError, FixtureStore};
pub use memory::MemoryStore;

/// Environment variable to enable mock mode
pub const MOCK_DIR_ENV: &str = "LABEL_STATE_MOCK_DIR";

/// Get the mock directory from environment, if set
pub fn get_mock_dir() -> Option<std::path::PathBuf> {
    std::env::var(MOCK_DIR_ENV)
        .ok()
        .map(std::path::PathBuf::from)
}
