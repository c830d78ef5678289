//! Fixture-backed label store for labelsync
//!
//! Serves labels from a scenario directory instead of a real repository.
//! Mutations are applied to the in-memory state and written back to the
//! fixture, so a second run observes the first run's changes. It is used for:
//!
//! 1. **Integration Testing**: drive the CLI without a GitHub or GitLab instance
//! 2. **Failure Injection**: make chosen calls fail to exercise partial-failure handling
//! 3. **Offline Previews**: try a label file against a snapshot of remote labels
//!
//! # Usage
//!
//! Set the `LABELSYNC_MOCK_DIR` environment variable to point to a scenario directory:
//!
//! ```bash
//! LABELSYNC_MOCK_DIR=./fixtures/basic labelsync sync --file labels.yml
//! ```
//!
//! # Scenario Structure
//!
//! ```text
//! scenarios/basic/
//! ├── remote.json        # Current remote labels: [{"name", "color", "description"}]
//! ├── failures.toml      # Optional: calls that should fail
//! └── call_log.jsonl     # Runtime log (written by MockLabelStore)
//! ```

mod failures;
mod store;

pub use failures::{FailureRule, Failures, MockError};
pub use store::{CallLogEntry, FixtureLabel, MockLabelStore};

/// Environment variable to enable mock mode
pub const MOCK_DIR_ENV: &str = "LABELSYNC_MOCK_DIR";

/// Get the mock directory from environment, if set
pub fn get_mock_dir() -> Option<std::path::PathBuf> {
    std::env::var(MOCK_DIR_ENV)
        .ok()
        .map(std::path::PathBuf::from)
}
