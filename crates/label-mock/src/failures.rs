//! Failure injection rules
//!
//! `failures.toml` lists store calls that should fail instead of touching
//! the fixture state.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// All failure rules of a scenario
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Failures {
    #[serde(default)]
    pub failures: Vec<FailureRule>,
}

/// Makes matching calls fail with the given status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureRule {
    /// LabelStore method name (e.g., "create_label", "update_label")
    pub method: String,

    /// Label name to match, case-insensitive. `"*"` or absent matches any label.
    #[serde(default)]
    pub label: Option<String>,

    /// HTTP status code to simulate (default: 500)
    #[serde(default = "default_status")]
    pub status: u16,

    #[serde(default)]
    pub message: Option<String>,
}

fn default_status() -> u16 {
    500
}

impl FailureRule {
    pub fn matches(&self, method: &str, label: &str) -> bool {
        if self.method != method && self.method != "*" {
            return false;
        }
        match self.label.as_deref() {
            None | Some("*") => true,
            Some(expected) => expected.trim().eq_ignore_ascii_case(label.trim()),
        }
    }

    pub fn message(&self) -> String {
        self.message
            .clone()
            .unwrap_or_else(|| format!("HTTP {}", self.status))
    }
}

impl Failures {
    /// Load rules from a TOML file
    pub fn load(path: &Path) -> Result<Self, MockError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| MockError::Io(path.to_path_buf(), e))?;

        toml::from_str(&content).map_err(|e| MockError::Parse(path.to_path_buf(), e.to_string()))
    }

    /// First rule matching the call, if any
    pub fn find(&self, method: &str, label: &str) -> Option<&FailureRule> {
        self.failures.iter().find(|rule| rule.matches(method, label))
    }
}

/// Errors that can occur when loading a scenario
#[derive(Debug, thiserror::Error)]
pub enum MockError {
    #[error("Failed to read {0}: {1}")]
    Io(PathBuf, std::io::Error),

    #[error("Failed to parse {0}: {1}")]
    Parse(PathBuf, String),

    #[error("Invalid fixture label in {0}: {1}")]
    InvalidLabel(PathBuf, label_core::ValidationError),
}
