use std::path::PathBuf;

use thiserror::Error;

use crate::reconcile::SyncOperation;

/// A label field or label file that failed validation.
///
/// Raised before any remote call is made, so it is always safe to abort on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid label name {name:?}: {reason}")]
    InvalidName { name: String, reason: String },

    #[error("Invalid label color {color:?}: expected 6 hex digits, optionally prefixed with '#'")]
    InvalidColor { color: String },

    #[error("Label {0:?} is defined more than once")]
    DuplicateLabel(String),

    #[error("Label {0:?} is listed under delete but is also a configured label or alias")]
    AmbiguousDelete(String),

    #[error("Alias {alias:?} of label {label:?} is the name of another configured label")]
    AliasConflict { label: String, alias: String },
}

/// Failure to obtain a label file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Label file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read label file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported label file format: {0} (expected .yml, .yaml, .json or .toml)")]
    UnsupportedFormat(PathBuf),

    #[error("Label file does not match the expected schema: {0}")]
    Schema(String),

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

impl ConfigError {
    /// Whether the caller should point the user at the usage help.
    pub fn show_help(&self) -> bool {
        matches!(self, ConfigError::NotFound(_) | ConfigError::UnsupportedFormat(_))
    }
}

/// Errors reported by a label store
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Authentication failed")]
    Unauthorized,

    #[error("Label not found: {0}")]
    NotFound(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Label listing exceeds {pages} pages; raise LABELSYNC_MAX_PAGES to read it all")]
    Truncated { pages: usize },
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StoreError::NotFound(_) | StoreError::Api { status: 404, .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// A single remote call that failed during execution.
#[derive(Error, Debug, Clone)]
#[error("{} failed: {cause}", operation.describe())]
pub struct OperationFailed {
    pub operation: SyncOperation,
    #[source]
    pub cause: StoreError,
}
