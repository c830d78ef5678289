use label_core::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GitLabError {
    #[error("HTTP error: {0}")]
    Http(#[from] ureq::Error),

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Label not found: {0}")]
    LabelNotFound(String),

    #[error("Authentication failed")]
    Unauthorized,

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
}

pub type Result<T> = std::result::Result<T, GitLabError>;

impl From<GitLabError> for StoreError {
    fn from(err: GitLabError) -> Self {
        match err {
            GitLabError::Http(e) => StoreError::Http(e.to_string()),
            GitLabError::Parse(e) => StoreError::Parse(e.to_string()),
            GitLabError::Io(e) => StoreError::Io(e.to_string()),
            GitLabError::LabelNotFound(name) => StoreError::NotFound(name),
            GitLabError::Unauthorized => StoreError::Unauthorized,
            GitLabError::Api { status: 429, .. } => StoreError::RateLimited,
            GitLabError::Api { status, message } => StoreError::Api { status, message },
        }
    }
}
