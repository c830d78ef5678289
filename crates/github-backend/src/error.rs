use label_core::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GitHubError {
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

    #[error("Rate limited")]
    RateLimited,

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
}

pub type Result<T> = std::result::Result<T, GitHubError>;

impl From<GitHubError> for StoreError {
    fn from(err: GitHubError) -> Self {
        match err {
            GitHubError::Http(e) => StoreError::Http(e.to_string()),
            GitHubError::Parse(e) => StoreError::Parse(e.to_string()),
            GitHubError::Io(e) => StoreError::Io(e.to_string()),
            GitHubError::LabelNotFound(name) => StoreError::NotFound(name),
            GitHubError::Unauthorized => StoreError::Unauthorized,
            GitHubError::RateLimited => StoreError::RateLimited,
            GitHubError::Api { status, message } => StoreError::Api { status, message },
        }
    }
}
