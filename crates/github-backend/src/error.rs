use label_state_core::StateError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GitHubError {
    #[error("HTTP error: {0}")]
    Http(#[from] ureq::Error),

    #[error("Label not found: {0}")]
    LabelNotFound(String),

    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
}

pub type Result<T> = std::result::Result<T, GitHubError>;

impl From<GitHubError> for StateError {
    fn from(err: GitHubError) -> Self {
        match err {
            GitHubError::Http(e) => StateError::Http(e.to_string()),
            GitHubError::LabelNotFound(name) => StateError::NotFound(name),
            GitHubError::Unauthorized(message) => StateError::Unauthorized(message),
            GitHubError::RateLimited(message) => StateError::Api {
                status: 403,
                message,
            },
            GitHubError::Api { status, message } => StateError::Api { status, message },
        }
    }
}
