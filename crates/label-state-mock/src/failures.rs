use label_state_core::StateError;
use serde::{Deserialize, Serialize};

/// An injected API failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureSpec {
    /// HTTP status code to simulate (default: 500)
    #[serde(default = "default_status")]
    pub status: u16,
    pub message: String,
}

fn default_status() -> u16 {
    500
}

impl FailureSpec {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn to_error(&self) -> StateError {
        if self.status == 401 {
            return StateError::Unauthorized(self.message.clone());
        }
        StateError::Api {
            status: self.status,
            message: self.message.clone(),
        }
    }
}

/// Per-method failure injection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failures {
    #[serde(default)]
    pub list: Option<FailureSpec>,
    #[serde(default)]
    pub replace: Option<FailureSpec>,
    #[serde(default)]
    pub delete: Option<FailureSpec>,
}
