pub mod client;
pub mod error;
pub mod models;
mod trait_impl;


pub use client::GitHubClient;
pub use error::{GitHubError, Result};
pub use models::*;

// Re-export core types for convenience
pub use label_state_core::{LabelStore, StateError};
