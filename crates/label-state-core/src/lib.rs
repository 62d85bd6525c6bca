pub mod codec;
pub mod context;
pub mod error;
pub mod models;
pub mod operations;
pub mod state;
pub mod traits;

pub use codec::{decode, encode, is_state_label, normalize_value};
pub use context::OperationContext;
pub use error::{Result, StateError};
pub use models::*;
pub use operations::{execute, get, get_all, remove, set};
pub use state::{extract_state, State};
pub use traits::LabelStore;
