//! Authorization records, their state machine, and the shared store.

pub mod types;
pub mod store;

pub use store::AuthorizationStore;
pub use types::{Authorization, AuthorizationError, AuthorizationId, AuthorizationState};
