//! Authorization record and its state machine.
//!
//! Legal edges:
//! - `Pending -> Accepted` (operator approval)
//! - `Pending -> Rejected` (operator refusal)
//! - `Accepted -> Consumed` (the one permitted execution through the proxy)
//!
//! `Rejected` and `Consumed` are terminal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Authorization identifier (lowercase hex of 16 random bytes)
pub type AuthorizationId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthorizationState {
    Pending,
    Accepted,
    Rejected,
    Consumed,
}

impl AuthorizationState {
    /// Whether `self -> next` is an edge of the state machine.
    pub fn can_transition_to(self, next: AuthorizationState) -> bool {
        use AuthorizationState::*;
        matches!(
            (self, next),
            (Pending, Accepted) | (Pending, Rejected) | (Accepted, Consumed)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, AuthorizationState::Rejected | AuthorizationState::Consumed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AuthorizationState::Pending => "pending",
            AuthorizationState::Accepted => "accepted",
            AuthorizationState::Rejected => "rejected",
            AuthorizationState::Consumed => "consumed",
        }
    }
}

impl fmt::Display for AuthorizationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single-use grant to execute one gated RPC method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Authorization {
    pub id: AuthorizationId,
    pub method: String,
    /// params of the call that requested approval, kept for the operator's review
    pub params: Value,
    pub state: AuthorizationState,
    pub created_at: DateTime<Utc>,
    /// time of the latest state transition; `None` while pending
    pub updated_at: Option<DateTime<Utc>>,
}

impl Authorization {
    pub fn new(id: AuthorizationId, method: String, params: Value) -> Self {
        Self {
            id,
            method,
            params,
            state: AuthorizationState::Pending,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    /// Move to `next` if the edge is legal. Leaves the record untouched otherwise.
    pub(crate) fn transition(&mut self, next: AuthorizationState) -> Result<(), AuthorizationError> {
        if !self.state.can_transition_to(next) {
            return Err(AuthorizationError::InvalidTransition {
                id: self.id.clone(),
                from: self.state,
                to: next,
            });
        }
        self.state = next;
        self.updated_at = Some(Utc::now());
        Ok(())
    }
}

/// Failures reported by the authorization store. None of these are fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthorizationError {
    #[error("authorization {0} not found")]
    NotFound(AuthorizationId),

    #[error("authorization {id} cannot move from {from} to {to}")]
    InvalidTransition {
        id: AuthorizationId,
        from: AuthorizationState,
        to: AuthorizationState,
    },

    #[error("authorization {id} was granted for {expected}, not {actual}")]
    MethodMismatch {
        id: AuthorizationId,
        expected: String,
        actual: String,
    },
}
