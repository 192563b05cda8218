//! In-memory authorization store.
//!
//! One `parking_lot::Mutex` guards both the id -> record map and the creation
//! order, so every mutation and every `list()` snapshot is atomic. Nothing is
//! awaited while the lock is held.
//!
//! The store is a cheap `Clone` handle over shared state; hand it to each
//! handler that needs it instead of reaching for a global.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use rand::RngCore;
use serde_json::Value;

use crate::authz::types::{Authorization, AuthorizationError, AuthorizationId, AuthorizationState};

const ID_BYTES: usize = 16;

#[derive(Debug, Default)]
struct Inner {
    records: HashMap<AuthorizationId, Authorization>,
    // creation order; ids are never removed
    order: Vec<AuthorizationId>,
}

#[derive(Debug, Default, Clone)]
pub struct AuthorizationStore {
    inner: Arc<Mutex<Inner>>,
}

impl AuthorizationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new pending authorization for `method` with the caller's `params`.
    pub fn create(&self, method: &str, params: Value) -> Authorization {
        let mut inner = self.inner.lock();
        let id = loop {
            let candidate = new_id();
            // records are never deleted, so this also rules out reuse of spent ids
            if !inner.records.contains_key(&candidate) {
                break candidate;
            }
        };
        let auth = Authorization::new(id.clone(), method.to_string(), params);
        inner.records.insert(id.clone(), auth.clone());
        inner.order.push(id);
        auth
    }

    pub fn get(&self, id: &str) -> Option<Authorization> {
        self.inner.lock().records.get(id).cloned()
    }

    /// Every record, any state, in creation order.
    pub fn list(&self) -> Vec<Authorization> {
        let inner = self.inner.lock();
        let snapshot: Vec<Authorization> = inner
            .order
            .iter()
            .filter_map(|id| inner.records.get(id).cloned())
            .collect();
        snapshot
    }

    pub fn len(&self) -> usize {
        self.inner.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `Pending -> Accepted`
    pub fn accept(&self, id: &str) -> Result<Authorization, AuthorizationError> {
        self.transition(id, AuthorizationState::Accepted)
    }

    /// `Pending -> Rejected`
    pub fn reject(&self, id: &str) -> Result<Authorization, AuthorizationError> {
        self.transition(id, AuthorizationState::Rejected)
    }

    /// Spend an accepted authorization on `method`.
    ///
    /// Existence, state and method are checked and the record moved to
    /// `Consumed` under one lock acquisition, so for any id at most one caller
    /// ever gets `Ok`. On error nothing changes.
    pub fn consume(&self, id: &str, method: &str) -> Result<Authorization, AuthorizationError> {
        let mut inner = self.inner.lock();
        let auth = inner
            .records
            .get_mut(id)
            .ok_or_else(|| AuthorizationError::NotFound(id.to_string()))?;
        if auth.state != AuthorizationState::Accepted {
            return Err(AuthorizationError::InvalidTransition {
                id: auth.id.clone(),
                from: auth.state,
                to: AuthorizationState::Consumed,
            });
        }
        if auth.method != method {
            return Err(AuthorizationError::MethodMismatch {
                id: auth.id.clone(),
                expected: auth.method.clone(),
                actual: method.to_string(),
            });
        }
        auth.transition(AuthorizationState::Consumed)?;
        Ok(auth.clone())
    }

    fn transition(&self, id: &str, next: AuthorizationState) -> Result<Authorization, AuthorizationError> {
        let mut inner = self.inner.lock();
        let auth = inner
            .records
            .get_mut(id)
            .ok_or_else(|| AuthorizationError::NotFound(id.to_string()))?;
        auth.transition(next)?;
        Ok(auth.clone())
    }
}

fn new_id() -> AuthorizationId {
    let mut buf = [0u8; ID_BYTES];
    rand::thread_rng().fill_bytes(&mut buf);
    hex::encode(buf)
}
