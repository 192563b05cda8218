use tracing::info;

use crate::authz::{Authorization, AuthorizationStore};
use crate::utils::errors::{PortalError, Result};
use crate::utils::metrics::{self, METRICS};

/// Operator-facing view of the authorization store: review and decide.
#[derive(Clone)]
pub struct AuthorizationManager {
    store: AuthorizationStore,
}

impl AuthorizationManager {
    pub fn new(store: AuthorizationStore) -> Self {
        Self { store }
    }

    /// All records, creation order
    pub fn list(&self) -> Vec<Authorization> {
        self.store.list()
    }

    pub fn stored(&self) -> usize {
        self.store.len()
    }

    pub fn get(&self, id: &str) -> Result<Authorization> {
        self.store
            .get(id)
            .ok_or_else(|| PortalError::AuthorizationNotFound(id.to_string()))
    }

    pub fn accept(&self, id: &str) -> Result<Authorization> {
        let auth = self.store.accept(id)?;
        METRICS.inc_counter(metrics::AUTHORIZATIONS_ACCEPTED);
        info!(id = %auth.id, method = %auth.method, "authorization accepted");
        Ok(auth)
    }

    pub fn reject(&self, id: &str) -> Result<Authorization> {
        let auth = self.store.reject(id)?;
        METRICS.inc_counter(metrics::AUTHORIZATIONS_REJECTED);
        info!(id = %auth.id, method = %auth.method, "authorization rejected");
        Ok(auth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authz::AuthorizationState;
    use serde_json::Value;

    #[test]
    fn test_decisions() {
        let store = AuthorizationStore::new();
        let mgr = AuthorizationManager::new(store.clone());
        let a = store.create("getnewaddress", Value::Null);
        let b = store.create("sendtoaddress", Value::Null);

        assert_eq!(mgr.accept(&a.id).unwrap().state, AuthorizationState::Accepted);
        assert_eq!(mgr.reject(&b.id).unwrap().state, AuthorizationState::Rejected);

        assert!(matches!(mgr.accept(&a.id), Err(PortalError::InvalidTransition(_))));
        assert!(matches!(mgr.accept(&b.id), Err(PortalError::InvalidTransition(_))));
        assert!(matches!(mgr.reject("missing"), Err(PortalError::AuthorizationNotFound(_))));
        assert!(matches!(mgr.get("missing"), Err(PortalError::AuthorizationNotFound(_))));

        let states: Vec<_> = mgr.list().into_iter().map(|a| a.state).collect();
        assert_eq!(states, vec![AuthorizationState::Accepted, AuthorizationState::Rejected]);
    }
}
