//! Proxy handler: the interception protocol in front of the daemon.
//!
//! | method policy | `auth`  | outcome                                        |
//! |---------------|---------|------------------------------------------------|
//! | unknown       | any     | `MethodUnknown`, daemon untouched              |
//! | direct        | ignored | forwarded                                      |
//! | gated         | absent  | new pending authorization, `ApprovalRequired`  |
//! | gated         | present | consumed then forwarded, or `AuthorizationInvalid` |
//!
//! A request touches the daemon at most once.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::authz::AuthorizationStore;
use crate::rpc::client::RpcCaller;
use crate::rpc::registry::{MethodPolicy, MethodRegistry};
use crate::utils::errors::{PortalError, Result};
use crate::utils::metrics::{self, METRICS};

/// Inbound request body: `{method, params?, auth?}`. Other fields such as
/// `id` or `jsonrpc` are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProxyRequest {
    pub method: String,
    #[serde(default)]
    pub params: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<String>,
}

impl ProxyRequest {
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        serde_json::from_slice(body).map_err(|e| {
            METRICS.inc_counter(metrics::PROXY_BAD_REQUEST);
            PortalError::BadRequest(e.to_string())
        })
    }

    /// The attached token; an empty string counts as no token.
    fn token(&self) -> Option<&str> {
        self.auth.as_deref().filter(|t| !t.is_empty())
    }
}

pub struct ProxyHandler {
    registry: Arc<MethodRegistry>,
    store: AuthorizationStore,
    upstream: Arc<dyn RpcCaller>,
}

impl ProxyHandler {
    pub fn new(registry: Arc<MethodRegistry>, store: AuthorizationStore, upstream: Arc<dyn RpcCaller>) -> Self {
        Self { registry, store, upstream }
    }

    /// Run one request through the protocol and return the daemon's result.
    pub async fn handle(&self, req: ProxyRequest) -> Result<Value> {
        match self.registry.classify(&req.method) {
            MethodPolicy::Unknown => {
                METRICS.inc_counter(metrics::PROXY_UNKNOWN);
                warn!(method = %req.method, "rejecting unknown method");
                Err(PortalError::MethodUnknown(req.method))
            }
            MethodPolicy::Direct => {
                METRICS.inc_counter(metrics::PROXY_DIRECT);
                self.forward(&req).await
            }
            MethodPolicy::Gated => match req.token().map(str::to_string) {
                None => {
                    let auth = self.store.create(&req.method, req.params);
                    METRICS.inc_counter(metrics::PROXY_GATED_CREATED);
                    METRICS.set_gauge(metrics::AUTHORIZATIONS_STORED, self.store.len() as f64);
                    info!(id = %auth.id, method = %auth.method, "approval required");
                    Err(PortalError::ApprovalRequired(auth))
                }
                Some(token) => {
                    let auth = self.store.consume(&token, &req.method).map_err(|e| {
                        METRICS.inc_counter(metrics::PROXY_FORBIDDEN);
                        warn!(method = %req.method, error = %e, "authorization refused");
                        PortalError::AuthorizationInvalid(e)
                    })?;
                    METRICS.inc_counter(metrics::PROXY_CONSUMED);
                    info!(id = %auth.id, method = %auth.method, "authorization consumed");
                    self.forward(&req).await
                }
            },
        }
    }

    async fn forward(&self, req: &ProxyRequest) -> Result<Value> {
        self.upstream.call(&req.method, &req.params).await.map_err(|e| {
            METRICS.inc_counter(metrics::UPSTREAM_ERROR);
            warn!(method = %req.method, error = %e, "daemon call failed");
            PortalError::Upstream(e)
        })
    }
}
