//! Portal orchestration: wire registry, store, daemon client and the two
//! HTTP apps, then run them until shutdown.

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info};

use crate::authz::AuthorizationStore;
use crate::portal::config::PortalConfig;
use crate::portal::service_handle::ServiceHandle;
use crate::rpc::client::{DaemonClient, RpcCaller};
use crate::rpc::management::AuthorizationManager;
use crate::rpc::proxy::ProxyHandler;
use crate::rpc::server::{management_router, proxy_router, RpcServer};

/// Addresses the listeners actually bound (useful when configured with port 0).
#[derive(Debug, Clone, Copy)]
pub struct BoundAddrs {
    pub proxy: SocketAddr,
    pub auth: SocketAddr,
}

pub struct Portal {
    cfg: PortalConfig,
    upstream: Arc<dyn RpcCaller>,
    store: AuthorizationStore,
}

impl Portal {
    /// Portal talking to the daemon named in `cfg`.
    pub fn new(cfg: PortalConfig) -> Result<Self> {
        let client = DaemonClient::new(cfg.daemon.clone(), cfg.rpc_timeout)?;
        Ok(Self::with_upstream(cfg, Arc::new(client)))
    }

    /// Portal forwarding to any `RpcCaller` instead of an HTTP daemon.
    pub fn with_upstream(cfg: PortalConfig, upstream: Arc<dyn RpcCaller>) -> Self {
        Self { cfg, upstream, store: AuthorizationStore::new() }
    }

    /// Shared store handle; clones stay live after `start`.
    pub fn store(&self) -> &AuthorizationStore {
        &self.store
    }

    /// Bind both listeners, spawn them, and return the handle for graceful shutdown.
    pub async fn start(self) -> Result<(ServiceHandle, BoundAddrs)> {
        let (mut svc, shutdown_rx) = ServiceHandle::new();

        let handler = ProxyHandler::new(Arc::new(self.cfg.registry.clone()), self.store.clone(), self.upstream.clone());
        let proxy = RpcServer::bind("proxy", self.cfg.proxy_addr, proxy_router(Arc::new(handler))).await?;
        let auth = RpcServer::bind(
            "authorization",
            self.cfg.auth_addr,
            management_router(AuthorizationManager::new(self.store.clone())),
        )
        .await?;
        let addrs = BoundAddrs { proxy: proxy.local_addr()?, auth: auth.local_addr()? };

        for (name, server) in [("proxy", proxy), ("authorization", auth)] {
            let rx = shutdown_rx.clone();
            svc.attach(name, tokio::spawn(async move {
                let res = server.serve(rx).await;
                if let Err(e) = &res {
                    error!("{} server failed: {:?}", name, e);
                }
                res
            }));
        }

        info!(
            "Portal started, proxy: {}, authorizations: {}, daemon: {}",
            addrs.proxy,
            addrs.auth,
            self.cfg.daemon.url()
        );
        Ok((svc, addrs))
    }
}
