use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    body::Bytes,
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;
use tokio::sync::watch;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::authz::Authorization;
use crate::rpc::management::AuthorizationManager;
use crate::rpc::proxy::{ProxyHandler, ProxyRequest};
use crate::utils::errors::Result;
use crate::utils::metrics::{self, METRICS};

/// Proxy app: `POST /` plus `GET /health`.
pub fn proxy_router(handler: Arc<ProxyHandler>) -> Router {
    Router::new()
        .route("/", post(proxy_endpoint))
        .route("/health", get(health))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(handler)
}

/// Authorization management app: list, get, accept, reject, plus diagnostics.
pub fn management_router(manager: AuthorizationManager) -> Router {
    Router::new()
        .route("/authorizations", get(list_authorizations))
        .route("/authorizations/:id", get(get_authorization))
        .route("/authorizations/:id/accept", post(accept_authorization))
        .route("/authorizations/:id/reject", post(reject_authorization))
        .route("/health", get(health))
        .route("/metrics", get(metrics_handler))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(manager)
}

/// The body is taken raw so malformed JSON maps to our own 400 instead of the
/// extractor's rejection.
async fn proxy_endpoint(State(handler): State<Arc<ProxyHandler>>, body: Bytes) -> Result<Json<Value>> {
    let req = ProxyRequest::from_slice(&body)?;
    let result = handler.handle(req).await?;
    Ok(Json(result))
}

async fn list_authorizations(State(mgr): State<AuthorizationManager>) -> Json<Vec<Authorization>> {
    Json(mgr.list())
}

async fn get_authorization(State(mgr): State<AuthorizationManager>, Path(id): Path<String>) -> Result<Json<Authorization>> {
    Ok(Json(mgr.get(&id)?))
}

async fn accept_authorization(State(mgr): State<AuthorizationManager>, Path(id): Path<String>) -> Result<Json<Authorization>> {
    Ok(Json(mgr.accept(&id)?))
}

async fn reject_authorization(State(mgr): State<AuthorizationManager>, Path(id): Path<String>) -> Result<Json<Authorization>> {
    Ok(Json(mgr.reject(&id)?))
}

async fn health() -> &'static str {
    "ok"
}

async fn metrics_handler(State(mgr): State<AuthorizationManager>) -> String {
    METRICS.set_gauge(metrics::AUTHORIZATIONS_STORED, mgr.stored() as f64);
    METRICS.render()
}

/// One bound HTTP listener and the router it serves.
pub struct RpcServer {
    name: &'static str,
    listener: tokio::net::TcpListener,
    router: Router,
}

impl RpcServer {
    /// Bind now so address problems surface at startup rather than inside a task.
    pub async fn bind(name: &'static str, addr: SocketAddr, router: Router) -> anyhow::Result<Self> {
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("bind {name} server on {addr}"))?;
        Ok(Self { name, listener, router })
    }

    pub fn local_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Serve until `shutdown` flips to `true` and in-flight requests have drained.
    pub async fn serve(self, mut shutdown: watch::Receiver<bool>) -> anyhow::Result<()> {
        info!("Starting {} server on {}", self.name, self.local_addr()?);
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.wait_for(|stop| *stop).await;
            })
            .await?;
        info!("{} server stopped", self.name);
        Ok(())
    }
}
