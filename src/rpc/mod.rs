//! RPC surface of the portal
//!
//! - proxy app: `POST /` intercepts JSON-RPC calls bound for the daemon
//! - management app: `/authorizations` lets an operator review and decide
//! - upstream client: JSON-RPC over HTTP basic auth to the daemon
//!
//! To integrate: build a `ProxyHandler` over a `MethodRegistry`, a shared
//! `AuthorizationStore` and any `RpcCaller`, then hand it to `proxy_router`.

pub mod client;
pub mod registry;
pub mod proxy;
pub mod management;
pub mod server;

#[cfg(test)]
pub(crate) mod fake;

pub use client::{DaemonClient, DaemonEndpoint, RpcCaller, UpstreamError};
pub use management::AuthorizationManager;
pub use proxy::{ProxyHandler, ProxyRequest};
pub use registry::{MethodPolicy, MethodRegistry};
pub use server::{management_router, proxy_router, RpcServer};
