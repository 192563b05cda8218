use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use crate::rpc::client::DaemonEndpoint;
use crate::rpc::registry::MethodRegistry;

pub const DEFAULT_PROXY_BIND: &str = "127.0.0.1:9999";
pub const DEFAULT_AUTH_BIND: &str = "127.0.0.1:9899";
pub const DEFAULT_RPC_TIMEOUT_SECS: u64 = 30;

/// Optional TOML configuration file. Every key may be omitted.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub rpc_url: Option<String>,
    pub proxy_bind: Option<String>,
    pub auth_bind: Option<String>,
    pub rpc_timeout_secs: Option<u64>,
    /// Replaces the built-in method table as a whole when present.
    pub methods: Option<MethodsConfig>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct MethodsConfig {
    #[serde(default)]
    pub direct: Vec<String>,
    #[serde(default)]
    pub gated: Vec<String>,
}

impl FileConfig {
    /// Load config from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
        let cfg: FileConfig = toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
        Ok(cfg)
    }
}

/// Values given on the command line (or via environment); they win over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub rpc_url: Option<String>,
    pub proxy_bind: Option<String>,
    pub auth_bind: Option<String>,
}

/// Fully resolved settings the portal starts with.
#[derive(Debug, Clone)]
pub struct PortalConfig {
    pub daemon: DaemonEndpoint,
    pub proxy_addr: SocketAddr,
    pub auth_addr: SocketAddr,
    pub rpc_timeout: Duration,
    pub registry: MethodRegistry,
}

impl PortalConfig {
    /// Merge file and overrides. Any error here is fatal at startup.
    pub fn resolve(file: FileConfig, overrides: Overrides) -> Result<Self> {
        let rpc_url = overrides
            .rpc_url
            .filter(|u| !u.is_empty())
            .or(file.rpc_url)
            .ok_or_else(|| anyhow!("Please set RECRYPT_RPC to recryptd's RPC URL"))?;
        let daemon = DaemonEndpoint::parse(&rpc_url).context("RECRYPT_RPC")?;

        let proxy_addr = parse_addr(overrides.proxy_bind.or(file.proxy_bind), DEFAULT_PROXY_BIND, "proxy bind")?;
        let auth_addr = parse_addr(overrides.auth_bind.or(file.auth_bind), DEFAULT_AUTH_BIND, "auth bind")?;

        let registry = match file.methods {
            Some(m) => MethodRegistry::new(m.direct, m.gated).context("method table")?,
            None => MethodRegistry::default(),
        };

        Ok(Self {
            daemon,
            proxy_addr,
            auth_addr,
            rpc_timeout: Duration::from_secs(file.rpc_timeout_secs.unwrap_or(DEFAULT_RPC_TIMEOUT_SECS)),
            registry,
        })
    }
}

fn parse_addr(value: Option<String>, default: &str, what: &str) -> Result<SocketAddr> {
    let raw = value.unwrap_or_else(|| default.to_string());
    raw.parse().with_context(|| format!("invalid {what} address: {raw}"))
}
