use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::portal::config::{FileConfig, Overrides, PortalConfig};
use crate::portal::Portal;
use crate::rpc::registry::{MethodPolicy, MethodRegistry};
use crate::utils::init_logging;

/// CLI for the portal.
#[derive(Parser, Debug)]
#[clap(name = "recrypt-portal", version, about = "RECRYPT DApp Server: approval-gated proxy for recryptd RPC")]
pub struct Cli {
    /// Optional TOML configuration file
    #[clap(long, global = true)]
    pub config: Option<PathBuf>,

    #[clap(subcommand)]
    pub cmd: Cmd,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Run the proxy and authorization servers
    Run {
        /// URL of recrypt RPC service, with user & password
        #[clap(long, env = "RECRYPT_RPC", hide_env_values = true)]
        recrypt_rpc: Option<String>,

        /// proxy bind address (host:port)
        #[clap(long)]
        proxy_bind: Option<String>,

        /// authorization API bind address (host:port)
        #[clap(long)]
        auth_bind: Option<String>,
    },
    /// Print the effective method table and exit
    Methods,
}

fn load_file(path: Option<&PathBuf>) -> Result<FileConfig> {
    match path {
        Some(p) => FileConfig::load(p),
        None => Ok(FileConfig::default()),
    }
}

pub async fn run_cli() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    let file = load_file(cli.config.as_ref())?;

    match cli.cmd {
        Cmd::Methods => {
            let registry = match file.methods {
                Some(m) => MethodRegistry::new(m.direct, m.gated)?,
                None => MethodRegistry::default(),
            };
            for (method, policy) in registry.entries() {
                let label = match policy {
                    MethodPolicy::Direct => "direct",
                    MethodPolicy::Gated => "gated",
                    MethodPolicy::Unknown => continue,
                };
                println!("{method:<24} {label}");
            }
            Ok(())
        }
        Cmd::Run { recrypt_rpc, proxy_bind, auth_bind } => {
            let cfg = PortalConfig::resolve(file, Overrides { rpc_url: recrypt_rpc, proxy_bind, auth_bind })?;
            let (svc, _addrs) = Portal::new(cfg)?.start().await?;
            // Wait for Ctrl+C
            tokio::signal::ctrl_c().await?;
            tracing::info!("Shutting down portal...");
            svc.shutdown().await?;
            tracing::info!("Portal stopped");
            Ok(())
        }
    }
}
