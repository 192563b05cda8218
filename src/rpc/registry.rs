//! Method registry: which daemon methods pass straight through and which need
//! an operator's approval first. Anything not listed is refused.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MethodPolicy {
    Unknown,
    Direct,
    Gated,
}

/// Read-only wallet and chain queries.
pub const DEFAULT_DIRECT: &[&str] = &[
    "getinfo",
    "getblockchaininfo",
    "getnetworkinfo",
    "getwalletinfo",
    "getblockcount",
    "getbestblockhash",
    "getblockhash",
    "getblock",
    "getbalance",
    "getrawtransaction",
    "gettransaction",
    "listunspent",
    "listtransactions",
    "validateaddress",
    "estimatefee",
    "callcontract",
];

/// Calls that create keys, move funds, or expose secrets.
pub const DEFAULT_GATED: &[&str] = &[
    "getnewaddress",
    "sendtoaddress",
    "sendmany",
    "sendtocontract",
    "createcontract",
    "dumpprivkey",
    "walletpassphrase",
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("method {0} is listed as both direct and gated")]
    Conflict(String),
}

#[derive(Debug, Clone)]
pub struct MethodRegistry {
    methods: BTreeMap<String, MethodPolicy>,
}

impl MethodRegistry {
    pub fn new<D, G>(direct: D, gated: G) -> Result<Self, RegistryError>
    where
        D: IntoIterator,
        D::Item: Into<String>,
        G: IntoIterator,
        G::Item: Into<String>,
    {
        let mut methods: BTreeMap<String, MethodPolicy> =
            direct.into_iter().map(|m| (m.into(), MethodPolicy::Direct)).collect();
        for m in gated {
            let m = m.into();
            if methods.get(&m) == Some(&MethodPolicy::Direct) {
                return Err(RegistryError::Conflict(m));
            }
            methods.insert(m, MethodPolicy::Gated);
        }
        Ok(Self { methods })
    }

    pub fn classify(&self, method: &str) -> MethodPolicy {
        self.methods.get(method).copied().unwrap_or(MethodPolicy::Unknown)
    }

    /// (method, policy) pairs sorted by method name
    pub fn entries(&self) -> impl Iterator<Item = (&str, MethodPolicy)> {
        self.methods.iter().map(|(m, p)| (m.as_str(), *p))
    }
}

impl Default for MethodRegistry {
    fn default() -> Self {
        let methods = DEFAULT_DIRECT
            .iter()
            .map(|m| (m.to_string(), MethodPolicy::Direct))
            .chain(DEFAULT_GATED.iter().map(|m| (m.to_string(), MethodPolicy::Gated)))
            .collect();
        Self { methods }
    }
}
