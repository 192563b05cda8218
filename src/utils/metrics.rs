use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::sync::Arc;

use lazy_static::lazy_static;
use parking_lot::Mutex;

pub const PROXY_DIRECT: &str = "proxy_direct_total";
pub const PROXY_GATED_CREATED: &str = "proxy_gated_created_total";
pub const PROXY_CONSUMED: &str = "proxy_consumed_total";
pub const PROXY_FORBIDDEN: &str = "proxy_forbidden_total";
pub const PROXY_UNKNOWN: &str = "proxy_unknown_total";
pub const PROXY_BAD_REQUEST: &str = "proxy_bad_request_total";
pub const UPSTREAM_ERROR: &str = "upstream_error_total";
pub const AUTHORIZATIONS_ACCEPTED: &str = "authorizations_accepted_total";
pub const AUTHORIZATIONS_REJECTED: &str = "authorizations_rejected_total";
pub const AUTHORIZATIONS_STORED: &str = "authorizations_stored";

/// Metrics registry (simple, Prometheus-style)
#[derive(Clone, Default)]
pub struct MetricsRegistry {
    counters: Arc<Mutex<BTreeMap<String, u64>>>,
    gauges: Arc<Mutex<BTreeMap<String, f64>>>,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inc_counter(&self, name: &str) {
        *self.counters.lock().entry(name.to_string()).or_insert(0) += 1;
    }

    pub fn counter(&self, name: &str) -> u64 {
        self.counters.lock().get(name).copied().unwrap_or(0)
    }

    pub fn set_gauge(&self, name: &str, val: f64) {
        self.gauges.lock().insert(name.to_string(), val);
    }

    pub fn snapshot(&self) -> (BTreeMap<String, u64>, BTreeMap<String, f64>) {
        (self.counters.lock().clone(), self.gauges.lock().clone())
    }

    /// Text exposition, one `name value` line per series, sorted by name.
    pub fn render(&self) -> String {
        let (counters, gauges) = self.snapshot();
        let mut out = String::new();
        for (name, v) in counters {
            let _ = writeln!(out, "# TYPE {name} counter\n{name} {v}");
        }
        for (name, v) in gauges {
            let _ = writeln!(out, "# TYPE {name} gauge\n{name} {v}");
        }
        out
    }
}

lazy_static! {
    pub static ref METRICS: MetricsRegistry = MetricsRegistry::new();
}
