//! In-process stand-in for the daemon, used by unit tests.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};

use crate::rpc::client::{RpcCaller, UpstreamError};

#[derive(Default)]
pub struct RecordingCaller {
    calls: Mutex<Vec<(String, Value)>>,
    failure: Mutex<Option<(i64, String)>>,
}

impl RecordingCaller {
    /// Every later call answers with this daemon error.
    pub fn fail_with(&self, code: i64, message: &str) {
        *self.failure.lock() = Some((code, message.to_string()));
    }

    pub fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl RpcCaller for RecordingCaller {
    async fn call(&self, method: &str, params: &Value) -> Result<Value, UpstreamError> {
        self.calls.lock().push((method.to_string(), params.clone()));
        if let Some((code, message)) = self.failure.lock().clone() {
            return Err(UpstreamError::Rpc { code, message });
        }
        Ok(json!({ "method": method, "params": params }))
    }
}
