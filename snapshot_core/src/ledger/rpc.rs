use log::debug;
use reqwest::Client;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use super::dto::{RpcRequest, RpcResponse};
use crate::error::{LedgerError, LedgerResult};

/// Minimal Ethereum JSON-RPC 2.0 transport over HTTP.
#[derive(Debug)]
pub struct RpcClient {
    client: Client,
    url: String,
    next_id: AtomicU64,
}

impl RpcClient {
    pub fn new(url: &str, timeout: Duration) -> LedgerResult<Self> {
        let client = Client::builder()
            .user_agent("snapshot-validator/0.1")
            .timeout(timeout)
            .build()
            .map_err(|e| {
                LedgerError::Unavailable(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            url: url.to_string(),
            next_id: AtomicU64::new(1),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Send one request and return its `result`.
    pub async fn call(&self, method: &str, params: Value) -> LedgerResult<Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = RpcRequest {
            jsonrpc: "2.0",
            id,
            method,
            params,
        };

        debug!("rpc #{} {} -> {}", id, method, self.url);

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(LedgerError::Query(format!(
                "{} returned HTTP {}: {}",
                method, status, error_text
            )));
        }

        let body: RpcResponse = response
            .json()
            .await
            .map_err(|e| LedgerError::Query(format!("Invalid {} response: {}", method, e)))?;

        if let Some(error) = body.error {
            return Err(LedgerError::Query(format!(
                "{} failed ({}): {}",
                method, error.code, error.message
            )));
        }

        body.result
            .ok_or_else(|| LedgerError::Query(format!("{} returned no result", method)))
    }

    /// `net_listening`; any failure counts as not listening.
    pub async fn is_listening(&self) -> bool {
        match self.call("net_listening", json!([])).await {
            Ok(Value::Bool(listening)) => listening,
            Ok(other) => {
                debug!("net_listening returned unexpected value: {}", other);
                false
            }
            Err(e) => {
                debug!("net_listening failed on {}: {}", self.url, e);
                false
            }
        }
    }

    pub async fn net_version(&self) -> LedgerResult<String> {
        match self.call("net_version", json!([])).await? {
            Value::String(version) => Ok(version),
            Value::Number(version) => Ok(version.to_string()),
            other => Err(LedgerError::Query(format!(
                "net_version returned unexpected value: {}",
                other
            ))),
        }
    }
}

// A refused or dropped connection means the node is gone; everything else is scoped to the request.
fn classify_transport_error(err: reqwest::Error) -> LedgerError {
    if err.is_connect() {
        LedgerError::Unavailable(err.to_string())
    } else if err.is_timeout() {
        LedgerError::Query(format!("request timed out: {}", err))
    } else {
        LedgerError::Query(err.to_string())
    }
}
