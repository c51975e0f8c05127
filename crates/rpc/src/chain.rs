//! Chain access over JSON-RPC

use crate::errors::{Result, RpcError};
use crate::extrinsic::SignedExtrinsic;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Read/write access to one network, bound to the node it was dialed on.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Look up one entry of a named storage map. `Ok(None)` when the entry
    /// is absent.
    async fn query_map(&self, module: &str, item: &str, key: &str) -> Result<Option<String>>;

    /// Submit a signed extrinsic for inclusion.
    async fn submit(&self, extrinsic: &SignedExtrinsic) -> Result<()>;
}

/// A live handle to one network, shared by every resolver and registry in
/// the process.
pub type Connection = Arc<dyn ChainClient>;

/// Establishes connections to individual nodes.
#[async_trait]
pub trait Dialer: Send + Sync {
    /// Attempt to reach the node at `target`. `None` when the node cannot
    /// be reached or fails protocol negotiation; the connector treats that
    /// as a retryable miss, not an error.
    async fn dial(&self, target: &str) -> Option<Connection>;
}

/// JSON-RPC 2.0 client over HTTP.
#[derive(Debug)]
pub struct HttpChainClient {
    http: reqwest::Client,
    endpoint: Url,
    next_id: AtomicU64,
}

impl HttpChainClient {
    pub fn new(endpoint: &str) -> Result<Self> {
        Self::with_http_client(
            endpoint,
            reqwest::Client::builder()
                .timeout(Duration::from_secs(10))
                .build()?,
        )
    }

    /// Use an existing reqwest client (shared across dials).
    pub fn with_http_client(endpoint: &str, http: reqwest::Client) -> Result<Self> {
        let endpoint =
            Url::parse(endpoint).map_err(|_| RpcError::InvalidEndpoint(endpoint.to_string()))?;
        Ok(Self {
            http,
            endpoint,
            next_id: AtomicU64::new(1),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn call(&self, method: &str, params: Value) -> Result<Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = json!({
            "id": id,
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
        });
        debug!(endpoint = %self.endpoint, method, "sending rpc request");

        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(RpcError::Node(format!(
                "http status {} from {}",
                response.status(),
                self.endpoint
            )));
        }

        let reply = response.json::<Value>().await?;
        if let Some(error) = reply.get("error").filter(|error| !error.is_null()) {
            return Err(RpcError::Node(error.to_string()));
        }
        Ok(reply.get("result").cloned().unwrap_or(Value::Null))
    }

    /// Probe the node; used during dialing before the handle is handed out.
    pub async fn health(&self) -> Result<()> {
        self.call("system_health", json!([])).await.map(|_| ())
    }
}

#[async_trait]
impl ChainClient for HttpChainClient {
    async fn query_map(&self, module: &str, item: &str, key: &str) -> Result<Option<String>> {
        let storage_key = fedns_codec::storage_key(module, item, key);
        let result = self.call("state_getStorage", json!([storage_key])).await?;
        match result {
            Value::Null => Ok(None),
            Value::String(hex_value) => {
                let raw = hex::decode(hex_value.trim_start_matches("0x")).map_err(|err| {
                    RpcError::MalformedResponse(format!("storage value is not hex: {err}"))
                })?;
                let decoded = fedns_codec::decode_string(&raw).ok_or_else(|| {
                    RpcError::MalformedResponse("storage value is not a length-prefixed string".into())
                })?;
                Ok(Some(decoded))
            }
            other => Err(RpcError::MalformedResponse(format!(
                "unexpected storage result: {other}"
            ))),
        }
    }

    async fn submit(&self, extrinsic: &SignedExtrinsic) -> Result<()> {
        let encoded = extrinsic.to_hex()?;
        self.call("author_submitExtrinsic", json!([encoded]))
            .await
            .map(|_| ())
    }
}

/// Dialer backed by [`HttpChainClient`]. A dial counts as successful only
/// after the node answers a `system_health` probe.
#[derive(Debug, Clone)]
pub struct HttpDialer {
    http: reqwest::Client,
}

impl HttpDialer {
    pub fn new() -> Result<Self> {
        Ok(Self {
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(10))
                .build()?,
        })
    }
}

#[async_trait]
impl Dialer for HttpDialer {
    async fn dial(&self, target: &str) -> Option<Connection> {
        let client = match HttpChainClient::with_http_client(target, self.http.clone()) {
            Ok(client) => client,
            Err(err) => {
                debug!(%target, %err, "dial target rejected");
                return None;
            }
        };
        match client.health().await {
            Ok(()) => Some(Arc::new(client)),
            Err(err) => {
                debug!(%target, %err, "dial failed");
                None
            }
        }
    }
}
