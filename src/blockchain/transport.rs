//! JSON-RPC transport between the client and the node.
//!
//! A [`Transport`] performs one call and hands back the `result` member of the
//! response untouched. It does no business validation. A `null` result comes
//! back as `Ok(Value::Null)` so callers can tell "no data" from a failed call.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::{
    endpoint::Endpoint,
    error::{ConfigurationError, TransportError},
};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[async_trait]
pub trait Transport: Send + Sync {
    /// Issues `method` with positional `params` and returns the raw result.
    async fn request(&self, method: &str, params: Vec<Value>) -> Result<Value, TransportError>;
}

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: &'a [Value],
}

/// Splits a decoded JSON-RPC response into its result or error object.
pub(crate) fn extract_result(response: Value) -> Result<Value, TransportError> {
    let mut object = match response {
        Value::Object(map) => map,
        other => {
            return Err(TransportError::malformed(format!(
                "expected a JSON-RPC object, got {}",
                other
            )))
        }
    };

    if let Some(error) = object.remove("error").filter(|e| !e.is_null()) {
        let code = error.get("code").and_then(Value::as_i64).unwrap_or_default();
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("unknown error")
            .to_string();
        return Err(TransportError::Rpc {
            code,
            message,
            data: error.get("data").cloned(),
        });
    }

    object
        .remove("result")
        .ok_or_else(|| TransportError::malformed("response has neither 'result' nor 'error'"))
}

/// HTTP transport posting JSON-RPC 2.0 envelopes to a single endpoint.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    endpoint: Endpoint,
}

impl HttpTransport {
    pub fn new(endpoint: Endpoint, timeout: Duration) -> Result<Self, ConfigurationError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ConfigurationError::Transport(e.to_string()))?;
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn request(&self, method: &str, params: Vec<Value>) -> Result<Value, TransportError> {
        let payload = RpcRequest {
            jsonrpc: "2.0",
            id: 1,
            method,
            params: &params,
        };
        debug!(method, "sending JSON-RPC request");

        let response = self
            .client
            .post(self.endpoint.url().clone())
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            // Some nodes pair a JSON-RPC error object with a non-2xx status.
            if let Ok(value) = serde_json::from_str::<Value>(&body) {
                if let Err(err @ TransportError::Rpc { .. }) = extract_result(value) {
                    warn!(method, %status, "node returned an error: {}", err);
                    return Err(err);
                }
            }
            warn!(method, %status, "HTTP error from node");
            return Err(TransportError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let value: Value = serde_json::from_str(&body)
            .map_err(|e| TransportError::malformed(format!("invalid JSON body: {}", e)))?;
        extract_result(value).map_err(|err| {
            if let TransportError::Rpc { code, message, .. } = &err {
                warn!(method, code, "node returned an error: {}", message);
            }
            err
        })
    }
}
