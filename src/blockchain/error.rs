// src/blockchain/error.rs

use serde_json::Value;
use thiserror::Error;

// --- Error types for the RPC client ---

/// The endpoint handed to the client could not be used.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("invalid endpoint '{0}': expected an http:// or https:// URL")]
    InvalidScheme(String),
    #[error("invalid endpoint '{url}': {reason}")]
    MalformedUrl { url: String, reason: String },
    #[error("failed to build HTTP transport: {0}")]
    Transport(String),
}

/// Caller input rejected before any network call was made.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),
    #[error("invalid hash: {0}")]
    InvalidHash(String),
    #[error("invalid hex string: {0}")]
    InvalidHex(String),
}

/// Error codes reserved by JSON-RPC 2.0 and EIP-1474 for call-level faults.
pub mod rpc_codes {
    pub const PARSE_ERROR: i64 = -32700;
    pub const INVALID_REQUEST: i64 = -32600;
    pub const METHOD_NOT_FOUND: i64 = -32601;
    pub const INVALID_PARAMS: i64 = -32602;
    pub const INTERNAL_ERROR: i64 = -32603;
    pub const METHOD_NOT_SUPPORTED: i64 = -32004;
    pub const LIMIT_EXCEEDED: i64 = -32005;
}

/// A call could not be completed, or its response could not be understood.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("network error: {0}")]
    Network(String),
    #[error("request timed out: {0}")]
    Timeout(String),
    #[error("HTTP error: status {status}")]
    Http { status: u16, body: String },
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    #[error("node returned error {code}: {message}")]
    Rpc {
        code: i64,
        message: String,
        data: Option<Value>,
    },
}

impl TransportError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }

    /// Network, timeout, 5xx and rate-limit failures; a later attempt may
    /// succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network(_) | Self::Timeout(_) => true,
            Self::Http { status, .. } => *status >= 500 || *status == 429,
            Self::Rpc { code, .. } => *code == rpc_codes::LIMIT_EXCEEDED,
            Self::MalformedResponse(_) => false,
        }
    }

    /// An error object that reports a problem with the call itself or with
    /// the node (unknown method, bad envelope, rate limit) rather than a
    /// verdict on the submitted payload.
    pub fn is_protocol_fault(&self) -> bool {
        match self {
            Self::Rpc { code, .. } => matches!(
                *code,
                rpc_codes::PARSE_ERROR
                    | rpc_codes::INVALID_REQUEST
                    | rpc_codes::METHOD_NOT_FOUND
                    | rpc_codes::INVALID_PARAMS
                    | rpc_codes::INTERNAL_ERROR
                    | rpc_codes::METHOD_NOT_SUPPORTED
                    | rpc_codes::LIMIT_EXCEEDED
            ),
            _ => false,
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_decode() {
            Self::MalformedResponse(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

/// Every failure an [`RpcClient`](super::client::RpcClient) operation can produce.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("transaction rejected by node: {message}")]
    BroadcastRejected {
        code: Option<i64>,
        message: String,
        data: Option<Value>,
    },
}

impl ClientError {
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::BroadcastRejected {
            code: None,
            message: message.into(),
            data: None,
        }
    }

    /// Stable label used by the service surfaces.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "configuration_error",
            Self::Validation(_) => "validation_error",
            Self::Transport(_) => "transport_error",
            Self::BroadcastRejected { .. } => "broadcast_rejected",
        }
    }

    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_transient())
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
