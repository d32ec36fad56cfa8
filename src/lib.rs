// src/lib.rs

use std::sync::Arc;

// Re-export commonly used types
pub use ethers_core::types::{Address, H256, U256};

pub mod api;
pub mod blockchain;
pub mod config;
pub mod mcp;
pub mod utils;

pub use blockchain::{ClientError, RpcClient};

/// Application state shared across all request handlers
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<config::Config>,
    /// Client for the configured node
    pub rpc_client: RpcClient,
}

impl AppState {
    pub fn new(config: config::Config, rpc_client: RpcClient) -> Self {
        Self {
            config: Arc::new(config),
            rpc_client,
        }
    }
}
