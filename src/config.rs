// src/config.rs

use std::env;
use std::time::Duration;

use anyhow::{Context, Result};

// Loaded once at startup from the environment (and the .env file, if any).
#[derive(Clone, Debug)]
pub struct Config {
    // Server settings
    pub port: u16,

    /// HTTP(S) URL of the EVM node every call is sent to.
    pub rpc_url: String,
    /// Upper bound on a single RPC call, connection included.
    pub rpc_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            rpc_url: "http://127.0.0.1:8545".to_string(),
            rpc_timeout: Duration::from_secs(30),
        }
    }
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let rpc_url = env::var("RPC_URL").context("RPC_URL must be set to the node's HTTP(S) URL")?;

        let rpc_timeout_secs = env::var("RPC_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse::<u64>()
            .context("RPC_TIMEOUT_SECS must be a valid number")?;

        Ok(Config {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            rpc_url,
            rpc_timeout: Duration::from_secs(rpc_timeout_secs),
        })
    }
}
