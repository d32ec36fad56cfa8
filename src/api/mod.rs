//! # API Module
//!
//! HTTP handlers exposing the node client as a small JSON API.
//!
//! ## Available Endpoints
//!
//! ### Node
//! - `GET /health` - Liveness check, makes no node call
//! - `GET /node/syncing` - Whether the node is still syncing
//! - `GET /node/chain_id` - Chain id reported by the node
//!
//! ### Address
//! - `GET /address/:address/balance` - Native balance in wei
//! - `GET /address/:address/nonce` - Next nonce, pending transactions included
//!
//! ### Blocks and Transactions
//! - `GET /block/latest` - Current head height
//! - `GET /block/height/:height` - Block with full transactions
//! - `GET /block/hash/:hash` - Block with full transactions
//! - `GET /tx/:hash/receipt` - Receipt, 404 while unmined
//! - `POST /tx/broadcast` - Submit a signed raw transaction

pub mod address;
pub mod block;
pub mod error;
pub mod health;
pub mod node;
pub mod tx;

use axum::{
    routing::{get, post},
    Router,
};

use crate::AppState;

pub use error::ApiError;

/// Routes served under `/api`.
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/node/syncing", get(node::syncing_handler))
        .route("/node/chain_id", get(node::chain_id_handler))
        .route("/address/:address/balance", get(address::balance_handler))
        .route("/address/:address/nonce", get(address::nonce_handler))
        .route("/block/latest", get(block::latest_height_handler))
        .route("/block/height/:height", get(block::block_by_height_handler))
        .route("/block/hash/:hash", get(block::block_by_hash_handler))
        .route("/tx/:hash/receipt", get(tx::receipt_handler))
        .route("/tx/broadcast", post(tx::broadcast_handler))
}
