// src/blockchain/mod.rs

pub mod client;
pub use client::RpcClient;

pub mod endpoint;
pub mod error;
pub mod models;
pub mod quantity;
pub mod transport;
pub mod validation;

pub use endpoint::Endpoint;
pub use error::{ClientError, ClientResult, ConfigurationError, TransportError, ValidationError};
pub use models::{
    Block, BlockId, BlockTransaction, ReceiptLog, ReceiptStatus, SyncProgress, SyncStatus,
    TransactionReceipt,
};
pub use transport::{HttpTransport, Transport};

// Re-export commonly used types
pub use ethers_core::{
    types::{Address, H256, U256},
    utils::to_checksum,
};
