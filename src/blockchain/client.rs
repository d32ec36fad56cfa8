//! Typed client for a single EVM-compatible node.
//!
//! Every operation validates its arguments, performs at most one JSON-RPC
//! call through the configured [`Transport`], and normalizes the node's
//! answer into the types in [`models`](super::models). Malformed input is
//! rejected before the transport is touched.

use std::{fmt, sync::Arc, time::Duration};

use ethers_core::types::{H256, U256};
use serde_json::{json, Value};
use tokio::time::{sleep, Instant};
use tracing::{debug, instrument, warn};

use super::{
    endpoint::Endpoint,
    error::{ClientError, ClientResult, ConfigurationError, TransportError},
    models::{Block, BlockId, ReceiptStatus, SyncStatus, TransactionReceipt},
    quantity::{decode_u256, decode_u64, encode_u64},
    transport::{HttpTransport, Transport, DEFAULT_TIMEOUT},
    validation::{normalize_raw_transaction, validate_address, validate_hash},
};

/// Client for one node endpoint. Cloning shares the underlying transport.
#[derive(Clone)]
pub struct RpcClient {
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for RpcClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RpcClient").finish_non_exhaustive()
    }
}

impl RpcClient {
    /// Builds a client for `endpoint_url` with the default per-call timeout.
    /// No network call is made.
    pub fn create(endpoint_url: &str) -> Result<Self, ConfigurationError> {
        Self::create_with_timeout(endpoint_url, DEFAULT_TIMEOUT)
    }

    pub fn create_with_timeout(
        endpoint_url: &str,
        timeout: Duration,
    ) -> Result<Self, ConfigurationError> {
        let endpoint = Endpoint::parse(endpoint_url)?;
        let transport = HttpTransport::new(endpoint, timeout)?;
        Ok(Self::with_transport(transport))
    }

    pub fn with_transport<T: Transport + 'static>(transport: T) -> Self {
        Self {
            transport: Arc::new(transport),
        }
    }

    async fn call(&self, method: &str, params: Vec<Value>) -> Result<Value, TransportError> {
        self.transport.request(method, params).await
    }

    // --- Node ---

    #[instrument(skip(self))]
    pub async fn is_node_syncing(&self) -> ClientResult<bool> {
        Ok(self.get_sync_status().await?.is_syncing())
    }

    #[instrument(skip(self))]
    pub async fn get_sync_status(&self) -> ClientResult<SyncStatus> {
        let result = self.call("eth_syncing", vec![]).await?;
        Ok(SyncStatus::from_value(&result))
    }

    #[instrument(skip(self))]
    pub async fn get_chain_id(&self) -> ClientResult<u64> {
        let result = self.call("eth_chainId", vec![]).await?;
        Ok(decode_u64(&result, "chain id")?)
    }

    // --- Address ---

    /// Balance in wei at the latest block.
    #[instrument(skip(self))]
    pub async fn get_native_balance_by_address(&self, address: &str) -> ClientResult<U256> {
        let address = validate_address(address)?;
        let result = self
            .call("eth_getBalance", vec![json!(address), json!("latest")])
            .await?;
        Ok(decode_u256(&result, "balance")?)
    }

    /// Nonce to use for the next transaction from `address`.
    ///
    /// Counts pending transactions as well as mined ones; the mined-only
    /// count would hand out the same nonce to back-to-back sends.
    #[instrument(skip(self))]
    pub async fn get_next_nonce_by_address(&self, address: &str) -> ClientResult<u64> {
        let address = validate_address(address)?;
        let result = self
            .call("eth_getTransactionCount", vec![json!(address), json!("pending")])
            .await?;
        Ok(decode_u64(&result, "transaction count")?)
    }

    // --- Transaction ---

    /// `Ok(None)` while the transaction is not mined.
    #[instrument(skip(self))]
    pub async fn get_transaction_receipt_by_hash(
        &self,
        tx_hash: &str,
    ) -> ClientResult<Option<TransactionReceipt>> {
        let tx_hash = validate_hash(tx_hash)?;
        self.fetch_receipt(tx_hash).await
    }

    async fn fetch_receipt(&self, tx_hash: H256) -> ClientResult<Option<TransactionReceipt>> {
        let result = self
            .call("eth_getTransactionReceipt", vec![json!(tx_hash)])
            .await?;
        Ok(TransactionReceipt::from_value(result)?)
    }

    // --- Block ---

    #[instrument(skip(self))]
    pub async fn get_latest_block_height(&self) -> ClientResult<u64> {
        let result = self.call("eth_blockNumber", vec![]).await?;
        Ok(decode_u64(&result, "block number")?)
    }

    /// Fetches a block with full transaction bodies. `Ok(None)` if the node
    /// does not know the block.
    #[instrument(skip(self))]
    pub async fn get_block(&self, id: BlockId) -> ClientResult<Option<Block>> {
        let (method, selector) = match id {
            BlockId::Height(height) => ("eth_getBlockByNumber", json!(encode_u64(height))),
            BlockId::Hash(hash) => ("eth_getBlockByHash", json!(hash)),
        };
        let result = self.call(method, vec![selector, json!(true)]).await?;
        Ok(Block::from_value(result)?)
    }

    pub async fn get_block_by_height(&self, height: u64) -> ClientResult<Option<Block>> {
        self.get_block(BlockId::Height(height)).await
    }

    pub async fn get_block_by_hash(&self, block_hash: &str) -> ClientResult<Option<Block>> {
        let hash = validate_hash(block_hash)?;
        self.get_block(BlockId::Hash(hash)).await
    }

    // --- Broadcast ---

    /// Submits an already-signed transaction and returns its hash.
    ///
    /// The payload may be given with or without `0x`. An error object from
    /// the node is a rejection, unless its code marks a call-level fault
    /// (unknown method, bad request, rate limit); those and network
    /// failures stay [`ClientError::Transport`].
    #[instrument(skip(self, signed_tx_hex), fields(len = signed_tx_hex.len()))]
    pub async fn broadcast_raw_transaction_hex(&self, signed_tx_hex: &str) -> ClientResult<H256> {
        let raw = normalize_raw_transaction(signed_tx_hex)?;

        let result = match self.call("eth_sendRawTransaction", vec![json!(raw)]).await {
            Ok(result) => result,
            Err(err) if err.is_protocol_fault() => {
                warn!("broadcast failed before the node judged it: {}", err);
                return Err(err.into());
            }
            Err(TransportError::Rpc {
                code,
                message,
                data,
            }) => {
                warn!(code, "transaction rejected: {}", message);
                return Err(ClientError::BroadcastRejected {
                    code: Some(code),
                    message,
                    data,
                });
            }
            Err(err) => return Err(err.into()),
        };

        match result.as_str().map(validate_hash) {
            Some(Ok(tx_hash)) => {
                debug!(?tx_hash, "transaction accepted");
                Ok(tx_hash)
            }
            _ => Err(ClientError::rejected(format!(
                "node did not return a transaction hash: {}",
                result
            ))),
        }
    }

    /// Polls for the receipt of `tx_hash` until it is mined or `timeout`
    /// elapses. A reverted transaction is reported as a rejection.
    ///
    /// The transaction is never resubmitted.
    #[instrument(skip(self))]
    pub async fn wait_for_receipt(
        &self,
        tx_hash: H256,
        poll_interval: Duration,
        timeout: Duration,
    ) -> ClientResult<TransactionReceipt> {
        // A duration too large to add to the clock means no deadline.
        let deadline = Instant::now().checked_add(timeout);
        loop {
            if let Some(receipt) = self.fetch_receipt(tx_hash).await? {
                if receipt.status == ReceiptStatus::Failed {
                    return Err(ClientError::rejected(format!(
                        "transaction {:?} reverted in block {}",
                        tx_hash, receipt.block_number
                    )));
                }
                return Ok(receipt);
            }
            let next_poll = Instant::now().checked_add(poll_interval);
            let expired = match (deadline, next_poll) {
                (Some(deadline), Some(next_poll)) => next_poll > deadline,
                (Some(_), None) => true,
                (None, _) => false,
            };
            if expired {
                return Err(TransportError::Timeout(format!(
                    "no receipt for {:?} after {:?}",
                    tx_hash, timeout
                ))
                .into());
            }
            sleep(poll_interval).await;
        }
    }

    pub async fn broadcast_and_confirm(
        &self,
        signed_tx_hex: &str,
        poll_interval: Duration,
        timeout: Duration,
    ) -> ClientResult<TransactionReceipt> {
        let tx_hash = self.broadcast_raw_transaction_hex(signed_tx_hex).await?;
        self.wait_for_receipt(tx_hash, poll_interval, timeout).await
    }
}
