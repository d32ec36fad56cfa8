// src/blockchain/models.rs
use chrono::{DateTime, TimeZone, Utc};
use ethers_core::types::{Address, Bytes, H256, U256, U64};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{error::TransportError, quantity};

// --- Block identifiers ---

/// Selects a block either by height or by hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockId {
    Height(u64),
    Hash(H256),
}

impl From<u64> for BlockId {
    fn from(height: u64) -> Self {
        BlockId::Height(height)
    }
}

impl From<H256> for BlockId {
    fn from(hash: H256) -> Self {
        BlockId::Hash(hash)
    }
}

// --- Sync status ---

/// Progress reported by a node that is still catching up.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncProgress {
    pub starting_block: Option<u64>,
    pub current_block: Option<u64>,
    pub highest_block: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SyncStatus {
    Synced,
    Syncing(SyncProgress),
}

impl SyncStatus {
    /// `eth_syncing` answers with a scalar (`false`) when synced and with an
    /// object when it is not. Progress fields vary between clients, so any
    /// that are missing or unreadable are left empty.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(map) => {
                let field = |key: &str| map.get(key).and_then(|v| quantity::decode_u64(v, key).ok());
                SyncStatus::Syncing(SyncProgress {
                    starting_block: field("startingBlock"),
                    current_block: field("currentBlock"),
                    highest_block: field("highestBlock"),
                })
            }
            _ => SyncStatus::Synced,
        }
    }

    pub fn is_syncing(&self) -> bool {
        matches!(self, SyncStatus::Syncing(_))
    }
}

// --- Block Models ---

/// A transaction body as included in a block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockTransaction {
    pub hash: H256,
    pub nonce: u64,
    pub from: Address,
    /// `None` for contract creation.
    pub to: Option<Address>,
    pub value: U256,
    pub gas: U256,
    pub gas_price: Option<U256>,
    pub input: Bytes,
    pub transaction_index: Option<u64>,
}

/// A mined block with its full transaction bodies, in block order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Block {
    pub height: u64,
    pub hash: H256,
    pub parent_hash: H256,
    /// Unix seconds.
    pub timestamp: u64,
    pub miner: Option<Address>,
    pub gas_used: U256,
    pub gas_limit: U256,
    pub base_fee_per_gas: Option<U256>,
    pub transactions: Vec<BlockTransaction>,
}

impl Block {
    pub fn timestamp_utc(&self) -> Option<DateTime<Utc>> {
        i64::try_from(self.timestamp)
            .ok()
            .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
    }

    /// Decodes an `eth_getBlockBy*` result requested with full transactions.
    /// `null` means the node does not know the block.
    pub fn from_value(value: Value) -> Result<Option<Self>, TransportError> {
        if value.is_null() {
            return Ok(None);
        }
        let raw: RawBlock = serde_json::from_value(value)
            .map_err(|e| TransportError::malformed(format!("block: {}", e)))?;

        // Pending blocks carry no number or hash.
        let height = raw
            .number
            .ok_or_else(|| TransportError::malformed("block has no number"))?;
        let hash = raw
            .hash
            .ok_or_else(|| TransportError::malformed("block has no hash"))?;

        Ok(Some(Block {
            height: height.as_u64(),
            hash,
            parent_hash: raw.parent_hash,
            timestamp: raw.timestamp.as_u64(),
            miner: raw.miner,
            gas_used: raw.gas_used,
            gas_limit: raw.gas_limit,
            base_fee_per_gas: raw.base_fee_per_gas,
            transactions: raw.transactions.into_iter().map(Into::into).collect(),
        }))
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBlock {
    number: Option<U64>,
    hash: Option<H256>,
    parent_hash: H256,
    timestamp: U64,
    miner: Option<Address>,
    gas_used: U256,
    gas_limit: U256,
    base_fee_per_gas: Option<U256>,
    #[serde(default)]
    transactions: Vec<RawTransaction>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTransaction {
    hash: H256,
    nonce: U64,
    from: Address,
    to: Option<Address>,
    value: U256,
    gas: U256,
    gas_price: Option<U256>,
    #[serde(default)]
    input: Bytes,
    transaction_index: Option<U64>,
}

impl From<RawTransaction> for BlockTransaction {
    fn from(raw: RawTransaction) -> Self {
        BlockTransaction {
            hash: raw.hash,
            nonce: raw.nonce.as_u64(),
            from: raw.from,
            to: raw.to,
            value: raw.value,
            gas: raw.gas,
            gas_price: raw.gas_price,
            input: raw.input,
            transaction_index: raw.transaction_index.map(|i| i.as_u64()),
        }
    }
}

// --- Receipt Models ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReceiptStatus {
    Success,
    Failed,
    /// Pre-Byzantium receipts carry a state root instead of a status.
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReceiptLog {
    pub address: Address,
    pub topics: Vec<H256>,
    pub data: Bytes,
    pub log_index: Option<u64>,
}

/// Post-execution record of a mined transaction. The block is referenced by
/// hash and number only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionReceipt {
    pub transaction_hash: H256,
    pub status: ReceiptStatus,
    pub block_hash: H256,
    pub block_number: u64,
    pub transaction_index: Option<u64>,
    pub from: Option<Address>,
    pub to: Option<Address>,
    pub contract_address: Option<Address>,
    pub gas_used: Option<U256>,
    pub cumulative_gas_used: U256,
    pub effective_gas_price: Option<U256>,
    pub logs: Vec<ReceiptLog>,
}

impl TransactionReceipt {
    pub fn succeeded(&self) -> bool {
        self.status != ReceiptStatus::Failed
    }

    /// Decodes an `eth_getTransactionReceipt` result. Both `null` and a
    /// receipt without block placement mean "not mined yet".
    pub fn from_value(value: Value) -> Result<Option<Self>, TransportError> {
        if value.is_null() {
            return Ok(None);
        }
        let raw: RawReceipt = serde_json::from_value(value)
            .map_err(|e| TransportError::malformed(format!("receipt: {}", e)))?;

        let (block_hash, block_number) = match (raw.block_hash, raw.block_number) {
            (Some(hash), Some(number)) => (hash, number.as_u64()),
            _ => return Ok(None),
        };

        let status = match raw.status.map(|s| s.as_u64()) {
            Some(1) => ReceiptStatus::Success,
            Some(0) => ReceiptStatus::Failed,
            Some(other) => {
                return Err(TransportError::malformed(format!(
                    "receipt status {} is neither 0 nor 1",
                    other
                )))
            }
            None => ReceiptStatus::Unknown,
        };

        Ok(Some(TransactionReceipt {
            transaction_hash: raw.transaction_hash,
            status,
            block_hash,
            block_number,
            transaction_index: raw.transaction_index.map(|i| i.as_u64()),
            from: raw.from,
            to: raw.to,
            contract_address: raw.contract_address,
            gas_used: raw.gas_used,
            cumulative_gas_used: raw.cumulative_gas_used,
            effective_gas_price: raw.effective_gas_price,
            logs: raw
                .logs
                .into_iter()
                .map(|log| ReceiptLog {
                    address: log.address,
                    topics: log.topics,
                    data: log.data,
                    log_index: log.log_index.map(|i| i.as_u64()),
                })
                .collect(),
        }))
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawReceipt {
    transaction_hash: H256,
    transaction_index: Option<U64>,
    block_hash: Option<H256>,
    block_number: Option<U64>,
    from: Option<Address>,
    to: Option<Address>,
    contract_address: Option<Address>,
    gas_used: Option<U256>,
    cumulative_gas_used: U256,
    effective_gas_price: Option<U256>,
    status: Option<U64>,
    #[serde(default)]
    logs: Vec<RawLog>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLog {
    address: Address,
    #[serde(default)]
    topics: Vec<H256>,
    #[serde(default)]
    data: Bytes,
    log_index: Option<U64>,
}
