//! Shared fixtures for the integration suites.
#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use evm_rpc_client::blockchain::{Transport, TransportError};
use serde_json::{json, Value};

/// Transport double that records every call and answers from a script.
///
/// Responses are queued per method; a method with nothing queued fails
/// with a network error so unexpected calls are loud. Clones share state, so
/// a test can keep one handle and give another to the client.
#[derive(Clone, Default)]
pub struct SpyTransport {
    calls: Arc<Mutex<Vec<(String, Vec<Value>)>>>,
    responses: Arc<Mutex<HashMap<String, VecDeque<Result<Value, TransportError>>>>>,
}

impl SpyTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, method: &str, result: Value) -> Self {
        self.push(method, Ok(result));
        self
    }

    pub fn fail(self, method: &str, err: TransportError) -> Self {
        self.push(method, Err(err));
        self
    }

    fn push(&self, method: &str, response: Result<Value, TransportError>) {
        self.responses
            .lock()
            .unwrap()
            .entry(method.to_string())
            .or_default()
            .push_back(response);
    }

    pub fn calls(&self) -> Vec<(String, Vec<Value>)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for SpyTransport {
    async fn request(&self, method: &str, params: Vec<Value>) -> Result<Value, TransportError> {
        self.calls
            .lock()
            .unwrap()
            .push((method.to_string(), params));
        self.responses
            .lock()
            .unwrap()
            .get_mut(method)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Err(TransportError::Network(format!("no response scripted for {}", method))))
    }
}

pub const ADDRESS: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";

pub fn hash(byte: u8) -> String {
    format!("0x{}", hex::encode([byte; 32]))
}

pub fn addr(byte: u8) -> String {
    format!("0x{}", hex::encode([byte; 20]))
}

pub fn transaction_json(byte: u8, index: u64) -> Value {
    json!({
        "hash": hash(byte),
        "nonce": format!("{:#x}", index),
        "blockHash": hash(0xbb),
        "blockNumber": "0x64",
        "transactionIndex": format!("{:#x}", index),
        "from": addr(0x11),
        "to": addr(0x22),
        "value": "0x1",
        "gas": "0x5208",
        "gasPrice": "0x3b9aca00",
        "input": "0x",
        "v": "0x25",
        "r": hash(0x01),
        "s": hash(0x02)
    })
}

pub fn block_json(height: u64, tx_count: u8) -> Value {
    json!({
        "number": format!("{:#x}", height),
        "hash": hash(0xbb),
        "parentHash": hash(0xaa),
        "timestamp": "0x65f0a000",
        "miner": addr(0x33),
        "gasUsed": "0x5208",
        "gasLimit": "0x1c9c380",
        "baseFeePerGas": "0x7",
        "transactions": (0..tx_count)
            .map(|i| transaction_json(i + 1, u64::from(i)))
            .collect::<Vec<_>>()
    })
}

pub fn receipt_json(status: &str) -> Value {
    json!({
        "transactionHash": hash(0x01),
        "transactionIndex": "0x0",
        "blockHash": hash(0xbb),
        "blockNumber": "0x64",
        "from": addr(0x11),
        "to": addr(0x22),
        "cumulativeGasUsed": "0x5208",
        "gasUsed": "0x5208",
        "effectiveGasPrice": "0x3b9aca00",
        "contractAddress": null,
        "logs": [],
        "logsBloom": format!("0x{}", "00".repeat(256)),
        "type": "0x2",
        "status": status
    })
}
