use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{api::ApiError, blockchain::TransactionReceipt, AppState};

#[derive(Debug, Deserialize)]
pub struct BroadcastRequest {
    /// Signed transaction, hex with or without `0x`.
    pub raw_transaction: String,
}

#[derive(Debug, Serialize)]
pub struct BroadcastResponse {
    pub tx_hash: String,
}

pub async fn receipt_handler(
    Path(hash): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<TransactionReceipt>, ApiError> {
    state
        .rpc_client
        .get_transaction_receipt_by_hash(&hash)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("receipt for {}", hash)))
}

pub async fn broadcast_handler(
    State(state): State<AppState>,
    Json(req): Json<BroadcastRequest>,
) -> Result<Json<BroadcastResponse>, ApiError> {
    let tx_hash = state
        .rpc_client
        .broadcast_raw_transaction_hex(&req.raw_transaction)
        .await?;
    info!("Broadcast accepted: {:?}", tx_hash);
    Ok(Json(BroadcastResponse {
        tx_hash: format!("{:?}", tx_hash),
    }))
}
