use axum::{extract::State, Json};
use serde::Serialize;

use crate::{api::ApiError, blockchain::SyncStatus, AppState};

#[derive(Debug, Serialize)]
pub struct SyncingOutput {
    pub syncing: bool,
    pub status: SyncStatus,
}

#[derive(Debug, Serialize)]
pub struct ChainIdOutput {
    pub chain_id: u64,
}

// GET /node/syncing
pub async fn syncing_handler(
    State(state): State<AppState>,
) -> Result<Json<SyncingOutput>, ApiError> {
    let status = state.rpc_client.get_sync_status().await?;
    Ok(Json(SyncingOutput {
        syncing: status.is_syncing(),
        status,
    }))
}

// GET /node/chain_id
pub async fn chain_id_handler(
    State(state): State<AppState>,
) -> Result<Json<ChainIdOutput>, ApiError> {
    let chain_id = state.rpc_client.get_chain_id().await?;
    Ok(Json(ChainIdOutput { chain_id }))
}
