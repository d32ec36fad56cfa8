use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::{api::ApiError, blockchain::Block, AppState};

#[derive(Debug, Serialize)]
pub struct LatestHeightOutput {
    pub height: u64,
}

pub async fn latest_height_handler(
    State(state): State<AppState>,
) -> Result<Json<LatestHeightOutput>, ApiError> {
    let height = state.rpc_client.get_latest_block_height().await?;
    Ok(Json(LatestHeightOutput { height }))
}

pub async fn block_by_height_handler(
    Path(height): Path<u64>,
    State(state): State<AppState>,
) -> Result<Json<Block>, ApiError> {
    state
        .rpc_client
        .get_block_by_height(height)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("block {}", height)))
}

pub async fn block_by_hash_handler(
    Path(hash): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Block>, ApiError> {
    state
        .rpc_client
        .get_block_by_hash(&hash)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("block {}", hash)))
}
