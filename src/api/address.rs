use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use tracing::info;

use crate::{api::ApiError, AppState};

// Defines the structure for the JSON output returned by the balance endpoint.
#[derive(Debug, Serialize)]
pub struct BalanceOutput {
    pub address: String,
    /// Decimal string, balances routinely exceed 2^64.
    pub balance: String,
    pub denom: String,
}

#[derive(Debug, Serialize)]
pub struct NonceOutput {
    pub address: String,
    pub nonce: u64,
}

// The handler function for the GET /address/:address/balance endpoint.
pub async fn balance_handler(
    Path(address): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<BalanceOutput>, ApiError> {
    info!("Fetching native balance for {}", address);
    let balance = state
        .rpc_client
        .get_native_balance_by_address(&address)
        .await?;
    Ok(Json(BalanceOutput {
        address,
        balance: balance.to_string(),
        denom: "wei".to_string(),
    }))
}

// GET /address/:address/nonce
pub async fn nonce_handler(
    Path(address): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<NonceOutput>, ApiError> {
    let nonce = state.rpc_client.get_next_nonce_by_address(&address).await?;
    Ok(Json(NonceOutput { address, nonce }))
}
