//! # MCP Handler Module
//!
//! Line-delimited JSON-RPC tool protocol over stdin/stdout. Every tool is a
//! thin wrapper around one [`RpcClient`](crate::RpcClient) operation.
//!
//! ## Supported Tools
//!
//! ### Node
//! - `is_node_syncing` - Whether the node is still catching up
//! - `get_chain_id` - Chain id reported by the node
//!
//! ### Address
//! - `get_balance` - Native balance in wei
//! - `get_next_nonce` - Next nonce, pending transactions included
//!
//! ### Blocks and Transactions
//! - `get_latest_block_height` - Current head height
//! - `get_block_by_height` / `get_block_by_hash` - Block with full transactions
//! - `get_transaction_receipt` - Receipt, or null while unmined
//! - `broadcast_raw_transaction` - Submit a signed raw transaction

use serde_json::{json, Value};
use tracing::{info, warn};

use crate::{
    blockchain::ClientError,
    mcp::protocol::{error_codes, Request, Response},
    utils, AppState,
};

const TOOL_NAMES: [&str; 9] = [
    "is_node_syncing",
    "get_chain_id",
    "get_balance",
    "get_next_nonce",
    "get_transaction_receipt",
    "get_latest_block_height",
    "get_block_by_height",
    "get_block_by_hash",
    "broadcast_raw_transaction",
];

// Produce a result Value that always contains a text content array
// and preserves structured data for JSON-friendly clients.
fn make_texty_result(text: String, payload: Value) -> Value {
    let content = json!([{ "type": "text", "text": text }]);
    match payload {
        Value::Object(mut map) => {
            if !map.contains_key("content") {
                map.insert("content".into(), content);
            }
            Value::Object(map)
        }
        other => json!({
            "data": other,
            "content": content
        }),
    }
}

fn client_error_response(req_id: &Value, err: ClientError) -> Response {
    let code = match err {
        ClientError::Validation(_) => error_codes::INVALID_PARAMS,
        _ => error_codes::INTERNAL_ERROR,
    };
    let mut data = json!({ "kind": err.kind(), "transient": err.is_transient() });
    if let ClientError::BroadcastRejected {
        code: Some(node_code),
        ..
    } = &err
    {
        data["node_code"] = json!(node_code);
    }
    warn!("Tool call failed: {}", err);
    Response::error_with_data(req_id.clone(), code, err.to_string(), data)
}

/// Main dispatcher for incoming protocol requests.
pub async fn handle_mcp_request(req: Request, state: AppState) -> Option<Response> {
    info!("Handling MCP request for method: {}", req.method);

    if req.is_notification() {
        return None;
    }

    let response = match req.method.as_str() {
        "initialize" => handle_initialize(&req),
        "tools/list" => handle_tools_list(&req),
        "tools/call" => handle_tool_call(req, state).await,
        // Direct method calls are rewritten into tools/call to reuse the same logic
        name if TOOL_NAMES.contains(&name) => {
            let wrapped = Request {
                jsonrpc: req.jsonrpc.clone(),
                id: req.id.clone(),
                method: "tools/call".to_string(),
                params: Some(json!({
                    "name": name,
                    "arguments": req.params.clone().unwrap_or_else(|| json!({}))
                })),
            };
            handle_tool_call(wrapped, state).await
        }
        _ => Response::error(
            req.id,
            error_codes::METHOD_NOT_FOUND,
            format!("Method not found: {}", req.method),
        ),
    };

    Some(response)
}

/// Handles a 'tools/call' request by dispatching it to the matching client call.
async fn handle_tool_call(req: Request, state: AppState) -> Response {
    let params = match req.params.as_ref() {
        Some(p) => p,
        None => {
            return Response::error(
                req.id,
                error_codes::INVALID_PARAMS,
                "Missing 'params' object".into(),
            )
        }
    };

    let tool_name = match params.get("name").and_then(|n| n.as_str()) {
        Some(name) => name,
        None => {
            return Response::error(
                req.id,
                error_codes::INVALID_PARAMS,
                "Missing 'name' field in params".into(),
            )
        }
    };

    let empty_args = json!({});
    let args = params.get("arguments").unwrap_or(&empty_args);

    match run_tool(tool_name, args, &req.id, &state).await {
        Ok((text, payload)) => Response::success(req.id.clone(), make_texty_result(text, payload)),
        Err(resp) => resp,
    }
}

async fn run_tool(
    tool_name: &str,
    args: &Value,
    req_id: &Value,
    state: &AppState,
) -> Result<(String, Value), Response> {
    let client = &state.rpc_client;
    let fail = |err: ClientError| client_error_response(req_id, err);

    match tool_name {
        "is_node_syncing" => {
            let status = client.get_sync_status().await.map_err(fail)?;
            let syncing = status.is_syncing();
            let text = if syncing { "Node is syncing" } else { "Node is synced" };
            Ok((text.to_string(), json!({ "syncing": syncing, "status": status })))
        }
        "get_chain_id" => {
            let chain_id = client.get_chain_id().await.map_err(fail)?;
            Ok((format!("Chain id: {}", chain_id), json!({ "chain_id": chain_id })))
        }
        "get_balance" => {
            let address = utils::get_required_arg::<String>(args, "address", req_id)?;
            let balance = client
                .get_native_balance_by_address(&address)
                .await
                .map_err(fail)?;
            Ok((
                format!("Balance of {}: {} wei", address, balance),
                json!({ "address": address, "balance": balance.to_string(), "denom": "wei" }),
            ))
        }
        "get_next_nonce" => {
            let address = utils::get_required_arg::<String>(args, "address", req_id)?;
            let nonce = client
                .get_next_nonce_by_address(&address)
                .await
                .map_err(fail)?;
            Ok((
                format!("Next nonce for {}: {}", address, nonce),
                json!({ "address": address, "nonce": nonce }),
            ))
        }
        "get_transaction_receipt" => {
            let tx_hash = utils::get_required_arg::<String>(args, "tx_hash", req_id)?;
            let receipt = client
                .get_transaction_receipt_by_hash(&tx_hash)
                .await
                .map_err(fail)?;
            let text = match &receipt {
                Some(r) => format!("Transaction {} mined in block {}", tx_hash, r.block_number),
                None => format!("Transaction {} is not mined yet", tx_hash),
            };
            Ok((text, json!({ "mined": receipt.is_some(), "receipt": receipt })))
        }
        "get_latest_block_height" => {
            let height = client.get_latest_block_height().await.map_err(fail)?;
            Ok((format!("Latest block: {}", height), json!({ "height": height })))
        }
        "get_block_by_height" => {
            let height = utils::get_required_arg::<u64>(args, "height", req_id)?;
            let block = client.get_block_by_height(height).await.map_err(fail)?;
            Ok((describe_block(&block, &height.to_string()), json!({ "block": block })))
        }
        "get_block_by_hash" => {
            let block_hash = utils::get_required_arg::<String>(args, "block_hash", req_id)?;
            let block = client.get_block_by_hash(&block_hash).await.map_err(fail)?;
            Ok((describe_block(&block, &block_hash), json!({ "block": block })))
        }
        "broadcast_raw_transaction" => {
            let raw = utils::get_required_arg::<String>(args, "raw_transaction", req_id)?;
            let tx_hash = client
                .broadcast_raw_transaction_hex(&raw)
                .await
                .map_err(fail)?;
            let tx_hash = format!("{:?}", tx_hash);
            Ok((format!("Broadcast accepted: {}", tx_hash), json!({ "tx_hash": tx_hash })))
        }
        _ => Err(Response::error(
            req_id.clone(),
            error_codes::METHOD_NOT_FOUND,
            format!("Tool not found: {}", tool_name),
        )),
    }
}

fn describe_block(block: &Option<crate::blockchain::Block>, id: &str) -> String {
    match block {
        Some(b) => format!(
            "Block {} ({:?}) with {} transactions",
            b.height,
            b.hash,
            b.transactions.len()
        ),
        None => format!("Block {} not found", id),
    }
}

/// Handles the 'initialize' request.
fn handle_initialize(req: &Request) -> Response {
    let server_info = json!({
        "name": "evm_rpc",
        "version": env!("CARGO_PKG_VERSION")
    });
    let capabilities = json!({ "tools": { "listChanged": false } });
    let instructions =
        "Read-only queries and raw transaction broadcast against a single EVM node.";

    Response::success(
        req.id.clone(),
        json!({
            "serverInfo": server_info,
            "protocolVersion": "2025-06-18",
            "capabilities": capabilities,
            "instructions": instructions
        }),
    )
}

/// Handles the 'tools/list' request by returning a JSON definition of all available tools.
fn handle_tools_list(req: &Request) -> Response {
    let no_args = json!({ "type": "object", "properties": {}, "additionalProperties": false });
    let address_arg = json!({
        "type": "object",
        "properties": {
            "address": {"type": "string", "description": "The 0x... EVM address."}
        },
        "required": ["address"],
        "additionalProperties": false
    });

    let tools = json!([
        {
            "name": "is_node_syncing",
            "description": "Report whether the node is still syncing, with progress if it is.",
            "inputSchema": no_args
        },
        {
            "name": "get_chain_id",
            "description": "Get the chain id the node is configured for.",
            "inputSchema": no_args
        },
        {
            "name": "get_balance",
            "description": "Get the native balance of an address in wei at the latest block.",
            "inputSchema": address_arg
        },
        {
            "name": "get_next_nonce",
            "description": "Get the nonce to use for the next transaction from an address, counting pending transactions.",
            "inputSchema": address_arg
        },
        {
            "name": "get_transaction_receipt",
            "description": "Get the receipt of a transaction. Returns mined=false while it is not mined.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "tx_hash": {"type": "string", "description": "The 0x... transaction hash."}
                },
                "required": ["tx_hash"],
                "additionalProperties": false
            }
        },
        {
            "name": "get_latest_block_height",
            "description": "Get the current head block height.",
            "inputSchema": no_args
        },
        {
            "name": "get_block_by_height",
            "description": "Get a block and its full transactions by height.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "height": {"type": "integer", "minimum": 0, "description": "Block height."}
                },
                "required": ["height"],
                "additionalProperties": false
            }
        },
        {
            "name": "get_block_by_hash",
            "description": "Get a block and its full transactions by hash.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "block_hash": {"type": "string", "description": "The 0x... block hash."}
                },
                "required": ["block_hash"],
                "additionalProperties": false
            }
        },
        {
            "name": "broadcast_raw_transaction",
            "description": "Submit an already-signed transaction given as hex (0x prefix optional).",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "raw_transaction": {"type": "string", "description": "Signed transaction bytes as hex."}
                },
                "required": ["raw_transaction"],
                "additionalProperties": false
            }
        }
    ]);

    Response::success(req.id.clone(), json!({ "tools": tools }))
}
