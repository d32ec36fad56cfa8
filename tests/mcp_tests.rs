//! Tool protocol dispatch over a scripted transport.

mod common;

use common::{block_json, hash, SpyTransport, ADDRESS};
use evm_rpc_client::{
    config::Config,
    mcp::{
        handler::handle_mcp_request,
        protocol::{error_codes, Request, Response},
    },
    AppState, RpcClient,
};
use serde_json::{json, Value};

fn state(spy: &SpyTransport) -> AppState {
    AppState::new(Config::default(), RpcClient::with_transport(spy.clone()))
}

fn request(method: &str, params: Value) -> Request {
    Request {
        jsonrpc: "2.0".to_string(),
        id: json!(1),
        method: method.to_string(),
        params: Some(params),
    }
}

async fn call_tool(spy: &SpyTransport, name: &str, arguments: Value) -> Response {
    handle_mcp_request(
        request("tools/call", json!({"name": name, "arguments": arguments})),
        state(spy),
    )
    .await
    .unwrap()
}

#[tokio::test]
async fn tools_list_names_every_tool() {
    let resp = handle_mcp_request(request("tools/list", json!({})), state(&SpyTransport::new()))
        .await
        .unwrap();
    let tools = resp.result.unwrap()["tools"].as_array().unwrap().clone();
    let names: Vec<_> = tools.iter().map(|t| t["name"].as_str().unwrap().to_string()).collect();
    assert_eq!(names.len(), 9);
    assert!(names.contains(&"broadcast_raw_transaction".to_string()));
}

#[tokio::test]
async fn notifications_get_no_response() {
    let mut req = request("tools/list", json!({}));
    req.id = Value::Null;
    assert!(handle_mcp_request(req, state(&SpyTransport::new())).await.is_none());
}

#[tokio::test]
async fn balance_tool_returns_text_and_data() {
    let spy = SpyTransport::new().respond("eth_getBalance", json!("0x10"));
    let resp = call_tool(&spy, "get_balance", json!({"address": ADDRESS})).await;
    let result = resp.result.unwrap();
    assert_eq!(result["balance"], json!("16"));
    assert_eq!(result["content"][0]["type"], json!("text"));
}

#[tokio::test]
async fn direct_method_alias_is_dispatched() {
    let spy = SpyTransport::new().respond("eth_chainId", json!("0xaa36a7"));
    let resp = handle_mcp_request(request("get_chain_id", json!({})), state(&spy))
        .await
        .unwrap();
    assert_eq!(resp.result.unwrap()["chain_id"], json!(11155111));
}

#[tokio::test]
async fn validation_failure_is_invalid_params() {
    let spy = SpyTransport::new();
    let resp = call_tool(&spy, "get_next_nonce", json!({"address": "nope"})).await;
    let error = resp.error.unwrap();
    assert_eq!(error.code, error_codes::INVALID_PARAMS);
    assert_eq!(error.data.unwrap()["kind"], json!("validation_error"));
    assert!(spy.calls().is_empty());
}

#[tokio::test]
async fn missing_argument_is_invalid_params() {
    let resp = call_tool(&SpyTransport::new(), "get_block_by_height", json!({})).await;
    assert_eq!(resp.error.unwrap().code, error_codes::INVALID_PARAMS);
}

#[tokio::test]
async fn receipt_tool_reports_unmined() {
    let spy = SpyTransport::new().respond("eth_getTransactionReceipt", Value::Null);
    let resp = call_tool(&spy, "get_transaction_receipt", json!({"tx_hash": hash(0x01)})).await;
    let result = resp.result.unwrap();
    assert_eq!(result["mined"], json!(false));
    assert_eq!(result["receipt"], Value::Null);
}

#[tokio::test]
async fn block_tool_by_hash() {
    let spy = SpyTransport::new().respond("eth_getBlockByHash", block_json(5, 1));
    let resp = call_tool(&spy, "get_block_by_hash", json!({"block_hash": hash(0xbb)})).await;
    let result = resp.result.unwrap();
    assert_eq!(result["block"]["height"], json!(5));
    assert_eq!(result["block"]["transactions"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn rejected_broadcast_is_internal_error_with_kind() {
    let spy = SpyTransport::new().fail(
        "eth_sendRawTransaction",
        evm_rpc_client::blockchain::TransportError::Rpc {
            code: -32000,
            message: "replacement transaction underpriced".into(),
            data: None,
        },
    );
    let resp = call_tool(&spy, "broadcast_raw_transaction", json!({"raw_transaction": "0xdeadbeef"})).await;
    let error = resp.error.unwrap();
    assert_eq!(error.code, error_codes::INTERNAL_ERROR);
    let data = error.data.unwrap();
    assert_eq!(data["kind"], json!("broadcast_rejected"));
    assert_eq!(data["node_code"], json!(-32000));
}

#[tokio::test]
async fn unknown_tool_and_method() {
    let resp = call_tool(&SpyTransport::new(), "transfer_evm", json!({})).await;
    assert_eq!(resp.error.unwrap().code, error_codes::METHOD_NOT_FOUND);

    let resp = handle_mcp_request(request("eth_call", json!({})), state(&SpyTransport::new()))
        .await
        .unwrap();
    assert_eq!(resp.error.unwrap().code, error_codes::METHOD_NOT_FOUND);
}
