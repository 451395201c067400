//! MCP method routing shared by the SSE sessions and the `/mcp` endpoint.

use serde_json::Value;

use figma_mcp::jsonrpc::{INVALID_PARAMS, INVALID_REQUEST, METHOD_NOT_FOUND};
use figma_mcp::{Dispatcher, JsonRpcRequest, JsonRpcResponse, ToolInvocation, ToolRegistry};

pub const PROTOCOL_VERSION: &str = "2024-11-05";
pub const SERVER_NAME: &str = "figma-mcp-server";

/// Handle one JSON-RPC message. Notifications produce no response.
pub async fn handle(dispatcher: &Dispatcher, req: JsonRpcRequest) -> Option<JsonRpcResponse> {
    let Some(id) = req.id.clone() else {
        tracing::debug!("Received MCP notification: {}", req.method);
        return None;
    };

    if !req.has_valid_version() {
        return Some(JsonRpcResponse::error(
            id,
            INVALID_REQUEST,
            "jsonrpc field must be \"2.0\"",
        ));
    }

    let response = match req.method.as_str() {
        "initialize" => handle_initialize(id),
        "ping" => JsonRpcResponse::success(id, serde_json::json!({})),
        "tools/list" => handle_tools_list(id),
        "tools/call" => handle_tools_call(dispatcher, id, req.params.as_ref()).await,
        method => JsonRpcResponse::error(
            id,
            METHOD_NOT_FOUND,
            format!("Method not found: {method}"),
        ),
    };
    Some(response)
}

fn handle_initialize(id: Value) -> JsonRpcResponse {
    JsonRpcResponse::success(
        id,
        serde_json::json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {
                "tools": {}
            },
            "serverInfo": {
                "name": SERVER_NAME,
                "version": env!("CARGO_PKG_VERSION")
            }
        }),
    )
}

fn handle_tools_list(id: Value) -> JsonRpcResponse {
    let tools = ToolRegistry::definitions();
    JsonRpcResponse::success(id, serde_json::json!({ "tools": tools }))
}

async fn handle_tools_call(
    dispatcher: &Dispatcher,
    id: Value,
    params: Option<&Value>,
) -> JsonRpcResponse {
    let Some(params) = params else {
        return JsonRpcResponse::error(id, INVALID_PARAMS, "Missing params");
    };

    let invocation: ToolInvocation = match serde_json::from_value(params.clone()) {
        Ok(invocation) => invocation,
        Err(e) => {
            return JsonRpcResponse::error(
                id,
                INVALID_PARAMS,
                format!("Invalid tools/call params: {e}"),
            )
        }
    };

    let result = dispatcher.call(&invocation).await;
    JsonRpcResponse::success(id, serde_json::to_value(&result).unwrap_or(Value::Null))
}
