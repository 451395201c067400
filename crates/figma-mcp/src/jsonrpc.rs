use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// The only protocol version accepted on the wire.
pub const JSONRPC_VERSION: &str = "2.0";

pub const PARSE_ERROR: i32 = -32700;
pub const INVALID_REQUEST: i32 = -32600;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;

/// An incoming JSON-RPC message. Without an `id` member it is a
/// notification; an explicit `"id": null` is still a request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    #[serde(
        default,
        deserialize_with = "present_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }

    pub fn has_valid_version(&self) -> bool {
        self.jsonrpc == JSONRPC_VERSION
    }
}

/// Maps a present `id` member, `null` included, to `Some`.
fn present_id<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Outgoing reply: exactly one of `result` or `error` is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    fn reply(id: Value, result: Option<Value>, error: Option<JsonRpcError>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result,
            error,
        }
    }

    pub fn success(id: Value, result: Value) -> Self {
        Self::reply(id, Some(result), None)
    }

    pub fn error(id: Value, code: i32, message: impl Into<String>) -> Self {
        let error = JsonRpcError {
            code,
            message: message.into(),
            data: None,
        };
        Self::reply(id, None, Some(error))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn tools_call_with_string_id() {
        let req: JsonRpcRequest = serde_json::from_value(json!({
            "jsonrpc": "2.0",
            "id": "abc",
            "method": "tools/call",
            "params": { "name": "get_node", "arguments": { "file_key": "FILE", "node_id": "1:2" } }
        }))
        .unwrap();

        assert!(req.has_valid_version());
        assert!(!req.is_notification());
        assert_eq!(req.id, Some(json!("abc")));
        assert_eq!(req.params.unwrap()["arguments"]["node_id"], "1:2");
    }

    #[test]
    fn initialized_notification_has_no_id() {
        let req: JsonRpcRequest = serde_json::from_value(json!({
            "jsonrpc": "2.0",
            "method": "notifications/initialized"
        }))
        .unwrap();

        assert!(req.is_notification());
        assert!(req.params.is_none());
    }

    #[test]
    fn null_id_is_a_request() {
        let req: JsonRpcRequest = serde_json::from_value(json!({
            "jsonrpc": "2.0",
            "id": null,
            "method": "tools/list"
        }))
        .unwrap();

        assert!(!req.is_notification());
        assert_eq!(req.id, Some(Value::Null));
    }

    #[test]
    fn wrong_version_is_flagged() {
        let req: JsonRpcRequest =
            serde_json::from_value(json!({ "jsonrpc": "1.0", "id": 1, "method": "ping" })).unwrap();
        assert!(!req.has_valid_version());
    }

    #[test]
    fn success_omits_error_field() {
        let wire = serde_json::to_value(JsonRpcResponse::success(json!(3), json!({}))).unwrap();
        assert_eq!(wire, json!({ "jsonrpc": "2.0", "id": 3, "result": {} }));
    }

    #[test]
    fn error_omits_result_field() {
        let resp = JsonRpcResponse::error(json!(4), METHOD_NOT_FOUND, "Method not found: resources/list");
        let wire = serde_json::to_value(&resp).unwrap();

        assert!(wire.get("result").is_none());
        assert_eq!(wire["error"]["code"], -32601);
        assert_eq!(wire["error"]["message"], "Method not found: resources/list");
        assert!(wire["error"].get("data").is_none());
    }
}
