use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use figma_core::error::Error;
use figma_core::traits::FigmaApi;
use figma_core::types::ToolRequest;

use crate::tools::ToolRegistry;

/// The `params` of a `tools/call` request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInvocation {
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

/// One content item of a tool result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolContent {
    Text { text: String },
}

/// The result of a `tools/call`, in MCP wire shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResult {
    pub content: Vec<ToolContent>,
    #[serde(rename = "isError", default, skip_serializing_if = "is_false")]
    pub is_error: bool,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_false(value: &bool) -> bool {
    !*value
}

impl ToolResult {
    /// Wrap an API response as indented JSON text.
    pub fn json(value: &Value) -> Self {
        match serde_json::to_string_pretty(value) {
            Ok(text) => Self {
                content: vec![ToolContent::Text { text }],
                is_error: false,
            },
            Err(e) => Self::error(format!("failed to serialize response: {e}")),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text {
                text: message.into(),
            }],
            is_error: true,
        }
    }

    /// Text of the single content item.
    pub fn text(&self) -> &str {
        match self.content.first() {
            Some(ToolContent::Text { text }) => text,
            None => "",
        }
    }
}

/// Routes tool calls for one connection to its Figma API client.
///
/// Every failure, whether a bad argument, an unknown tool or an upstream
/// error, comes back as an `isError` result. Nothing here can take the
/// connection down.
#[derive(Clone)]
pub struct Dispatcher {
    api: Arc<dyn FigmaApi>,
}

impl Dispatcher {
    #[must_use]
    pub fn new(api: Arc<dyn FigmaApi>) -> Self {
        Self { api }
    }

    /// Handle one `tools/call`.
    pub async fn call(&self, invocation: &ToolInvocation) -> ToolResult {
        let outcome = match ToolRegistry::parse(&invocation.name, &invocation.arguments) {
            Ok(request) => self.execute(&request).await,
            Err(err) => Err(err),
        };

        match outcome {
            Ok(value) => {
                tracing::debug!(tool = %invocation.name, "Tool call succeeded");
                ToolResult::json(&value)
            }
            Err(err) => {
                tracing::warn!(tool = %invocation.name, error = %err, "Tool call failed");
                ToolResult::error(err.to_string())
            }
        }
    }

    /// Run an already validated request against the API.
    ///
    /// # Errors
    ///
    /// Propagates the API client's error unchanged.
    pub async fn execute(&self, request: &ToolRequest) -> Result<Value, Error> {
        tracing::debug!(
            tool = request.tool_name(),
            file_key = request.file_key(),
            "Calling Figma API"
        );
        match request {
            ToolRequest::GetFile(params) => self.api.get_file(params).await,
            ToolRequest::GetNode(params) => self.api.get_file_nodes(params).await,
            ToolRequest::GetImage(params) => self.api.get_image(params).await,
            ToolRequest::GetImageFills(params) => self.api.get_image_fills(params).await,
            ToolRequest::GetComments(params) => self.api.get_comments(params).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::json;

    use figma_core::types::{GetComments, GetFile, GetFileNodes, GetImage, GetImageFills};

    use super::*;

    /// Records every call and answers with a canned value or error.
    #[derive(Default)]
    struct StubApi {
        calls: Mutex<Vec<String>>,
        fail_with: Option<(Option<u16>, String)>,
        response: Value,
    }

    impl StubApi {
        fn answering(response: Value) -> Self {
            Self {
                response,
                ..Self::default()
            }
        }

        fn failing(status: Option<u16>, message: &str) -> Self {
            Self {
                fail_with: Some((status, message.to_string())),
                ..Self::default()
            }
        }

        fn record(&self, call: String) -> Result<Value, Error> {
            self.calls.lock().unwrap().push(call);
            match &self.fail_with {
                Some((status, message)) => Err(Error::network(*status, message.clone())),
                None => Ok(self.response.clone()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl FigmaApi for StubApi {
        async fn get_file(&self, params: &GetFile) -> Result<Value, Error> {
            self.record(format!("get_file {} {:?}", params.file_key, params.depth))
        }

        async fn get_file_nodes(&self, params: &GetFileNodes) -> Result<Value, Error> {
            self.record(format!("get_file_nodes {} {}", params.file_key, params.ids.join(",")))
        }

        async fn get_image(&self, params: &GetImage) -> Result<Value, Error> {
            self.record(format!(
                "get_image {} {} {} {}",
                params.file_key,
                params.ids.join(","),
                params.format,
                params.scale
            ))
        }

        async fn get_image_fills(&self, params: &GetImageFills) -> Result<Value, Error> {
            self.record(format!("get_image_fills {}", params.file_key))
        }

        async fn get_comments(&self, params: &GetComments) -> Result<Value, Error> {
            self.record(format!("get_comments {}", params.file_key))
        }

        async fn get_team_projects(&self, team_id: &str) -> Result<Value, Error> {
            self.record(format!("get_team_projects {team_id}"))
        }

        async fn get_project_files(&self, project_id: &str) -> Result<Value, Error> {
            self.record(format!("get_project_files {project_id}"))
        }
    }

    fn invocation(name: &str, arguments: Value) -> ToolInvocation {
        ToolInvocation {
            name: name.to_string(),
            arguments,
        }
    }

    fn valid_calls() -> Vec<ToolInvocation> {
        vec![
            invocation("get_file", json!({ "file_key": "F" })),
            invocation("get_node", json!({ "file_key": "F", "node_id": "1:2" })),
            invocation("get_image", json!({ "file_key": "F", "node_id": "1:2" })),
            invocation("get_image_fills", json!({ "file_key": "F" })),
            invocation("get_comments", json!({ "file_key": "F" })),
        ]
    }

    #[tokio::test]
    async fn success_text_roundtrips_to_api_value() {
        let body = json!({ "name": "doc", "nodes": { "1:2": { "type": "FRAME" } } });
        let stub = Arc::new(StubApi::answering(body.clone()));
        let dispatcher = Dispatcher::new(stub.clone());

        for call in valid_calls() {
            let result = dispatcher.call(&call).await;
            assert!(!result.is_error, "{} failed: {}", call.name, result.text());
            let parsed: Value = serde_json::from_str(result.text()).unwrap();
            assert_eq!(parsed, body);
        }
        assert_eq!(stub.calls().len(), 5);
    }

    #[tokio::test]
    async fn success_text_is_pretty_printed() {
        let stub = Arc::new(StubApi::answering(json!({ "name": "doc" })));
        let dispatcher = Dispatcher::new(stub);

        let result = dispatcher
            .call(&invocation("get_file", json!({ "file_key": "X" })))
            .await;

        assert_eq!(result.text(), "{\n  \"name\": \"doc\"\n}");
        let wire = serde_json::to_value(&result).unwrap();
        assert!(wire.get("isError").is_none());
        assert_eq!(wire["content"][0]["type"], "text");
    }

    #[tokio::test]
    async fn unknown_tool_is_error_result() {
        let stub = Arc::new(StubApi::default());
        let dispatcher = Dispatcher::new(stub.clone());

        let result = dispatcher
            .call(&invocation("get_team_projects", json!({})))
            .await;

        assert!(result.is_error);
        assert_eq!(result.text(), "Unknown tool: get_team_projects");
        assert!(stub.calls().is_empty());
    }

    #[tokio::test]
    async fn missing_node_id_never_reaches_api() {
        let stub = Arc::new(StubApi::default());
        let dispatcher = Dispatcher::new(stub.clone());

        let result = dispatcher
            .call(&invocation("get_node", json!({ "file_key": "F" })))
            .await;

        assert!(result.is_error);
        assert!(result.text().contains("node_id"));
        assert!(stub.calls().is_empty());
    }

    #[tokio::test]
    async fn bad_format_fails_before_network() {
        let stub = Arc::new(StubApi::default());
        let dispatcher = Dispatcher::new(stub.clone());

        let result = dispatcher
            .call(&invocation(
                "get_image",
                json!({ "file_key": "F", "node_id": "1:2", "format": "gif" }),
            ))
            .await;

        assert!(result.is_error);
        assert!(result.text().contains("format"));
        assert!(stub.calls().is_empty());
    }

    #[tokio::test]
    async fn network_errors_become_error_results() {
        let stub = Arc::new(StubApi::failing(Some(403), "Invalid token"));
        let dispatcher = Dispatcher::new(stub.clone());

        for call in valid_calls() {
            let result = dispatcher.call(&call).await;
            assert!(result.is_error);
            assert!(result.text().contains("Invalid token"), "{}", result.text());
        }
        assert_eq!(stub.calls().len(), 5);
    }

    #[tokio::test]
    async fn image_arguments_reach_api_typed() {
        let stub = Arc::new(StubApi::answering(json!({})));
        let dispatcher = Dispatcher::new(stub.clone());

        dispatcher
            .call(&invocation(
                "get_image",
                json!({ "file_key": "F", "node_id": "1:2,3:4", "format": "pdf", "scale": 2 }),
            ))
            .await;

        assert_eq!(stub.calls(), vec!["get_image F 1:2,3:4 pdf 2"]);
    }

    #[test]
    fn invocation_without_arguments() {
        let call: ToolInvocation = serde_json::from_value(json!({ "name": "get_file" })).unwrap();
        assert!(call.arguments.is_null());
    }
}
