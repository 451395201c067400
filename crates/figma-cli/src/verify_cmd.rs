use std::time::Duration;

use reqwest::{Client, Url};
use reqwest_eventsource::{Event, EventSource};
use tokio_stream::StreamExt;

/// Id of the final request; its response ends the run.
const TOOL_CALL_ID: i64 = 2;

/// Open an SSE session, walk through the MCP handshake, list the tools and
/// call `get_file`, printing every response.
pub async fn run(server: &str, token: &str, file_key: &str, timeout: Duration) -> anyhow::Result<()> {
    tokio::time::timeout(timeout, session(server, token, file_key))
        .await
        .map_err(|_| anyhow::anyhow!("no tool call response within {}s", timeout.as_secs()))?
}

async fn session(server: &str, token: &str, file_key: &str) -> anyhow::Result<()> {
    let client = Client::new();
    let base = Url::parse(server)?;
    let sse_url = Url::parse_with_params(base.join("/sse")?.as_str(), &[("token", token)])?;

    tracing::info!("Connecting to SSE: {}", base.join("/sse")?);
    let mut es = EventSource::get(sse_url);

    while let Some(event) = es.next().await {
        match event {
            Ok(Event::Open) => {
                tracing::info!("SSE connection established");
            }
            Ok(Event::Message(msg)) if msg.event == "endpoint" => {
                let endpoint = base.join(&msg.data)?;
                tracing::info!("Session endpoint: {endpoint}");
                send_requests(&client, &endpoint, file_key).await?;
            }
            Ok(Event::Message(msg)) => {
                let message: serde_json::Value = match serde_json::from_str(&msg.data) {
                    Ok(m) => m,
                    Err(e) => {
                        tracing::warn!("Failed to parse message: {e}");
                        continue;
                    }
                };
                println!("{}", serde_json::to_string_pretty(&message)?);

                if message["result"]["tools"].is_array() {
                    tracing::info!("Tools listed successfully");
                }
                if message["id"] == TOOL_CALL_ID {
                    tracing::info!("Tool call response received");
                    es.close();
                    return Ok(());
                }
            }
            Err(err) => {
                es.close();
                anyhow::bail!("SSE error: {err}");
            }
        }
    }

    anyhow::bail!("SSE stream ended before the tool call was answered")
}

async fn send_requests(client: &Client, endpoint: &Url, file_key: &str) -> anyhow::Result<()> {
    let requests = [
        serde_json::json!({
            "jsonrpc": "2.0",
            "id": 0,
            "method": "initialize",
            "params": {
                "protocolVersion": "2024-11-05",
                "capabilities": {},
                "clientInfo": { "name": "figma-mcp-cli", "version": env!("CARGO_PKG_VERSION") }
            }
        }),
        serde_json::json!({
            "jsonrpc": "2.0",
            "method": "notifications/initialized"
        }),
        serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "tools/list"
        }),
        serde_json::json!({
            "jsonrpc": "2.0",
            "id": TOOL_CALL_ID,
            "method": "tools/call",
            "params": {
                "name": "get_file",
                "arguments": { "file_key": file_key }
            }
        }),
    ];

    for request in &requests {
        let resp = client.post(endpoint.clone()).json(request).send().await?;
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await?;
            anyhow::bail!("Server rejected {}: {status} {body}", request["method"]);
        }
    }

    Ok(())
}
