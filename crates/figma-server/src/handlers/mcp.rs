use std::convert::Infallible;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive},
    response::{IntoResponse, Response, Sse},
    Json,
};
use serde::Deserialize;
use tokio_stream::{wrappers::ReceiverStream, StreamExt};

use figma_core::types::SessionId;
use figma_mcp::jsonrpc::PARSE_ERROR;
use figma_mcp::{JsonRpcRequest, JsonRpcResponse};

use crate::app_state::AppState;
use crate::rpc;
use crate::session::DeliveryError;

/// Query parameters accepted when opening a connection.
#[derive(Deserialize)]
pub struct ConnectQuery {
    pub token: Option<String>,
}

/// Query parameters of a posted session message.
#[derive(Deserialize)]
pub struct MessageQuery {
    #[serde(rename = "sessionId")]
    pub session_id: Option<String>,
}

fn missing_token() -> (StatusCode, String) {
    (
        StatusCode::BAD_REQUEST,
        "Missing token query parameter".to_string(),
    )
}

/// Open an MCP SSE stream.
///
/// Per the MCP SSE transport:
/// 1. Server sends `event: endpoint` with the session's POST URL
/// 2. Client POSTs JSON-RPC to that URL
/// 3. Server sends responses back via SSE `event: message`
#[allow(clippy::missing_errors_doc)]
pub async fn sse_connect(
    State(state): State<AppState>,
    Query(query): Query<ConnectQuery>,
) -> Result<Sse<impl tokio_stream::Stream<Item = Result<Event, Infallible>>>, (StatusCode, String)>
{
    let dispatcher = state
        .dispatcher_for(query.token.as_deref())
        .ok_or_else(missing_token)?;

    let session = state.sessions.open(dispatcher);
    let guard = session.guard;

    let endpoint = format!("/messages?sessionId={}", session.id);
    let init_stream = tokio_stream::once(Ok(Event::default().event("endpoint").data(endpoint)));

    let event_stream = ReceiverStream::new(session.outbound).map(move |response| {
        // The guard lives as long as the stream; dropping it closes the session.
        let _open = &guard;
        Ok(Event::default()
            .event("message")
            .json_data(&response)
            .unwrap_or_else(|_| Event::default().data("error serializing response")))
    });

    Ok(Sse::new(init_stream.chain(event_stream)).keep_alive(KeepAlive::default()))
}

/// Accept a JSON-RPC message for an open session.
///
/// Returns 202 once queued; the response travels back over the session's
/// SSE stream. A session whose stream has stopped draining answers 503.
#[allow(clippy::missing_errors_doc)]
pub async fn post_message(
    State(state): State<AppState>,
    Query(query): Query<MessageQuery>,
    body: Bytes,
) -> Result<(StatusCode, &'static str), (StatusCode, String)> {
    let Some(raw_id) = query.session_id.filter(|id| !id.is_empty()) else {
        return Err((StatusCode::BAD_REQUEST, "Missing sessionId".to_string()));
    };

    let not_found = || (StatusCode::NOT_FOUND, "Session not found".to_string());
    let session_id: SessionId = raw_id.parse().map_err(|_| not_found())?;
    let transport = state.sessions.lookup(&session_id).map_err(|_| not_found())?;

    let req: JsonRpcRequest = serde_json::from_slice(&body).map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            format!("Invalid JSON-RPC message: {e}"),
        )
    })?;
    tracing::debug!(session_id = %session_id, method = %req.method, "Session message");

    transport.deliver(req).map_err(|err| match err {
        DeliveryError::Busy => {
            tracing::warn!(session_id = %session_id, "Session queue full, rejecting message");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "Session busy: the event stream is not being read".to_string(),
            )
        }
        DeliveryError::Closed => not_found(),
    })?;

    Ok((StatusCode::ACCEPTED, "Accepted"))
}

/// Handle a JSON-RPC request and answer it in the response body.
///
/// Builds a fresh dispatcher per request; no session is kept.
pub async fn mcp_request(
    State(state): State<AppState>,
    Query(query): Query<ConnectQuery>,
    body: Bytes,
) -> Response {
    let Some(dispatcher) = state.dispatcher_for(query.token.as_deref()) else {
        return missing_token().into_response();
    };

    let req: JsonRpcRequest = match serde_json::from_slice(&body) {
        Ok(req) => req,
        Err(e) => {
            let response = JsonRpcResponse::error(
                serde_json::Value::Null,
                PARSE_ERROR,
                format!("Parse error: {e}"),
            );
            return (StatusCode::OK, Json(response)).into_response();
        }
    };

    match rpc::handle(&dispatcher, req).await {
        Some(response) => (StatusCode::OK, Json(response)).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}
