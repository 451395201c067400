use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde_json::Value;

use figma_core::error::Error;
use figma_core::traits::{FigmaApi, FigmaApiFactory};
use figma_core::types::{Credential, GetComments, GetFile, GetFileNodes, GetImage, GetImageFills};

/// Base URL of the public Figma REST API.
pub const DEFAULT_API_BASE: &str = "https://api.figma.com/v1";

const TOKEN_HEADER: &str = "X-Figma-Token";

/// Figma API client bound to a single credential.
#[derive(Debug, Clone)]
pub struct FigmaClient {
    http: reqwest::Client,
    base: Url,
    credential: Credential,
}

impl FigmaClient {
    /// Create a client that shares the given connection pool.
    #[must_use]
    pub fn new(http: reqwest::Client, base: Url, credential: Credential) -> Self {
        Self {
            http,
            base,
            credential,
        }
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| Error::Internal(format!("invalid API base URL: {}", self.base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get(&self, segments: &[&str], query: &[(&str, String)]) -> Result<Value, Error> {
        let url = self.endpoint(segments)?;
        tracing::debug!(path = url.path(), "Figma API request");

        let response = self
            .http
            .get(url)
            .header(TOKEN_HEADER, self.credential.expose())
            .query(query)
            .send()
            .await
            .map_err(|e| Error::network(None, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "Figma API request failed");
            return Err(Error::network(
                Some(status.as_u16()),
                upstream_message(status, &body),
            ));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| Error::network(None, format!("invalid response body: {e}")))
    }
}

/// Pull a readable message out of an error response.
///
/// Figma answers with `{"status": 403, "err": "Invalid token"}`; other
/// services in front of it may use `message` or plain text.
fn upstream_message(status: StatusCode, body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<Value>(body) {
        if let Some(msg) = ["err", "message", "error"]
            .iter()
            .find_map(|field| json.get(field).and_then(Value::as_str))
        {
            return msg.to_string();
        }
    }

    let body = body.trim();
    if body.is_empty() {
        status.canonical_reason().unwrap_or("unknown error").to_string()
    } else {
        body.to_string()
    }
}

fn depth_query(depth: Option<u32>) -> Vec<(&'static str, String)> {
    depth.map(|d| ("depth", d.to_string())).into_iter().collect()
}

#[async_trait]
impl FigmaApi for FigmaClient {
    async fn get_file(&self, params: &GetFile) -> Result<Value, Error> {
        self.get(&["files", params.file_key.as_str()], &depth_query(params.depth))
            .await
    }

    async fn get_file_nodes(&self, params: &GetFileNodes) -> Result<Value, Error> {
        let mut query = vec![("ids", params.ids.join(","))];
        query.extend(depth_query(params.depth));
        self.get(&["files", params.file_key.as_str(), "nodes"], &query).await
    }

    async fn get_image(&self, params: &GetImage) -> Result<Value, Error> {
        let query = [
            ("ids", params.ids.join(",")),
            ("format", params.format.to_string()),
            ("scale", params.scale.to_string()),
        ];
        self.get(&["images", params.file_key.as_str()], &query).await
    }

    async fn get_image_fills(&self, params: &GetImageFills) -> Result<Value, Error> {
        self.get(&["files", params.file_key.as_str(), "images"], &[]).await
    }

    async fn get_comments(&self, params: &GetComments) -> Result<Value, Error> {
        self.get(&["files", params.file_key.as_str(), "comments"], &[]).await
    }

    async fn get_team_projects(&self, team_id: &str) -> Result<Value, Error> {
        self.get(&["teams", team_id, "projects"], &[]).await
    }

    async fn get_project_files(&self, project_id: &str) -> Result<Value, Error> {
        self.get(&["projects", project_id, "files"], &[]).await
    }
}

/// Hands out [`FigmaClient`]s that share one HTTP connection pool.
#[derive(Debug, Clone)]
pub struct FigmaClientFactory {
    http: reqwest::Client,
    base: Url,
}

impl FigmaClientFactory {
    /// Build a factory for the given API base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL does not parse or the HTTP client
    /// cannot be constructed.
    pub fn new(api_base: &str, timeout: Duration) -> Result<Self, Error> {
        let base = Url::parse(api_base)
            .map_err(|e| Error::Internal(format!("invalid API base URL '{api_base}': {e}")))?;
        if base.cannot_be_a_base() {
            return Err(Error::Internal(format!(
                "invalid API base URL '{api_base}'"
            )));
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("figma-mcp/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http, base })
    }

    /// Build a client directly, without going through the trait object.
    #[must_use]
    pub fn client(&self, credential: Credential) -> FigmaClient {
        FigmaClient::new(self.http.clone(), self.base.clone(), credential)
    }
}

impl FigmaApiFactory for FigmaClientFactory {
    fn connect(&self, credential: Credential) -> Arc<dyn FigmaApi> {
        Arc::new(self.client(credential))
    }
}
