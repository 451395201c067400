use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Error;
use crate::types::{Credential, GetComments, GetFile, GetFileNodes, GetImage, GetImageFills};

/// Read-only access to the Figma REST API.
///
/// Every operation returns the decoded JSON body untouched. Non-2xx responses
/// and transport failures surface as [`Error::Network`].
#[async_trait]
pub trait FigmaApi: Send + Sync {
    /// Fetch the document tree of a file.
    async fn get_file(&self, params: &GetFile) -> Result<Value, Error>;

    /// Fetch a subset of nodes by id.
    async fn get_file_nodes(&self, params: &GetFileNodes) -> Result<Value, Error>;

    /// Render nodes and return a map of node id to image URL.
    async fn get_image(&self, params: &GetImage) -> Result<Value, Error>;

    /// Return a map of image fill reference to image URL.
    async fn get_image_fills(&self, params: &GetImageFills) -> Result<Value, Error>;

    /// List the comments on a file.
    async fn get_comments(&self, params: &GetComments) -> Result<Value, Error>;

    /// List the projects of a team.
    async fn get_team_projects(&self, team_id: &str) -> Result<Value, Error>;

    /// List the files of a project.
    async fn get_project_files(&self, project_id: &str) -> Result<Value, Error>;
}

/// Builds an API client bound to one credential.
///
/// The server calls this once per connection, so every session talks to
/// Figma with its own token.
pub trait FigmaApiFactory: Send + Sync {
    fn connect(&self, credential: Credential) -> Arc<dyn FigmaApi>;
}
