use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an SSE session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub Uuid);

impl SessionId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

/// Bearer token for the Figma API.
///
/// Deliberately has no `Display` or `Serialize` impl, and its `Debug` output
/// is redacted, so a token cannot end up in logs or on disk by accident.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token, for placing into the request header.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Output format for rendered images.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[default]
    Png,
    Jpg,
    Svg,
    Pdf,
}

impl ImageFormat {
    pub const ALL: [ImageFormat; 4] = [Self::Png, Self::Jpg, Self::Svg, Self::Pdf];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpg => "jpg",
            Self::Svg => "svg",
            Self::Pdf => "pdf",
        }
    }
}

impl std::fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|format| format.as_str() == s)
            .ok_or_else(|| format!("unsupported image format '{s}'"))
    }
}

/// Parameters for fetching a whole file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetFile {
    pub file_key: String,
    pub depth: Option<u32>,
}

/// Parameters for fetching a subset of nodes from a file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetFileNodes {
    pub file_key: String,
    pub ids: Vec<String>,
    pub depth: Option<u32>,
}

/// Parameters for rendering nodes as images.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetImage {
    pub file_key: String,
    pub ids: Vec<String>,
    pub format: ImageFormat,
    pub scale: f64,
}

impl GetImage {
    pub const DEFAULT_SCALE: f64 = 1.0;
    pub const MIN_SCALE: f64 = 0.01;
    pub const MAX_SCALE: f64 = 4.0;
}

/// Parameters for listing the image fills of a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetImageFills {
    pub file_key: String,
}

/// Parameters for listing the comments of a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetComments {
    pub file_key: String,
}

/// A validated tool invocation, ready to be sent to the Figma API.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolRequest {
    GetFile(GetFile),
    GetNode(GetFileNodes),
    GetImage(GetImage),
    GetImageFills(GetImageFills),
    GetComments(GetComments),
}

impl ToolRequest {
    /// Name of the tool this request was parsed from.
    #[must_use]
    pub fn tool_name(&self) -> &'static str {
        match self {
            Self::GetFile(_) => "get_file",
            Self::GetNode(_) => "get_node",
            Self::GetImage(_) => "get_image",
            Self::GetImageFills(_) => "get_image_fills",
            Self::GetComments(_) => "get_comments",
        }
    }

    #[must_use]
    pub fn file_key(&self) -> &str {
        match self {
            Self::GetFile(req) => &req.file_key,
            Self::GetNode(req) => &req.file_key,
            Self::GetImage(req) => &req.file_key,
            Self::GetImageFills(req) => &req.file_key,
            Self::GetComments(req) => &req.file_key,
        }
    }
}
