use crate::types::SessionId;

/// Core error type for the figma bridge.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Tool arguments did not match the declared schema.
    #[error("{0}")]
    Validation(String),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// The Figma API answered with a non-2xx status or could not be reached.
    #[error("{}", describe_network(*.status, .message))]
    Network {
        status: Option<u16>,
        message: String,
    },

    #[error("session not found: {0}")]
    SessionNotFound(SessionId),

    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn network(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Network {
            status,
            message: message.into(),
        }
    }
}

fn describe_network(status: Option<u16>, message: &str) -> String {
    match status {
        Some(code) => format!("Figma API error ({code}): {message}"),
        None => format!("Figma API request failed: {message}"),
    }
}
