use std::time::Duration;

use clap::Parser;

use figma_client::DEFAULT_API_BASE;
use figma_core::types::Credential;

/// Errors that stop the server from starting.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("single-tenant mode requires a Figma token (set FIGMA_TOKEN or --figma-token)")]
    MissingToken,

    #[error("request timeout must be at least one second")]
    ZeroTimeout,
}

/// Command-line and environment configuration for the server.
///
/// No `Debug` derive: the struct may hold the process-wide token.
#[derive(Parser)]
#[command(
    name = "figma-mcp-server",
    about = "MCP server exposing the Figma REST API as tools over SSE"
)]
pub struct ServerConfig {
    /// Address to bind
    #[arg(long, env = "FIGMA_MCP_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Base URL of the Figma REST API
    #[arg(long, env = "FIGMA_API_BASE", default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    /// Serve every connection with the process token instead of a per-connection `token`
    #[arg(long, env = "FIGMA_MCP_SINGLE_TENANT")]
    pub single_tenant: bool,

    /// Figma personal access token (single-tenant mode)
    #[arg(long, env = "FIGMA_TOKEN", hide_env_values = true)]
    pub figma_token: Option<String>,

    /// Timeout for each Figma API request, in seconds
    #[arg(long, env = "FIGMA_REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// # Errors
    ///
    /// Returns an error if the timeout is zero.
    pub fn request_timeout(&self) -> Result<Duration, ConfigError> {
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(Duration::from_secs(self.request_timeout_secs))
    }

    /// Decide where connection credentials come from.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingToken`] in single-tenant mode when no
    /// token was supplied.
    pub fn tenancy(&self) -> Result<Tenancy, ConfigError> {
        if !self.single_tenant {
            return Ok(Tenancy::PerConnection);
        }
        match self.figma_token.as_deref().map(str::trim) {
            Some(token) if !token.is_empty() => Ok(Tenancy::Fixed(Credential::new(token))),
            _ => Err(ConfigError::MissingToken),
        }
    }
}

/// Source of the Figma credential for a new connection.
#[derive(Debug, Clone)]
pub enum Tenancy {
    /// Every connection brings its own `token` query parameter.
    PerConnection,
    /// One token for the whole process; `token` parameters are ignored.
    Fixed(Credential),
}

impl Tenancy {
    /// Credential for a connection that supplied `token`, if any.
    #[must_use]
    pub fn resolve(&self, token: Option<&str>) -> Option<Credential> {
        match self {
            Self::Fixed(credential) => Some(credential.clone()),
            Self::PerConnection => token
                .filter(|token| !token.is_empty())
                .map(Credential::new),
        }
    }
}
