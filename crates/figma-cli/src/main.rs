use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use figma_client::DEFAULT_API_BASE;

mod api_cmd;
mod verify_cmd;

#[derive(Parser)]
#[command(name = "figma-mcp", about = "Figma MCP CLI - check a running server or query Figma directly")]
struct Cli {
    /// Figma personal access token
    #[arg(long, env = "FIGMA_TOKEN", hide_env_values = true, global = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect to a figma-mcp server over SSE and exercise the protocol
    Verify {
        /// Server URL
        #[arg(long, env = "FIGMA_MCP_URL", default_value = "http://localhost:3000")]
        server: String,

        /// File key to request with `get_file`
        #[arg(long, default_value = "invalid_key")]
        file_key: String,

        /// Give up after this many seconds
        #[arg(long, default_value_t = 30)]
        timeout_secs: u64,
    },

    /// List the projects of a team
    Projects {
        /// Team ID
        team: String,

        /// Figma API base URL
        #[arg(long, env = "FIGMA_API_BASE", default_value = DEFAULT_API_BASE)]
        api_base: String,
    },

    /// List the files of a project
    Files {
        /// Project ID
        project: String,

        /// Figma API base URL
        #[arg(long, env = "FIGMA_API_BASE", default_value = DEFAULT_API_BASE)]
        api_base: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let token = cli
        .token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| anyhow::anyhow!("a Figma token is required (set FIGMA_TOKEN or --token)"))?;

    match cli.command {
        Commands::Verify {
            server,
            file_key,
            timeout_secs,
        } => {
            verify_cmd::run(
                &server,
                &token,
                &file_key,
                std::time::Duration::from_secs(timeout_secs),
            )
            .await?;
        }
        Commands::Projects { team, api_base } => {
            api_cmd::team_projects(&api_base, &token, &team).await?;
        }
        Commands::Files { project, api_base } => {
            api_cmd::project_files(&api_base, &token, &project).await?;
        }
    }

    Ok(())
}
