use std::future::IntoFuture;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use figma_client::FigmaClientFactory;
use figma_server::app_state::AppState;
use figma_server::config::{ServerConfig, Tenancy};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = ServerConfig::parse();

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let tenancy = config.tenancy()?;
    let factory = FigmaClientFactory::new(&config.api_base, config.request_timeout()?)?;

    match tenancy {
        Tenancy::Fixed(_) => tracing::info!("Single-tenant mode: using the process Figma token"),
        Tenancy::PerConnection => {
            tracing::info!("Multi-tenant mode: connections must pass a token query parameter");
        }
    }

    let state = AppState::new(Arc::new(factory), tenancy);
    let app = figma_server::router::create_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Figma MCP server listening on {addr}");

    // SSE streams never end, so there is no graceful drain.
    tokio::select! {
        result = axum::serve(listener, app).into_future() => result?,
        () = shutdown_signal() => {}
    }

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
