//! furqand — Furqan proxy daemon.
//!
//! Serves the caching proxy over HTTP, sharing one cache across all
//! connections for the life of the process.

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;

use furqan::server::config::{Config, Secrets};
use furqan::{Furqan, FurqanError};

/// Furqan daemon — caching proxy for the Quran.com API.
#[derive(Parser)]
#[command(name = "furqand")]
#[command(version = furqan::PKG_VERSION)]
#[command(about = "Furqan caching proxy daemon")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    // Load configuration
    let config = Config::load(args.config.as_deref())?;
    let secrets = Secrets::load()?;

    let assembler = Furqan::builder()
        .base_url(&config.upstream.base_url)
        .credentials(secrets.credentials())
        .build()?;

    // Parse address
    let addr: SocketAddr = config
        .server
        .address
        .parse()
        .map_err(|e| FurqanError::Configuration(format!("Invalid address: {e}")))?;

    let app = furqan::server::router(Arc::new(assembler), &config.cors.allowed_origins)?;
    let listener = TcpListener::bind(addr).await?;

    info!(
        version = furqan::version_string(),
        %addr,
        upstream = %config.upstream.base_url,
        "furqand starting"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("furqand stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
    }
}
