//! Aquarium broadcast server
//!
//! Run with: aquarium-server [--bind ADDR] [--source NAME] [--window N] [--bins N]
//!
//! Observers connect over WebSocket (default ws://127.0.0.1:8765), receive a
//! greeting listing the known sources, then one frame per state vector.
//! Send `{"action":"switch","source":"weather"}` to change source.

use std::net::SocketAddr;

use clap::Parser;
use entropy_aquarium::{AquariumServer, ServerConfig, SourceKind};

/// Entropy signature broadcast server
#[derive(Debug, Parser)]
#[command(name = "aquarium-server", version, about)]
struct Args {
    /// Address to bind to
    #[arg(long, default_value = "127.0.0.1:8765")]
    bind: SocketAddr,

    /// Source selected at start (unknown names select "synthetic")
    #[arg(long, default_value = "synthetic")]
    source: String,

    /// Estimator history window in samples
    #[arg(long, default_value_t = 128)]
    window: usize,

    /// Estimator histogram buckets
    #[arg(long, default_value_t = 32)]
    bins: usize,

    /// Maximum concurrent connections (0 = unlimited)
    #[arg(long, default_value_t = 0)]
    max_connections: usize,

    /// Per-observer queue depth before an observer is dropped as lagging
    #[arg(long, default_value_t = 64)]
    queue_capacity: usize,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("entropy_aquarium=info".parse()?)
                .add_directive("aquarium_server=info".parse()?),
        )
        .init();

    let source = SourceKind::resolve(&args.source, SourceKind::DEFAULT);
    if source.name() != args.source {
        tracing::warn!(requested = %args.source, source = %source, "Unknown source, using default");
    }

    let config = ServerConfig::with_addr(args.bind)
        .max_connections(args.max_connections)
        .default_source(source)
        .estimator(args.window, args.bins)
        .queue_capacity(args.queue_capacity);

    let server = AquariumServer::new(config)?;

    tracing::info!(
        sources = ?SourceKind::names(),
        "Connect with a WebSocket client to ws://{}",
        server.bind_addr()
    );

    server
        .run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            }
        })
        .await?;

    tracing::info!("Shut down");
    Ok(())
}
