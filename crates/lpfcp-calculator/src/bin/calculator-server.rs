//! Calculator server - exposes the calculator over LPFCP/HTTP.

use anyhow::Result;
use clap::Parser;
use lpfcp_axum::{LpfcpServer, ServerConfig};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "calculator-server")]
#[command(about = "Serve the calculator over LPFCP")]
struct Args {
    /// Port to listen on (0 = auto-assign)
    #[arg(short, long, default_value = "8080")]
    port: u16,

    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Route the calculator is served on
    #[arg(long, default_value = "/lpfcp")]
    path: String,

    /// Allow cross-origin calls from any origin
    #[arg(long)]
    cors: bool,

    /// Seconds to wait for in-flight calls on shutdown
    #[arg(long, default_value = "5")]
    grace_period: u64,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.debug { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .init();

    info!("Starting calculator server");

    let config = ServerConfig {
        host: args.host,
        port: args.port,
        path: args.path,
        permissive_cors: args.cors,
        ..ServerConfig::default()
    };

    let processor = Arc::new(lpfcp_calculator::processor()?);
    let server = LpfcpServer::start(processor, config).await?;

    // Machine-readable port line for scripts that start the server with --port 0
    println!("LPFCP_PORT={}", server.addr().port());

    info!("Calculator available at {}", server.endpoint());

    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received, exiting");

    let grace = Duration::from_secs(args.grace_period);
    if !server.shutdown_with_timeout(grace).await {
        warn!("In-flight calls were cancelled after {:?}", grace);
    }
    Ok(())
}
