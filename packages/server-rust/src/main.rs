//! `ReqShape` server binary.

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use reqshape_core::Engine;
use reqshape_server::network::{NetworkConfig, NetworkModule};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Command-line and environment configuration.
#[derive(Debug, Parser)]
#[command(name = "reqshape", about = "Request-shape learning and validation server")]
struct Args {
    /// Bind address.
    #[arg(long, env = "REQSHAPE_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on (0 = OS-assigned).
    #[arg(long, env = "REQSHAPE_PORT", default_value_t = 3000)]
    port: u16,

    /// Allowed CORS origins, comma-separated. `*` allows any origin.
    #[arg(
        long = "cors-origin",
        env = "REQSHAPE_CORS_ORIGINS",
        value_delimiter = ',',
        default_value = "*"
    )]
    cors_origins: Vec<String>,

    /// Request timeout in seconds.
    #[arg(long, env = "REQSHAPE_REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    request_timeout_secs: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = NetworkConfig {
        host: args.host,
        port: args.port,
        cors_origins: args.cors_origins,
        request_timeout: Duration::from_secs(args.request_timeout_secs),
    };

    let engine = Arc::new(Engine::new());
    let mut module = NetworkModule::new(config, engine);
    let port = module.start().await?;
    info!(port, "reqshape server started");

    module
        .serve(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown signal received");
        })
        .await
}
