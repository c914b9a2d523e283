//! Service Gateway
//!
//! A reverse-proxy gateway built with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!                       ┌──────────────────────────────────────────────────┐
//!                       │                    GATEWAY                       │
//!   Client Request      │  ┌─────────┐    ┌──────────┐    ┌────────────┐   │
//!   ────────────────────┼─▶│  http   │───▶│ routing  │───▶│  selector  │   │
//!                       │  │ server  │    │ (service │    │ round robin│   │
//!                       │  └─────────┘    │  lookup) │    │ + failover │   │
//!                       │                 └──────────┘    └─────┬──────┘   │
//!                       │                                       │ probe    │
//!                       │                                       ▼          │
//!   Client Response     │  ┌──────────┐                   ┌────────────┐   │
//!   ◀───────────────────┼──│ response │◀──────────────────│ forwarder  │◀──┼── Backend
//!                       │  └──────────┘                   └────────────┘   │
//!                       └──────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use service_gateway::config::{self, validation::validate_config, ConfigError, GatewayConfig};
use service_gateway::observability::{logging, metrics};
use service_gateway::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "service-gateway")]
#[command(about = "Round-robin API gateway with health-checked failover", long_about = None)]
struct Cli {
    /// TOML configuration file; built-in defaults are used when absent.
    #[arg(short, long, env = "GATEWAY_CONFIG")]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,
}

fn load(cli: &Cli) -> Result<GatewayConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => GatewayConfig::default(),
    };

    if let Some(bind) = &cli.bind {
        config.listener.bind_address = bind.clone();
        validate_config(&config).map_err(ConfigError::Validation)?;
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load(&cli)?;

    logging::init_logging(&config.observability)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = ?cli.config,
        services = config.services.0.len(),
        mode = ?config.selection.mode,
        "service-gateway starting"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let server = HttpServer::new(config)?;

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
