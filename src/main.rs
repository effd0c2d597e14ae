//! Edge gateway - routes content requests to object storage or the admin service

use clap::Parser;
use edge_gateway::api::{router, AppState};
use edge_gateway::config::{Config, StorageConfig};
use edge_gateway::storage;
use edge_gateway::upstream::HttpAdminBackend;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Edge gateway - content routing and auth bridging
#[derive(Parser, Debug)]
#[command(name = "edge_gateway")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<String>,

    /// Listen address (overrides config)
    #[arg(short, long, value_name = "ADDR")]
    listen: Option<String>,

    /// Admin service base URL (overrides config)
    #[arg(short, long, value_name = "URL")]
    admin_url: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration from file if specified, otherwise use default loading
    let mut config = if let Some(ref path) = cli.config {
        Config::from_file(path)?
    } else {
        Config::load()?
    };

    // Initialize tracing; RUST_LOG wins over the configured level
    let log_level = if cli.verbose {
        "edge_gateway=trace,tower_http=trace".to_string()
    } else {
        config.log_level.clone()
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // CLI overrides
    if let Some(ref addr) = cli.listen {
        config.listen_addr = addr.parse()?;
    }
    if let Some(ref url) = cli.admin_url {
        config.admin_url = url.clone();
    }
    config.validate()?;

    info!("Starting edge gateway");
    info!("  Listen address: {}", config.listen_addr);
    info!("  Admin URL: {}", config.admin_url);

    match &config.storage {
        StorageConfig::Filesystem { path } => {
            info!("  Storage: Filesystem");
            info!("  Data directory: {:?}", path);
        }
        StorageConfig::S3 {
            endpoint, region, ..
        } => {
            info!("  Storage: S3");
            info!("  Region: {}", region);
            if let Some(ep) = endpoint {
                info!("  Endpoint: {}", ep);
            }
        }
    }

    if config.admin_excepted_orgs.is_empty() {
        info!("  Storage allow-list: empty (all documents via admin)");
    } else {
        info!("  Storage allow-list: {}", config.admin_excepted_orgs.join(", "));
    }
    if !config.admin_optin_orgs.is_empty() {
        info!("  Admin opt-in orgs: {}", config.admin_optin_orgs.join(", "));
    }
    let networks: Vec<String> = config
        .trusted_networks
        .iter()
        .map(|net| net.to_string())
        .collect();
    info!("  Trusted networks: {}", networks.join(", "));
    info!("  Client IP header: {}", config.client_ip_header);

    let object_store = storage::from_config(&config.storage).await?;
    let admin = Arc::new(HttpAdminBackend::new()?);
    let state = Arc::new(AppState::new(&config, object_store, admin)?);
    let app = router(state);

    // Start server with graceful shutdown
    let listener = TcpListener::bind(&config.listen_addr).await?;
    info!("Edge gateway listening on http://{}", config.listen_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Handle shutdown signals (SIGINT, SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            warn!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
