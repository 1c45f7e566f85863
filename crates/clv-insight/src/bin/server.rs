//! CLV Server binary
//!
//! Run with: cargo run -p clv-insight --bin clv-insight-server -- --config clv.toml

use clap::Parser;
use clv_insight::{config::ClvConfig, server::ClvServer};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "clv-insight-server", version, about = "Insurance CLV analytics server")]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the bind host
    #[arg(long)]
    host: Option<String>,

    /// Override the bind port
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "clv_insight=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    // Load configuration
    let mut config = ClvConfig::load(args.config.as_deref())?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    config.validate()?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - Extraction model: {}", config.llm.extraction_model);
    tracing::info!("  - Recommendation model: {}", config.llm.recommendation_model);
    tracing::info!("  - Batch size: {}", config.ingestion.batch_size);
    tracing::info!("  - Strict row counts: {}", config.ingestion.strict_row_counts);

    let server = ClvServer::new(config).await?;

    match server.state().pipeline().provider().health_check().await {
        Ok(true) => tracing::info!("Gemini API is reachable"),
        _ => {
            tracing::warn!("Gemini API not reachable; /ready reports 503 until it is");
            server.state().set_ready(false);
        }
    }

    println!("\nServer starting...");
    println!("  API: http://{}", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("  API Info: http://{}/api/info", server.address());
    println!("\nEndpoints:");
    println!("  POST /api/customers/upload  - Upload customer CSV");
    println!("  GET  /api/customers         - List customers");
    println!("  GET  /api/dashboard         - CLV summary");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
