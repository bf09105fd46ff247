//! HTTP server for the leave and invoice rules engine.

use std::net::SocketAddr;

use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use erp_rules_engine::api::{AppState, create_router};
use erp_rules_engine::config::ConfigLoader;

/// Leave and invoice rules engine server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory holding policy.yaml and the holidays/ calendars
    #[arg(short, long, default_value = "./config/libya")]
    config: String,

    /// Address to bind the server to
    #[arg(short, long, default_value = "127.0.0.1:8080")]
    bind: SocketAddr,
}

fn init_logger() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("erp_rules_engine=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .compact(),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logger();

    let config = ConfigLoader::load(&args.config)?;
    info!(
        company = %config.company().code,
        holidays = config.holidays().len(),
        "Loaded configuration from {}",
        args.config
    );

    let app = create_router(AppState::new(config));

    let listener = tokio::net::TcpListener::bind(args.bind).await?;
    info!("Server listening on {}", args.bind);
    axum::serve(listener, app).await?;

    Ok(())
}
