mod config;
mod error;
mod handlers;
mod models;
mod router;
mod state;
mod ticker;

use anyhow::Context;
use config::GatewayConfig;
use ledger::Ledger;
use market_data::MarketSimulator;
use persistence::JsonFileStore;
use router::create_router;
use state::AppState;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // A missing .env is fine; a malformed one is worth a warning
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Warning: failed to load .env: {}", e);
        }
    }

    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,entrepreneur_sim=debug,ledger=debug")),
        )
        .init();

    tracing::info!("Starting Entrepreneur Simulator service");

    let config = GatewayConfig::from_env()?;
    tracing::info!(?config, "configuration loaded");

    // Open the data directory and load the ledger
    let store = JsonFileStore::open(&config.data_dir)
        .with_context(|| format!("opening data directory {}", config.data_dir.display()))?;
    let ledger = Ledger::open(Box::new(store), config.policy.clone())?;
    let simulator = MarketSimulator::new(config.volatility)?;
    let state = AppState::new(ledger, simulator);

    match config.market_tick {
        Some(period) => {
            ticker::spawn_market_ticker(state.clone(), period);
        }
        None => tracing::info!("market ticker disabled"),
    }

    // Create router
    let app = create_router(state);

    // Bind and serve
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;

    tracing::info!("Listening on {}", addr);
    tracing::info!("Default logins: teacher/teacher123, student1/student1, student2/student2, student3/student3");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
