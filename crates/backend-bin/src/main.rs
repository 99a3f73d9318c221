use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use backend_lib::{config::Settings, routes, store::FlatFileUserStore, AppState};

/// reelsearch authentication server
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Path to a TOML config file (overrides the default search locations)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let settings = match &args.config {
        Some(path) => Settings::load_from(path)?,
        None => Settings::load().or_else(|_| Settings::load_from("config/default.toml"))?,
    };

    // Initialize tracing from the configured level
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&settings.log.level).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Create storage
    let store = Arc::new(FlatFileUserStore::new(&settings.storage.data_dir)?);

    // Create application state and router
    let addr = settings.server.bind_addr;
    let state = Arc::new(AppState::new(store, settings));
    let app = routes::create_router(state);

    // Start the server
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, app).await?;

    Ok(())
}
