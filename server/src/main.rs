use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{info, warn};

use promo_server::{AppState, database, init_tracing, server};
use promo_shared::config::load_config;

#[derive(Parser)]
#[command(name = "promo-server")]
#[command(about = "Mints and verifies signed promo-discount tokens", long_about = None)]
struct Cli {
    /// Path to the TOML config file
    #[arg(long = "config", short = 'c', default_value = "config.toml")]
    config_path: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let path = cli.config_path.to_string_lossy().into_owned();

    let config = load_config(&path).with_context(|| format!("Failed to load config from {}", path))?;
    let secret = config
        .promo
        .resolved_secret()
        .ok_or_else(|| anyhow!("No promo signing secret configured"))?;

    let db = database::connect(&config.database.url)
        .await
        .with_context(|| format!("Failed to open database {}", config.database.url))?;
    database::create_tables(&db)
        .await
        .context("Failed to create database tables")?;

    let addr = config.server.addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!(
        "Promo tokens valid for {} minutes, minting window {} hours",
        config.promo.token_ttl_minutes, config.promo.mint_window_hours
    );

    let state = AppState::new(config, &secret, db);

    server::serve(listener, state, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for ctrl-c: {}", e);
            std::future::pending::<()>().await;
        }
    })
    .await?;

    info!("Server closed");
    Ok(())
}
