mod api;
mod catalog;
mod config;
mod db;
mod error;
mod orchestrator;
mod provider;
mod scheduler;
mod streak;
mod types;

use std::sync::Arc;

use sqlx::sqlite::{SqlitePoolOptions, SqliteConnectOptions};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::api::routes::{router, ApiState};
use crate::config::Config;
use crate::error::Result;
use crate::orchestrator::Scanner;
use crate::provider::ProviderClient;

#[tokio::main]
async fn main() {
    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {e}");
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cfg.log_level))
        .init();

    if let Err(e) = run(cfg).await {
        error!("Fatal error: {e}");
        std::process::exit(1);
    }
}

async fn run(cfg: Config) -> Result<()> {
    // --- Database setup ---
    let connect_opts = SqliteConnectOptions::new()
        .filename(&cfg.db_path)
        .create_if_missing(true);
    let pool = SqlitePoolOptions::new().connect_with(connect_opts).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("Database ready at {}", cfg.db_path);

    // --- Scanner ---
    let provider = ProviderClient::new(&cfg)?;
    let scanner = Arc::new(Scanner::new(cfg.clone(), provider, pool.clone()));
    info!(
        start_date = %cfg.start_date,
        budget_ms = cfg.scan_budget_ms,
        interval_secs = cfg.scan_interval_secs,
        "Scanner ready",
    );

    // Background batch loop
    let background = Arc::clone(&scanner);
    tokio::spawn(async move { background.run_periodic().await });

    // --- HTTP API server ---
    let api_state = ApiState { pool, scanner };
    let app = router(api_state);
    let bind_addr = format!("0.0.0.0:{}", cfg.api_port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("HTTP API listening on {bind_addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
