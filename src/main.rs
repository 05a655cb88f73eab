use dotenvy::dotenv;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use activity_board::config::Config;
use activity_board::database::{self, schema};
use activity_board::error::StartupError;
use activity_board::services::seed_service;
use activity_board::web;

#[tokio::main]
async fn main() {
    // Load .env file
    dotenv().ok();

    // 1. Start logging
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run().await {
        error!("startup failed: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), StartupError> {
    let config = Config::load()?;

    // 2. Connect to the database
    info!(database_url = %config.database_url, "connecting to database");
    let pool = database::connect(&config.database_url).await?;
    schema::ensure_schema(&pool).await?;

    // 3. Seed once, before accepting traffic
    let catalog = seed_service::load_catalog(&config.catalog_path)?;
    let report = seed_service::seed_activities(&pool, &catalog, config.seed_reset_threshold).await?;
    info!(
        existing = report.existing,
        dropped = report.dropped,
        inserted = report.inserted,
        "activity store ready"
    );

    // 4. Build the application
    let app = web::build_router(pool.clone(), &config.static_dir);

    // 5. Start the server (with fallback port)
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

    let listener = match TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            let fallback = SocketAddr::new(addr.ip(), addr.port().wrapping_add(1));
            warn!("could not bind {}: {}. trying fallback {}", addr, e, fallback);
            TcpListener::bind(fallback).await?
        }
    };

    info!("server running on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    info!("database connection closed");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
        info!("received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("received terminate signal, shutting down");
            }
            Err(e) => {
                warn!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
