use dotenvy::dotenv;

use activity_board::config::Config;
use activity_board::database::{self, activities_repo, schema};
use activity_board::services::seed_service;

// Drops every activity (rosters included) and reseeds from the catalog.
#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("reseed failed: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = reseed(&config).await {
        eprintln!("reseed failed: {}", e);
        std::process::exit(1);
    }
}

async fn reseed(config: &Config) -> Result<(), seed_service::SeedError> {
    let catalog = seed_service::load_catalog(&config.catalog_path)?;

    let pool = database::connect(&config.database_url).await?;
    schema::ensure_schema(&pool).await?;

    let dropped = activities_repo::drop_all(&pool).await?;
    let report = seed_service::seed_activities(&pool, &catalog, None).await?;
    println!(
        "reseed: dropped={}, inserted={}",
        dropped, report.inserted
    );

    pool.close().await;
    Ok(())
}
