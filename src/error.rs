use thiserror::Error;

use crate::config::ConfigError;
use crate::services::seed_service::SeedError;

/// Anything that stops the server from starting.
#[derive(Error, Debug)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("database unavailable: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Seed(#[from] SeedError),

    #[error("server i/o error: {0}")]
    Io(#[from] std::io::Error),
}
