use sqlx::SqlitePool;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use crate::database::activities_repo::{self, NewActivity};
use crate::models::{CatalogEntry, SeedCatalog};

#[derive(Error, Debug)]
pub enum SeedError {
    #[error("failed to read activity catalog {path}: {source}")]
    ReadCatalog {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse activity catalog: {0}")]
    ParseCatalog(#[from] serde_json::Error),

    #[error("invalid catalog entry {name:?}: {reason}")]
    InvalidEntry { name: String, reason: String },

    #[error("database error while seeding: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedReport {
    /// Activities found in the store before seeding.
    pub existing: i64,
    pub dropped: bool,
    pub inserted: usize,
}

pub fn load_catalog(path: &Path) -> Result<SeedCatalog, SeedError> {
    let raw = std::fs::read_to_string(path).map_err(|source| SeedError::ReadCatalog {
        path: path.to_path_buf(),
        source,
    })?;
    parse_catalog(&raw)
}

pub fn parse_catalog(raw: &str) -> Result<SeedCatalog, SeedError> {
    let catalog: SeedCatalog = serde_json::from_str(raw)?;
    for (name, entry) in &catalog {
        validate_entry(name, entry)?;
    }
    Ok(catalog)
}

fn validate_entry(name: &str, entry: &CatalogEntry) -> Result<(), SeedError> {
    let invalid = |reason: String| SeedError::InvalidEntry {
        name: name.to_string(),
        reason,
    };

    if name.trim().is_empty() {
        return Err(invalid("activity name is empty".to_string()));
    }
    if entry.max_participants < 1 {
        return Err(invalid(format!(
            "max_participants must be at least 1, got {}",
            entry.max_participants
        )));
    }
    if entry.participants.len() as i64 > entry.max_participants {
        return Err(invalid(format!(
            "{} participants exceed capacity {}",
            entry.participants.len(),
            entry.max_participants
        )));
    }
    let mut seen = HashSet::new();
    if let Some(dup) = entry.participants.iter().find(|e| !seen.insert(e.as_str())) {
        return Err(invalid(format!("participant {} is listed twice", dup)));
    }
    Ok(())
}

/// Makes the store reflect `catalog` once per deployment.
///
/// A store holding more than `reset_threshold` activities (default: the catalog
/// size) is treated as polluted by earlier runs and dropped before seeding. An
/// empty store gets every catalog entry in one transaction. Anything else is
/// assumed to be seeded already and is left alone.
pub async fn seed_activities(
    pool: &SqlitePool,
    catalog: &SeedCatalog,
    reset_threshold: Option<usize>,
) -> Result<SeedReport, SeedError> {
    let threshold = reset_threshold.unwrap_or(catalog.len()) as i64;

    let existing = activities_repo::count_activities(pool).await?;
    info!(existing, threshold, "found existing activities");

    let mut count = existing;
    let mut dropped = false;
    if count > threshold {
        warn!(count, threshold, "more activities than expected, dropping store");
        activities_repo::drop_all(pool).await?;
        count = 0;
        dropped = true;
    }

    if count > 0 {
        if count != catalog.len() as i64 {
            warn!(
                count,
                catalog = catalog.len(),
                "store and catalog sizes differ, leaving store untouched"
            );
        }
        return Ok(SeedReport {
            existing,
            dropped,
            inserted: 0,
        });
    }

    info!(activities = catalog.len(), "populating store from catalog");
    let mut tx = pool.begin().await?;
    for (name, entry) in catalog {
        activities_repo::insert_activity(
            &mut *tx,
            NewActivity {
                name,
                description: &entry.description,
                schedule: &entry.schedule,
                max_participants: entry.max_participants,
            },
        )
        .await?;
        for email in &entry.participants {
            activities_repo::insert_seed_participant(&mut *tx, name, email).await?;
        }
    }
    tx.commit().await?;

    Ok(SeedReport {
        existing,
        dropped,
        inserted: catalog.len(),
    })
}
