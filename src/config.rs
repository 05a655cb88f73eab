use std::{env, fmt::Display, path::PathBuf, str::FromStr};

use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
#[error("invalid {key} value {value:?}: {reason}")]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub catalog_path: PathBuf,
    pub static_dir: PathBuf,
    /// Activity count above which the store is reset before seeding.
    pub seed_reset_threshold: Option<usize>,
}

impl Config {
    /// Reads settings from the process environment (call `dotenvy::dotenv` first).
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            database_url: try_load(&lookup, "DATABASE_URL", "sqlite://activities.db")?,
            host: try_load(&lookup, "HOST", "127.0.0.1")?,
            port: try_load(&lookup, "PORT", "8000")?,
            catalog_path: try_load(&lookup, "ACTIVITIES_FILE", "data/activities.json")?,
            static_dir: try_load(&lookup, "STATIC_DIR", "static")?,
            seed_reset_threshold: try_load_optional(&lookup, "SEED_RESET_THRESHOLD")?,
        })
    }
}

fn parse<T: FromStr>(key: &'static str, value: String) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError {
        key,
        reason: e.to_string(),
        value,
    })
}

fn try_load<T: FromStr, F>(lookup: &F, key: &'static str, default: &str) -> Result<T, ConfigError>
where
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    let value = lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });
    parse(key, value)
}

fn try_load_optional<T: FromStr, F>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) if !value.trim().is_empty() => parse(key, value).map(Some),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.database_url, "sqlite://activities.db");
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8000);
        assert_eq!(config.catalog_path, PathBuf::from("data/activities.json"));
        assert_eq!(config.static_dir, PathBuf::from("static"));
        assert_eq!(config.seed_reset_threshold, None);
    }

    #[test]
    fn reads_overrides() {
        let config = config_from(&[
            ("PORT", "9100"),
            ("DATABASE_URL", "sqlite::memory:"),
            ("SEED_RESET_THRESHOLD", "10"),
        ])
        .unwrap();
        assert_eq!(config.port, 9100);
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.seed_reset_threshold, Some(10));
    }

    #[test]
    fn rejects_bad_numbers() {
        let err = config_from(&[("PORT", "eighty")]).unwrap_err();
        assert_eq!(err.key, "PORT");

        let err = config_from(&[("SEED_RESET_THRESHOLD", "-1")]).unwrap_err();
        assert_eq!(err.key, "SEED_RESET_THRESHOLD");
    }
}
