use serde::Deserialize;
use std::collections::BTreeMap;

/// Template for one activity in the seed file.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogEntry {
    pub description: String,
    pub schedule: String,
    pub max_participants: i64,
    #[serde(default)]
    pub participants: Vec<String>,
}

/// Activity name -> template.
pub type SeedCatalog = BTreeMap<String, CatalogEntry>;
