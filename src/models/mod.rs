pub mod activities;
pub mod catalog;

pub use activities::{ActivitiesRow, Activity};
pub use catalog::{CatalogEntry, SeedCatalog};
