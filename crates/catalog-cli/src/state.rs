//! # Application State
//!
//! Catalog store, resolver and settings shared by every command.

use catalog_core::{BoxedCatalogStore, CatalogConfig, CatalogResolver, InMemoryStore};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Seed locations tried when none is given, relative to the working directory
const SEED_PATHS: [&str; 3] = [
    "config/catalog.toml",
    "../config/catalog.toml",
    "../../config/catalog.toml",
];

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Explicit seed file (`--seed` / `CATALOG_SEED`)
    pub seed_path: Option<PathBuf>,
    /// Environment (development, staging, production)
    pub environment: String,
}

impl AppConfig {
    /// Load from environment variables, letting an explicit seed path win
    pub fn from_env(seed_path: Option<PathBuf>) -> Self {
        dotenvy::dotenv().ok();

        Self {
            seed_path: seed_path.or_else(|| std::env::var("CATALOG_SEED").ok().map(PathBuf::from)),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
        }
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Seeded store, kept concrete so commands can report round-trips
    pub store: Arc<InMemoryStore>,
    /// Query layer over the store
    pub resolver: CatalogResolver,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Load the seed and wire the resolver
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        let catalog_config = CatalogConfig::from_env()?;
        let store = Arc::new(load_catalog(config.seed_path.as_deref())?);
        let resolver = CatalogResolver::new(store.clone() as BoxedCatalogStore, catalog_config);

        Ok(Self {
            store,
            resolver,
            config,
        })
    }
}

/// Load the catalog seed from `path`, or from the first default location
/// that exists
fn load_catalog(path: Option<&Path>) -> anyhow::Result<InMemoryStore> {
    if let Some(path) = path {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
        let store = InMemoryStore::from_toml(&content)
            .map_err(|e| anyhow::anyhow!("Failed to load {}: {}", path.display(), e))?;
        tracing::info!("Loaded catalog from {}", path.display());
        return Ok(store);
    }

    for path in SEED_PATHS {
        if let Ok(content) = std::fs::read_to_string(path) {
            let store = InMemoryStore::from_toml(&content)
                .map_err(|e| anyhow::anyhow!("Failed to load {}: {}", path, e))?;
            tracing::info!("Loaded catalog from {}", path);
            return Ok(store);
        }
    }

    tracing::warn!("No catalog seed found, using empty catalog");
    Ok(InMemoryStore::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_seed_path_wins() {
        let config = AppConfig::from_env(Some(PathBuf::from("seed.toml")));
        assert_eq!(config.seed_path, Some(PathBuf::from("seed.toml")));
    }

    #[test]
    fn test_missing_seed_file_is_an_error() {
        let result = load_catalog(Some(Path::new("does/not/exist.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_production_flag() {
        let config = AppConfig {
            seed_path: None,
            environment: "production".to_string(),
        };
        assert!(config.is_production());
    }
}
