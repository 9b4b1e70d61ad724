//! # Catalog Configuration
//!
//! Settings shared by the resolvers. Loaded from environment variables
//! (a `.env` file is honoured when present).

use crate::error::CatalogError;
use crate::pricing::Currency;
use std::env;

/// Catalog resolver configuration
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Public prefix of uploaded media
    pub media_url: String,

    /// Public prefix of static assets (placeholders)
    pub static_url: String,

    /// Currency used when the request does not name one
    pub default_currency: Currency,
}

impl CatalogConfig {
    /// Load configuration from environment variables.
    ///
    /// Optional env vars:
    /// - `CATALOG_MEDIA_URL` (default `/media`)
    /// - `CATALOG_STATIC_URL` (default `/static`)
    /// - `CATALOG_CURRENCY` (default `USD`)
    pub fn from_env() -> Result<Self, CatalogError> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        let default_currency = match env::var("CATALOG_CURRENCY") {
            Ok(code) => code.parse()?,
            Err(_) => defaults.default_currency,
        };

        Ok(Self {
            media_url: env::var("CATALOG_MEDIA_URL").unwrap_or(defaults.media_url),
            static_url: env::var("CATALOG_STATIC_URL").unwrap_or(defaults.static_url),
            default_currency,
        })
    }

    /// Builder: set media prefix
    pub fn with_media_url(mut self, url: impl Into<String>) -> Self {
        self.media_url = url.into();
        self
    }

    /// Builder: set static prefix
    pub fn with_static_url(mut self, url: impl Into<String>) -> Self {
        self.static_url = url.into();
        self
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            media_url: "/media".to_string(),
            static_url: "/static".to_string(),
            default_currency: Currency::USD,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CatalogConfig::default();
        assert_eq!(config.default_currency, Currency::USD);
        assert_eq!(config.media_url, "/media");
    }

    #[test]
    fn test_builders() {
        let config = CatalogConfig::default()
            .with_media_url("https://cdn.example.com/media")
            .with_static_url("https://cdn.example.com/static");
        assert_eq!(config.media_url, "https://cdn.example.com/media");
        assert_eq!(config.static_url, "https://cdn.example.com/static");
    }
}
