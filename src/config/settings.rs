//! Application settings loaded from config.toml
//!
//! Every section is optional; a missing file or key falls back to the
//! defaults below.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP server settings
    pub server: ServerConfig,
    /// The owner (single admin) account
    pub owner: OwnerConfig,
    /// Shop defaults
    pub shops: ShopsConfig,
}

/// `[server]` section
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:15000".to_string(),
        }
    }
}

/// `[owner]` section
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct OwnerConfig {
    /// Login name of the admin account seeded at startup
    pub name: String,
}

impl Default for OwnerConfig {
    fn default() -> Self {
        Self {
            name: "owner".to_string(),
        }
    }
}

/// `[shops]` section
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ShopsConfig {
    /// Shop assigned to workers created without one
    pub default_shop: String,
}

impl Default for ShopsConfig {
    fn default() -> Self {
        Self {
            default_shop: "shop1".to_string(),
        }
    }
}

/// Loads configuration from a TOML file
///
/// # Errors
/// Returns an error if the file cannot be read or the TOML is invalid.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config file {}: {e}", path_ref.display()),
    })
}

/// Loads the application configuration.
///
/// Reads the file named by `CONFIG_PATH` (default `config.toml`); when that
/// file does not exist the built-in defaults are used.
pub fn load_app_configuration() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    if Path::new(&path).exists() {
        let config = load_config(&path)?;
        info!("Loaded configuration from {}", path);
        Ok(config)
    } else {
        info!("No configuration file at {}, using defaults", path);
        Ok(AppConfig::default())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let toml_str = r#"
            [server]
            bind_address = "127.0.0.1:8080"

            [owner]
            name = "boss"

            [shops]
            default_shop = "main-street"
        "#;

        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.bind_address, "127.0.0.1:8080");
        assert_eq!(config.owner.name, "boss");
        assert_eq!(config.shops.default_shop, "main-street");
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config: AppConfig = toml::from_str("[owner]\nname = \"boss\"\n").unwrap();
        assert_eq!(config.owner.name, "boss");
        assert_eq!(config.server.bind_address, "0.0.0.0:15000");
        assert_eq!(config.shops.default_shop, "shop1");
    }

    #[test]
    fn test_load_config_missing_file_is_config_error() {
        let result = load_config("/nonexistent/shop-ledger.toml");
        assert!(matches!(result.unwrap_err(), Error::Config { message: _ }));
    }
}
