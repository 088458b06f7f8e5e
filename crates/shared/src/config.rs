//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Inventory valuation policy.
    #[serde(default)]
    pub inventory: InventoryConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Inventory valuation policy.
#[derive(Debug, Clone, Deserialize)]
pub struct InventoryConfig {
    /// Whether sales may drive on-hand quantity below zero (backorders).
    #[serde(default = "default_allow_negative_stock")]
    pub allow_negative_stock: bool,
    /// How many times a stock recording is retried after losing an
    /// optimistic-concurrency race on the item row.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_allow_negative_stock() -> bool {
    true
}

fn default_max_retries() -> u32 {
    3
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            allow_negative_stock: default_allow_negative_stock(),
            max_retries: default_max_retries(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is not set.
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// Emit JSON lines instead of human readable output.
    #[serde(default)]
    pub json: bool,
}

fn default_log_filter() -> String {
    "ledgerline=info,sea_orm=warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Sources, lowest precedence first: `config/default`, `config/{RUN_MODE}`,
    /// then `LEDGERLINE__*` environment variables (e.g. `LEDGERLINE__DATABASE__URL`).
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("LEDGERLINE").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_environment() {
        temp_env::with_vars(
            [
                ("LEDGERLINE__DATABASE__URL", Some("sqlite::memory:")),
                ("LEDGERLINE__DATABASE__MAX_CONNECTIONS", Some("4")),
                ("LEDGERLINE__INVENTORY__ALLOW_NEGATIVE_STOCK", Some("false")),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.database.url, "sqlite::memory:");
                assert_eq!(config.database.max_connections, 4);
                assert_eq!(config.database.min_connections, 1);
                assert!(!config.inventory.allow_negative_stock);
                assert_eq!(config.inventory.max_retries, 3);
            },
        );
    }

    #[test]
    fn test_defaults_for_optional_sections() {
        temp_env::with_vars(
            [
                ("LEDGERLINE__DATABASE__URL", Some("postgres://localhost/ledgerline")),
                ("LEDGERLINE__INVENTORY__ALLOW_NEGATIVE_STOCK", None),
                ("LEDGERLINE__DATABASE__MAX_CONNECTIONS", None),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert!(config.inventory.allow_negative_stock);
                assert_eq!(config.logging.filter, "ledgerline=info,sea_orm=warn");
                assert!(!config.logging.json);
            },
        );
    }

    #[test]
    fn test_missing_database_url_fails() {
        temp_env::with_vars([("LEDGERLINE__DATABASE__URL", None::<&str>)], || {
            assert!(AppConfig::load().is_err());
        });
    }
}
