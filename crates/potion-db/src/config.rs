//! Shop configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

use potion_core::{DEFAULT_POTION_PRICE, DEFAULT_STARTING_GOLD};

/// Shop configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopConfig {
    /// SQLite database file
    pub database_path: PathBuf,

    /// Raw ml the shop can store across all colors
    pub max_barrel_capacity: i64,

    /// Finished potions the shop can hold
    pub max_potion_capacity: i64,

    /// Gold the shop holds after a reset
    pub starting_gold: i64,

    /// Price of every listed potion
    pub potion_price: i64,
}

impl Default for ShopConfig {
    fn default() -> Self {
        ShopConfig {
            database_path: PathBuf::from("potion_shop.db"),
            max_barrel_capacity: 10_000,
            max_potion_capacity: 50,
            starting_gold: DEFAULT_STARTING_GOLD,
            potion_price: DEFAULT_POTION_PRICE,
        }
    }
}

impl ShopConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |---|---|
    /// | `POTION_DB_PATH` | `potion_shop.db` |
    /// | `POTION_MAX_BARREL_CAPACITY` | `10000` |
    /// | `POTION_MAX_POTION_CAPACITY` | `50` |
    /// | `POTION_STARTING_GOLD` | `100` |
    /// | `POTION_PRICE` | `50` |
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a config from any key lookup. `load` passes the process
    /// environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ShopConfig::default();

        let config = ShopConfig {
            database_path: lookup("POTION_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.database_path),

            max_barrel_capacity: parse_or(
                &lookup,
                "POTION_MAX_BARREL_CAPACITY",
                defaults.max_barrel_capacity,
            )?,

            max_potion_capacity: parse_or(
                &lookup,
                "POTION_MAX_POTION_CAPACITY",
                defaults.max_potion_capacity,
            )?,

            starting_gold: parse_or(&lookup, "POTION_STARTING_GOLD", defaults.starting_gold)?,

            potion_price: parse_or(&lookup, "POTION_PRICE", defaults.potion_price)?,
        };

        if config.max_barrel_capacity <= 0 {
            return Err(ConfigError::MustBePositive(
                "POTION_MAX_BARREL_CAPACITY".to_string(),
            ));
        }
        if config.max_potion_capacity <= 0 {
            return Err(ConfigError::MustBePositive(
                "POTION_MAX_POTION_CAPACITY".to_string(),
            ));
        }
        if config.starting_gold < 0 {
            return Err(ConfigError::InvalidValue("POTION_STARTING_GOLD".to_string()));
        }
        if potion_core::validation::validate_catalog_price(config.potion_price).is_err() {
            return Err(ConfigError::InvalidValue("POTION_PRICE".to_string()));
        }

        Ok(config)
    }

    /// Sets the database path.
    pub fn database_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.database_path = path.into();
        self
    }

    /// Sets the ml storage capacity.
    pub fn max_barrel_capacity(mut self, ml: i64) -> Self {
        self.max_barrel_capacity = ml;
        self
    }

    /// Sets the potion storage capacity.
    pub fn max_potion_capacity(mut self, potions: i64) -> Self {
        self.max_potion_capacity = potions;
        self
    }
}

fn parse_or<F>(lookup: &F, name: &str, default: i64) -> Result<i64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(name.to_string())),
        None => Ok(default),
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("{0} must be positive")]
    MustBePositive(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = ShopConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ShopConfig::default());
        assert_eq!(config.max_barrel_capacity, 10_000);
        assert_eq!(config.max_potion_capacity, 50);
        assert_eq!(config.starting_gold, 100);
    }

    #[test]
    fn reads_overrides() {
        let config = ShopConfig::from_lookup(lookup(&[
            ("POTION_DB_PATH", "/tmp/shop.db"),
            ("POTION_MAX_POTION_CAPACITY", " 300 "),
            ("POTION_PRICE", "35"),
        ]))
        .unwrap();
        assert_eq!(config.database_path, PathBuf::from("/tmp/shop.db"));
        assert_eq!(config.max_potion_capacity, 300);
        assert_eq!(config.potion_price, 35);
    }

    #[test]
    fn rejects_garbage() {
        let err = ShopConfig::from_lookup(lookup(&[("POTION_STARTING_GOLD", "lots")])).unwrap_err();
        assert_eq!(err, ConfigError::InvalidValue("POTION_STARTING_GOLD".to_string()));
    }

    #[test]
    fn rejects_zero_capacity() {
        let err =
            ShopConfig::from_lookup(lookup(&[("POTION_MAX_BARREL_CAPACITY", "0")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::MustBePositive("POTION_MAX_BARREL_CAPACITY".to_string())
        );
    }

    #[test]
    fn rejects_price_outside_catalog_range() {
        let err = ShopConfig::from_lookup(lookup(&[("POTION_PRICE", "900")])).unwrap_err();
        assert_eq!(err, ConfigError::InvalidValue("POTION_PRICE".to_string()));
    }
}
