//! # Configuration
//!
//! [`CafeConfig`] is read from an optional TOML file and then from `EISCAFE_*` environment
//! variables, with later sources winning. Nested keys use a double underscore:
//!
//! ```bash
//! EISCAFE_STORE__BACKEND=rest
//! EISCAFE_STORE__URL=https://example.supabase.co
//! EISCAFE_KITCHEN__REFRESH_INTERVAL_MS=500
//! ```
//!
//! Every field has a default, so running without any configuration gives an in-memory
//! café with the usual timings.

use crate::kitchen::KitchenSettings;
use crate::order_form::ConfirmationTimings;
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use secrecy::Secret;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Default configuration file, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "Eiscafe.toml";

/// Prefix of every configuration environment variable.
pub const ENV_PREFIX: &str = "EISCAFE_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    Load(#[from] figment::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Which [`Datastore`](crate::store::Datastore) backs the café.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Memory,
    Rest,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// Base URL of the hosted store, e.g. `https://<project>.supabase.co`.
    pub url: Option<String>,
    pub api_key: Option<Secret<String>>,
    pub table: String,
    /// Channel capacity of the in-memory store.
    pub buffer: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Memory,
            url: None,
            api_key: None,
            table: "orders".to_string(),
            buffer: 32,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CafeConfig {
    pub store: StoreConfig,
    pub kitchen: KitchenSettings,
    pub confirmation: ConfirmationTimings,
    /// Used when `RUST_LOG` is not set.
    pub log_filter: String,
}

impl Default for CafeConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            kitchen: KitchenSettings::default(),
            confirmation: ConfirmationTimings::default(),
            log_filter: "info".to_string(),
        }
    }
}

impl CafeConfig {
    /// Loads `path` (missing file is fine) and the `EISCAFE_*` environment on top.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config: Self = Figment::new()
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;

        config.kitchen.validate().map_err(ConfigError::Invalid)?;
        Ok(config)
    }

    /// Loads [`DEFAULT_CONFIG_FILE`] and the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(DEFAULT_CONFIG_FILE)
    }
}
