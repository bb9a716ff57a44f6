//! Solwind configuration
//!
//! Layered, later sources win:
//! 1. Built-in defaults
//! 2. `solwind.toml` in the working directory, or the file given by `--config`
//! 3. `SOLWIND__` environment variables, `__` between sections
//!    (`SOLWIND__COSTING__UNIT_POLICY=strict`)

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use solwind_costing::CostingConfig;
use solwind_profit::ProfitConfig;

/// File looked up when no `--config` is given
pub const DEFAULT_CONFIG_FILE: &str = "solwind";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Tracing filter used when `RUST_LOG` is unset
    pub log_level: String,
    pub costing: CostingConfig,
    pub profit: ProfitConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            costing: CostingConfig::default(),
            profit: ProfitConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from `.env`, the config file and the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let _ = dotenvy::dotenv();

        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };
        let settings = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix("SOLWIND")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()
            .context("failed to read configuration")?;

        Self::finish(settings)
    }

    /// Parse configuration from TOML text alone
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from_str(content, config::FileFormat::Toml))
            .build()
            .context("failed to parse configuration")?;
        Self::finish(settings)
    }

    fn finish(settings: config::Config) -> Result<Self> {
        let cfg: Self = settings
            .try_deserialize()
            .context("invalid configuration")?;
        cfg.profit.validate().context("invalid profit configuration")?;
        Ok(cfg)
    }
}
