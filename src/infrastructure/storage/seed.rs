//! Seed-file loading for tenant rate configurations
//!
//! The service boots with an optional TOML file of tenant rate tables. Every
//! entry is validated before it enters the store; a single malformed tenant
//! aborts startup so operators fix configuration instead of serving quotes
//! from a broken table.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::domain::{PricingError, RateConfig};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Failed to read seed file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse seed file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid rate configuration for tenant {tenant_id}: {source}")]
    Invalid {
        tenant_id: String,
        #[source]
        source: PricingError,
    },
}

#[derive(Debug, Deserialize)]
struct SeedFile {
    #[serde(default)]
    rate_configs: Vec<RateConfig>,
}

/// Parse and validate a seed document.
pub fn parse_seed(raw: &str) -> Result<Vec<RateConfig>, SeedError> {
    let file: SeedFile = toml::from_str(raw)?;
    for config in &file.rate_configs {
        config.validate().map_err(|e| SeedError::Invalid {
            tenant_id: config.tenant_id.clone(),
            source: e,
        })?;
    }
    Ok(file.rate_configs)
}

/// Load and validate tenant rate configurations from a TOML file.
pub fn load_seed_file(path: &Path) -> Result<Vec<RateConfig>, SeedError> {
    parse_seed(&std::fs::read_to_string(path)?)
}

// ── Tests ──────────────────────────────────────────────────────
