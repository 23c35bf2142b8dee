//! Config file loading

use crate::{substitution, validator, CoreConfig};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info, instrument};

/// Load, substitute and validate a configuration file
#[instrument(skip(path))]
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<CoreConfig> {
    let path = path.as_ref();
    info!("Loading configuration from: {:?}", path);

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let substituted = substitution::substitute_env_vars(&content)?;
    debug!("Environment variable substitution completed");

    let config: CoreConfig = serde_yaml::from_str(&substituted)
        .with_context(|| "Failed to parse YAML configuration")?;

    validator::validate_config(&config).with_context(|| "Configuration failed validation")?;

    info!("Configuration loaded successfully");
    Ok(config)
}

// ============================================================================
// Tests
// ============================================================================
