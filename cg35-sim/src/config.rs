//! Configuration loading
//!
//! The default `calculator.toml` is compiled in; `--config` replaces it with
//! a file from disk. Missing keys fall back to the built-in defaults.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use cg35_core::CalculatorConfig;
use tracing::debug;

/// Built-in configuration
pub const DEFAULT_CONFIG: &str = include_str!("../calculator.toml");

/// Load and validate the configuration
pub fn load(path: Option<&Path>) -> Result<CalculatorConfig> {
    let config = match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            parse(&text).with_context(|| format!("in config {}", path.display()))?
        }
        None => parse(DEFAULT_CONFIG).context("in built-in config")?,
    };
    debug!(?config, "configuration loaded");
    Ok(config)
}

/// Parse TOML text into a validated configuration
pub fn parse(text: &str) -> Result<CalculatorConfig> {
    let config: CalculatorConfig = toml::from_str(text).context("parsing TOML")?;
    config.validate().context("invalid configuration")?;
    Ok(config)
}
