//! Command implementations

pub mod config;
pub mod post;
pub mod sign;

use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use herald_core::config::HierarchicalConfigLoader;
use herald_core::types::RuntimeConfig;

/// Resolve runtime configuration, honouring `--config <dir>`
pub(crate) fn load_runtime_config(config_dir: Option<Utf8PathBuf>) -> Result<RuntimeConfig> {
    let loader = match config_dir {
        Some(dir) => HierarchicalConfigLoader::with_dir(dir),
        None => HierarchicalConfigLoader::new().context("Failed to locate config directory")?,
    };

    loader
        .load_runtime_config()
        .with_context(|| format!("Failed to load configuration from {}", loader.config_dir()))
}
