//! Hierarchical configuration loader with precedence
//!
//! Loads configuration from multiple sources with the following precedence (low to high):
//! 1. Embedded defaults (built into binary)
//! 2. User config (~/.herald/config.yaml, or `$HERALD_CONFIG_DIR/config.yaml`)
//! 3. Environment variables (HERALD_* prefix)
//! 4. CLI flags (handled by caller)
//!
//! Layers are merged key by key, so a user file only needs the values it changes.

use crate::error::{Error, Result};
use crate::types::RuntimeConfig;
use camino::{Utf8Path, Utf8PathBuf};
use rust_embed::RustEmbed;
use serde::Deserialize;
use serde_yaml_ng::Value;
use std::env;
use std::fs;
use std::str::FromStr;

/// Environment variable naming an alternate config directory
pub const CONFIG_DIR_ENV: &str = "HERALD_CONFIG_DIR";

/// File name of the user configuration inside the config directory
pub const CONFIG_FILE: &str = "config.yaml";

/// Embedded configuration files
#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/../../embedded/config/"]
#[prefix = ""]
struct EmbeddedConfigs;

/// Configuration hierarchy loader
#[derive(Debug, Clone)]
pub struct HierarchicalConfigLoader {
    /// Base directory for configuration files
    config_dir: Utf8PathBuf,
}

impl HierarchicalConfigLoader {
    /// Create a loader for the standard config directory
    pub fn new() -> Result<Self> {
        let config_dir = Self::default_config_dir()?;
        Ok(Self { config_dir })
    }

    /// Create a loader with a custom config directory
    pub fn with_dir(config_dir: Utf8PathBuf) -> Self {
        Self { config_dir }
    }

    /// `$HERALD_CONFIG_DIR`, falling back to `~/.herald`
    fn default_config_dir() -> Result<Utf8PathBuf> {
        if let Ok(dir) = env::var(CONFIG_DIR_ENV) {
            if !dir.trim().is_empty() {
                return Ok(Utf8PathBuf::from(dir));
            }
        }

        let home = dirs::home_dir()
            .ok_or_else(|| Error::invalid_config("Could not determine home directory"))?;
        let home = Utf8PathBuf::from_path_buf(home)
            .map_err(|p| Error::invalid_config(format!("Home directory is not UTF-8: {}", p.display())))?;

        Ok(home.join(".herald"))
    }

    /// Load runtime configuration with hierarchical precedence
    pub fn load_runtime_config(&self) -> Result<RuntimeConfig> {
        let mut layered = Self::load_embedded_value("runtime-defaults.yaml")?;

        let user_config_path = self.config_file();
        if user_config_path.exists() {
            tracing::debug!(path = %user_config_path, "loading user config");
            let overlay = Self::load_yaml_value(&user_config_path)?;
            merge_values(&mut layered, overlay);
        }

        let config = RuntimeConfig::deserialize(layered)
            .map_err(|e| Error::invalid_config(format!("Failed to resolve configuration: {}", e)))?;

        self.apply_env_overrides(config)
    }

    fn load_embedded_value(filename: &str) -> Result<Value> {
        let embedded_file = EmbeddedConfigs::get(filename).ok_or_else(|| {
            Error::config_not_found(format!("Embedded config not found: {}", filename))
        })?;

        let content = std::str::from_utf8(&embedded_file.data).map_err(|_| {
            Error::invalid_config(format!("Invalid UTF-8 in embedded config: {}", filename))
        })?;

        serde_yaml_ng::from_str(content).map_err(|e| {
            Error::invalid_config(format!(
                "Failed to parse embedded config {}: {}",
                filename, e
            ))
        })
    }

    fn load_yaml_value(path: &Utf8Path) -> Result<Value> {
        let content = fs::read_to_string(path)?;
        let value: Value = serde_yaml_ng::from_str(&content)
            .map_err(|e| Error::invalid_config(format!("Failed to parse {}: {}", path, e)))?;

        // An empty file parses as null; treat it as "no overrides"
        Ok(match value {
            Value::Null => Value::Mapping(Default::default()),
            other => other,
        })
    }

    /// Apply environment variable overrides to runtime config
    fn apply_env_overrides(&self, mut config: RuntimeConfig) -> Result<RuntimeConfig> {
        if let Ok(val) = env::var("HERALD_API_BASE_URL") {
            if !val.trim().is_empty() {
                config.api.base_url = val.trim().to_string();
            }
        }

        if let Some(val) = parse_env("HERALD_HTTP_TIMEOUT_SECS")? {
            config.api.http_timeout_secs = val;
        }

        if let Some(val) = parse_env("HERALD_MAX_ATTEMPTS")? {
            config.retry.max_attempts = val;
        }

        if let Some(val) = parse_env("HERALD_INITIAL_DELAY_MS")? {
            config.retry.initial_delay_ms = val;
        }

        if let Some(val) = parse_env("HERALD_MAX_DELAY_MS")? {
            config.retry.max_delay_ms = val;
        }

        Ok(config)
    }

    /// Get the config directory path
    pub fn config_dir(&self) -> &Utf8Path {
        &self.config_dir
    }

    /// Path of the user config file
    pub fn config_file(&self) -> Utf8PathBuf {
        self.config_dir.join(CONFIG_FILE)
    }
}

fn parse_env<T: FromStr>(name: &str) -> Result<Option<T>> {
    match env::var(name) {
        Ok(val) => val
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| Error::invalid_config(format!("{} must be a valid number", name))),
        Err(_) => Ok(None),
    }
}

/// Recursively merge `overlay` into `base`; mappings merge, everything else replaces
fn merge_values(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Mapping(base_map), Value::Mapping(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RetryStrategy;
    use serial_test::serial;
    use tempfile::TempDir;

    const ENV_VARS: [&str; 5] = [
        "HERALD_API_BASE_URL",
        "HERALD_HTTP_TIMEOUT_SECS",
        "HERALD_MAX_ATTEMPTS",
        "HERALD_INITIAL_DELAY_MS",
        "HERALD_MAX_DELAY_MS",
    ];

    fn clear_env() {
        for name in ENV_VARS {
            env::remove_var(name);
        }
    }

    fn create_temp_loader() -> (HierarchicalConfigLoader, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config_dir =
            Utf8PathBuf::from_path_buf(temp_dir.path().to_path_buf()).expect("Invalid UTF-8 path");
        let loader = HierarchicalConfigLoader::with_dir(config_dir);
        (loader, temp_dir)
    }

    #[test]
    #[serial]
    fn test_load_runtime_config_defaults() {
        clear_env();
        let (loader, _temp) = create_temp_loader();
        let config = loader.load_runtime_config().unwrap();

        assert_eq!(config, RuntimeConfig::default());
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.retry.jitter_ms, 200);
        assert_eq!(config.api.base_url, "https://api.twitter.com");
    }

    #[test]
    #[serial]
    fn test_user_file_overrides_only_given_keys() {
        clear_env();
        let (loader, _temp) = create_temp_loader();

        let config_content = r#"
api:
  base-url: "http://localhost:8080"
retry:
  max-attempts: 5
  strategy: fixed-delay
"#;
        fs::write(loader.config_file(), config_content).unwrap();

        let config = loader.load_runtime_config().unwrap();
        assert_eq!(config.api.base_url, "http://localhost:8080");
        assert_eq!(config.api.http_timeout_secs, 30);
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.retry.strategy, RetryStrategy::FixedDelay);
        assert_eq!(config.retry.initial_delay_ms, 1000);
    }

    #[test]
    #[serial]
    fn test_empty_user_file_is_ignored() {
        clear_env();
        let (loader, _temp) = create_temp_loader();
        fs::write(loader.config_file(), "").unwrap();

        let config = loader.load_runtime_config().unwrap();
        assert_eq!(config, RuntimeConfig::default());
    }

    #[test]
    #[serial]
    fn test_malformed_user_file_is_rejected() {
        clear_env();
        let (loader, _temp) = create_temp_loader();
        fs::write(loader.config_file(), "retry: [not, a, mapping").unwrap();

        let err = loader.load_runtime_config().unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { .. }));
        assert!(
            err.to_string().contains(loader.config_file().as_str()),
            "message should name the file: {}",
            err
        );
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        clear_env();
        let (loader, _temp) = create_temp_loader();
        fs::write(loader.config_file(), "retry:\n  max-attempts: 7\n").unwrap();

        env::set_var("HERALD_API_BASE_URL", "https://example.test");
        env::set_var("HERALD_HTTP_TIMEOUT_SECS", "5");
        env::set_var("HERALD_MAX_ATTEMPTS", "2");
        env::set_var("HERALD_INITIAL_DELAY_MS", "250");
        env::set_var("HERALD_MAX_DELAY_MS", "4000");

        let config = loader.load_runtime_config().unwrap();
        clear_env();

        assert_eq!(config.api.base_url, "https://example.test");
        assert_eq!(config.api.http_timeout_secs, 5);
        assert_eq!(config.retry.max_attempts, 2);
        assert_eq!(config.retry.initial_delay_ms, 250);
        assert_eq!(config.retry.max_delay_ms, 4000);
    }

    #[test]
    #[serial]
    fn test_invalid_env_number() {
        clear_env();
        let (loader, _temp) = create_temp_loader();
        env::set_var("HERALD_MAX_ATTEMPTS", "many");

        let err = loader.load_runtime_config().unwrap_err();
        clear_env();

        assert_eq!(
            err.to_string(),
            "Invalid configuration: HERALD_MAX_ATTEMPTS must be a valid number"
        );
    }

    #[test]
    #[serial]
    fn test_config_dir_env() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("custom");
        env::set_var(CONFIG_DIR_ENV, &dir);

        let loader = HierarchicalConfigLoader::new().unwrap();
        env::remove_var(CONFIG_DIR_ENV);

        assert_eq!(loader.config_dir().as_std_path(), dir.as_path());
        assert_eq!(loader.config_file().file_name(), Some(CONFIG_FILE));
    }

    #[test]
    fn test_merge_values_is_deep() {
        let mut base: Value = serde_yaml_ng::from_str("a:\n  x: 1\n  y: 2\nb: 3\n").unwrap();
        let overlay: Value = serde_yaml_ng::from_str("a:\n  y: 20\nc: 4\n").unwrap();

        merge_values(&mut base, overlay);

        let expected: Value =
            serde_yaml_ng::from_str("a:\n  x: 1\n  y: 20\nb: 3\nc: 4\n").unwrap();
        assert_eq!(base, expected);
    }
}
