use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;

pub use crate::domain::error::ConfigError;
use crate::domain::models::{LogConfig, Output};

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. fieldlog.yaml (project config)
    /// 3. fieldlog.local.yaml (local overrides, optional)
    /// 4. Environment variables (FIELDLOG_* prefix, highest priority)
    pub fn load() -> Result<LogConfig> {
        let config: LogConfig = Figment::new()
            .merge(Serialized::defaults(LogConfig::default()))
            .merge(Yaml::file("fieldlog.yaml"))
            .merge(Yaml::file("fieldlog.local.yaml"))
            .merge(Env::prefixed("FIELDLOG_").split("__"))
            .extract()
            .map_err(|e| ConfigError::Extract(e.to_string()))
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        tracing::debug!(target: "fieldlog", level = %config.level, output = ?config.output, "configuration loaded");
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<LogConfig> {
        let config: LogConfig = Figment::new()
            .merge(Serialized::defaults(LogConfig::default()))
            .merge(Yaml::file(path.as_ref()))
            .extract()
            .map_err(|e| ConfigError::Extract(e.to_string()))
            .with_context(|| format!("Failed to load config from {}", path.as_ref().display()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &LogConfig) -> Result<(), ConfigError> {
        if !config.level.is_valid() {
            return Err(ConfigError::InvalidLevel(config.level.to_string()));
        }

        match (&config.output, &config.path) {
            (Output::File, None) => return Err(ConfigError::MissingPath),
            (_, Some(path)) if path.as_os_str().is_empty() => return Err(ConfigError::EmptyPath),
            _ => {}
        }

        Ok(())
    }
}
