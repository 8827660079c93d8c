//! Configuration loading and config file resolution
//!
//! Config file path resolution follows this priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable (`BANDMATES_CONFIG`)
//! 3. Platform config directory (`<config_dir>/bandmates/config.toml`)
//! 4. Compiled defaults (fallback)
//!
//! A missing configuration file is never fatal: a warning is logged and the
//! compiled defaults are used. A file that exists but does not parse is an
//! error, since silently ignoring it would hide a typo.

use crate::params::EngineParams;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "BANDMATES_CONFIG";

/// Smallest group size callers may request
pub const MIN_GROUP_SIZE: usize = 3;

/// Largest group size callers may request
pub const MAX_GROUP_SIZE: usize = 8;

/// Group size used when nothing else is configured
pub const DEFAULT_GROUP_SIZE: usize = 4;

/// Bootstrap configuration loaded from TOML file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Engine tuning parameters (optional, every field defaulted)
    #[serde(default)]
    pub engine: EngineParams,

    /// Preferred group size, clamped to [3, 8] before use
    #[serde(default)]
    pub group_size: Option<usize>,

    /// Seed for the group-name random source
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl TomlConfig {
    /// Parse configuration from TOML text and validate engine parameters
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: TomlConfig = toml::from_str(content)?;
        config.engine.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Effective group size: configured value (or default) clamped to [3, 8]
    pub fn effective_group_size(&self, cli_override: Option<usize>) -> usize {
        clamp_group_size(cli_override.or(self.group_size).unwrap_or(DEFAULT_GROUP_SIZE))
    }
}

/// Config file resolver
///
/// Walks the priority order and returns the first candidate path.
pub struct ConfigResolver {
    cli_path: Option<PathBuf>,
}

impl ConfigResolver {
    pub fn new(cli_path: Option<PathBuf>) -> Self {
        Self { cli_path }
    }

    /// Resolve the config file path, or `None` when no source names one
    pub fn resolve(&self) -> Option<PathBuf> {
        // Priority 1: Command-line argument
        if let Some(path) = &self.cli_path {
            debug!("Config path from command line: {}", path.display());
            return Some(path.clone());
        }

        // Priority 2: Environment variable
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            if !path.trim().is_empty() {
                debug!("Config path from {}: {}", CONFIG_ENV_VAR, path);
                return Some(PathBuf::from(path));
            }
        }

        // Priority 3: Platform config directory
        let user_config = default_config_path()?;
        if user_config.exists() {
            return Some(user_config);
        }

        // Priority 4: compiled defaults
        None
    }

    /// Resolve and load, degrading to defaults when the file is missing
    pub fn load(&self) -> Result<TomlConfig> {
        let Some(path) = self.resolve() else {
            debug!("No configuration file found, using compiled defaults");
            return Ok(TomlConfig::default());
        };

        if !path.exists() {
            warn!(
                "Configuration file {} not found, using compiled defaults",
                path.display()
            );
            return Ok(TomlConfig::default());
        }

        TomlConfig::load_from(&path)
    }
}

/// Default configuration file path for the platform
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("bandmates").join("config.toml"))
}

/// Clamp a requested group size into the supported [3, 8] range
pub fn clamp_group_size(requested: usize) -> usize {
    let clamped = requested.clamp(MIN_GROUP_SIZE, MAX_GROUP_SIZE);
    if clamped != requested {
        warn!(
            requested,
            clamped, "Requested group size outside supported range, clamping"
        );
    }
    clamped
}
