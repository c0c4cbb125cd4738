//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ranking: RankingConfig,

    #[serde(default)]
    pub template: TemplateConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Ranking configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RankingConfig {
    /// How many sites a panel ranks; negative means unbounded
    #[serde(default = "default_max_entries")]
    pub max_entries: i64,
}

fn default_max_entries() -> i64 {
    crate::rank::DEFAULT_MAX_ENTRIES
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            max_entries: default_max_entries(),
        }
    }
}

/// Page template configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TemplateConfig {
    /// Path to the page template; the bundled template is used when unset
    pub path: Option<PathBuf>,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("retrace").join("config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        if let Ok(max) = std::env::var("RETRACE_MAX_ENTRIES") {
            if let Ok(n) = max.parse() {
                self.ranking.max_entries = n;
            }
        }

        if let Ok(path) = std::env::var("RETRACE_TEMPLATE") {
            self.template.path = Some(PathBuf::from(path));
        }

        if let Ok(level) = std::env::var("RETRACE_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("RETRACE_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Retrace Configuration
#
# Environment variables override these settings:
# - RETRACE_MAX_ENTRIES
# - RETRACE_TEMPLATE
# - RETRACE_LOG_LEVEL
# - RETRACE_LOG_FORMAT

[ranking]
# How many sites to rank (negative = unbounded)
max_entries = 8

[template]
# Path to the page template; omit to use the bundled one
# path = "/usr/share/retrace/mostvisited.html"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.ranking.max_entries, 8);
        assert!(config.template.path.is_none());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "[ranking]\nmax_entries = 12\n\n[logging]\nlevel = \"debug\"\n"
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.ranking.max_entries, 12);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not toml at all [[[").unwrap();

        let err = Config::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = Config::load(Path::new("/no/such/config.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_generated_default_parses() {
        let config: Config = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config.ranking.max_entries, 8);
    }
}
