// =============================================================================
// CONFIGURATION - Load settings from config.toml
// =============================================================================
//
// Application metadata and debug toggles for engine startup.
// Provides sensible defaults if config file is missing or has errors.

use anyhow::{Context, Result};
use log::LevelFilter;
use serde::Deserialize;
use std::path::Path;

use crate::settings::EngineSettings;

/// Root configuration structure
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub application: ApplicationConfig,
    pub debug: DebugConfig,
}

/// Application metadata reported to the driver
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ApplicationConfig {
    pub name: String,
    pub version: u32,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            name: "Conjure".to_string(),
            version: 1,
        }
    }
}

/// Debug settings
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    pub validation_layers: bool,
    pub log_level: String,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            validation_layers: true,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from file, falling back to defaults if not found
    pub fn load() -> Self {
        Self::load_from_path("config.toml").unwrap_or_else(|e| {
            log::warn!("Failed to load config.toml: {}. Using defaults.", e);
            Config::default()
        })
    }

    /// Load configuration from a specific path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            log::info!("Config file not found at {:?}, using defaults", path);
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        log::info!("Loaded configuration from {:?}", path);
        log::debug!("Config: {:?}", config);

        Ok(config)
    }

    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            application_name: self.application.name.clone(),
            application_version: self.application.version,
            enable_debug: self.debug.validation_layers,
        }
    }

    /// Get log level as a filter
    pub fn log_level(&self) -> LevelFilter {
        match self.debug.log_level.to_lowercase().as_str() {
            "off" => LevelFilter::Off,
            "error" => LevelFilter::Error,
            "warn" => LevelFilter::Warn,
            "info" => LevelFilter::Info,
            "debug" => LevelFilter::Debug,
            "trace" => LevelFilter::Trace,
            _ => {
                log::warn!("Unknown log level '{}', defaulting to info", self.debug.log_level);
                LevelFilter::Info
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from_path(dir.path().join("config.toml")).unwrap();

        assert_eq!(config.application.name, "Conjure");
        assert!(config.debug.validation_layers);
        assert_eq!(config.log_level(), LevelFilter::Info);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[application]\nname = \"Unit Test\"\n\n[debug]\nlog_level = \"DEBUG\"").unwrap();

        let config = Config::load_from_path(file.path()).unwrap();
        let settings = config.engine_settings();

        assert_eq!(settings.application_name, "Unit Test");
        assert_eq!(settings.application_version, 1);
        assert!(settings.enable_debug);
        assert_eq!(config.log_level(), LevelFilter::Debug);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[application\nname = ").unwrap();

        let err = Config::load_from_path(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn unknown_log_level_falls_back_to_info() {
        let config = Config {
            debug: DebugConfig {
                validation_layers: false,
                log_level: "loud".to_string(),
            },
            ..Config::default()
        };
        assert_eq!(config.log_level(), LevelFilter::Info);
        assert!(!config.engine_settings().enable_debug);
    }
}
