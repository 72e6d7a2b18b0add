//! Service configuration loading
//!
//! Settings are resolved in priority order:
//! 1. Command-line arguments (applied by the binary)
//! 2. Environment variables (`ALLOWED_ORIGINS`)
//! 3. TOML config file
//! 4. Compiled defaults
//!
//! A missing config file is only an error when it was explicitly requested.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Config file looked up in the working directory when none is named
pub const DEFAULT_CONFIG_FILE: &str = "alumni-map.toml";

/// Environment variable holding the comma-separated CORS origin list
pub const ALLOWED_ORIGINS_ENV: &str = "ALLOWED_ORIGINS";

/// Complete service configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Socket address the HTTP server binds to
    pub bind: String,

    /// Path of the student record CSV file
    pub data_file: PathBuf,

    /// Origins allowed for cross-origin requests; `["*"]` means unrestricted
    pub allowed_origins: Vec<String>,

    pub store: StoreConfig,
    pub geocoder: GeocoderConfig,
    pub sheets: SheetsConfig,
    pub logging: LoggingConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8000".to_string(),
            data_file: PathBuf::from("students.csv"),
            allowed_origins: vec!["*".to_string()],
            store: StoreConfig::default(),
            geocoder: GeocoderConfig::default(),
            sheets: SheetsConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Record store backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Single CSV file at `data_file`
    #[default]
    Csv,
    /// Process-local, lost on restart
    Memory,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
}

/// Geocoding service settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeocoderConfig {
    /// Nominatim-compatible search endpoint
    pub base_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org/search".to_string(),
            user_agent: "bis_alumni_map".to_string(),
            timeout_secs: 5,
        }
    }
}

impl GeocoderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Google Sheets export settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SheetsConfig {
    /// Prefix of the export URL; `/d/{id}/export?format=csv` is appended
    pub export_base: String,
    pub timeout_secs: u64,
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            export_base: "https://docs.google.com/spreadsheets".to_string(),
            timeout_secs: 30,
        }
    }
}

impl SheetsConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "alumni_map=info,tower_http=info".to_string(),
        }
    }
}

impl ServiceConfig {
    /// Parse configuration from TOML text; absent keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Invalid TOML: {}", e)))
    }

    /// Load configuration from file and environment
    ///
    /// With `path == None` the default file in the working directory is used
    /// if present, otherwise compiled defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::from_file(default_path)?
                } else {
                    debug!("No config file found, using compiled defaults");
                    Self::default()
                }
            }
        };

        config.apply_env_overrides();
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Cannot read config file {}: {}", path.display(), e))
        })?;
        let config = Self::from_toml_str(&content)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) {
        if let Ok(value) = std::env::var(ALLOWED_ORIGINS_ENV) {
            self.allowed_origins = parse_origins(&value);
        }
    }

    /// True when cross-origin access is unrestricted
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.is_empty() || self.allowed_origins.iter().any(|o| o == "*")
    }
}

/// Split a comma-separated origin list, trimming entries and dropping blanks
pub fn parse_origins(value: &str) -> Vec<String> {
    let origins: Vec<String> = value
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect();

    if origins.is_empty() {
        vec!["*".to_string()]
    } else {
        origins
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_origins_trims_entries() {
        assert_eq!(
            parse_origins("https://a.example, https://b.example ,"),
            vec!["https://a.example", "https://b.example"]
        );
    }

    #[test]
    fn test_parse_origins_blank_means_any() {
        assert_eq!(parse_origins("  "), vec!["*"]);
    }

    #[test]
    fn test_allows_any_origin() {
        let mut config = ServiceConfig::default();
        assert!(config.allows_any_origin());

        config.allowed_origins = vec!["https://alumni.example".to_string()];
        assert!(!config.allows_any_origin());
    }
}
