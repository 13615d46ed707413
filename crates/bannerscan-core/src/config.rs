//! Configuration management for bannerscan.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides.

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Location of the community-maintained cookie banner list.
pub const DEFAULT_LIST_URL: &str = "https://www.i-dont-care-about-cookies.eu/abp/";

/// File name the fetched list is stored under.
pub const DEFAULT_LIST_FILE: &str = "bannerlist.txt";

/// Main application configuration.
///
/// This is loaded from `~/.config/bannerscan/config.toml` (or platform equivalent).
/// If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Banner list retrieval settings
    pub list: ListConfig,
    /// Detection settings
    pub detection: DetectionConfig,
}

impl AppConfig {
    /// Load configuration from disk, falling back to defaults if not found.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML
    pub fn load() -> ConfigResult<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            tracing::debug!("Loading config from {}", config_path.display());
            let contents = fs::read_to_string(&config_path)?;
            let config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration with environment variable overrides.
    ///
    /// Supports the following environment variables:
    /// - `BANNERSCAN_LIST_URL`: Override the banner list URL
    /// - `BANNERSCAN_DATA_DIR`: Override the directory the list is stored in
    /// - `BANNERSCAN_TIMEOUT_SECS`: Override the list download timeout
    pub fn load_with_env() -> ConfigResult<Self> {
        let mut config = Self::load()?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Apply overrides from a key lookup (normally the process environment).
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("BANNERSCAN_LIST_URL") {
            tracing::debug!("Override list.url from env: {}", url);
            self.list.url = url;
        }

        if let Some(dir) = lookup("BANNERSCAN_DATA_DIR") {
            tracing::debug!("Override list.data_dir from env: {}", dir);
            self.list.data_dir = Some(PathBuf::from(dir));
        }

        if let Some(val) = lookup("BANNERSCAN_TIMEOUT_SECS") {
            if let Ok(secs) = val.parse() {
                self.list.timeout_secs = secs;
                tracing::debug!("Override list.timeout_secs from env: {}", secs);
            }
        }
    }

    /// Save configuration to disk.
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> ConfigResult<()> {
        let config_path = Self::config_path()?;
        let config_dir = config_path
            .parent()
            .ok_or_else(|| ConfigError::InvalidValue {
                field: "config_path".to_string(),
                reason: "no parent directory".to_string(),
            })?;

        fs::create_dir_all(config_dir)?;
        tracing::debug!("Saving config to {}", config_path.display());

        let contents = toml::to_string_pretty(self)?;
        fs::write(config_path, contents)?;
        Ok(())
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/bannerscan/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs = ProjectDirs::from("org", "bannerscan", "bannerscan")
            .ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Get the data directory path.
    ///
    /// Uses XDG base directories: `~/.local/share/bannerscan`
    pub fn data_dir() -> ConfigResult<PathBuf> {
        let dirs = ProjectDirs::from("org", "bannerscan", "bannerscan")
            .ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.data_dir().to_path_buf())
    }

    /// Directory the banner list is fetched into.
    ///
    /// Honors `list.data_dir` when set, otherwise the XDG data directory.
    pub fn list_dir(&self) -> ConfigResult<PathBuf> {
        match &self.list.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => Self::data_dir(),
        }
    }

    /// Full path of the locally stored banner list.
    pub fn list_path(&self) -> ConfigResult<PathBuf> {
        Ok(self.list_dir()?.join(&self.list.file_name))
    }
}

/// Banner list retrieval settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ListConfig {
    /// Remote location of the list
    pub url: String,
    /// Local file name of the fetched list
    pub file_name: String,
    /// Directory override for the fetched list
    pub data_dir: Option<PathBuf>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// User agent string
    pub user_agent: String,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_LIST_URL.to_string(),
            file_name: DEFAULT_LIST_FILE.to_string(),
            data_dir: None,
            timeout_secs: 60,
            user_agent: "bannerscan/0.1.0 (+https://github.com/bannerscan/bannerscan)".to_string(),
        }
    }
}

/// Exclusive numeric bounds used for load-sanity checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SanityRange {
    /// Values must be strictly greater than this
    pub min: usize,
    /// Values must be strictly less than this
    pub max: usize,
}

impl SanityRange {
    /// Create a new range with exclusive bounds.
    #[must_use]
    pub const fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    /// Whether `value` lies strictly within the bounds.
    #[must_use]
    pub const fn contains(&self, value: usize) -> bool {
        value > self.min && value < self.max
    }
}

/// Detection settings.
///
/// The bounds describe the order of magnitude of a real list snapshot.
/// Values outside them are logged, never rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Expected number of table keys (reserved keys included)
    pub domain_bounds: SanityRange,
    /// Expected number of `__global__` selectors
    pub global_bounds: SanityRange,
    /// Expected number of `__unknown__` selectors
    pub unknown_bounds: SanityRange,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            domain_bounds: SanityRange::new(1000, 10_000),
            global_bounds: SanityRange::new(1000, 10_000),
            unknown_bounds: SanityRange::new(10, 500),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.list.url, DEFAULT_LIST_URL);
        assert_eq!(config.list.file_name, "bannerlist.txt");
        assert_eq!(config.list.timeout_secs, 60);
        assert!(config.list.data_dir.is_none());
        assert_eq!(config.detection.unknown_bounds, SanityRange::new(10, 500));
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("[list]"));
        assert!(toml_str.contains("[detection"));

        let parsed: AppConfig = toml::from_str(&toml_str).expect("parse serialized config");
        assert_eq!(parsed.list.url, config.list.url);
        assert_eq!(parsed.detection.global_bounds, config.detection.global_bounds);
    }

    #[test]
    fn test_config_save_load() {
        let tmp = TempDir::new().expect("create temp dir");
        let config_path = tmp.path().join("config.toml");

        let mut config = AppConfig::default();
        config.list.url = "http://mirror.local/list.txt".to_string();
        config.list.timeout_secs = 5;

        let contents = toml::to_string_pretty(&config).expect("serialize config");
        fs::write(&config_path, contents).expect("write config file");

        let loaded_contents = fs::read_to_string(&config_path).expect("read config file");
        let loaded: AppConfig = toml::from_str(&loaded_contents).expect("parse loaded config");

        assert_eq!(loaded.list.url, "http://mirror.local/list.txt");
        assert_eq!(loaded.list.timeout_secs, 5);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("BANNERSCAN_LIST_URL", "http://127.0.0.1:8080/list"),
            ("BANNERSCAN_DATA_DIR", "/tmp/bannerscan"),
            ("BANNERSCAN_TIMEOUT_SECS", "not-a-number"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config.apply_env_overrides(|key| env.get(key).map(|v| (*v).to_string()));

        assert_eq!(config.list.url, "http://127.0.0.1:8080/list");
        assert_eq!(
            config.list_path().expect("list path"),
            PathBuf::from("/tmp/bannerscan/bannerlist.txt")
        );
        // Unparseable values leave the default in place
        assert_eq!(config.list.timeout_secs, 60);
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[list]
file_name = "cookies.txt"

[detection.unknown_bounds]
min = 1
max = 50
"#;

        let config: AppConfig = toml::from_str(toml_str).expect("parse partial config");
        assert_eq!(config.list.file_name, "cookies.txt");
        assert_eq!(config.detection.unknown_bounds, SanityRange::new(1, 50));
        // These should be defaults
        assert_eq!(config.list.url, DEFAULT_LIST_URL);
        assert_eq!(config.detection.domain_bounds, SanityRange::new(1000, 10_000));
    }

    #[test]
    fn test_sanity_range_is_exclusive() {
        let range = SanityRange::new(10, 500);
        assert!(!range.contains(10));
        assert!(range.contains(11));
        assert!(range.contains(499));
        assert!(!range.contains(500));
    }
}
