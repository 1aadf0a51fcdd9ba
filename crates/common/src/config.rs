//! Configuration types for newcoin.
//!
//! Configuration is loaded from TOML. Every section has defaults, so an empty
//! file is a valid configuration.
//!
//! # Example Configuration (TOML)
//!
//! ```toml
//! [fees]
//! base_fee = 10
//! account_create_fee = 1000
//! nickname_create_fee = 1000
//! load_factor = 256
//!
//! [directory]
//! page_capacity = 32
//!
//! [paths]
//! max_path_length = 6
//! max_paths = 4
//!
//! [engine]
//! disabled_transactions = ["Store"]
//!
//! [logging]
//! level = "debug"
//! format = "json"
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Log levels for filtering log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Filter directive string understood by `tracing-subscriber`.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Log output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Main configuration for a newcoin node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Fee schedule used by the engine's fee sufficiency check.
    #[serde(default)]
    pub fees: FeeConfig,

    /// Ownership directory paging.
    #[serde(default)]
    pub directory: DirectoryConfig,

    /// Limits for the built-in pathfinder.
    #[serde(default)]
    pub paths: PathConfig,

    /// Engine feature switches.
    #[serde(default)]
    pub engine: EngineConfig,

    /// Logging configuration (level and format).
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Fee schedule.
///
/// All amounts are in drops of the native currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeConfig {
    /// Cost of an ordinary transaction.
    ///
    /// Default: 10
    #[serde(default = "default_base_fee")]
    pub base_fee: i64,

    /// Cost of a transaction that creates an account.
    ///
    /// Default: 1000
    #[serde(default = "default_account_create_fee")]
    pub account_create_fee: i64,

    /// Cost of claiming a nickname nobody holds yet.
    ///
    /// Default: 1000
    #[serde(default = "default_nickname_create_fee")]
    pub nickname_create_fee: i64,

    /// Current network load, scaled so that 256 means 1.0x.
    ///
    /// Default: 256
    #[serde(default = "default_load_factor")]
    pub load_factor: u32,
}

/// Load factor that leaves fees unscaled.
pub const LOAD_BASE: u32 = 256;

impl Default for FeeConfig {
    fn default() -> Self {
        Self {
            base_fee: default_base_fee(),
            account_create_fee: default_account_create_fee(),
            nickname_create_fee: default_nickname_create_fee(),
            load_factor: default_load_factor(),
        }
    }
}

/// Ownership directory configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryConfig {
    /// Number of entries a single directory page holds.
    ///
    /// Default: 32
    #[serde(default = "default_page_capacity")]
    pub page_capacity: usize,

    /// Highest page number a directory may allocate.
    ///
    /// Default: `u64::MAX`
    #[serde(default = "default_max_pages")]
    pub max_pages: u64,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            page_capacity: default_page_capacity(),
            max_pages: default_max_pages(),
        }
    }
}

/// Pathfinder limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathConfig {
    /// Maximum number of accounts on a path, endpoints included.
    ///
    /// Default: 6
    #[serde(default = "default_max_path_length")]
    pub max_path_length: usize,

    /// Maximum number of candidate paths returned per search.
    ///
    /// Default: 4
    #[serde(default = "default_max_paths")]
    pub max_paths: usize,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            max_path_length: default_max_path_length(),
            max_paths: default_max_paths(),
        }
    }
}

/// Engine switches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Transaction type names the engine refuses with `tenUNKNOWN`.
    #[serde(default)]
    pub disabled_transactions: Vec<String>,
}

/// Logging configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter.
    ///
    /// Default: `Info`
    #[serde(default)]
    pub level: LogLevel,

    /// Log output format.
    ///
    /// Default: `Text`
    #[serde(default)]
    pub format: LogFormat,
}

fn default_base_fee() -> i64 {
    10
}

fn default_account_create_fee() -> i64 {
    1000
}

fn default_nickname_create_fee() -> i64 {
    1000
}

fn default_load_factor() -> u32 {
    LOAD_BASE
}

fn default_page_capacity() -> usize {
    32
}

fn default_max_pages() -> u64 {
    u64::MAX
}

fn default_max_path_length() -> usize {
    6
}

fn default_max_paths() -> usize {
    4
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid TOML or
    /// fails validation.
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> crate::Result<Self> {
        let config: Config =
            toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints serde cannot express.
    pub fn validate(&self) -> crate::Result<()> {
        if self.fees.base_fee < 0
            || self.fees.account_create_fee < 0
            || self.fees.nickname_create_fee < 0
        {
            return Err(crate::Error::Config("fees must be non-negative".into()));
        }
        if self.fees.load_factor < LOAD_BASE {
            return Err(crate::Error::Config(format!(
                "load_factor must be at least {}",
                LOAD_BASE
            )));
        }
        if self.directory.page_capacity == 0 {
            return Err(crate::Error::Config("page_capacity must be positive".into()));
        }
        if self.directory.max_pages == 0 {
            return Err(crate::Error::Config("max_pages must be positive".into()));
        }
        if self.paths.max_path_length < 2 {
            return Err(crate::Error::Config(
                "max_path_length must allow at least source and destination".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.fees.base_fee, 10);
        assert_eq!(config.directory.page_capacity, 32);
        assert_eq!(config.logging.level, LogLevel::Info);
    }

    #[test]
    fn test_partial_sections() {
        let config = Config::from_toml_str(
            r#"
            [fees]
            base_fee = 12

            [directory]
            page_capacity = 4

            [engine]
            disabled_transactions = ["Store", "Invoice"]

            [logging]
            level = "debug"
            format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(config.fees.base_fee, 12);
        assert_eq!(config.fees.account_create_fee, 1000);
        assert_eq!(config.directory.page_capacity, 4);
        assert_eq!(config.engine.disabled_transactions.len(), 2);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.level.as_str(), "debug");
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(Config::from_toml_str("[directory]\npage_capacity = 0").is_err());
        assert!(Config::from_toml_str("[fees]\nload_factor = 10").is_err());
        assert!(Config::from_toml_str("[fees]\nbase_fee = -1").is_err());
        assert!(Config::from_toml_str("[paths]\nmax_path_length = 1").is_err());
        assert!(Config::from_toml_str("not toml at all [").is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[fees]\nnickname_create_fee = 5").unwrap();
        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.fees.nickname_create_fee, 5);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Config::from_file(Path::new("/nonexistent/newcoin.toml")).unwrap_err();
        assert!(matches!(err, crate::Error::Io(_)));
    }
}
