// sqlprobe-config/src/config.rs
// ============================================================================
// Module: SQL Probe Configuration
// Description: Configuration loading and validation for SQL Probe.
// Purpose: Provide strict config parsing with hard limits and stock defaults.
// Dependencies: sqlprobe-core, sqlprobe-store-sqlite, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Every section is optional; omitted values fall back to the stock run. A
//! missing file at the default location is treated as an empty config, while
//! a missing file that was named explicitly is an error.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;
use sqlprobe_core::HarnessConfig;
use sqlprobe_core::OpenOptions;
use sqlprobe_store_sqlite::DEFAULT_BUSY_TIMEOUT_MS;
use sqlprobe_store_sqlite::SqliteStoreMode;
use sqlprobe_store_sqlite::SqliteStoreOpener;
use sqlprobe_store_sqlite::SqliteSyncMode;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
pub const DEFAULT_CONFIG_NAME: &str = "sqlprobe.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "SQLPROBE_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum busy timeout accepted for the store (ms).
pub(crate) const MAX_BUSY_TIMEOUT_MS: u64 = 600_000;
/// Maximum length of the engine variant label.
const MAX_ENGINE_VARIANT_LENGTH: usize = 64;

/// Default database name.
const DEFAULT_DB_NAME: &str = "test.db";
/// Default location label.
const DEFAULT_LOCATION: &str = "default";

// ============================================================================
// SECTION: Config Model
// ============================================================================

/// Root configuration for a probe run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SqlProbeConfig {
    /// Store selection and pragmas.
    #[serde(default)]
    pub store: StoreConfig,
    /// Harness phases and sizes.
    #[serde(default)]
    pub harness: HarnessConfig,
    /// Structured event output.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Store selection.
///
/// # Invariants
/// - `name` and `location` are plain names resolved under `directory`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// Database name.
    #[serde(default = "default_db_name")]
    pub name: String,
    /// Location label; `default` stores the file directly in `directory`.
    #[serde(default = "default_location")]
    pub location: String,
    /// Optional engine variant label.
    #[serde(default)]
    pub engine_variant: Option<String>,
    /// Base directory for database files.
    #[serde(default = "default_directory")]
    pub directory: PathBuf,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteStoreMode,
    /// `SQLite` sync mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            name: default_db_name(),
            location: default_location(),
            engine_variant: None,
            directory: default_directory(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            journal_mode: SqliteStoreMode::default(),
            sync_mode: SqliteSyncMode::default(),
        }
    }
}

impl StoreConfig {
    /// Returns the open request for the configured database.
    #[must_use]
    pub fn open_options(&self) -> OpenOptions {
        OpenOptions {
            name: self.name.clone(),
            location: self.location.clone(),
            engine_variant: self.engine_variant.clone(),
        }
    }

    /// Returns a `SQLite` opener rooted at the configured directory.
    #[must_use]
    pub fn sqlite_opener(&self) -> SqliteStoreOpener {
        SqliteStoreOpener {
            directory: self.directory.clone(),
            busy_timeout_ms: self.busy_timeout_ms,
            journal_mode: self.journal_mode,
            sync_mode: self.sync_mode,
        }
    }

    /// Validates store settings.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_plain_name("store.name", &self.name)?;
        if self.location != DEFAULT_LOCATION {
            validate_plain_name("store.location", &self.location)?;
        }
        if let Some(variant) = &self.engine_variant {
            let trimmed = variant.trim();
            if trimmed.is_empty() || trimmed.len() > MAX_ENGINE_VARIANT_LENGTH {
                return Err(ConfigError::Invalid(
                    "store.engine_variant must be 1-64 characters".to_string(),
                ));
            }
        }
        validate_path_string("store.directory", &self.directory.to_string_lossy())?;
        if self.busy_timeout_ms > MAX_BUSY_TIMEOUT_MS {
            return Err(ConfigError::Invalid(format!(
                "store.busy_timeout_ms exceeds limit ({} > {MAX_BUSY_TIMEOUT_MS})",
                self.busy_timeout_ms
            )));
        }
        Ok(())
    }
}

/// Destination for structured harness events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventSinkKind {
    /// JSON lines on stderr.
    #[default]
    Stderr,
    /// JSON lines appended to `logging.path`.
    File,
    /// Discard events.
    None,
}

/// Structured event output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Sink selection.
    #[serde(default)]
    pub sink: EventSinkKind,
    /// Log file path for the `file` sink.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl LoggingConfig {
    /// Validates logging settings.
    fn validate(&self) -> Result<(), ConfigError> {
        match (&self.sink, &self.path) {
            (EventSinkKind::File, None) => Err(ConfigError::Invalid(
                "logging.path is required when logging.sink = \"file\"".to_string(),
            )),
            (_, Some(path)) => validate_path_string("logging.path", &path.to_string_lossy()),
            (_, None) => Ok(()),
        }
    }
}

impl SqlProbeConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// Resolution order is the explicit `path`, then [`CONFIG_ENV_VAR`], then
    /// [`DEFAULT_CONFIG_NAME`] in the working directory. Only the last may be
    /// absent, in which case the defaults are returned.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (resolved, explicit) = resolve_path(path)?;
        validate_path(&resolved)?;
        if !explicit && !resolved.exists() {
            let config = Self::default();
            config.validate()?;
            return Ok(config);
        }
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml_str(content)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.store.validate()?;
        self.harness.validate().map_err(|err| ConfigError::Invalid(err.to_string()))?;
        self.logging.validate()?;
        Ok(())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path and whether it was named explicitly.
fn resolve_path(path: Option<&Path>) -> Result<(PathBuf, bool), ConfigError> {
    if let Some(path) = path {
        return Ok((path.to_path_buf(), true));
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok((PathBuf::from(env_path), true));
    }
    Ok((PathBuf::from(DEFAULT_CONFIG_NAME), false))
}

/// Validates the resolved path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        let component_value = component.as_os_str().to_string_lossy();
        if component_value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Validates a name that must not contain path separators.
fn validate_plain_name(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_PATH_COMPONENT_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    if trimmed.contains(['/', '\\']) || trimmed == "." || trimmed == ".." {
        return Err(ConfigError::Invalid(format!("{field} must be a plain name")));
    }
    Ok(())
}

/// Serde default for the database name.
fn default_db_name() -> String {
    DEFAULT_DB_NAME.to_string()
}

/// Serde default for the location label.
fn default_location() -> String {
    DEFAULT_LOCATION.to_string()
}

/// Serde default for the database directory.
fn default_directory() -> PathBuf {
    PathBuf::from(".")
}

/// Serde default for the busy timeout.
const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}
