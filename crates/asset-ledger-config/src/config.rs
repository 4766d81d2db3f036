// crates/asset-ledger-config/src/config.rs
// ============================================================================
// Module: Asset Ledger Configuration
// Description: Configuration loading and validation for the asset ledger.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: asset-ledger-core, asset-ledger-store-sqlite, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Every section is optional and falls back to defaults; values that are
//! present are validated and rejected when out of range.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use asset_ledger_core::DEFAULT_APP_VERSION;
use asset_ledger_core::DEFAULT_HISTORY_DISAMBIGUATOR;
use asset_ledger_core::DEFAULT_HISTORY_ERA;
use asset_ledger_core::DEFAULT_MAX_ROWS_PER_SCAN;
use asset_ledger_core::HistoryKeyPolicy;
use asset_ledger_store_sqlite::DEFAULT_STREAM_BUFFER;
use asset_ledger_store_sqlite::SqliteLedgerConfig;
use asset_ledger_store_sqlite::SqliteStoreMode;
use asset_ledger_store_sqlite::SqliteSyncMode;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "asset-ledger.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "ASSET_LEDGER_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Default busy timeout for the sqlite store.
const DEFAULT_STORE_BUSY_TIMEOUT_MS: u64 = 5_000;
/// Maximum busy timeout for the sqlite store.
pub(crate) const MAX_STORE_BUSY_TIMEOUT_MS: u64 = 600_000;
/// Maximum rows buffered by a scan producer.
pub(crate) const MAX_STREAM_BUFFER: usize = 65_536;
/// Maximum rows returned by a single scan.
pub(crate) const MAX_ROWS_PER_SCAN_LIMIT: usize = 1_000_000;
/// Maximum length of a history key component.
pub(crate) const MAX_HISTORY_COMPONENT_LENGTH: usize = 128;

// ============================================================================
// SECTION: Config Root
// ============================================================================

/// Asset ledger configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssetLedgerConfig {
    /// Ledger engine configuration.
    #[serde(default)]
    pub store: StoreConfig,
    /// Range read configuration.
    #[serde(default)]
    pub scan: ScanConfig,
    /// History key configuration.
    #[serde(default)]
    pub history: HistoryConfig,
    /// Initialization configuration.
    #[serde(default)]
    pub ledger: LedgerConfig,
    /// Audit sink configuration.
    #[serde(default)]
    pub audit: AuditConfig,
}

impl AssetLedgerConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// The explicit `path` wins, then [`CONFIG_ENV_VAR`], then
    /// `asset-ledger.toml` in the working directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml(content)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
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
        self.scan.validate()?;
        self.history.validate()?;
        self.audit.validate()?;
        Ok(())
    }
}

// ============================================================================
// SECTION: Store
// ============================================================================

/// Ledger engine backend type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StoreType {
    /// Use the in-memory engine.
    #[default]
    Memory,
    /// Use the `SQLite`-backed durable engine.
    Sqlite,
}

/// Ledger engine configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Engine backend type.
    #[serde(rename = "type", default)]
    pub store_type: StoreType,
    /// `SQLite` database path when using the sqlite backend.
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_store_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteStoreMode,
    /// `SQLite` synchronous mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
    /// Rows buffered between a scan producer and its consumer.
    #[serde(default = "default_stream_buffer")]
    pub stream_buffer: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            store_type: StoreType::default(),
            path: None,
            busy_timeout_ms: default_store_busy_timeout_ms(),
            journal_mode: SqliteStoreMode::default(),
            sync_mode: SqliteSyncMode::default(),
            stream_buffer: default_stream_buffer(),
        }
    }
}

impl StoreConfig {
    /// Validates ledger engine configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.stream_buffer == 0 || self.stream_buffer > MAX_STREAM_BUFFER {
            return Err(ConfigError::Invalid(format!(
                "store stream_buffer must be between 1 and {MAX_STREAM_BUFFER}"
            )));
        }
        if self.busy_timeout_ms > MAX_STORE_BUSY_TIMEOUT_MS {
            return Err(ConfigError::Invalid(format!(
                "store busy_timeout_ms must not exceed {MAX_STORE_BUSY_TIMEOUT_MS}"
            )));
        }
        match self.store_type {
            StoreType::Memory => {
                if self.path.is_some() {
                    return Err(ConfigError::Invalid("memory store must not set path".to_string()));
                }
                Ok(())
            }
            StoreType::Sqlite => {
                let path = self.path.as_ref().ok_or_else(|| {
                    ConfigError::Invalid("sqlite store requires path".to_string())
                })?;
                validate_field_path("store", path)
            }
        }
    }

    /// Returns the `SQLite` engine configuration for the sqlite backend.
    ///
    /// Returns `None` for the memory backend.
    #[must_use]
    pub fn sqlite_config(&self) -> Option<SqliteLedgerConfig> {
        match (self.store_type, &self.path) {
            (StoreType::Sqlite, Some(path)) => Some(SqliteLedgerConfig {
                path: path.clone(),
                busy_timeout_ms: self.busy_timeout_ms,
                journal_mode: self.journal_mode,
                sync_mode: self.sync_mode,
                stream_buffer: self.stream_buffer,
            }),
            _ => None,
        }
    }
}

/// Returns the default busy timeout for the sqlite store.
const fn default_store_busy_timeout_ms() -> u64 {
    DEFAULT_STORE_BUSY_TIMEOUT_MS
}

/// Returns the default scan stream buffer.
const fn default_stream_buffer() -> usize {
    DEFAULT_STREAM_BUFFER
}

// ============================================================================
// SECTION: Scan
// ============================================================================

/// Range read configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ScanConfig {
    /// Maximum rows returned by one scan; extra rows mark it truncated.
    #[serde(default = "default_max_rows_per_scan")]
    pub max_rows_per_scan: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            max_rows_per_scan: default_max_rows_per_scan(),
        }
    }
}

impl ScanConfig {
    /// Validates range read configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_rows_per_scan == 0 || self.max_rows_per_scan > MAX_ROWS_PER_SCAN_LIMIT {
            return Err(ConfigError::Invalid(format!(
                "scan max_rows_per_scan must be between 1 and {MAX_ROWS_PER_SCAN_LIMIT}"
            )));
        }
        Ok(())
    }
}

/// Returns the default scan row cap.
const fn default_max_rows_per_scan() -> usize {
    DEFAULT_MAX_ROWS_PER_SCAN
}

// ============================================================================
// SECTION: History
// ============================================================================

/// History key configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryConfig {
    /// Leading key component of every history row.
    #[serde(default = "default_history_era")]
    pub era: String,
    /// Trailing key component of every history row.
    #[serde(default = "default_history_disambiguator")]
    pub disambiguator: String,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            era: default_history_era(),
            disambiguator: default_history_disambiguator(),
        }
    }
}

impl HistoryConfig {
    /// Validates history key configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [("era", &self.era), ("disambiguator", &self.disambiguator)] {
            if value.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("history {field} must be non-empty")));
            }
            if value.len() > MAX_HISTORY_COMPONENT_LENGTH {
                return Err(ConfigError::Invalid(format!(
                    "history {field} exceeds {MAX_HISTORY_COMPONENT_LENGTH} bytes"
                )));
            }
        }
        Ok(())
    }

    /// Returns the history key derivation.
    #[must_use]
    pub fn policy(&self) -> HistoryKeyPolicy {
        HistoryKeyPolicy {
            era: self.era.clone(),
            disambiguator: self.disambiguator.clone(),
        }
    }
}

/// Returns the default history era.
fn default_history_era() -> String {
    DEFAULT_HISTORY_ERA.to_string()
}

/// Returns the default history disambiguator.
fn default_history_disambiguator() -> String {
    DEFAULT_HISTORY_DISAMBIGUATOR.to_string()
}

// ============================================================================
// SECTION: Ledger
// ============================================================================

/// Initialization configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    /// Version marker written by initialization.
    #[serde(default = "default_app_version")]
    pub app_version: u32,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            app_version: default_app_version(),
        }
    }
}

/// Returns the default version marker.
const fn default_app_version() -> u32 {
    DEFAULT_APP_VERSION
}

// ============================================================================
// SECTION: Audit
// ============================================================================

/// Audit sink selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AuditSinkType {
    /// JSON lines on stderr.
    #[default]
    Stderr,
    /// JSON lines appended to a file.
    File,
    /// Discard audit events.
    None,
}

/// Audit sink configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditConfig {
    /// Selected sink.
    #[serde(default)]
    pub sink: AuditSinkType,
    /// Log file path for the file sink.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl AuditConfig {
    /// Validates audit sink configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        match (self.sink, &self.path) {
            (AuditSinkType::File, Some(path)) => validate_field_path("audit", path),
            (AuditSinkType::File, None) => {
                Err(ConfigError::Invalid("file audit sink requires path".to_string()))
            }
            (_, Some(_)) => {
                Err(ConfigError::Invalid("only the file audit sink accepts path".to_string()))
            }
            (_, None) => Ok(()),
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
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

/// Resolves the config path from CLI or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates the resolved path against security limits.
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

/// Validates a configured file path for a named section.
fn validate_field_path(section: &str, path: &Path) -> Result<(), ConfigError> {
    if path.as_os_str().is_empty() {
        return Err(ConfigError::Invalid(format!("{section} path must be non-empty")));
    }
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{section} path exceeds max length")));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{section} path component too long")));
        }
    }
    Ok(())
}

// ============================================================================
// SECTION: Tests
// ============================================================================
