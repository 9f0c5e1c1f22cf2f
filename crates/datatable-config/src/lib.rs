// crates/datatable-config/src/lib.rs
// ============================================================================
// Module: Data Table Config
// Description: Canonical configuration model + validation for storage.
// Purpose: Load and validate the storage-location policy from TOML.
// Dependencies: datatable-store-sqlite, serde, thiserror, toml
// ============================================================================

//! ## Overview
//! Configuration selects one of three mutually exclusive storage modes for
//! the data table files: a writable persistent directory, a read-only
//! streaming directory, or bundled resources supplied through a loader.
//! Loading is strict and fail-closed: oversized files, non-UTF-8 content,
//! unknown fields, and mode/root mismatches are all rejected with stable
//! error messages.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use datatable_store_sqlite::ResourceLoader;
use datatable_store_sqlite::SqliteStoreResolver;
use datatable_store_sqlite::StorageLayout;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum config file size accepted by the loader.
const MAX_CONFIG_BYTES: u64 = 1024 * 1024;
/// Default busy timeout handed to resolvers (ms).
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
///
/// # Invariants
/// - Message prefixes are stable for test assertions.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Filesystem-level failure while reading the config.
    #[error("config io error: {0}")]
    Io(String),
    /// Config file failed TOML parsing.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Config content failed validation.
    #[error("config invalid: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Model
// ============================================================================

/// Storage-location policy mode.
///
/// # Invariants
/// - Modes are mutually exclusive; exactly one is configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageMode {
    /// Writable persistent-data directory.
    Persistent,
    /// Read-only streaming-asset directory.
    Streaming,
    /// Bundled read-only resource bytes via a loader.
    Resources,
}

/// `[storage]` section of the config file.
///
/// # Invariants
/// - `root` is required and absolute for path modes, and must be absent for
///   `resources` mode.
/// - `busy_timeout_ms` is interpreted as milliseconds and must be > 0.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StorageSection {
    /// Active storage mode.
    pub mode: StorageMode,
    /// Root directory for path modes.
    #[serde(default)]
    pub root: Option<PathBuf>,
    /// Busy timeout applied to every store handle (ms).
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

/// Returns the default busy timeout.
const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

/// Root configuration document.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DataTableConfig {
    /// Storage-location policy.
    pub storage: StorageSection,
}

impl DataTableConfig {
    /// Loads and validates a config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the path is unsafe, the file is
    /// oversized or not UTF-8, parsing fails, or validation fails.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        validate_config_path(path)?;
        let metadata = fs::metadata(path).map_err(|err| ConfigError::Io(err.to_string()))?;
        if metadata.len() > MAX_CONFIG_BYTES {
            return Err(ConfigError::Invalid(format!(
                "config file exceeds size limit: {} bytes (max {MAX_CONFIG_BYTES})",
                metadata.len()
            )));
        }
        let bytes = fs::read(path).map_err(|err| ConfigError::Io(err.to_string()))?;
        let text = String::from_utf8(bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml_str(&text)
    }

    /// Parses and validates config content.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(text).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates mode/root consistency and limit fields.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.busy_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "busy_timeout_ms must be greater than zero".to_string(),
            ));
        }
        match self.storage.mode {
            StorageMode::Persistent | StorageMode::Streaming => {
                let Some(root) = &self.storage.root else {
                    return Err(ConfigError::Invalid(
                        "storage root is required for path modes".to_string(),
                    ));
                };
                if !root.is_absolute() {
                    return Err(ConfigError::Invalid(
                        "storage root must be an absolute path".to_string(),
                    ));
                }
            }
            StorageMode::Resources => {
                if self.storage.root.is_some() {
                    return Err(ConfigError::Invalid(
                        "storage root is not allowed for resources mode".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Converts the config into a bound resolver.
    ///
    /// Resources mode requires a loader; path modes ignore it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when resources mode has no loader.
    pub fn into_resolver(
        self,
        loader: Option<Box<dyn ResourceLoader>>,
    ) -> Result<SqliteStoreResolver, ConfigError> {
        let busy_timeout_ms = self.storage.busy_timeout_ms;
        let layout = match (self.storage.mode, self.storage.root) {
            (StorageMode::Persistent, Some(root)) => StorageLayout::Persistent { root },
            (StorageMode::Streaming, Some(root)) => StorageLayout::Streaming { root },
            (StorageMode::Resources, None) => {
                let Some(loader) = loader else {
                    return Err(ConfigError::Invalid(
                        "resources mode requires a resource loader".to_string(),
                    ));
                };
                StorageLayout::Resources { loader }
            }
            _ => {
                return Err(ConfigError::Invalid(
                    "storage mode and root are inconsistent".to_string(),
                ));
            }
        };
        Ok(SqliteStoreResolver::with_busy_timeout(layout, busy_timeout_ms))
    }
}

// ============================================================================
// SECTION: Path Guards
// ============================================================================

/// Rejects unsafe config paths before any filesystem access.
fn validate_config_path(path: &Path) -> Result<(), ConfigError> {
    let raw = path.as_os_str();
    if raw.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!(
            "config path exceeds max length: {} (max {MAX_TOTAL_PATH_LENGTH})",
            raw.len()
        )));
    }
    for component in path.components() {
        if component.as_os_str().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!(
                "config path component too long (max {MAX_PATH_COMPONENT_LENGTH})"
            )));
        }
    }
    Ok(())
}
