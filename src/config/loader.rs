//! Configuration file loading with precedence handling.

use crate::state::WindowConfig;
use serde::Deserialize;
use std::ops::RangeInclusive;
use std::path::PathBuf;
use thiserror::Error;
use tracing::warn;

/// Allowed cells per grid row.
pub const COLUMNS_RANGE: RangeInclusive<usize> = 1..=32;

/// Allowed rows per extra batch.
pub const BUFFER_ROWS_RANGE: RangeInclusive<usize> = 1..=1000;

/// Allowed rows for the initial load.
pub const INITIAL_ROWS_RANGE: RangeInclusive<usize> = 1..=1000;

/// Env var naming an explicit config file.
pub const ENV_CONFIG: &str = "NUMGRID_CONFIG";
/// Env var overriding `columns`.
pub const ENV_COLUMNS: &str = "NUMGRID_COLUMNS";
/// Env var overriding `buffer_rows`.
pub const ENV_BUFFER_ROWS: &str = "NUMGRID_BUFFER_ROWS";

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Config file path contains invalid UTF-8 or cannot be resolved.
    #[error("Invalid config path: {0}")]
    InvalidPath(String),

    /// Failed to read config file (file may not exist or have permission issues).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },

    /// A resolved value lies outside its allowed range.
    #[error("{field} = {value} is out of range ({min}..={max})")]
    OutOfRange {
        /// Config key.
        field: &'static str,
        /// Offending value.
        value: usize,
        /// Smallest allowed value.
        min: usize,
        /// Largest allowed value.
        max: usize,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/numgrid/config.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Cells per grid row.
    #[serde(default)]
    pub columns: Option<usize>,

    /// Rows fetched per extra batch.
    #[serde(default)]
    pub buffer_rows: Option<usize>,

    /// Rows materialized by the initial load.
    #[serde(default)]
    pub initial_rows: Option<usize>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,

    /// Disable colors.
    #[serde(default)]
    pub no_color: Option<bool>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Cells per grid row.
    pub columns: usize,
    /// Rows fetched per extra batch.
    pub buffer_rows: usize,
    /// Rows materialized by the initial load.
    pub initial_rows: usize,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
    /// Disable colors.
    pub no_color: bool,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        let window = WindowConfig::default();
        Self {
            columns: window.columns,
            buffer_rows: window.buffer_rows,
            initial_rows: window.initial_rows,
            log_file_path: default_log_path(),
            no_color: false,
        }
    }
}

impl ResolvedConfig {
    /// Check every numeric setting against its allowed range.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::OutOfRange`] for the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("columns", self.columns, &COLUMNS_RANGE)?;
        check_range("buffer_rows", self.buffer_rows, &BUFFER_ROWS_RANGE)?;
        check_range("initial_rows", self.initial_rows, &INITIAL_ROWS_RANGE)?;
        Ok(())
    }

    /// Window geometry for the session.
    pub fn window_config(&self) -> WindowConfig {
        WindowConfig {
            columns: self.columns,
            buffer_rows: self.buffer_rows,
            initial_rows: self.initial_rows,
        }
    }
}

fn check_range(
    field: &'static str,
    value: usize,
    range: &RangeInclusive<usize>,
) -> Result<(), ConfigError> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            min: *range.start(),
            max: *range.end(),
        })
    }
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/numgrid/numgrid.log` on Unix-like systems,
/// or appropriate platform path on other systems.
///
/// If state directory cannot be determined, falls back to current directory.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("numgrid").join("numgrid.log")
    } else {
        PathBuf::from("numgrid.log")
    }
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    // Missing file is not an error - use defaults
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Resolve default config file path.
///
/// Returns `~/.config/numgrid/config.toml` on Unix, appropriate path on other platforms.
/// Returns `None` if home directory cannot be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("numgrid").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `NUMGRID_CONFIG` environment variable
/// 3. Default path `~/.config/numgrid/config.toml`
///
/// Missing config files are NOT errors - defaults are used.
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var(ENV_CONFIG) {
        return load_config_file(PathBuf::from(env_path));
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

/// Merge config file into defaults to create resolved config.
///
/// For each field in `ConfigFile`, if `Some(value)`, use it; otherwise use default.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };

    ResolvedConfig {
        columns: config.columns.unwrap_or(defaults.columns),
        buffer_rows: config.buffer_rows.unwrap_or(defaults.buffer_rows),
        initial_rows: config.initial_rows.unwrap_or(defaults.initial_rows),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
        no_color: config.no_color.unwrap_or(defaults.no_color),
    }
}

/// Apply environment variable overrides to resolved config.
///
/// Checks for:
/// - `NUMGRID_COLUMNS`: Override columns
/// - `NUMGRID_BUFFER_ROWS`: Override buffer rows
///
/// Values that do not parse as an unsigned integer are ignored with a warning.
pub fn apply_env_overrides(mut config: ResolvedConfig) -> ResolvedConfig {
    if let Some(columns) = env_usize(ENV_COLUMNS) {
        config.columns = columns;
    }
    if let Some(rows) = env_usize(ENV_BUFFER_ROWS) {
        config.buffer_rows = rows;
    }
    config
}

fn env_usize(name: &str) -> Option<usize> {
    let raw = std::env::var(name).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(var = name, value = %raw, error = %e, "Ignoring unparsable environment override");
            None
        }
    }
}

/// Apply CLI argument overrides to resolved config.
///
/// CLI args have the highest precedence and override all other sources.
/// Only applies overrides for flags that were explicitly set by the user.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
pub fn apply_cli_overrides(
    mut config: ResolvedConfig,
    columns_override: Option<usize>,
    buffer_rows_override: Option<usize>,
    initial_rows_override: Option<usize>,
    no_color: bool,
) -> ResolvedConfig {
    if let Some(columns) = columns_override {
        config.columns = columns;
    }
    if let Some(rows) = buffer_rows_override {
        config.buffer_rows = rows;
    }
    if let Some(rows) = initial_rows_override {
        config.initial_rows = rows;
    }
    // A flag can only switch colors off.
    if no_color {
        config.no_color = true;
    }
    config
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
