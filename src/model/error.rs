//! Error types for the numgrid application.
//!
//! The windowed sequence engine itself never fails: out-of-range input is
//! clamped, the domain floor is signalled with a sentinel, and misuse of the
//! buffer or generator is a logged no-op. The errors here belong to the shell
//! around it (configuration, logging, terminal).
//!
//! # Error Hierarchy
//!
//! - [`AppError`] - Top-level application error
//!   - [`ConfigError`](crate::config::ConfigError) - config file reading/validation
//!   - [`LoggingError`](crate::logging::LoggingError) - tracing subscriber setup
//!   - `std::io::Error` - Terminal/TUI failures

use thiserror::Error;

/// Top-level application error encompassing all fatal failure modes.
///
/// All variants are fatal: the application restores the terminal and exits.
///
/// # Examples
///
/// ```
/// use numgrid::config::ConfigError;
/// use numgrid::model::AppError;
///
/// fn load() -> Result<(), AppError> {
///     Err(ConfigError::InvalidPath("?".to_string()))?;
///     Ok(())
/// }
/// assert!(matches!(load(), Err(AppError::Config(_))));
/// ```
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be read, parsed, or validated.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// The tracing subscriber could not be initialized.
    #[error("Logging error: {0}")]
    Logging(#[from] crate::logging::LoggingError),

    /// Terminal or TUI rendering error.
    ///
    /// Failures in the crossterm/ratatui layer (raw mode, broken pipe, resize).
    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}
