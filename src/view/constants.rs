//! Layout dimension constants for TUI rendering.
//!
//! Centralized location for all layout-related numeric values to enable
//! consistent tuning across the application.

/// Height of the header line.
pub const HEADER_HEIGHT: u16 = 1;

/// Height of the status bar in lines.
///
/// Single line for window range, policy state and keyboard hints.
pub const STATUS_BAR_HEIGHT: u16 = 1;

/// Narrowest a grid cell is drawn, including its separating space.
pub const MIN_CELL_WIDTH: u16 = 4;

/// Width percentage for help overlay popup.
///
/// Percentage of screen width (0-100) for the help overlay modal.
pub const HELP_POPUP_WIDTH_PERCENT: u16 = 70;

/// Height percentage for help overlay popup.
///
/// Percentage of screen height (0-100) for the help overlay modal.
pub const HELP_POPUP_HEIGHT_PERCENT: u16 = 80;

/// Width percentage for the factors popup.
pub const FACTORS_POPUP_WIDTH_PERCENT: u16 = 60;

/// Height of the factors popup in lines (border + title + text).
pub const FACTORS_POPUP_HEIGHT: u16 = 5;

/// Event poll interval. Short enough that delivered batches show up promptly.
pub const TICK_INTERVAL_MS: u64 = 50;
