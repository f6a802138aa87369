//! Grid cell styling configuration.
//!
//! Primes, composites, the cursor cell and factor highlights each get a
//! distinct style. Without colors the distinction falls back to modifiers.

use crate::model::Entry;
use ratatui::style::{Color, Modifier, Style};

/// Style for the header line.
pub const HEADER: Style = Style::new().fg(Color::Cyan);

/// Style for the status bar.
pub const STATUS_BAR: Style = Style::new().fg(Color::Gray);

/// Style for section headers in overlays.
pub const SECTION_HEADER: Style = Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD);

/// Style for de-emphasized hint text.
pub const MUTED_TEXT: Style = Style::new().fg(Color::DarkGray);

// ===== ColorConfig =====

/// Configuration for color output.
///
/// Determines whether colors should be enabled or disabled based on:
/// - `--no-color` CLI flag or `no_color` config key
/// - `NO_COLOR` environment variable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorConfig {
    enabled: bool,
}

impl ColorConfig {
    /// Create a ColorConfig from CLI args and environment.
    ///
    /// Priority (first match wins):
    /// 1. `--no-color` flag (disables colors)
    /// 2. `NO_COLOR` env var (any value disables colors)
    /// 3. Default: colors enabled
    pub fn from_env_and_args(no_color_flag: bool) -> Self {
        let enabled = !no_color_flag && std::env::var("NO_COLOR").is_err();
        Self { enabled }
    }

    /// Check if colors are enabled.
    pub fn colors_enabled(self) -> bool {
        self.enabled
    }
}

// ===== CellStyles =====

/// How one grid cell is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellState {
    /// The cursor is on this cell.
    pub cursor: bool,
    /// This cell is the open factors selection.
    pub selected: bool,
    /// This cell shares a factor with the selection.
    pub highlighted: bool,
}

/// Styles for grid cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellStyles {
    prime: Style,
    composite: Style,
    selected: Style,
    highlight: Style,
}

impl CellStyles {
    /// Create a CellStyles with default color scheme.
    pub fn new() -> Self {
        Self::with_color_config(ColorConfig::from_env_and_args(false))
    }

    /// Create a CellStyles with specified color configuration.
    ///
    /// Without colors, primes are bold and highlights are underlined.
    pub fn with_color_config(config: ColorConfig) -> Self {
        if config.colors_enabled() {
            Self {
                prime: Style::new().fg(Color::Green).add_modifier(Modifier::BOLD),
                composite: Style::new().fg(Color::White),
                selected: Style::new().fg(Color::Black).bg(Color::Yellow),
                highlight: Style::new().fg(Color::Black).bg(Color::Cyan),
            }
        } else {
            Self {
                prime: Style::new().add_modifier(Modifier::BOLD),
                composite: Style::new(),
                selected: Style::new().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
                highlight: Style::new().add_modifier(Modifier::UNDERLINED),
            }
        }
    }

    /// Base style for an entry, by primality.
    pub fn base(&self, entry: &Entry) -> Style {
        if entry.is_prime() {
            self.prime
        } else {
            self.composite
        }
    }

    /// Final style for a cell. The cursor is always reversed on top.
    pub fn for_cell(&self, entry: &Entry, state: CellState) -> Style {
        let mut style = self.base(entry);
        if state.selected {
            style = style.patch(self.selected);
        } else if state.highlighted {
            style = style.patch(self.highlight);
        }
        if state.cursor {
            style = style.add_modifier(Modifier::REVERSED);
        }
        style
    }
}

impl Default for CellStyles {
    fn default() -> Self {
        Self::new()
    }
}

// ===== Tests =====
