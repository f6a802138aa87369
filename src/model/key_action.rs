//! Domain-level keyboard actions independent of key bindings.

/// Domain-level actions that can be mapped to key bindings.
///
/// These represent user intent, not specific keys. The mapping from
/// `crossterm::event::KeyEvent` to `KeyAction` is handled by `KeyBindings`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    // Scrolling
    /// Scroll the grid up by one row. Default: k/↑
    ScrollUp,
    /// Scroll the grid down by one row. Default: j/↓
    ScrollDown,
    /// Scroll up by one page of rows. Default: Ctrl+u/Page Up
    PageUp,
    /// Scroll down by one page of rows. Default: Ctrl+d/Page Down
    PageDown,
    /// Jump to the first row of the materialized window. Default: g/Home
    ScrollToTop,

    // Cursor
    /// Move the cursor one cell left. Default: h/←
    CursorLeft,
    /// Move the cursor one cell right. Default: l/→
    CursorRight,

    // Factors
    /// Show or hide the factors popup for the cursor cell. Default: Enter/Space
    ToggleFactors,
    /// Hide the factors popup and clear highlights. Default: Esc
    CloseFactors,

    // Reconfiguration
    /// Add one column (resets the window). Default: +
    IncreaseColumns,
    /// Remove one column (resets the window). Default: -
    DecreaseColumns,
    /// Grow the prefetch buffer by ten rows (resets the window). Default: >
    IncreaseBufferRows,
    /// Shrink the prefetch buffer by ten rows (resets the window). Default: <
    DecreaseBufferRows,

    // Application
    /// Show or hide the help overlay. Default: ?
    Help,
    /// Exit the application. Default: q/Ctrl+c
    Quit,
}
