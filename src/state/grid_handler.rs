//! Grid keyboard action handler.
//!
//! Translates domain [`KeyAction`]s into AppState transitions. Quitting is
//! left to the event loop.

use crate::model::KeyAction;
use crate::state::AppState;

/// Rows added or removed by one buffer-rows keypress.
pub const BUFFER_ROWS_STEP: isize = 10;

/// Apply `action` to `state`.
///
/// Paging moves by the number of rows currently on screen.
pub fn handle_grid_action(state: &mut AppState, action: KeyAction) {
    let page = state.viewport_rows().max(1) as isize;

    match action {
        KeyAction::ScrollDown => state.scroll_rows(1),
        KeyAction::ScrollUp => state.scroll_rows(-1),
        KeyAction::PageDown => state.scroll_rows(page),
        KeyAction::PageUp => state.scroll_rows(-page),
        KeyAction::ScrollToTop => state.scroll_to_top(),
        KeyAction::CursorLeft => state.move_cursor(-1),
        KeyAction::CursorRight => state.move_cursor(1),
        KeyAction::ToggleFactors => state.toggle_factors(),
        KeyAction::CloseFactors => {
            state.close_factors();
            state.help_visible = false;
        }
        KeyAction::IncreaseColumns => state.change_columns(1),
        KeyAction::DecreaseColumns => state.change_columns(-1),
        KeyAction::IncreaseBufferRows => state.change_buffer_rows(BUFFER_ROWS_STEP),
        KeyAction::DecreaseBufferRows => state.change_buffer_rows(-BUFFER_ROWS_STEP),
        KeyAction::Help => state.help_visible = !state.help_visible,
        KeyAction::Quit => {}
    }
}
