//! Keyboard bindings configuration.

use crate::model::key_action::KeyAction;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

/// Maps keyboard events to domain actions.
///
/// Provides default vim-style bindings alongside arrow and paging keys.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    bindings: HashMap<KeyEvent, KeyAction>,
}

impl KeyBindings {
    /// Look up the action for a key event.
    ///
    /// Shift is ignored for printable characters, since terminals disagree on
    /// whether `+`, `>`, `<` and `?` carry it.
    pub fn get(&self, key: KeyEvent) -> Option<KeyAction> {
        if let Some(action) = self.bindings.get(&key) {
            return Some(*action);
        }
        match key.code {
            KeyCode::Char(_) if key.modifiers.contains(KeyModifiers::SHIFT) => {
                let unshifted = KeyEvent::new(key.code, key.modifiers.difference(KeyModifiers::SHIFT));
                self.bindings.get(&unshifted).copied()
            }
            _ => None,
        }
    }

    fn bind(&mut self, code: KeyCode, modifiers: KeyModifiers, action: KeyAction) {
        self.bindings.insert(KeyEvent::new(code, modifiers), action);
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        let mut keys = Self {
            bindings: HashMap::new(),
        };
        let none = KeyModifiers::NONE;
        let ctrl = KeyModifiers::CONTROL;

        // Vim-style scrolling
        keys.bind(KeyCode::Char('j'), none, KeyAction::ScrollDown);
        keys.bind(KeyCode::Char('k'), none, KeyAction::ScrollUp);
        keys.bind(KeyCode::Char('h'), none, KeyAction::CursorLeft);
        keys.bind(KeyCode::Char('l'), none, KeyAction::CursorRight);
        keys.bind(KeyCode::Char('g'), none, KeyAction::ScrollToTop);

        // Arrow keys
        keys.bind(KeyCode::Down, none, KeyAction::ScrollDown);
        keys.bind(KeyCode::Up, none, KeyAction::ScrollUp);
        keys.bind(KeyCode::Left, none, KeyAction::CursorLeft);
        keys.bind(KeyCode::Right, none, KeyAction::CursorRight);
        keys.bind(KeyCode::Home, none, KeyAction::ScrollToTop);

        // Page navigation
        keys.bind(KeyCode::Char('d'), ctrl, KeyAction::PageDown);
        keys.bind(KeyCode::Char('u'), ctrl, KeyAction::PageUp);
        keys.bind(KeyCode::PageDown, none, KeyAction::PageDown);
        keys.bind(KeyCode::PageUp, none, KeyAction::PageUp);

        // Factors
        keys.bind(KeyCode::Enter, none, KeyAction::ToggleFactors);
        keys.bind(KeyCode::Char(' '), none, KeyAction::ToggleFactors);
        keys.bind(KeyCode::Esc, none, KeyAction::CloseFactors);

        // Reconfiguration
        keys.bind(KeyCode::Char('+'), none, KeyAction::IncreaseColumns);
        keys.bind(KeyCode::Char('-'), none, KeyAction::DecreaseColumns);
        keys.bind(KeyCode::Char('>'), none, KeyAction::IncreaseBufferRows);
        keys.bind(KeyCode::Char('<'), none, KeyAction::DecreaseBufferRows);

        // Application controls
        keys.bind(KeyCode::Char('?'), none, KeyAction::Help);
        keys.bind(KeyCode::Char('q'), none, KeyAction::Quit);
        keys.bind(KeyCode::Char('c'), ctrl, KeyAction::Quit);

        keys
    }
}
