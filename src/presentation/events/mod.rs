//! Event handling.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Result of event handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventResult {
    /// Continue processing.
    Continue,
    /// Exit application.
    Exit,
}

/// `Ctrl+C` or `Ctrl+Q`; plain letters are reserved for typing.
#[must_use]
pub fn is_quit_event(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c' | 'q'))
}

#[must_use]
pub fn is_submit_event(key: &KeyEvent) -> bool {
    matches!(key.code, KeyCode::Enter)
}

#[must_use]
pub fn is_back_event(key: &KeyEvent) -> bool {
    matches!(key.code, KeyCode::Esc)
}

/// `Ctrl+<c>`.
#[must_use]
pub fn is_ctrl(key: &KeyEvent, c: char) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char(c)
}
