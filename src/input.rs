//! Key bindings: crossterm key events mapped onto the launcher's logical actions.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Logical input understood by the launcher state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    New,
    Delete,
    Edit,
    Up,
    Down,
    Enter,
    Escape,
    Tab,
    Backspace,
    /// Backspace with the clear modifier (Alt).
    ClearSearch,
    Insert(char),
}

/// Footer hint for the bindings available while no overlay is open.
pub const NORMAL_HINTS: &str = "<Ctrl-q>: quit, <up/down>: selection, <Ctrl-n>: new, \
<Ctrl-d>: delete, <Ctrl-e>: edit, <enter>: execute";

/// Footer hint while an overlay owns the keyboard.
pub const OVERLAY_HINTS: &str = "<ESC>: cancel, <enter>: confirm";

/// Translate a key event. Returns `None` for keys without a binding.
pub fn action_for_key(key: KeyEvent) -> Option<Action> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);

    match key.code {
        KeyCode::Char(c) if ctrl => match c.to_ascii_lowercase() {
            'q' | 'c' => Some(Action::Quit),
            'n' => Some(Action::New),
            'd' => Some(Action::Delete),
            'e' => Some(Action::Edit),
            _ => None,
        },
        KeyCode::Char(c) if !c.is_control() => Some(Action::Insert(c)),
        KeyCode::Backspace if alt => Some(Action::ClearSearch),
        KeyCode::Backspace => Some(Action::Backspace),
        KeyCode::Up => Some(Action::Up),
        KeyCode::Down => Some(Action::Down),
        KeyCode::Enter => Some(Action::Enter),
        KeyCode::Esc => Some(Action::Escape),
        KeyCode::Tab | KeyCode::BackTab => Some(Action::Tab),
        _ => None,
    }
}
