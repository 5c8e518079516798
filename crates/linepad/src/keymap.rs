use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use linecore::EditorEvent;

/// Fixed key bindings for the editing window.
pub fn map_key(key: KeyEvent) -> EditorEvent {
    let control = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);

    match key.code {
        KeyCode::Char(c) if control => match c.to_ascii_lowercase() {
            'q' => EditorEvent::Quit,
            's' => EditorEvent::Save,
            'f' => EditorEvent::Search,
            _ => EditorEvent::Other,
        },
        KeyCode::Char(_) if alt => EditorEvent::Other,
        KeyCode::Char(c) => EditorEvent::Char(c),
        KeyCode::Enter => EditorEvent::Enter,
        KeyCode::Backspace => EditorEvent::Backspace,
        KeyCode::Up => EditorEvent::Up,
        KeyCode::Down => EditorEvent::Down,
        KeyCode::Left => EditorEvent::Left,
        KeyCode::Right => EditorEvent::Right,
        KeyCode::Esc => EditorEvent::CommandMode,
        _ => EditorEvent::Other,
    }
}
