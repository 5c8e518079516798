/// One logical input event, already decoded from the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorEvent {
    Char(char),
    Enter,
    Backspace,
    Up,
    Down,
    Left,
    Right,
    Quit,
    Save,
    Search,
    CommandMode,
    Other,
}

/// Which line of text the application should collect from the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptKind {
    Search,
    Command,
}

/// What the session loop must do after an event was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    OpenPrompt(PromptKind),
    Save,
    Quit,
}
