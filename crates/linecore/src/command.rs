//! Command-mode grammar: `[0-9]+[cdp]` or a bare `p`.

/// A parsed command-mode instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Copy `count` lines from the cursor row into the clipboard.
    Copy { count: usize },
    /// Copy `count` lines, then remove them from the document.
    Delete { count: usize },
    /// Insert the clipboard at the cursor row.
    Paste,
    /// Anything the grammar does not accept.
    Unknown(String),
}

/// What executing a command did, in lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandEffect {
    Copied(usize),
    Deleted(usize),
    Pasted(usize),
    Ignored,
}

/// Parse command text. Surrounding whitespace is ignored; a count too large
/// for `usize` saturates. A count before `p` is accepted and ignored.
pub fn parse_command(input: &str) -> Command {
    let trimmed = input.trim();
    if trimmed == "p" {
        return Command::Paste;
    }

    let digits_end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    let (digits, op) = trimmed.split_at(digits_end);
    if digits.is_empty() {
        return Command::Unknown(trimmed.to_string());
    }
    let count = digits.parse::<usize>().unwrap_or(usize::MAX);

    match op {
        "c" => Command::Copy { count },
        "d" => Command::Delete { count },
        "p" => Command::Paste,
        _ => Command::Unknown(trimmed.to_string()),
    }
}
