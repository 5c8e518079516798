use crate::line_buffer::LineBuffer;

/// Holds the lines of the most recent copy or delete.
///
/// Contents are owned copies; editing the document never changes them.
/// Every copy replaces what was there before.
#[derive(Debug, Clone, Default)]
pub struct Clipboard {
    contents: Option<LineBuffer>,
}

impl Clipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the held lines. An empty range clears the clipboard.
    pub fn replace(&mut self, lines: Vec<String>) {
        self.contents = if lines.is_empty() {
            None
        } else {
            Some(LineBuffer::from_lines(lines))
        };
    }

    pub fn len(&self) -> usize {
        self.contents.as_ref().map_or(0, LineBuffer::line_count)
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_none()
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> + '_ {
        self.contents.iter().flat_map(|buffer| buffer.lines())
    }
}
