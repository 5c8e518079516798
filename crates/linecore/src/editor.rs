use crate::clipboard::Clipboard;
use crate::command::{parse_command, Command, CommandEffect};
use crate::event::{EditorEvent, Outcome, PromptKind};
use crate::line_buffer::LineBuffer;
use crate::render::RenderSurface;
use crate::viewport::Viewport;

/// The command interpreter: owns the document, the cursor window and the
/// clipboard, and applies one event at a time.
#[derive(Debug, Clone)]
pub struct Editor {
    buffer: LineBuffer,
    viewport: Viewport,
    clipboard: Clipboard,
    modified: bool,
    edited_from: Option<usize>,
}

impl Editor {
    pub fn new(width: usize, height: usize) -> Self {
        Self::with_buffer(LineBuffer::new(), width, height)
    }

    pub fn with_buffer(buffer: LineBuffer, width: usize, height: usize) -> Self {
        Self {
            buffer,
            viewport: Viewport::new(width, height),
            clipboard: Clipboard::new(),
            modified: false,
            edited_from: Some(0),
        }
    }

    /// Replaces the document (e.g. after loading a file) and homes the cursor.
    /// The clipboard survives.
    pub fn set_buffer(&mut self, buffer: LineBuffer) {
        self.buffer = buffer;
        self.viewport.reset();
        self.modified = false;
        self.touch(0);
    }

    pub fn buffer(&self) -> &LineBuffer {
        &self.buffer
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn mark_saved(&mut self) {
        self.modified = false;
    }

    /// First row whose text may have changed since the last
    /// `take_edited_from`.
    pub fn edited_from(&self) -> Option<usize> {
        self.edited_from
    }

    pub fn take_edited_from(&mut self) -> Option<usize> {
        self.edited_from.take()
    }

    fn touch(&mut self, row: usize) {
        self.edited_from = Some(self.edited_from.map_or(row, |from| from.min(row)));
    }

    /// Logical cursor as `(row, column)`.
    pub fn cursor(&self) -> (usize, usize) {
        (self.viewport.logical_row(), self.viewport.column())
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.viewport.resize(width, height);
    }

    pub fn set_wrap_margin(&mut self, margin: usize) {
        self.viewport.set_wrap_margin(margin);
    }

    pub fn handle(&mut self, event: EditorEvent) -> Outcome {
        match event {
            EditorEvent::Char(ch) if !ch.is_control() => self.insert_char(ch),
            EditorEvent::Char(_) | EditorEvent::Other => {}
            EditorEvent::Enter => self.line_break(),
            EditorEvent::Backspace => self.backspace(),
            EditorEvent::Up => self.viewport.move_up(&self.buffer),
            EditorEvent::Down => self.viewport.move_down(&self.buffer),
            EditorEvent::Left => self.viewport.move_left(),
            EditorEvent::Right => self.viewport.move_right(&self.buffer),
            EditorEvent::Search => return Outcome::OpenPrompt(PromptKind::Search),
            EditorEvent::CommandMode => return Outcome::OpenPrompt(PromptKind::Command),
            EditorEvent::Save => return Outcome::Save,
            EditorEvent::Quit => return Outcome::Quit,
        }
        Outcome::Continue
    }

    fn insert_char(&mut self, ch: char) {
        let (row, column) = self.cursor();
        self.buffer.insert_char(row, column, ch);
        self.touch(row);
        self.viewport.set_column(column + 1);
        if self.viewport.on_insert_overflow(&mut self.buffer) {
            log::debug!("soft wrap to line {}", self.viewport.logical_row() + 1);
        }
        self.modified = true;
    }

    fn line_break(&mut self) {
        let (row, column) = self.cursor();
        self.buffer.split_at(row, column);
        self.touch(row);
        self.viewport.on_line_break();
        self.modified = true;
    }

    fn backspace(&mut self) {
        let (row, column) = self.cursor();
        if column > 0 {
            self.buffer.remove_char(row, column - 1);
            self.touch(row);
            self.viewport.set_column(column - 1);
            self.modified = true;
        } else if row > 0 {
            let joined_at = self.buffer.line_length(row - 1).unwrap_or(0);
            self.buffer.merge_with_next(row - 1);
            self.touch(row - 1);
            self.viewport.retreat_line();
            self.viewport.set_column(joined_at);
            self.modified = true;
        }
    }

    /// Finds the first line containing `query`, scanning from the top of
    /// the document. On a match the cursor lands on its first occurrence;
    /// otherwise nothing moves. An empty query never matches.
    pub fn search(&mut self, query: &str) -> bool {
        if query.is_empty() {
            return false;
        }
        let found = self.buffer.lines().enumerate().find_map(|(row, line)| {
            line.find(query)
                .map(|byte| (row, line[..byte].chars().count()))
        });
        match found {
            Some((row, column)) => {
                log::debug!("search {:?} matched at {}:{}", query, row + 1, column + 1);
                self.viewport.reveal(row, column);
                true
            }
            None => false,
        }
    }

    pub fn run_command(&mut self, input: &str) -> CommandEffect {
        self.execute(parse_command(input))
    }

    pub fn execute(&mut self, command: Command) -> CommandEffect {
        let row = self.viewport.logical_row();
        match command {
            Command::Copy { count: 0 } | Command::Delete { count: 0 } => CommandEffect::Ignored,
            Command::Copy { count } => {
                let lines = self.buffer.slice(row, count);
                let copied = lines.len();
                self.clipboard.replace(lines);
                CommandEffect::Copied(copied)
            }
            Command::Delete { count } => {
                let lines = self.buffer.remove_lines(row, count);
                let deleted = lines.len();
                self.clipboard.replace(lines);
                self.touch(row);
                if self.buffer.line_count() == 0 {
                    self.buffer.insert_line(0);
                }
                self.viewport.clamp_to(&self.buffer);
                self.modified |= deleted > 0;
                CommandEffect::Deleted(deleted)
            }
            Command::Paste => {
                if self.clipboard.is_empty() {
                    return CommandEffect::Ignored;
                }
                let lines = self.clipboard.lines().map(String::from);
                let pasted = self.buffer.insert_lines(row, lines);
                self.touch(row);
                self.viewport.clamp_column(&self.buffer);
                self.modified = true;
                CommandEffect::Pasted(pasted)
            }
            Command::Unknown(text) => {
                log::debug!("ignoring unknown command {:?}", text);
                CommandEffect::Ignored
            }
        }
    }

    /// `Line: L, Column: C`, both 1-based.
    pub fn status_line(&self) -> String {
        let (row, column) = self.cursor();
        format!("Line: {}, Column: {}", row + 1, column + 1)
    }

    /// Draws the visible slice of the document, the status text and the
    /// cursor. Read-only.
    pub fn render<S: RenderSurface + ?Sized>(&self, surface: &mut S) {
        let range = self.viewport.visible_range(self.buffer.line_count());
        for logical in range {
            if let (Some(screen_row), Some(text)) = (
                self.viewport.to_screen(logical),
                self.buffer.line_text(logical),
            ) {
                surface.draw_line(screen_row, logical + 1, text);
            }
        }
        surface.show_status(&self.status_line());
        let (row, column) = self.viewport.screen_cursor();
        surface.place_cursor(row, column);
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::with_buffer(LineBuffer::new(), 80, 24)
    }
}
