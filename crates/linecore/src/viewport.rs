//! Cursor and scroll state for the visible text window.

use std::ops::Range;

use crate::line_buffer::LineBuffer;

/// Columns kept free at the right edge before typing soft-wraps the cursor.
pub const DEFAULT_WRAP_MARGIN: usize = 2;

/// Maps the logical cursor (document row, column) onto a window of
/// `width` x `height` cells scrolled by `scroll_offset` lines.
///
/// Invariants, given the buffer the caller passes in:
/// * `row + scroll_offset` is a valid line index,
/// * `row < height`,
/// * `column` never exceeds the current line's length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    row: usize,
    column: usize,
    scroll_offset: usize,
    width: usize,
    height: usize,
    wrap_margin: usize,
}

impl Viewport {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            row: 0,
            column: 0,
            scroll_offset: 0,
            width: width.max(1),
            height: height.max(1),
            wrap_margin: DEFAULT_WRAP_MARGIN,
        }
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn wrap_margin(&self) -> usize {
        self.wrap_margin
    }

    pub fn set_wrap_margin(&mut self, margin: usize) {
        self.wrap_margin = margin;
    }

    pub fn logical_row(&self) -> usize {
        self.row + self.scroll_offset
    }

    /// Cursor position inside the window as `(row, column)`.
    pub fn screen_cursor(&self) -> (usize, usize) {
        (self.row, self.column)
    }

    /// Logical rows currently on screen.
    pub fn visible_range(&self, line_count: usize) -> Range<usize> {
        let start = self.scroll_offset.min(line_count);
        let end = (self.scroll_offset + self.height).min(line_count);
        start..end
    }

    pub fn to_screen(&self, logical_row: usize) -> Option<usize> {
        logical_row
            .checked_sub(self.scroll_offset)
            .filter(|screen| *screen < self.height)
    }

    pub fn to_logical(&self, screen_row: usize) -> usize {
        self.scroll_offset + screen_row
    }

    pub fn move_up(&mut self, buffer: &LineBuffer) {
        if self.logical_row() == 0 {
            return;
        }
        self.retreat_line();
        self.clamp_column(buffer);
    }

    pub fn move_down(&mut self, buffer: &LineBuffer) {
        if self.logical_row() + 1 >= buffer.line_count() {
            return;
        }
        self.advance_line();
        self.clamp_column(buffer);
    }

    pub fn move_left(&mut self) {
        self.column = self.column.saturating_sub(1);
    }

    /// Steps right while staying on the line and inside the window.
    pub fn move_right(&mut self, buffer: &LineBuffer) {
        let len = buffer.line_length(self.logical_row()).unwrap_or(0);
        if self.column < len && self.column + 1 < self.width {
            self.column += 1;
        }
    }

    /// Soft wrap after an insertion: once the cursor reaches the wrap
    /// threshold it continues at column 0 of the next logical line. The
    /// line itself is not split; a blank line is appended when the cursor
    /// was on the last line. Returns whether a wrap happened.
    pub fn on_insert_overflow(&mut self, buffer: &mut LineBuffer) -> bool {
        let threshold = self.width.saturating_sub(self.wrap_margin).max(1);
        if self.column < threshold {
            return false;
        }
        if self.logical_row() + 1 >= buffer.line_count() {
            buffer.insert_line(buffer.line_count());
        }
        self.column = 0;
        self.advance_line();
        true
    }

    /// Moves to the start of the next line after the buffer split the
    /// current one.
    pub fn on_line_break(&mut self) {
        self.advance_line();
        self.column = 0;
    }

    /// One logical line down, scrolling at the bottom edge.
    pub fn advance_line(&mut self) {
        if self.row + 1 >= self.height {
            self.scroll_offset += 1;
        } else {
            self.row += 1;
        }
    }

    /// One logical line up, scrolling at the top edge.
    pub fn retreat_line(&mut self) {
        if self.row > 0 {
            self.row -= 1;
        } else if self.scroll_offset > 0 {
            self.scroll_offset -= 1;
        }
    }

    pub(crate) fn set_column(&mut self, column: usize) {
        self.column = column;
    }

    /// Puts the cursor on `logical_row`, scrolling just enough to show it.
    pub fn reveal(&mut self, logical_row: usize, column: usize) {
        if logical_row < self.scroll_offset {
            self.scroll_offset = logical_row;
            self.row = 0;
        } else if logical_row >= self.scroll_offset + self.height {
            self.scroll_offset = logical_row + 1 - self.height;
            self.row = self.height - 1;
        } else {
            self.row = logical_row - self.scroll_offset;
        }
        self.column = column;
    }

    /// Restores the invariants after the buffer shrank. Scrolls back before
    /// moving the on-screen row so more of the document stays visible.
    pub fn clamp_to(&mut self, buffer: &LineBuffer) {
        let last = buffer.line_count().saturating_sub(1);
        let logical = self.logical_row();
        if logical > last {
            let shift = logical - last;
            if self.scroll_offset >= shift {
                self.scroll_offset -= shift;
            } else {
                self.row -= shift - self.scroll_offset;
                self.scroll_offset = 0;
            }
        }
        self.clamp_column(buffer);
    }

    pub fn clamp_column(&mut self, buffer: &LineBuffer) {
        let len = buffer.line_length(self.logical_row()).unwrap_or(0);
        self.column = self.column.min(len);
    }

    /// Adopts a new window size, keeping the cursor inside the window.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width.max(1);
        self.height = height.max(1);
        if self.row >= self.height {
            self.scroll_offset += self.row - (self.height - 1);
            self.row = self.height - 1;
        }
    }

    /// Back to the top-left corner, keeping size and margin.
    pub fn reset(&mut self) {
        self.row = 0;
        self.column = 0;
        self.scroll_offset = 0;
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(80, 24)
    }
}
