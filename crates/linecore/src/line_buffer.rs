//! Line-oriented text storage.
//!
//! Columns are counted in `char`s, never bytes, so multi-byte text can be
//! edited without splitting a code point. Display width is not corrected.

/// An ordered sequence of independently growable text lines.
///
/// A freshly created buffer holds one empty line. Every mutating method
/// clamps or ignores out-of-range positions instead of failing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineBuffer {
    lines: Vec<String>,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self {
            lines: vec![String::new()],
        }
    }

    /// Builds a buffer from already split lines. An empty iterator yields a
    /// single blank line.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut lines: Vec<String> = lines.into_iter().map(Into::into).collect();
        if lines.is_empty() {
            lines.push(String::new());
        }
        Self { lines }
    }

    /// Parses file content: one line per `\n`-delimited record with the
    /// trailing newline stripped. A `\r` before the newline is kept as text.
    pub fn from_text(content: &str) -> Self {
        let body = content.strip_suffix('\n').unwrap_or(content);
        Self::from_lines(body.split('\n'))
    }

    /// Encodes the buffer for writing: every line followed by `\n`.
    pub fn to_text(&self) -> String {
        let capacity = self.lines.iter().map(|l| l.len() + 1).sum();
        let mut out = String::with_capacity(capacity);
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        out
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn line_text(&self, row: usize) -> Option<&str> {
        self.lines.get(row).map(String::as_str)
    }

    pub fn line_length(&self, row: usize) -> Option<usize> {
        self.lines.get(row).map(|l| l.chars().count())
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> + '_ {
        self.lines.iter().map(String::as_str)
    }

    /// Inserts an empty line at `at`, clamped to `[0, line_count]`.
    pub fn insert_line(&mut self, at: usize) {
        let at = at.min(self.lines.len());
        self.lines.insert(at, String::new());
    }

    /// Removes the line at `at` and returns it; `None` when out of range.
    ///
    /// This may remove the last remaining line. Callers that must keep a
    /// non-empty document (the interpreter does) restore a blank line
    /// themselves.
    pub fn remove_line(&mut self, at: usize) -> Option<String> {
        if at < self.lines.len() {
            Some(self.lines.remove(at))
        } else {
            None
        }
    }

    /// Inserts `ch` at `col` in line `row`. A column past the end appends.
    pub fn insert_char(&mut self, row: usize, col: usize, ch: char) {
        if let Some(line) = self.lines.get_mut(row) {
            let idx = byte_offset(line, col);
            line.insert(idx, ch);
        }
    }

    /// Removes and returns the character at `col` in line `row`.
    pub fn remove_char(&mut self, row: usize, col: usize) -> Option<char> {
        let line = self.lines.get_mut(row)?;
        let (idx, _) = line.char_indices().nth(col)?;
        Some(line.remove(idx))
    }

    /// Appends line `row + 1` to line `row` and drops it. No-op on the last line.
    pub fn merge_with_next(&mut self, row: usize) {
        if row + 1 < self.lines.len() {
            let next = self.lines.remove(row + 1);
            self.lines[row].push_str(&next);
        }
    }

    /// Truncates line `row` at `col` and moves the remainder to a new line below.
    pub fn split_at(&mut self, row: usize, col: usize) {
        if let Some(line) = self.lines.get_mut(row) {
            let idx = byte_offset(line, col);
            let rest = line.split_off(idx);
            self.lines.insert(row + 1, rest);
        }
    }

    /// Copies up to `count` lines starting at `start`.
    pub fn slice(&self, start: usize, count: usize) -> Vec<String> {
        self.lines.iter().skip(start).take(count).cloned().collect()
    }

    /// Inserts `lines` before `at` (clamped), preserving their order.
    /// Returns how many lines were inserted.
    pub fn insert_lines<I>(&mut self, at: usize, lines: I) -> usize
    where
        I: IntoIterator<Item = String>,
    {
        let at = at.min(self.lines.len());
        let before = self.lines.len();
        self.lines.splice(at..at, lines);
        self.lines.len() - before
    }

    /// Removes up to `count` lines starting at `start` and returns them.
    /// Same caller contract as [`LineBuffer::remove_line`].
    pub fn remove_lines(&mut self, start: usize, count: usize) -> Vec<String> {
        let end = start.saturating_add(count).min(self.lines.len());
        if start >= end {
            return Vec::new();
        }
        self.lines.drain(start..end).collect()
    }
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::new()
    }
}

// Byte offset of the `col`-th char, or the line's end when `col` is past it.
fn byte_offset(line: &str, col: usize) -> usize {
    line.char_indices()
        .nth(col)
        .map(|(idx, _)| idx)
        .unwrap_or(line.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contents(buffer: &LineBuffer) -> Vec<&str> {
        buffer.lines().collect()
    }

    #[test]
    fn test_new_buffer_has_one_blank_line() {
        let buffer = LineBuffer::new();
        assert_eq!(buffer.line_count(), 1);
        assert_eq!(buffer.line_text(0), Some(""));
        assert_eq!(buffer.line_length(0), Some(0));
    }

    #[test]
    fn test_from_text_strips_trailing_newline() {
        let buffer = LineBuffer::from_text("one\ntwo\n");
        assert_eq!(contents(&buffer), vec!["one", "two"]);

        let buffer = LineBuffer::from_text("one\ntwo");
        assert_eq!(contents(&buffer), vec!["one", "two"]);

        let buffer = LineBuffer::from_text("");
        assert_eq!(contents(&buffer), vec![""]);

        let buffer = LineBuffer::from_text("a\n\n");
        assert_eq!(contents(&buffer), vec!["a", ""]);
    }

    #[test]
    fn test_to_text_terminates_every_line() {
        let buffer = LineBuffer::from_lines(["abc", "", "def"]);
        assert_eq!(buffer.to_text(), "abc\n\ndef\n");
    }

    #[test]
    fn test_text_round_trip_normalizes_trailing_newline() {
        for original in ["alpha\nbeta\n", "a\r\nb\r\n", "x\n\n\ny\n"] {
            assert_eq!(LineBuffer::from_text(original).to_text(), original);
        }
        assert_eq!(LineBuffer::from_text("no newline").to_text(), "no newline\n");
    }

    #[test]
    fn test_out_of_range_reads_return_none() {
        let buffer = LineBuffer::from_lines(["abc"]);
        assert_eq!(buffer.line_text(1), None);
        assert_eq!(buffer.line_length(5), None);
    }

    #[test]
    fn test_insert_char_example() {
        let mut buffer = LineBuffer::from_lines(["abc", "def"]);
        buffer.insert_char(0, 1, 'X');
        assert_eq!(contents(&buffer), vec!["aXbc", "def"]);
    }

    #[test]
    fn test_insert_char_past_end_appends() {
        let mut buffer = LineBuffer::from_lines(["ab"]);
        buffer.insert_char(0, 10, 'c');
        assert_eq!(buffer.line_text(0), Some("abc"));
    }

    #[test]
    fn test_insert_char_out_of_range_row_is_noop() {
        let mut buffer = LineBuffer::from_lines(["ab"]);
        buffer.insert_char(3, 0, 'c');
        assert_eq!(contents(&buffer), vec!["ab"]);
    }

    #[test]
    fn test_insert_then_remove_restores_line() {
        let original = LineBuffer::from_lines(["hello", "world"]);
        for row in 0..original.line_count() {
            let len = original.line_length(row).unwrap();
            for col in 0..=len {
                let mut buffer = original.clone();
                buffer.insert_char(row, col, '#');
                assert_eq!(buffer.remove_char(row, col), Some('#'));
                assert_eq!(buffer, original, "row {row} col {col}");
            }
        }
    }

    #[test]
    fn test_remove_char_bounds() {
        let mut buffer = LineBuffer::from_lines(["ab"]);
        assert_eq!(buffer.remove_char(0, 2), None);
        assert_eq!(buffer.remove_char(1, 0), None);
        assert_eq!(buffer.remove_char(0, 0), Some('a'));
        assert_eq!(buffer.line_text(0), Some("b"));
    }

    #[test]
    fn test_multibyte_columns_are_chars() {
        let mut buffer = LineBuffer::from_lines(["héllo"]);
        buffer.insert_char(0, 2, '-');
        assert_eq!(buffer.line_text(0), Some("hé-llo"));
        assert_eq!(buffer.remove_char(0, 1), Some('é'));
        buffer.split_at(0, 1);
        assert_eq!(contents(&buffer), vec!["h", "-llo"]);
    }

    #[test]
    fn test_insert_line_clamps_position() {
        let mut buffer = LineBuffer::from_lines(["a", "b"]);
        buffer.insert_line(1);
        assert_eq!(contents(&buffer), vec!["a", "", "b"]);
        buffer.insert_line(99);
        assert_eq!(contents(&buffer), vec!["a", "", "b", ""]);
    }

    #[test]
    fn test_insert_line_grows_past_initial_capacity() {
        let mut buffer = LineBuffer::new();
        for _ in 0..5000 {
            buffer.insert_line(buffer.line_count());
        }
        assert_eq!(buffer.line_count(), 5001);
    }

    #[test]
    fn test_remove_line() {
        let mut buffer = LineBuffer::from_lines(["a", "b", "c"]);
        assert_eq!(buffer.remove_line(1).as_deref(), Some("b"));
        assert_eq!(buffer.remove_line(7), None);
        assert_eq!(contents(&buffer), vec!["a", "c"]);
    }

    #[test]
    fn test_merge_with_next() {
        let mut buffer = LineBuffer::from_lines(["ab", "cd", "ef"]);
        buffer.merge_with_next(0);
        assert_eq!(contents(&buffer), vec!["abcd", "ef"]);

        buffer.merge_with_next(1);
        assert_eq!(contents(&buffer), vec!["abcd", "ef"]);
    }

    #[test]
    fn test_split_example() {
        let mut buffer = LineBuffer::from_lines(["ab", "cd"]);
        buffer.split_at(0, 1);
        assert_eq!(contents(&buffer), vec!["a", "b", "cd"]);
    }

    #[test]
    fn test_split_then_merge_restores_line() {
        let original = LineBuffer::from_lines(["first line", "second"]);
        for col in 0..=10 {
            let mut buffer = original.clone();
            buffer.split_at(0, col);
            assert_eq!(buffer.line_count(), 3);
            buffer.merge_with_next(0);
            assert_eq!(buffer, original, "col {col}");
        }
    }

    #[test]
    fn test_range_helpers() {
        let mut buffer = LineBuffer::from_lines(["a", "b", "c", "d"]);
        assert_eq!(buffer.slice(2, 5), vec!["c", "d"]);

        let removed = buffer.remove_lines(1, 2);
        assert_eq!(removed, vec!["b", "c"]);
        assert_eq!(contents(&buffer), vec!["a", "d"]);
        assert!(buffer.remove_lines(5, 1).is_empty());

        let inserted = buffer.insert_lines(1, removed);
        assert_eq!(inserted, 2);
        assert_eq!(contents(&buffer), vec!["a", "b", "c", "d"]);
    }
}
