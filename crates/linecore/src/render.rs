/// A write-only character-cell surface the editor draws onto.
///
/// Rows and columns are window-relative; `line_number` is 1-based.
pub trait RenderSurface {
    fn draw_line(&mut self, screen_row: usize, line_number: usize, text: &str);
    fn place_cursor(&mut self, row: usize, column: usize);
    fn show_status(&mut self, text: &str);
}
