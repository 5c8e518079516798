use linecore::RenderSurface;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::config::parse_hex_color;
use crate::status_manager::MessageType;

struct Areas {
    title: Rect,
    window: Rect,
    gutter: Option<Rect>,
    text: Rect,
    status: Rect,
    message: Rect,
}

fn layout(app: &App, area: Rect) -> Areas {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title bar
            Constraint::Min(0),    // Editor window
            Constraint::Length(1), // Status bar
            Constraint::Length(1), // Prompt / messages
        ])
        .split(area);

    let inner = Block::default().borders(Borders::ALL).inner(chunks[1]);
    let (gutter, text) = if app.config.editor.line_numbers {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(gutter_width(app)), Constraint::Min(0)])
            .split(inner);
        (Some(columns[0]), columns[1])
    } else {
        (None, inner)
    };

    Areas {
        title: chunks[0],
        window: chunks[1],
        gutter,
        text,
        status: chunks[2],
        message: chunks[3],
    }
}

fn gutter_width(app: &App) -> u16 {
    let digits = app.editor.buffer().line_count().to_string().len().max(3);
    u16::try_from(digits + 1).unwrap_or(u16::MAX)
}

/// The cells the document text occupies inside `area`.
pub fn text_area(app: &App, area: Rect) -> Rect {
    layout(app, area).text
}

fn theme_color(value: Option<&str>) -> Option<Color> {
    value
        .and_then(parse_hex_color)
        .map(|(r, g, b)| Color::Rgb(r, g, b))
}

pub fn draw(f: &mut Frame, app: &App) {
    let areas = layout(app, f.size());
    let theme = &app.config.theme;

    draw_title_bar(f, app, areas.title);

    let mut border_style = Style::default();
    if let Some(color) = theme_color(theme.border_color.as_deref()) {
        border_style = border_style.fg(color);
    }
    f.render_widget(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style),
        areas.window,
    );

    let mut text_style = Style::default();
    if let Some(color) = theme_color(theme.text_foreground.as_deref()) {
        text_style = text_style.fg(color);
    }
    let status_style = Style::default()
        .fg(theme_color(theme.status_foreground.as_deref()).unwrap_or(Color::White))
        .bg(theme_color(theme.status_background.as_deref()).unwrap_or(Color::Blue));

    let mut surface = FrameSurface {
        frame: &mut *f,
        gutter: areas.gutter,
        text: areas.text,
        status: areas.status,
        highlighted: app.highlighted_lines(),
        text_style,
        status_style,
        cursor: None,
    };
    app.editor.render(&mut surface);
    let cursor = surface.cursor;

    match draw_message_line(f, app, areas.message) {
        Some(prompt_cursor) => f.set_cursor(prompt_cursor.0, prompt_cursor.1),
        None => {
            if let Some((x, y)) = cursor {
                f.set_cursor(x, y);
            }
        }
    }
}

/// Draws the editor's render pass onto a ratatui frame.
struct FrameSurface<'f, 'b, 'h> {
    frame: &'f mut Frame<'b>,
    gutter: Option<Rect>,
    text: Rect,
    status: Rect,
    highlighted: Option<&'h [Line<'static>]>,
    text_style: Style,
    status_style: Style,
    cursor: Option<(u16, u16)>,
}

impl FrameSurface<'_, '_, '_> {
    fn row_rect(area: Rect, screen_row: usize) -> Option<Rect> {
        let offset = u16::try_from(screen_row).ok()?;
        (offset < area.height).then(|| Rect::new(area.x, area.y + offset, area.width, 1))
    }
}

impl RenderSurface for FrameSurface<'_, '_, '_> {
    fn draw_line(&mut self, screen_row: usize, line_number: usize, text: &str) {
        if let Some(gutter) = self.gutter.and_then(|g| Self::row_rect(g, screen_row)) {
            let width = usize::from(gutter.width.saturating_sub(1));
            let number = Paragraph::new(format!("{:>width$} ", line_number))
                .style(Style::default().fg(Color::DarkGray));
            self.frame.render_widget(number, gutter);
        }

        let Some(row) = Self::row_rect(self.text, screen_row) else {
            return;
        };
        let line = self
            .highlighted
            .and_then(|lines| lines.get(screen_row).cloned())
            .unwrap_or_else(|| Line::from(text.to_string()));
        self.frame
            .render_widget(Paragraph::new(line).style(self.text_style), row);
    }

    fn place_cursor(&mut self, row: usize, column: usize) {
        if self.text.width == 0 || self.text.height == 0 {
            return;
        }
        let x = u16::try_from(column).unwrap_or(u16::MAX).min(self.text.width - 1);
        let y = u16::try_from(row).unwrap_or(u16::MAX).min(self.text.height - 1);
        self.cursor = Some((self.text.x + x, self.text.y + y));
    }

    fn show_status(&mut self, text: &str) {
        let status = Paragraph::new(format!(" {}", text)).style(self.status_style);
        self.frame.render_widget(status, self.status);
    }
}

fn draw_title_bar(f: &mut Frame, app: &App, area: Rect) {
    let title = match app.file_path() {
        Some(path) => format!(" linepad -- {}", path.display()),
        None => String::from(" linepad -- [New File]"),
    };

    let modified_str = if app.is_modified() { " [Modified]" } else { "" };
    let title = format!("{}{}", title, modified_str);

    let title_bar = Paragraph::new(title)
        .style(Style::default().bg(Color::Blue).fg(Color::White))
        .alignment(Alignment::Left);

    f.render_widget(title_bar, area);
}

/// Bottom row: the open prompt, else the current message, else key hints.
/// Returns where the cursor belongs when a prompt is open.
fn draw_message_line(f: &mut Frame, app: &App, area: Rect) -> Option<(u16, u16)> {
    if let Some(prompt) = app.ui_state.prompt() {
        let label = prompt.label();
        let input = app.ui_state.input();
        let line = Paragraph::new(format!("{}{}", label, input))
            .style(Style::default().fg(Color::Yellow));
        f.render_widget(line, area);

        if area.width == 0 || area.height == 0 {
            return None;
        }
        let offset = label.chars().count() + input.chars().count();
        let x = u16::try_from(offset).unwrap_or(u16::MAX).min(area.width - 1);
        return Some((area.x + x, area.y));
    }

    if let Some(message) = app.ui_state.status_manager.current_message() {
        let color = match message.message_type {
            MessageType::Info => Color::White,
            MessageType::Success => Color::Green,
            MessageType::Warning => Color::Yellow,
            MessageType::Error => Color::Red,
        };
        let line = Paragraph::new(message.content.clone()).style(Style::default().fg(color));
        f.render_widget(line, area);
        return None;
    }

    let key = Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD);
    let hints = vec![
        Span::styled("^S", key),
        Span::raw(" Save  "),
        Span::styled("^Q", key),
        Span::raw(" Quit  "),
        Span::styled("^F", key),
        Span::raw(" Search  "),
        Span::styled("Esc", key),
        Span::raw(" Command"),
    ];
    let hint_bar = Paragraph::new(Line::from(hints)).style(Style::default().fg(Color::DarkGray));
    f.render_widget(hint_bar, area);
    None
}
