use linecore::LineBuffer;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use std::ops::Range;
use syntect::highlighting::{
    HighlightIterator, HighlightState, Highlighter as SynHighlighter, Style as SynStyle, Theme,
    ThemeSet,
};
use syntect::parsing::{ParseState, ScopeStack, SyntaxReference, SyntaxSet};

const FALLBACK_THEME: &str = "base16-ocean.dark";

/// Lines between saved parser states.
const CHECKPOINT_INTERVAL: usize = 64;

type Checkpoint = (ParseState, HighlightState);

/// Syntax highlighting for one document.
///
/// Parser state is saved every `CHECKPOINT_INTERVAL` lines, so drawing a
/// window only parses from the nearest checkpoint above it. Edits must be
/// reported through `invalidate_from`.
pub struct Highlighter {
    syntax_set: SyntaxSet,
    theme: Theme,
    syntax: Option<String>,
    // checkpoints[k] is the state before line k * CHECKPOINT_INTERVAL
    checkpoints: Vec<Checkpoint>,
    rendered: Option<(Range<usize>, Vec<Line<'static>>)>,
    lines_parsed: usize,
}

impl Highlighter {
    /// `None` if neither the named theme nor the fallback is bundled.
    pub fn new(theme_name: &str) -> Option<Self> {
        let syntax_set = SyntaxSet::load_defaults_nonewlines();
        let mut theme_set = ThemeSet::load_defaults();

        let theme = match theme_set.themes.remove(theme_name) {
            Some(theme) => theme,
            None => {
                log::warn!("Unknown syntax theme {:?}, using {}", theme_name, FALLBACK_THEME);
                theme_set.themes.remove(FALLBACK_THEME)?
            }
        };

        Some(Self {
            syntax_set,
            theme,
            syntax: None,
            checkpoints: Vec::new(),
            rendered: None,
            lines_parsed: 0,
        })
    }

    /// Syntax for a file name, or `None` when it would only be plain text.
    pub fn syntax_for_filename(&self, filename: &str) -> Option<&SyntaxReference> {
        let syntax = self
            .syntax_set
            .find_syntax_for_file(filename)
            .ok()
            .flatten()
            .or_else(|| {
                let ext = filename.rsplit('.').next().unwrap_or("");
                self.syntax_set.find_syntax_by_extension(ext)
            })?;
        (syntax.name != "Plain Text").then_some(syntax)
    }

    /// Picks the syntax for the document's file name and drops all
    /// cached state.
    pub fn set_file_name(&mut self, filename: Option<&str>) {
        self.syntax = filename
            .and_then(|name| self.syntax_for_filename(name))
            .map(|syntax| syntax.name.clone());
        log::debug!("Highlighting syntax: {:?}", self.syntax);
        self.checkpoints.clear();
        self.rendered = None;
    }

    /// Forgets everything that depends on lines at or after `row`.
    pub fn invalidate_from(&mut self, row: usize) {
        self.checkpoints.truncate(row / CHECKPOINT_INTERVAL + 1);
        self.rendered = None;
    }

    /// The last highlighted window, if it covers exactly `visible`.
    pub fn rendered(&self, visible: &Range<usize>) -> Option<&[Line<'static>]> {
        self.rendered
            .as_ref()
            .filter(|(range, _)| range == visible)
            .map(|(_, lines)| lines.as_slice())
    }

    /// Highlights `visible` lines of `buffer`, reusing the previous result
    /// when the window has not changed.
    pub fn highlight_visible(
        &mut self,
        buffer: &LineBuffer,
        visible: Range<usize>,
    ) -> Option<&[Line<'static>]> {
        if self.rendered(&visible).is_none() {
            let lines = self.compute(buffer, visible.clone())?;
            self.rendered = Some((visible.clone(), lines));
        }
        self.rendered(&visible)
    }

    fn compute(
        &mut self,
        buffer: &LineBuffer,
        visible: Range<usize>,
    ) -> Option<Vec<Line<'static>>> {
        let Self {
            syntax_set,
            theme,
            syntax,
            checkpoints,
            lines_parsed,
            ..
        } = self;
        let syntax = syntax_set.find_syntax_by_name(syntax.as_deref()?)?;
        let highlighter = SynHighlighter::new(theme);

        if checkpoints.is_empty() {
            checkpoints.push((
                ParseState::new(syntax),
                HighlightState::new(&highlighter, ScopeStack::new()),
            ));
        }

        let target = visible.start / CHECKPOINT_INTERVAL;
        while checkpoints.len() <= target {
            let start = (checkpoints.len() - 1) * CHECKPOINT_INTERVAL;
            if start + CHECKPOINT_INTERVAL > buffer.line_count() {
                break;
            }
            let Some((mut parse, mut state)) = checkpoints.last().cloned() else {
                break;
            };
            for text in buffer.lines().skip(start).take(CHECKPOINT_INTERVAL) {
                highlight_line(syntax_set, &highlighter, &mut parse, &mut state, text);
                *lines_parsed += 1;
            }
            checkpoints.push((parse, state));
        }

        let base = target.min(checkpoints.len() - 1);
        let first = base * CHECKPOINT_INTERVAL;
        let (mut parse, mut state) = checkpoints[base].clone();
        let mut out = Vec::with_capacity(visible.len());

        for (row, text) in buffer
            .lines()
            .enumerate()
            .skip(first)
            .take(visible.end.saturating_sub(first))
        {
            let regions = highlight_line(syntax_set, &highlighter, &mut parse, &mut state, text);
            *lines_parsed += 1;
            if row < visible.start {
                continue;
            }

            let spans: Vec<Span<'static>> = regions
                .into_iter()
                .map(|(style, text)| Span::styled(text.to_string(), syn_style_to_ratatui(style)))
                .collect();
            out.push(Line::from(spans));
        }
        Some(out)
    }
}

fn highlight_line<'t>(
    syntax_set: &SyntaxSet,
    highlighter: &SynHighlighter,
    parse: &mut ParseState,
    state: &mut HighlightState,
    text: &'t str,
) -> Vec<(SynStyle, &'t str)> {
    match parse.parse_line(text, syntax_set) {
        Ok(ops) => HighlightIterator::new(state, &ops, text, highlighter).collect(),
        Err(e) => {
            log::debug!("Highlight parse error: {}", e);
            vec![(SynStyle::default(), text)]
        }
    }
}

fn syn_style_to_ratatui(style: SynStyle) -> Style {
    let fg = style.foreground;
    Style::default().fg(Color::Rgb(fg.r, fg.g, fg.b))
}
