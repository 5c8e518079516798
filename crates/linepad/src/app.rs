use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use linecore::{CommandEffect, Editor, LineBuffer, Outcome};
use ratatui::layout::Rect;
use ratatui::text::Line;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::file_manager::{lines_label, FileManager, Opened};
use crate::highlight::Highlighter;
use crate::keymap::map_key;
use crate::ui;
use crate::ui_state::{Prompt, UIState};

pub struct App {
    pub editor: Editor,
    pub config: Config,
    pub ui_state: UIState,
    pub file_manager: FileManager,
    highlighter: Option<Highlighter>,
    quit_armed: bool,
}

impl App {
    pub async fn new() -> Result<Self> {
        let config = Config::load().await?;
        Ok(Self::with_config(config))
    }

    pub fn with_config(config: Config) -> Self {
        let mut editor = Editor::default();
        editor.set_wrap_margin(config.editor.wrap_margin);
        let highlighter = if config.editor.syntax_highlighting {
            Highlighter::new(&config.theme.syntax_theme)
        } else {
            None
        };

        Self {
            editor,
            config,
            ui_state: UIState::new(),
            file_manager: FileManager::new(),
            highlighter,
            quit_armed: false,
        }
    }

    /// Loads `path` into the editor. Never fails: problems end up on the
    /// status line and the session continues with an empty buffer.
    pub async fn open_path(&mut self, path: PathBuf) {
        match self.file_manager.open_file(path).await {
            Ok(Opened::Loaded(buffer)) => {
                let message = format!(
                    "\"{}\" {}",
                    self.file_manager.display_name(),
                    lines_label(buffer.line_count())
                );
                self.editor.set_buffer(buffer);
                self.ui_state.set_info_message(message);
            }
            Ok(Opened::NewFile) => {
                self.editor.set_buffer(LineBuffer::new());
                self.ui_state.set_info_message(format!(
                    "\"{}\" [New File]",
                    self.file_manager.display_name()
                ));
            }
            Err(e) => {
                log::error!("Failed to load file: {}", e);
                self.editor.set_buffer(LineBuffer::new());
                self.ui_state
                    .set_error_message(format!("ファイル読み込みエラー: {}", e));
            }
        }
        self.bind_syntax();
    }

    fn bind_syntax(&mut self) {
        let Some(highlighter) = self.highlighter.as_mut() else {
            return;
        };
        let name = self
            .file_manager
            .current_path()
            .and_then(Path::file_name)
            .and_then(|name| name.to_str());
        highlighter.set_file_name(name);
    }

    /// Sizes the editor window to the text area `ui::draw` will use.
    pub fn fit_to(&mut self, area: Rect) {
        let text = ui::text_area(self, area);
        self.editor
            .resize(usize::from(text.width), usize::from(text.height));
    }

    pub fn is_modified(&self) -> bool {
        self.editor.is_modified()
    }

    pub fn should_quit(&self) -> bool {
        self.ui_state.should_quit()
    }

    pub fn quit(&mut self) {
        self.ui_state.quit();
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_manager.current_path()
    }

    pub fn update_status(&mut self) {
        self.ui_state.update_status();
    }

    /// Brings the highlighted window up to date with edits and scrolling.
    /// Call before drawing.
    pub fn refresh_highlight(&mut self) {
        let edited_from = self.editor.take_edited_from();
        let Some(highlighter) = self.highlighter.as_mut() else {
            return;
        };
        if let Some(row) = edited_from {
            highlighter.invalidate_from(row);
        }
        let buffer = self.editor.buffer();
        let visible = self.editor.viewport().visible_range(buffer.line_count());
        highlighter.highlight_visible(buffer, visible);
    }

    /// Syntax-colored text for the visible lines, when the bound file has
    /// a known syntax and `refresh_highlight` has seen every edit.
    pub fn highlighted_lines(&self) -> Option<&[Line<'static>]> {
        if self.editor.edited_from().is_some() {
            return None;
        }
        let highlighter = self.highlighter.as_ref()?;
        let buffer = self.editor.buffer();
        let visible = self.editor.viewport().visible_range(buffer.line_count());
        highlighter.rendered(&visible)
    }

    pub async fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }

        if self.ui_state.prompt().is_some() {
            return self.handle_prompt_key(key).await;
        }

        let outcome = self.editor.handle(map_key(key));
        if outcome != Outcome::Quit {
            self.quit_armed = false;
        }

        match outcome {
            Outcome::Continue => {}
            Outcome::OpenPrompt(kind) => self.ui_state.open_prompt(kind.into()),
            Outcome::Save => self.save().await,
            Outcome::Quit => self.request_quit(),
        }
        Ok(())
    }

    async fn handle_prompt_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Enter => {
                if let Some((prompt, input)) = self.ui_state.take_prompt() {
                    self.submit_prompt(prompt, input).await;
                }
            }
            KeyCode::Esc => self.ui_state.cancel_prompt(),
            KeyCode::Up => self.ui_state.history_up(),
            KeyCode::Down => self.ui_state.history_down(),
            KeyCode::Backspace => self.ui_state.pop_input(),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.ui_state.push_input(c);
            }
            _ => {}
        }
        Ok(())
    }

    async fn submit_prompt(&mut self, prompt: Prompt, input: String) {
        match prompt {
            Prompt::Search => {
                if !input.is_empty() && !self.editor.search(&input) {
                    self.ui_state
                        .set_warning_message(format!("not found: {}", input));
                }
            }
            Prompt::Command => {
                let message = match self.editor.run_command(&input) {
                    CommandEffect::Copied(n) => format!("{} copied", lines_label(n)),
                    CommandEffect::Deleted(n) => format!("{} deleted", lines_label(n)),
                    CommandEffect::Pasted(n) => format!("{} pasted", lines_label(n)),
                    CommandEffect::Ignored => return,
                };
                self.ui_state.set_info_message(message);
            }
            Prompt::SaveAs => {
                let target = input.trim();
                if target.is_empty() {
                    self.ui_state.set_warning_message("not saved".to_string());
                    return;
                }
                let result = self
                    .file_manager
                    .save_file_as(PathBuf::from(target), self.editor.buffer())
                    .await;
                let bound = result.is_ok();
                self.finish_save(result);
                if bound {
                    self.bind_syntax();
                }
            }
        }
    }

    /// Writes to the bound file, or asks for a name first.
    pub async fn save(&mut self) {
        if !self.file_manager.has_file() {
            self.ui_state.open_prompt(Prompt::SaveAs);
            return;
        }
        let result = self.file_manager.save_file(self.editor.buffer()).await;
        self.finish_save(result);
    }

    fn finish_save(&mut self, result: Result<String>) {
        match result {
            Ok(message) => {
                self.editor.mark_saved();
                self.ui_state.set_success_message(message);
            }
            Err(e) => {
                log::error!("Save failed: {}", e);
                self.ui_state.set_error_message(format!("not saved: {}", e));
            }
        }
    }

    fn request_quit(&mut self) {
        if self.is_modified() && !self.quit_armed {
            self.quit_armed = true;
            self.ui_state.set_warning_message(
                "unsaved changes, press Ctrl-Q again to quit".to_string(),
            );
            return;
        }
        log::info!("Quit requested");
        self.quit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status_manager::MessageType;
    use tempfile::TempDir;

    fn create_test_app() -> App {
        App::with_config(Config::default())
    }

    fn create_key_event(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    async fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key_event(create_key_event(KeyCode::Char(c)))
                .await
                .unwrap();
        }
    }

    async fn press(app: &mut App, code: KeyCode) {
        app.handle_key_event(create_key_event(code)).await.unwrap();
    }

    fn message(app: &App) -> Option<(MessageType, &str)> {
        app.ui_state
            .status_manager
            .current_message()
            .map(|m| (m.message_type, m.content.as_str()))
    }

    fn with_lines(lines: &[&str]) -> App {
        let mut app = create_test_app();
        app.editor
            .set_buffer(LineBuffer::from_lines(lines.iter().copied()));
        app
    }

    #[tokio::test]
    async fn test_app_creation() {
        let app = create_test_app();
        assert!(!app.is_modified());
        assert!(!app.should_quit());
        assert!(app.file_path().is_none());
        assert_eq!(
            app.editor.viewport().wrap_margin(),
            app.config.editor.wrap_margin
        );
    }

    #[tokio::test]
    async fn test_typing_edits_buffer() {
        let mut app = create_test_app();
        type_text(&mut app, "ab").await;
        press(&mut app, KeyCode::Enter).await;
        type_text(&mut app, "c").await;

        assert_eq!(app.editor.buffer().to_text(), "ab\nc\n");
        assert!(app.is_modified());
    }

    #[tokio::test]
    async fn test_release_events_are_ignored() {
        let mut app = create_test_app();
        let release = KeyEvent::new_with_kind(
            KeyCode::Char('x'),
            KeyModifiers::NONE,
            KeyEventKind::Release,
        );
        app.handle_key_event(release).await.unwrap();
        assert!(!app.is_modified());
    }

    #[tokio::test]
    async fn test_command_prompt_runs_range_command() {
        let mut app = with_lines(&["one", "two", "three"]);

        press(&mut app, KeyCode::Esc).await;
        assert_eq!(app.ui_state.prompt(), Some(Prompt::Command));
        type_text(&mut app, "2c").await;
        press(&mut app, KeyCode::Enter).await;

        assert!(app.ui_state.prompt().is_none());
        assert_eq!(message(&app), Some((MessageType::Info, "2 lines copied")));
        assert_eq!(app.ui_state.history(Prompt::Command), &["2c"]);

        press(&mut app, KeyCode::Esc).await;
        type_text(&mut app, "p").await;
        press(&mut app, KeyCode::Enter).await;
        assert_eq!(
            app.editor.buffer().to_text(),
            "one\ntwo\none\ntwo\nthree\n"
        );
    }

    #[tokio::test]
    async fn test_unknown_command_sets_no_message() {
        let mut app = with_lines(&["one"]);
        press(&mut app, KeyCode::Esc).await;
        type_text(&mut app, "x").await;
        press(&mut app, KeyCode::Enter).await;
        assert!(message(&app).is_none());
    }

    #[tokio::test]
    async fn test_prompt_escape_cancels() {
        let mut app = with_lines(&["one"]);
        app.handle_key_event(ctrl('f')).await.unwrap();
        assert_eq!(app.ui_state.prompt(), Some(Prompt::Search));
        type_text(&mut app, "on").await;
        press(&mut app, KeyCode::Backspace).await;
        assert_eq!(app.ui_state.input(), "o");

        press(&mut app, KeyCode::Esc).await;
        assert!(app.ui_state.prompt().is_none());
        assert_eq!(app.editor.cursor(), (0, 0));
        assert_eq!(app.editor.buffer().to_text(), "one\n");
    }

    #[tokio::test]
    async fn test_search_prompt() {
        let mut app = with_lines(&["alpha", "beta", "gamma"]);

        app.handle_key_event(ctrl('f')).await.unwrap();
        type_text(&mut app, "mm").await;
        press(&mut app, KeyCode::Enter).await;
        assert_eq!(app.editor.cursor(), (2, 2));

        app.handle_key_event(ctrl('f')).await.unwrap();
        type_text(&mut app, "zeta").await;
        press(&mut app, KeyCode::Enter).await;
        assert_eq!(app.editor.cursor(), (2, 2));
        assert_eq!(message(&app), Some((MessageType::Warning, "not found: zeta")));

        // History recall
        app.handle_key_event(ctrl('f')).await.unwrap();
        press(&mut app, KeyCode::Up).await;
        assert_eq!(app.ui_state.input(), "zeta");
        press(&mut app, KeyCode::Up).await;
        assert_eq!(app.ui_state.input(), "mm");
    }

    #[tokio::test]
    async fn test_save_without_path_asks_for_name() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("out.txt");
        let mut app = create_test_app();
        type_text(&mut app, "hi").await;

        app.handle_key_event(ctrl('s')).await.unwrap();
        assert_eq!(app.ui_state.prompt(), Some(Prompt::SaveAs));
        type_text(&mut app, target.to_str().unwrap()).await;
        press(&mut app, KeyCode::Enter).await;

        assert_eq!(std::fs::read_to_string(&target).unwrap(), "hi\n");
        assert!(!app.is_modified());
        assert_eq!(app.file_path(), Some(target.as_path()));
        assert!(matches!(message(&app), Some((MessageType::Success, _))));
    }

    #[tokio::test]
    async fn test_save_as_empty_name_is_not_saved() {
        let mut app = create_test_app();
        type_text(&mut app, "hi").await;
        app.handle_key_event(ctrl('s')).await.unwrap();
        press(&mut app, KeyCode::Enter).await;

        assert!(app.is_modified());
        assert_eq!(message(&app), Some((MessageType::Warning, "not saved")));
    }

    #[tokio::test]
    async fn test_open_and_save_bound_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("doc.txt");
        std::fs::write(&path, "first\nsecond\n").unwrap();

        let mut app = create_test_app();
        app.open_path(path.clone()).await;
        assert_eq!(app.editor.buffer().line_count(), 2);
        assert_eq!(message(&app), Some((MessageType::Info, "\"doc.txt\" 2 lines")));

        type_text(&mut app, ">").await;
        app.handle_key_event(ctrl('s')).await.unwrap();
        assert!(app.ui_state.prompt().is_none());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), ">first\nsecond\n");
        assert!(!app.is_modified());
    }

    #[tokio::test]
    async fn test_open_missing_file_starts_new() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("fresh.txt");

        let mut app = create_test_app();
        app.open_path(path.clone()).await;
        assert_eq!(app.file_path(), Some(path.as_path()));
        assert_eq!(app.editor.buffer().line_count(), 1);
        assert_eq!(
            message(&app),
            Some((MessageType::Info, "\"fresh.txt\" [New File]"))
        );
    }

    #[tokio::test]
    async fn test_open_failure_falls_back_to_empty_buffer() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = create_test_app();
        app.open_path(temp_dir.path().to_path_buf()).await;

        assert!(app.file_path().is_none());
        assert_eq!(app.editor.buffer().to_text(), "\n");
        assert!(matches!(message(&app), Some((MessageType::Error, _))));
    }

    #[tokio::test]
    async fn test_save_failure_reports_not_saved() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = create_test_app();
        // Binding a directory as the file makes the write fail.
        app.file_manager
            .save_file_as(temp_dir.path().join("x.txt"), app.editor.buffer())
            .await
            .unwrap();
        std::fs::remove_file(temp_dir.path().join("x.txt")).unwrap();
        std::fs::create_dir(temp_dir.path().join("x.txt")).unwrap();

        type_text(&mut app, "a").await;
        app.handle_key_event(ctrl('s')).await.unwrap();
        assert!(app.is_modified());
        let (kind, text) = message(&app).unwrap();
        assert_eq!(kind, MessageType::Error);
        assert!(text.starts_with("not saved"));
    }

    #[tokio::test]
    async fn test_highlight_follows_edits() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("main.rs");
        std::fs::write(&path, "fn main() {}\n").unwrap();

        let mut app = create_test_app();
        app.open_path(path).await;
        assert!(app.highlighted_lines().is_none());
        app.refresh_highlight();
        let lines = app.highlighted_lines().unwrap();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].spans.len() > 1);

        // Stale colors are never drawn over edited text.
        type_text(&mut app, "//").await;
        assert!(app.highlighted_lines().is_none());
        app.refresh_highlight();
        let text: String = app.highlighted_lines().unwrap()[0]
            .spans
            .iter()
            .map(|s| s.content.as_ref())
            .collect();
        assert_eq!(text, "//fn main() {}");
    }

    #[tokio::test]
    async fn test_plain_text_file_is_not_highlighted() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("notes.txt");
        std::fs::write(&path, "fn main() {}\n").unwrap();

        let mut app = create_test_app();
        app.open_path(path).await;
        app.refresh_highlight();
        assert!(app.highlighted_lines().is_none());
    }

    #[tokio::test]
    async fn test_quit_unmodified() {
        let mut app = create_test_app();
        app.handle_key_event(ctrl('q')).await.unwrap();
        assert!(app.should_quit());
    }

    #[tokio::test]
    async fn test_quit_modified_needs_confirmation() {
        let mut app = create_test_app();
        type_text(&mut app, "a").await;

        app.handle_key_event(ctrl('q')).await.unwrap();
        assert!(!app.should_quit());
        assert!(matches!(message(&app), Some((MessageType::Warning, _))));

        // Any other key disarms the confirmation.
        press(&mut app, KeyCode::Left).await;
        app.handle_key_event(ctrl('q')).await.unwrap();
        assert!(!app.should_quit());

        app.handle_key_event(ctrl('q')).await.unwrap();
        assert!(app.should_quit());
    }
}
