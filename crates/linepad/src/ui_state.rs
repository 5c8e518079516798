use crate::status_manager::StatusManager;
use linecore::PromptKind;
use std::collections::HashMap;

const HISTORY_LIMIT: usize = 100;

/// One-line input collected under the editor window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Prompt {
    Search,
    Command,
    SaveAs,
}

impl Prompt {
    pub fn label(self) -> &'static str {
        match self {
            Prompt::Search => "Search: ",
            Prompt::Command => "Command: ",
            Prompt::SaveAs => "Save as: ",
        }
    }
}

impl From<PromptKind> for Prompt {
    fn from(kind: PromptKind) -> Self {
        match kind {
            PromptKind::Search => Prompt::Search,
            PromptKind::Command => Prompt::Command,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct UIState {
    prompt: Option<Prompt>,
    input: String,
    pub status_manager: StatusManager,
    should_quit: bool,
    history: HashMap<Prompt, Vec<String>>,
    history_index: Option<usize>,
}

impl UIState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_prompt(&mut self, prompt: Prompt) {
        self.prompt = Some(prompt);
        self.input.clear();
        self.history_index = None;
    }

    pub fn prompt(&self) -> Option<Prompt> {
        self.prompt
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Closes the prompt and hands back what was typed. The entry is
    /// remembered in that prompt's history.
    pub fn take_prompt(&mut self) -> Option<(Prompt, String)> {
        let prompt = self.prompt.take()?;
        let input = std::mem::take(&mut self.input);
        self.add_to_history(prompt, input.clone());
        Some((prompt, input))
    }

    pub fn cancel_prompt(&mut self) {
        self.prompt = None;
        self.input.clear();
        self.history_index = None;
    }

    pub fn push_input(&mut self, c: char) {
        self.input.push(c);
    }

    pub fn pop_input(&mut self) {
        self.input.pop();
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn set_info_message(&mut self, message: String) {
        self.status_manager.set_info(message);
    }

    pub fn set_success_message(&mut self, message: String) {
        self.status_manager.set_success(message);
    }

    pub fn set_warning_message(&mut self, message: String) {
        self.status_manager.set_warning(message);
    }

    pub fn set_error_message(&mut self, message: String) {
        self.status_manager.set_error(message);
    }

    pub fn update_status(&mut self) {
        self.status_manager.update();
    }

    fn add_to_history(&mut self, prompt: Prompt, entry: String) {
        let history = self.history.entry(prompt).or_default();
        // Don't add empty entries or duplicates of the last one
        if !entry.is_empty() && history.last() != Some(&entry) {
            history.push(entry);
            if history.len() > HISTORY_LIMIT {
                history.remove(0);
            }
        }
        self.history_index = None;
    }

    pub fn history(&self, prompt: Prompt) -> &[String] {
        self.history.get(&prompt).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn history_up(&mut self) {
        let Some(prompt) = self.prompt else { return };
        let Some(history) = self.history.get(&prompt).filter(|h| !h.is_empty()) else {
            return;
        };

        let new_index = match self.history_index {
            None => history.len() - 1,
            Some(0) => 0,
            Some(i) => i - 1,
        };

        self.history_index = Some(new_index);
        self.input = history[new_index].clone();
    }

    pub fn history_down(&mut self) {
        let Some(prompt) = self.prompt else { return };
        let Some(history) = self.history.get(&prompt).filter(|h| !h.is_empty()) else {
            return;
        };

        match self.history_index {
            None => {}
            Some(i) if i >= history.len() - 1 => {
                self.history_index = None;
                self.input.clear();
            }
            Some(i) => {
                let new_index = i + 1;
                self.history_index = Some(new_index);
                self.input = history[new_index].clone();
            }
        }
    }
}
