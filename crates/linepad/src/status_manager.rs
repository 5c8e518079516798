use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub content: String,
    pub message_type: MessageType,
    pub created_at: Instant,
    pub auto_clear_duration: Duration,
}

impl StatusMessage {
    pub fn new(content: String, message_type: MessageType) -> Self {
        Self {
            content,
            message_type,
            created_at: Instant::now(),
            auto_clear_duration: Self::default_duration_for_type(message_type),
        }
    }

    pub fn with_duration(content: String, message_type: MessageType, duration: Duration) -> Self {
        Self {
            content,
            message_type,
            created_at: Instant::now(),
            auto_clear_duration: duration,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() > self.auto_clear_duration
    }

    fn default_duration_for_type(message_type: MessageType) -> Duration {
        match message_type {
            MessageType::Info => Duration::from_secs(3),
            MessageType::Success => Duration::from_secs(2),
            MessageType::Warning => Duration::from_secs(5),
            MessageType::Error => Duration::from_secs(7),
        }
    }
}

/// Transient feedback shown under the editor window.
#[derive(Debug, Clone, Default)]
pub struct StatusManager {
    current_message: Option<StatusMessage>,
}

impl StatusManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, message: String, message_type: MessageType) {
        self.current_message = Some(StatusMessage::new(message, message_type));
    }

    pub fn set_info(&mut self, message: String) {
        self.set(message, MessageType::Info);
    }

    pub fn set_success(&mut self, message: String) {
        self.set(message, MessageType::Success);
    }

    pub fn set_warning(&mut self, message: String) {
        self.set(message, MessageType::Warning);
    }

    pub fn set_error(&mut self, message: String) {
        self.set(message, MessageType::Error);
    }

    pub fn clear(&mut self) {
        self.current_message = None;
    }

    /// Drops the current message once its display time has passed.
    pub fn update(&mut self) {
        if self
            .current_message
            .as_ref()
            .is_some_and(StatusMessage::is_expired)
        {
            self.current_message = None;
        }
    }

    pub fn current_message(&self) -> Option<&StatusMessage> {
        self.current_message.as_ref()
    }

    pub fn has_message(&self) -> bool {
        self.current_message.is_some()
    }
}
