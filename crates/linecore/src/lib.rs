pub mod clipboard;
pub mod command;
pub mod editor;
pub mod event;
pub mod line_buffer;
pub mod render;
pub mod viewport;

pub use clipboard::Clipboard;
pub use command::{parse_command, Command, CommandEffect};
pub use editor::Editor;
pub use event::{EditorEvent, Outcome, PromptKind};
pub use line_buffer::LineBuffer;
pub use render::RenderSurface;
pub use viewport::{Viewport, DEFAULT_WRAP_MARGIN};
