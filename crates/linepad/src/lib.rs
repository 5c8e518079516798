// linepad library exports

pub mod app;
pub mod config;
pub mod file_manager;
pub mod highlight;
pub mod keymap;
pub mod logging;
pub mod status_manager;
pub mod terminal;
pub mod ui;
pub mod ui_state;

pub use app::App;
pub use config::Config;
pub use ui_state::{Prompt, UIState};
