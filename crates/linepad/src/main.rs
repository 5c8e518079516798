use anyhow::Result;
use crossterm::event::{self, Event};
use linepad::{app::App, logging, terminal, ui};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{env, io, path::PathBuf, time::Duration};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    if let Some(path) = logging::init() {
        log::info!("Logging to {}", path.display());
    }

    // Setup panic hook to restore terminal
    terminal::install_panic_hook();

    let mut app = match App::new().await {
        Ok(app) => {
            log::info!("Application initialized successfully");
            app
        }
        Err(e) => {
            eprintln!("アプリケーションの初期化に失敗しました: {}", e);
            if let Some(source) = e.chain().nth(1) {
                eprintln!("詳細: {}", source);
            }
            return Err(e);
        }
    };

    // Load file from command line if provided
    if let Some(arg) = env::args().nth(1) {
        app.open_path(PathBuf::from(&arg)).await;
    } else {
        log::info!("No file specified, starting with empty buffer");
    }

    let session = terminal::TerminalSession::enter().map_err(|e| {
        eprintln!("{}", e);
        e
    })?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    drop(session);

    if let Err(err) = res {
        eprintln!("アプリケーション実行中にエラーが発生しました: {}", err);
        log::error!("Application error: {}", err);
        return Err(err);
    }

    Ok(())
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        app.fit_to(terminal.size()?);
        app.refresh_highlight();

        if let Err(e) = terminal.draw(|f| ui::draw(f, app)) {
            log::error!("Terminal draw error: {}", e);
        }

        app.update_status();

        if app.should_quit() {
            log::info!("Application shutdown requested");
            break;
        }

        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) => {
                    if let Err(e) = app.handle_key_event(key).await {
                        log::error!("Key event handling error: {}", e);
                        app.ui_state
                            .set_error_message(format!("キー処理エラー: {}", e));
                    }
                }
                Event::Resize(width, height) => {
                    log::debug!("Terminal resized to {}x{}", width, height);
                }
                _ => {}
            }
        }
    }

    log::info!("Application loop ended successfully");
    Ok(())
}
