use directories::ProjectDirs;
use env_logger::Target;
use log::LevelFilter;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Routes the `log` facade to a file, since stderr belongs to the
/// alternate screen while the editor runs. Returns the file in use, or
/// `None` when logging stays off.
pub fn init() -> Option<PathBuf> {
    let path = log_path()?;
    let file = match open_log_file(&path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("ログファイルを開けませんでした: {} - {}", path.display(), e);
            return None;
        }
    };

    // Initialize logger with debug fallback for development
    let mut logger = env_logger::Builder::from_default_env();
    if std::env::var_os("RUST_LOG").is_none() {
        logger.filter_level(LevelFilter::Info);
        logger.filter_module("linepad", LevelFilter::Debug);
        logger.filter_module("linecore", LevelFilter::Debug);
    }
    logger
        .format(|buf, record| {
            writeln!(
                buf,
                "{} {:<5} [{}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .target(Target::Pipe(Box::new(file)));

    logger.try_init().ok()?;
    Some(path)
}

fn log_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("LINEPAD_LOG_FILE") {
        return Some(PathBuf::from(path));
    }
    ProjectDirs::from("com", "linepad", "linepad").map(|dirs| dirs.data_dir().join("linepad.log"))
}

fn open_log_file(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}
