use anyhow::Result;
use linecore::LineBuffer;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Result of opening a path from the command line.
#[derive(Debug)]
pub enum Opened {
    Loaded(LineBuffer),
    /// The path does not exist yet; saving will create it.
    NewFile,
}

#[derive(Debug, Default)]
pub struct FileManager {
    current_path: Option<PathBuf>,
}

impl FileManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_path(&self) -> Option<&Path> {
        self.current_path.as_deref()
    }

    pub fn has_file(&self) -> bool {
        self.current_path.is_some()
    }

    pub fn display_name(&self) -> String {
        self.current_path
            .as_ref()
            .and_then(|path| path.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| String::from("[No Name]"))
    }

    pub async fn open_file(&mut self, path: PathBuf) -> Result<Opened> {
        let metadata = match fs::metadata(&path).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("New file: {}", path.display());
                self.current_path = Some(path);
                return Ok(Opened::NewFile);
            }
            Err(e) => {
                return Err(anyhow::anyhow!(
                    "ファイル情報の取得に失敗しました: {} - {}",
                    path.display(),
                    e
                ));
            }
        };

        if !metadata.is_file() {
            return Err(anyhow::anyhow!(
                "指定されたパスはファイルではありません: {}",
                path.display()
            ));
        }

        match fs::read_to_string(&path).await {
            Ok(content) => {
                if content.contains('\0') {
                    return Err(anyhow::anyhow!(
                        "ファイルがバイナリ形式の可能性があります: {}",
                        path.display()
                    ));
                }

                let buffer = LineBuffer::from_text(&content);
                log::info!(
                    "Opened {} ({} lines)",
                    path.display(),
                    buffer.line_count()
                );
                self.current_path = Some(path);
                Ok(Opened::Loaded(buffer))
            }
            Err(e) => {
                let error_msg = match e.kind() {
                    std::io::ErrorKind::PermissionDenied => {
                        format!("ファイルへのアクセス権限がありません: {}", path.display())
                    }
                    std::io::ErrorKind::InvalidData => {
                        format!(
                            "ファイルのエンコーディングが無効です (UTF-8ではありません): {}",
                            path.display()
                        )
                    }
                    _ => format!("ファイル読み込みエラー: {} - {}", path.display(), e),
                };
                Err(anyhow::anyhow!(error_msg))
            }
        }
    }

    /// Writes the buffer to the bound path and returns the status text.
    pub async fn save_file(&self, buffer: &LineBuffer) -> Result<String> {
        let path = self
            .current_path
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("ファイルパスが設定されていません"))?;
        write_buffer(path, buffer).await
    }

    /// Binds `path` once the write succeeds.
    pub async fn save_file_as(&mut self, path: PathBuf, buffer: &LineBuffer) -> Result<String> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !parent.exists() {
                fs::create_dir_all(parent).await.map_err(|e| {
                    anyhow::anyhow!(
                        "ディレクトリの作成に失敗しました: {} - {}",
                        parent.display(),
                        e
                    )
                })?;
                log::info!("Created directory: {}", parent.display());
            }
        }

        let message = write_buffer(&path, buffer).await?;
        self.current_path = Some(path);
        Ok(message)
    }
}

/// `1 line`, `3 lines`.
pub fn lines_label(count: usize) -> String {
    if count == 1 {
        String::from("1 line")
    } else {
        format!("{count} lines")
    }
}

async fn write_buffer(path: &Path, buffer: &LineBuffer) -> Result<String> {
    match fs::write(path, buffer.to_text()).await {
        Ok(()) => {
            log::info!("Successfully saved file: {}", path.display());
            Ok(format!(
                "{} written to {} ({})",
                lines_label(buffer.line_count()),
                path.display(),
                chrono::Local::now().format("%H:%M:%S")
            ))
        }
        Err(e) => {
            let error_msg = match e.kind() {
                std::io::ErrorKind::PermissionDenied => {
                    format!("ファイルへの書き込み権限がありません: {}", path.display())
                }
                std::io::ErrorKind::WriteZero => {
                    format!(
                        "ディスク容量が不足している可能性があります: {}",
                        path.display()
                    )
                }
                _ => format!("ファイル書き込みエラー: {} - {}", path.display(), e),
            };
            Err(anyhow::anyhow!(error_msg))
        }
    }
}
