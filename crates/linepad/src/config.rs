use anyhow::Result;
use directories::ProjectDirs;
use linecore::DEFAULT_WRAP_MARGIN;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs::try_exists;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub editor: EditorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub syntax_theme: String,
    #[serde(default)]
    pub text_foreground: Option<String>,
    #[serde(default)]
    pub border_color: Option<String>,
    #[serde(default)]
    pub status_foreground: Option<String>,
    #[serde(default)]
    pub status_background: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorConfig {
    pub line_numbers: bool,
    pub syntax_highlighting: bool,
    /// Columns left free at the right edge before typing wraps the cursor.
    pub wrap_margin: usize,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            name: String::from("classic"),
            syntax_theme: String::from("base16-ocean.dark"),
            text_foreground: Some(String::from("#D8DEE9")),
            border_color: Some(String::from("#5F87AF")),
            status_foreground: Some(String::from("#FFFFFF")),
            status_background: Some(String::from("#0000AA")),
        }
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            line_numbers: true,
            syntax_highlighting: true,
            wrap_margin: DEFAULT_WRAP_MARGIN,
        }
    }
}

impl Config {
    pub async fn load() -> Result<Self> {
        match Self::config_path() {
            Some(config_path) => Self::load_from(&config_path).await,
            None => {
                log::warn!("No config directory available, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub async fn load_from(config_path: &Path) -> Result<Self> {
        if try_exists(config_path).await? {
            match tokio::fs::read_to_string(config_path).await {
                Ok(content) => {
                    if content.trim().is_empty() {
                        log::warn!("Config file is empty, creating new one");
                        let default_config = Self::default();
                        let _ = default_config.save_to(config_path).await;
                        return Ok(default_config);
                    }

                    match serde_json::from_str::<Self>(&content) {
                        Ok(mut config) => {
                            config.validate()?;
                            log::info!(
                                "Successfully loaded config from: {}",
                                config_path.display()
                            );
                            return Ok(config);
                        }
                        Err(json_err) => {
                            log::error!("Failed to parse config file: {}", json_err);

                            let backup_path = config_path.with_extension("bak");
                            if let Err(e) = tokio::fs::copy(config_path, &backup_path).await {
                                log::warn!("Failed to backup broken config: {}", e);
                            } else {
                                log::info!(
                                    "Backed up broken config to: {}",
                                    backup_path.display()
                                );
                            }
                        }
                    }
                }
                Err(io_err) => {
                    log::error!("Failed to read config file: {}", io_err);
                }
            }
        } else {
            log::info!("Config file does not exist, creating default");
        }

        let default_config = Self::default();
        let _ = default_config.save_to(config_path).await;
        Ok(default_config)
    }

    pub async fn save_to(&self, config_path: &Path) -> Result<()> {
        let mut config_to_save = self.clone();
        config_to_save.validate()?;

        if let Some(parent) = config_path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                anyhow::anyhow!(
                    "設定ディレクトリの作成に失敗しました: {} - {}",
                    parent.display(),
                    e
                )
            })?;
        }

        let content = serde_json::to_string_pretty(&config_to_save)
            .map_err(|e| anyhow::anyhow!("設定のシリアライズに失敗しました: {}", e))?;
        tokio::fs::write(config_path, content).await.map_err(|e| {
            anyhow::anyhow!(
                "設定ファイルの書き込みに失敗しました: {} - {}",
                config_path.display(),
                e
            )
        })?;
        log::info!("Successfully saved config to: {}", config_path.display());
        Ok(())
    }

    /// Validate configuration values and fix invalid ones
    pub fn validate(&mut self) -> Result<()> {
        let mut has_issues = false;

        if self.editor.wrap_margin == 0 || self.editor.wrap_margin > 16 {
            log::warn!(
                "Invalid wrap margin: {}, using default",
                self.editor.wrap_margin
            );
            self.editor.wrap_margin = DEFAULT_WRAP_MARGIN;
            has_issues = true;
        }

        if self.theme.name.is_empty() {
            log::warn!("Empty theme name, using default");
            self.theme.name = Theme::default().name;
            has_issues = true;
        }

        if self.theme.syntax_theme.is_empty() {
            log::warn!("Empty syntax theme, using default");
            self.theme.syntax_theme = Theme::default().syntax_theme;
            has_issues = true;
        }

        for color in [
            &mut self.theme.text_foreground,
            &mut self.theme.border_color,
            &mut self.theme.status_foreground,
            &mut self.theme.status_background,
        ] {
            if let Some(value) = color.as_deref() {
                if parse_hex_color(value).is_none() {
                    log::warn!("Invalid color {:?}, falling back to terminal default", value);
                    *color = None;
                    has_issues = true;
                }
            }
        }

        if has_issues {
            log::info!("Configuration validation completed with corrections");
        }

        Ok(())
    }

    fn config_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("LINEPAD_CONFIG_PATH") {
            return Some(PathBuf::from(path));
        }

        if let Ok(dir) = std::env::var("LINEPAD_CONFIG_DIR") {
            return Some(PathBuf::from(dir).join("config.json"));
        }

        ProjectDirs::from("com", "linepad", "linepad")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }
}

/// Parses `#RRGGBB` into its components.
pub fn parse_hex_color(value: &str) -> Option<(u8, u8, u8)> {
    let hex = value.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
    Some((channel(0..2)?, channel(2..4)?, channel(4..6)?))
}
