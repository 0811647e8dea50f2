use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/earworm/config.toml` or `~/.config/earworm/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `EARWORM__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub quiz: QuizSettings,
    pub tool: ToolSettings,
    pub ui: UiSettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QuizSettings {
    /// Number of choices offered per question (target included).
    pub num_choices: usize,
    /// Length of the excerpt played for each question, in seconds.
    pub excerpt_seconds: u64,
    /// How many different tracks to try before giving up on a question.
    pub max_attempts: usize,
    /// Parent directory for the per-session download directory.
    /// Defaults to the system temp dir.
    pub cache_dir: Option<PathBuf>,
}

impl QuizSettings {
    pub fn excerpt_length(&self) -> Duration {
        Duration::from_secs(self.excerpt_seconds)
    }
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            num_choices: 5,
            excerpt_seconds: 30,
            max_attempts: 10,
            cache_dir: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ToolSettings {
    /// Program used both to list playlists and to download audio.
    pub program: String,
    /// Audio container passed to `--audio-format`; also the cached file extension.
    pub audio_format: String,
    /// Passed to `--audio-quality`.
    pub audio_quality: String,
    /// Prefix joined with a track id to build its URL.
    pub watch_url_prefix: String,
    /// Extra arguments inserted before every invocation's own arguments.
    pub extra_args: Vec<String>,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            program: "yt-dlp".to_string(),
            audio_format: "mp3".to_string(),
            audio_quality: "128K".to_string(),
            watch_url_prefix: "https://www.youtube.com/watch?v=".to_string(),
            extra_args: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,
    /// Playlist URL shown in the input box at startup.
    pub default_url: String,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ Name that tune ~ ".to_string(),
            default_url: String::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    pub level: LogLevelSetting,
    /// Log file path. Defaults to `earworm.log` in the system temp dir.
    pub file: Option<PathBuf>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: LogLevelSetting::Info,
            file: None,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LogLevelSetting {
    #[serde(alias = "none")]
    Off,
    Error,
    #[serde(alias = "warning")]
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevelSetting {
    pub fn to_filter(self) -> log::LevelFilter {
        match self {
            Self::Off => log::LevelFilter::Off,
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}
