//! Per-session download directory with "skip if already on disk" memoization.

use std::path::{Path, PathBuf};

use tempfile::TempDir;
use walkdir::WalkDir;

use crate::config::ToolSettings;
use crate::error::QuizError;
use crate::tool::ToolRunner;

use super::model::Track;

pub struct AudioCache {
    dir: TempDir,
    audio_format: String,
    audio_quality: String,
}

impl AudioCache {
    /// Create a fresh session directory under `parent`, or the system temp
    /// dir when `parent` is `None`.
    pub fn new(parent: Option<&Path>, settings: &ToolSettings) -> Result<Self, QuizError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("earworm-");
        let dir = match parent {
            Some(p) => {
                std::fs::create_dir_all(p)?;
                builder.tempdir_in(p)?
            }
            None => builder.tempdir()?,
        };
        log::debug!("audio cache at {}", dir.path().display());

        Ok(Self {
            dir,
            audio_format: settings.audio_format.clone(),
            audio_quality: settings.audio_quality.clone(),
        })
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// Deterministic location of `track`'s audio inside the session dir.
    pub fn path_for(&self, track: &Track) -> PathBuf {
        self.dir
            .path()
            .join(format!("{}.{}", file_stem(track.id.as_str()), self.audio_format))
    }

    /// Return the local audio file for `track`, downloading it on a miss.
    pub fn fetch(&self, tool: &dyn ToolRunner, track: &Track) -> Result<PathBuf, QuizError> {
        if track.id.is_empty() {
            return Err(QuizError::DownloadFailed {
                title: track.title.clone(),
                reason: "track has no id".to_string(),
            });
        }

        let path = self.path_for(track);
        if path.exists() {
            log::info!("using cached file for {}", track.title);
            return Ok(path);
        }

        log::info!("downloading: {}", track.title);
        let args = vec![
            "-x".to_string(),
            "--audio-format".to_string(),
            self.audio_format.clone(),
            "--audio-quality".to_string(),
            self.audio_quality.clone(),
            "-o".to_string(),
            path.to_string_lossy().into_owned(),
            track.url.clone(),
        ];

        let failed = |reason: String| {
            log::warn!("error downloading {}: {reason}", track.title);
            QuizError::DownloadFailed {
                title: track.title.clone(),
                reason,
            }
        };

        match tool.run_checked(&args) {
            Ok(_) if path.exists() => Ok(path),
            Ok(_) => Err(failed("tool produced no output file".to_string())),
            Err(e) => Err(failed(e.to_string())),
        }
    }

    /// Remove every downloaded file and the directory itself. Failures are
    /// logged and otherwise ignored.
    pub fn cleanup(self) {
        let root = self.dir.path().to_path_buf();
        for entry in WalkDir::new(&root)
            .min_depth(1)
            .contents_first(true)
            .into_iter()
            .filter_map(Result::ok)
        {
            let path = entry.path();
            let res = if entry.file_type().is_dir() {
                std::fs::remove_dir(path)
            } else {
                std::fs::remove_file(path)
            };
            if let Err(e) = res {
                log::debug!("could not remove {}: {e}", path.display());
            }
        }

        if let Err(e) = self.dir.close() {
            log::debug!("could not remove {}: {e}", root.display());
        }
    }
}

/// Map an id onto a safe, injective file stem. `[A-Za-z0-9-]` is kept,
/// `_` becomes `__` and every other byte becomes `_XX` (uppercase hex).
pub(super) fn file_stem(id: &str) -> String {
    let mut stem = String::with_capacity(id.len());
    for b in id.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' => stem.push(char::from(b)),
            b'_' => stem.push_str("__"),
            _ => stem.push_str(&format!("_{b:02X}")),
        }
    }
    stem
}
