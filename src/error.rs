//! Error taxonomy shared by the fetcher, downloader, session and player.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum QuizError {
    /// The external tool could not be started at all.
    #[error("failed to run {program}: {source}")]
    ToolSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The external tool ran but exited unsuccessfully.
    #[error("{program} exited with {status}: {stderr}")]
    ToolFailed {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("no songs found in playlist")]
    EmptyPlaylist,

    #[error("not enough songs in playlist: have {have}, need {need}")]
    NotEnoughTracks { have: usize, need: usize },

    /// Per-track failure; the caller may retry with another track.
    #[error("failed to download {title:?}: {reason}")]
    DownloadFailed { title: String, reason: String },

    #[error("gave up after {attempts} failed download attempts")]
    RetriesExhausted { attempts: usize },

    #[error("cannot play {path}: {reason}")]
    Playback { path: PathBuf, reason: String },

    #[error("audio output unavailable: {0}")]
    AudioInit(String),

    #[error("no active question")]
    NoActiveQuestion,

    #[error("choice {index} out of range (have {len})")]
    InvalidChoice { index: usize, len: usize },

    #[error("audio cache: {0}")]
    Cache(#[from] std::io::Error),
}

impl QuizError {
    /// Whether a fresh attempt with a different track may succeed.
    pub fn is_per_track(&self) -> bool {
        matches!(self, Self::DownloadFailed { .. })
    }
}
