//! Audio-related small types and handles.
//!
//! This module defines the commands understood by the audio thread and the
//! playback snapshot it shares with the UI.

use std::fs::File;
use std::io::BufReader;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use rodio::Decoder;

/// A decoded audio file, ready to be appended to a sink.
pub type FileSource = Decoder<BufReader<File>>;

pub enum AudioCmd {
    /// Replace whatever is playing with `source`, starting `start` into it
    /// and stopping automatically after `length`.
    PlayExcerpt {
        source: FileSource,
        start: Duration,
        length: Duration,
    },
    /// Stop playback immediately. No-op when idle.
    Stop,
    /// Stop and leave the audio thread.
    Quit,
}

#[derive(Debug, Clone, Default)]
/// Runtime playback information shared with the UI.
pub struct PlaybackInfo {
    /// Whether an excerpt is currently audible.
    pub playing: bool,
    /// Offset into the file where the excerpt started.
    pub offset: Duration,
    /// Planned excerpt length.
    pub length: Duration,
    /// When the current excerpt started playing.
    pub started_at: Option<Instant>,
}

impl PlaybackInfo {
    /// Time played so far, capped at the excerpt length.
    pub fn elapsed(&self, now: Instant) -> Duration {
        match (self.playing, self.started_at) {
            (true, Some(start)) => now.saturating_duration_since(start).min(self.length),
            _ => Duration::ZERO,
        }
    }
}

pub type PlaybackHandle = Arc<Mutex<PlaybackInfo>>;
