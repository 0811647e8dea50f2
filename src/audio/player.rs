use std::path::Path;
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use rand::thread_rng;

use crate::error::QuizError;

use super::excerpt::excerpt_start;
use super::sink::{open_source, read_duration};
use super::thread::spawn_audio_thread;
use super::types::{AudioCmd, PlaybackHandle, PlaybackInfo};

/// Plays timed excerpts of audio files.
pub trait ExcerptPlayer {
    /// Start a random `length`-long excerpt of `file`, replacing anything
    /// already playing. Returns the chosen start offset.
    fn play_excerpt(&self, file: &Path, length: Duration) -> Result<Duration, QuizError>;

    /// Stop playback if anything is playing.
    fn stop(&self);
}

pub struct AudioPlayer {
    tx: Sender<AudioCmd>,
    playback: PlaybackHandle,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl AudioPlayer {
    /// Open the default output device on a dedicated thread.
    pub fn new() -> Result<Self, QuizError> {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let (ready_tx, ready_rx) = mpsc::sync_channel::<Result<(), String>>(1);
        let playback_info: PlaybackHandle = Arc::new(Mutex::new(PlaybackInfo::default()));

        let audio_handle = spawn_audio_thread(rx, playback_info.clone(), ready_tx);

        match ready_rx.recv() {
            Ok(Ok(())) => {}
            Ok(Err(msg)) => {
                let _ = audio_handle.join();
                return Err(QuizError::AudioInit(msg));
            }
            Err(_) => {
                let _ = audio_handle.join();
                return Err(QuizError::AudioInit("audio thread exited".to_string()));
            }
        }

        Ok(Self {
            tx,
            playback: playback_info,
            join: Mutex::new(Some(audio_handle)),
        })
    }

    pub fn playback_handle(&self) -> PlaybackHandle {
        self.playback.clone()
    }

    pub fn send(&self, cmd: AudioCmd) -> Result<(), mpsc::SendError<AudioCmd>> {
        self.tx.send(cmd)
    }

    /// Stop playback and wait for the audio thread to exit.
    pub fn quit(&self) {
        let _ = self.send(AudioCmd::Quit);

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}

impl ExcerptPlayer for AudioPlayer {
    fn play_excerpt(&self, file: &Path, length: Duration) -> Result<Duration, QuizError> {
        let total = read_duration(file)?;
        let start = excerpt_start(total, length, &mut thread_rng());
        let source = open_source(file)?;

        self.send(AudioCmd::PlayExcerpt {
            source,
            start,
            length,
        })
        .map_err(|_| QuizError::Playback {
            path: file.to_path_buf(),
            reason: "audio thread is not running".to_string(),
        })?;

        log::debug!(
            "excerpt of {} ({:.1}s total) starts at {:.1}s",
            file.display(),
            total.as_secs_f64(),
            start.as_secs_f64()
        );
        Ok(start)
    }

    fn stop(&self) {
        let _ = self.send(AudioCmd::Stop);
    }
}
