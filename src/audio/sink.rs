//! Opening audio files for playback.
//!
//! Decoding is set up on the caller's thread so a missing or undecodable
//! file is reported to the caller instead of inside the audio thread.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use lofty::file::AudioFile;
use rodio::{Decoder, OutputStream, Sink, Source};

use crate::error::QuizError;

use super::types::FileSource;

fn playback_error(path: &Path, reason: impl ToString) -> QuizError {
    QuizError::Playback {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

/// Total duration from the file's metadata.
pub(super) fn read_duration(path: &Path) -> Result<Duration, QuizError> {
    let tagged = lofty::read_from_path(path).map_err(|e| playback_error(path, e))?;
    Ok(tagged.properties().duration())
}

pub(super) fn open_source(path: &Path) -> Result<FileSource, QuizError> {
    let file = File::open(path).map_err(|e| playback_error(path, e))?;
    Decoder::new(BufReader::new(file)).map_err(|e| playback_error(path, e))
}

/// Create a playing `Sink` for `source` that starts `start_at` into it.
pub(super) fn start_sink_at(stream: &OutputStream, source: FileSource, start_at: Duration) -> Sink {
    let sink = Sink::connect_new(stream.mixer());
    // `skip_duration` is our seeking primitive; even Duration::ZERO is fine.
    sink.append(source.skip_duration(start_at));
    sink.play();
    sink
}
