use serde::Deserialize;

use crate::config::ToolSettings;
use crate::error::QuizError;
use crate::tool::ToolRunner;

use super::model::{Track, TrackId};

pub const UNKNOWN_TITLE: &str = "Unknown Title";

/// The subset of a `--dump-json` flat-playlist record we care about.
#[derive(Debug, Deserialize)]
struct FlatEntry {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    id: Option<String>,
    /// Seconds; may be fractional or null.
    #[serde(default)]
    duration: Option<f64>,
}

impl FlatEntry {
    fn into_track(self, watch_url_prefix: &str) -> Track {
        let id = self.id.unwrap_or_default();
        let duration = self
            .duration
            .filter(|d| d.is_finite() && *d > 0.0)
            .map(|d| d.round() as u64)
            .unwrap_or(0);

        Track {
            url: format!("{watch_url_prefix}{id}"),
            id: TrackId::new(id),
            title: self.title.unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
            duration,
        }
    }
}

/// Parse line-delimited JSON records into tracks, preserving order.
///
/// Blank lines are ignored; lines that are not a JSON object are logged and
/// skipped.
pub fn parse_playlist(stdout: &str, watch_url_prefix: &str) -> Vec<Track> {
    let mut tracks = Vec::new();

    for (lineno, line) in stdout.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match serde_json::from_str::<FlatEntry>(line) {
            Ok(entry) => {
                let track = entry.into_track(watch_url_prefix);
                log::debug!("added: {} ({})", track.title, track.id);
                tracks.push(track);
            }
            Err(e) => {
                log::warn!("skipping unparsable playlist line {}: {e}: {line}", lineno + 1);
            }
        }
    }

    tracks
}

/// List `url` with the external tool in flat mode and parse the result.
pub fn fetch_playlist(
    tool: &dyn ToolRunner,
    url: &str,
    settings: &ToolSettings,
) -> Result<Vec<Track>, QuizError> {
    log::info!("fetching playlist: {url}");

    let args = vec![
        "--flat-playlist".to_string(),
        "--dump-json".to_string(),
        url.to_string(),
    ];
    let out = tool.run_checked(&args).inspect_err(|e| {
        log::error!("playlist listing failed: {e}");
    })?;

    let tracks = parse_playlist(&out.stdout, &settings.watch_url_prefix);
    if tracks.is_empty() {
        log::warn!("playlist {url} produced no tracks");
        return Err(QuizError::EmptyPlaylist);
    }

    log::info!("loaded {} songs from playlist", tracks.len());
    Ok(tracks)
}
