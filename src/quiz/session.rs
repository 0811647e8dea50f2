use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::config::QuizSettings;
use crate::error::QuizError;
use crate::playlist::{AudioCache, Track, TrackId};
use crate::tool::ToolRunner;

use super::question::{Answer, Question};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// No playlist loaded.
    Empty,
    /// Playlist loaded, no active question.
    Ready,
    /// Target chosen, its audio downloaded and choices drawn.
    QuestionActive,
}

/// Running tally of answered questions.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Score {
    pub answered: usize,
    pub correct: usize,
}

/// One quiz run from playlist load to teardown.
pub struct QuizSession {
    playlist: Vec<Track>,
    question: Option<Question>,
    audio_file: Option<PathBuf>,
    num_choices: usize,
    excerpt_length: Duration,
    cache: AudioCache,
    score: Score,
}

impl QuizSession {
    /// Start a session over `tracks`. Tracks without an id, and repeats of an
    /// id already seen, are dropped so every remaining track is uniquely
    /// identifiable.
    pub fn new(tracks: Vec<Track>, settings: &QuizSettings, cache: AudioCache) -> Self {
        let mut seen: HashSet<TrackId> = HashSet::new();
        let total = tracks.len();
        let playlist: Vec<Track> = tracks
            .into_iter()
            .filter(|t| !t.id.is_empty() && seen.insert(t.id.clone()))
            .collect();
        if playlist.len() != total {
            log::warn!(
                "dropped {} playlist entries without a unique id",
                total - playlist.len()
            );
        }

        Self {
            playlist,
            question: None,
            audio_file: None,
            num_choices: settings.num_choices.max(1),
            excerpt_length: settings.excerpt_length(),
            cache,
            score: Score::default(),
        }
    }

    pub fn state(&self) -> SessionState {
        if self.playlist.is_empty() {
            SessionState::Empty
        } else if self.question.is_some() && self.audio_file.is_some() {
            SessionState::QuestionActive
        } else {
            SessionState::Ready
        }
    }

    #[cfg(test)]
    pub fn playlist(&self) -> &[Track] {
        &self.playlist
    }

    pub fn track_count(&self) -> usize {
        self.playlist.len()
    }

    pub fn question(&self) -> Option<&Question> {
        self.question.as_ref()
    }

    pub fn audio_file(&self) -> Option<&Path> {
        self.audio_file.as_deref()
    }

    pub fn num_choices(&self) -> usize {
        self.num_choices
    }

    /// Clamp to `1..=playlist.len()` (or 1 for an empty playlist).
    pub fn set_num_choices(&mut self, n: usize) {
        self.num_choices = n.clamp(1, self.playlist.len().max(1));
    }

    pub fn excerpt_length(&self) -> Duration {
        self.excerpt_length
    }

    pub fn score(&self) -> Score {
        self.score
    }

    /// Pick a random target, download it and draw the choices.
    ///
    /// On any failure the previous question is gone and the session is back
    /// in [`SessionState::Ready`]; a [`QuizError::DownloadFailed`] may be
    /// retried, which picks a new random target.
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn generate_question<R: Rng + ?Sized>(
        &mut self,
        tool: &dyn ToolRunner,
        rng: &mut R,
    ) -> Result<&Question, QuizError> {
        self.attempt(tool, rng, &mut HashSet::new())
    }

    /// Generate a question, trying up to `max_attempts` different targets
    /// when downloads fail. A track that failed is not picked again within
    /// the same call.
    pub fn next_question<R: Rng + ?Sized>(
        &mut self,
        tool: &dyn ToolRunner,
        rng: &mut R,
        max_attempts: usize,
    ) -> Result<&Question, QuizError> {
        let mut failed: HashSet<TrackId> = HashSet::new();

        for attempt in 1..=max_attempts.max(1) {
            match self.attempt(tool, rng, &mut failed) {
                Ok(_) => break,
                Err(e) if e.is_per_track() => {
                    log::warn!("attempt {attempt}/{max_attempts}: {e}");
                }
                Err(e) => return Err(e),
            }
        }

        self.question.as_ref().ok_or(QuizError::RetriesExhausted {
            attempts: failed.len(),
        })
    }

    /// One generation attempt with targets restricted to ids outside
    /// `failed`; a target whose download fails is added to it.
    fn attempt<R: Rng + ?Sized>(
        &mut self,
        tool: &dyn ToolRunner,
        rng: &mut R,
        failed: &mut HashSet<TrackId>,
    ) -> Result<&Question, QuizError> {
        self.question = None;
        self.audio_file = None;

        if self.playlist.len() < self.num_choices {
            log::warn!("not enough songs in playlist");
            return Err(QuizError::NotEnoughTracks {
                have: self.playlist.len(),
                need: self.num_choices,
            });
        }

        let candidates: Vec<usize> = (0..self.playlist.len())
            .filter(|&i| !failed.contains(&self.playlist[i].id))
            .collect();
        let Some(&target) = candidates.choose(rng) else {
            return Err(QuizError::RetriesExhausted {
                attempts: failed.len(),
            });
        };

        let file = match self.cache.fetch(tool, &self.playlist[target]) {
            Ok(file) => file,
            Err(e) => {
                failed.insert(self.playlist[target].id.clone());
                return Err(e);
            }
        };
        let question = Question::build(&self.playlist, target, self.num_choices - 1, rng);
        log::info!(
            "new question: {} choices, target {}",
            question.choices().len(),
            question.target().id
        );

        self.audio_file = Some(file);
        Ok(self.question.insert(question))
    }

    /// Check `selected` against the current target. Pure: the score is
    /// only touched by [`QuizSession::record_answer`].
    pub fn check_answer(&self, selected: usize) -> Result<Answer, QuizError> {
        let question = self.question.as_ref().ok_or(QuizError::NoActiveQuestion)?;
        question.check(selected).ok_or(QuizError::InvalidChoice {
            index: selected,
            len: question.choices().len(),
        })
    }

    /// Count `answer` toward the score if it is the first for this question.
    pub fn record_answer(&mut self, answer: &Answer) {
        let Some(question) = self.question.as_mut() else {
            return;
        };
        if question.mark_answered() {
            self.score.answered += 1;
            if answer.correct {
                self.score.correct += 1;
            }
        }
    }

    /// Drop the question and remove every downloaded file.
    pub fn teardown(self) {
        log::info!("tearing down session, removing {}", self.cache.dir().display());
        self.cache.cleanup();
    }
}
