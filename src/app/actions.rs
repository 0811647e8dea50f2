//! User actions: load a playlist, ask the next question, replay the excerpt,
//! submit an answer and close the session.

use rand::Rng;

use crate::audio::ExcerptPlayer;
use crate::playlist::{AudioCache, fetch_playlist};
use crate::quiz::QuizSession;
use crate::tool::ToolRunner;

use super::model::{App, DialogKind, Focus, PendingAction, WELCOME_STATUS};

const LOAD_FAILED_STATUS: &str = "Please enter a valid playlist URL";

impl App {
    /// Run a queued action.
    pub fn run_pending<R: Rng + ?Sized>(
        &mut self,
        action: PendingAction,
        tool: &dyn ToolRunner,
        player: &dyn ExcerptPlayer,
        rng: &mut R,
    ) {
        match action {
            PendingAction::LoadPlaylist => self.load_playlist(tool, player),
            PendingAction::NextQuestion => self.next_question(tool, player, rng),
        }
    }

    /// Fetch the playlist in the URL field and start a new session on it,
    /// replacing any previous one. The first question is queued.
    pub fn load_playlist(&mut self, tool: &dyn ToolRunner, player: &dyn ExcerptPlayer) {
        let url = self.url.trim().to_string();
        if url.is_empty() {
            self.show(
                DialogKind::Error,
                "Error",
                "Please enter a valid YouTube or YouTube Music playlist URL",
            );
            self.status = WELCOME_STATUS.to_string();
            return;
        }

        self.close(player);

        let tracks = match fetch_playlist(tool, &url, &self.settings.tool) {
            Ok(tracks) => tracks,
            Err(e) => {
                log::error!("failed to load playlist {url}: {e}");
                self.load_failed();
                return;
            }
        };

        let cache_parent = self.settings.quiz.cache_dir.as_deref();
        let cache = match AudioCache::new(cache_parent, &self.settings.tool) {
            Ok(cache) => cache,
            Err(e) => {
                log::error!("cannot create download directory: {e}");
                self.show(
                    DialogKind::Error,
                    "Error",
                    format!("Could not create a download directory: {e}"),
                );
                self.status = LOAD_FAILED_STATUS.to_string();
                return;
            }
        };

        let mut session = QuizSession::new(tracks, &self.settings.quiz, cache);
        let n = session.track_count();
        if n == 0 {
            session.teardown();
            self.load_failed();
            return;
        }
        if n < self.settings.quiz.num_choices {
            self.show(
                DialogKind::Warning,
                "Warning",
                format!("Found only {n} songs. Continuing with fewer options."),
            );
            session.set_num_choices(n);
        }

        self.session = Some(session);
        self.status = format!("Loaded {n} songs. Ready to play!");
        self.focus = Focus::Choices;
        self.request(PendingAction::NextQuestion);
    }

    fn load_failed(&mut self) {
        self.show(
            DialogKind::Error,
            "Error",
            "Failed to load playlist or no songs found",
        );
        self.status = LOAD_FAILED_STATUS.to_string();
    }

    /// Stop the current excerpt, draw a new question and play it.
    pub fn next_question<R: Rng + ?Sized>(
        &mut self,
        tool: &dyn ToolRunner,
        player: &dyn ExcerptPlayer,
        rng: &mut R,
    ) {
        let max_attempts = self.settings.quiz.max_attempts;
        let Some(session) = self.session.as_mut() else {
            return;
        };

        player.stop();
        let result = session.next_question(tool, rng, max_attempts).map(|_| ());
        self.reset_selection();

        match result {
            Ok(()) => {
                self.status =
                    "New question ready. Press p to hear another excerpt.".to_string();
                self.play_excerpt(player);
            }
            Err(e) => {
                log::error!("failed to generate a question: {e}");
                self.show(
                    DialogKind::Error,
                    "Error",
                    format!("Failed to generate a new question: {e}"),
                );
                self.status = "No question ready. Press n to try again.".to_string();
            }
        }
    }

    /// Play a fresh random excerpt of the current question's track.
    pub fn play_excerpt(&mut self, player: &dyn ExcerptPlayer) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let Some(file) = session.audio_file() else {
            log::warn!("no audio loaded");
            return;
        };

        if let Err(e) = player.play_excerpt(file, session.excerpt_length()) {
            log::warn!("error playing excerpt: {e}");
            self.status = format!("Could not play the excerpt: {e}");
        }
    }

    pub fn stop_playback(&self, player: &dyn ExcerptPlayer) {
        player.stop();
    }

    /// Check the selected radio button against the playing track.
    pub fn submit(&mut self) {
        let Some(selected) = self.selected else {
            if self.has_question() {
                self.show(DialogKind::Info, "Info", "Please select an answer first");
            }
            return;
        };
        let Some(session) = self.session.as_mut() else {
            return;
        };

        let answer = match session.check_answer(selected) {
            Ok(answer) => answer,
            Err(e) => {
                log::warn!("cannot check answer {selected}: {e}");
                return;
            }
        };
        session.record_answer(&answer);

        if answer.correct {
            self.show(
                DialogKind::Correct,
                "Correct!",
                format!("You got it right! The song is: {}", answer.target_title),
            );
        } else {
            self.show(
                DialogKind::Incorrect,
                "Incorrect",
                format!(
                    "Sorry, that's wrong. The correct song is: {}",
                    answer.target_title
                ),
            );
        }
    }

    /// Stop playback and tear the session down, removing its downloads.
    pub fn close(&mut self, player: &dyn ExcerptPlayer) {
        player.stop();
        if let Some(session) = self.session.take() {
            session.teardown();
        }
        self.reset_selection();
        self.focus = Focus::Url;
    }
}
