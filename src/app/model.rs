//! Application model types: `App`, `Focus`, `Dialog` and `PendingAction`.
//!
//! The `App` struct holds the URL field, status text, the quiz session and
//! the radio selection used by the UI and runtime.

use std::collections::VecDeque;

use crate::audio::PlaybackHandle;
use crate::config::Settings;
use crate::quiz::{QuizSession, Score};

/// Which part of the form receives key presses.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Focus {
    #[default]
    Url,
    Choices,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DialogKind {
    Info,
    Warning,
    Error,
    Correct,
    Incorrect,
}

/// A modal message box.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dialog {
    pub kind: DialogKind,
    pub title: String,
    pub message: String,
}

/// Blocking work requested by a key press. The runtime redraws before
/// running it so the status line reflects what is happening.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PendingAction {
    LoadPlaylist,
    NextQuestion,
}

impl PendingAction {
    /// Status line shown while the action blocks.
    pub fn progress_status(self) -> &'static str {
        match self {
            Self::LoadPlaylist => "Loading playlist... This may take a moment.",
            Self::NextQuestion => "Generating new question... downloading song...",
        }
    }
}

/// The main application model.
pub struct App {
    pub settings: Settings,
    pub url: String,
    pub status: String,
    pub focus: Focus,
    pub session: Option<QuizSession>,
    /// Radio button currently chosen, `None` until the player picks one.
    pub selected: Option<usize>,
    /// Row highlighted by the cursor in the choices list.
    pub cursor: usize,
    pub dialogs: VecDeque<Dialog>,
    pub pending: Option<PendingAction>,
    pub playback_handle: Option<PlaybackHandle>,
    pub should_quit: bool,
}

pub const WELCOME_STATUS: &str = "Enter a playlist URL to begin";

impl App {
    /// Create a new `App` with the provided `settings`.
    pub fn new(settings: Settings) -> Self {
        Self {
            url: settings.ui.default_url.clone(),
            settings,
            status: WELCOME_STATUS.to_string(),
            focus: Focus::Url,
            session: None,
            selected: None,
            cursor: 0,
            dialogs: VecDeque::new(),
            pending: None,
            playback_handle: None,
            should_quit: false,
        }
    }

    /// Attach a `PlaybackHandle` used to observe excerpt progress.
    pub fn set_playback_handle(&mut self, h: PlaybackHandle) {
        self.playback_handle = Some(h);
    }

    pub fn set_url(&mut self, url: impl Into<String>) {
        self.url = url.into();
    }

    pub fn push_url_char(&mut self, c: char) {
        self.url.push(c);
    }

    pub fn pop_url_char(&mut self) {
        self.url.pop();
    }

    pub fn clear_url(&mut self) {
        self.url.clear();
    }

    pub fn has_question(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|s| s.question().is_some())
    }

    /// Number of rows in the choices list.
    pub fn choice_count(&self) -> usize {
        self.session
            .as_ref()
            .and_then(|s| s.question())
            .map_or(0, |q| q.choices().len())
    }

    pub fn score(&self) -> Score {
        self.session.as_ref().map(QuizSession::score).unwrap_or_default()
    }

    /// Switch between the URL field and the choices; the choices can only be
    /// focused once a playlist is loaded.
    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Url if self.session.is_some() => Focus::Choices,
            _ => Focus::Url,
        };
    }

    pub fn cursor_down(&mut self) {
        let n = self.choice_count();
        if n > 0 {
            self.cursor = (self.cursor + 1) % n;
        }
    }

    pub fn cursor_up(&mut self) {
        let n = self.choice_count();
        if n > 0 {
            self.cursor = (self.cursor + n - 1) % n;
        }
    }

    /// Select the radio button at `index` if it exists.
    pub fn select(&mut self, index: usize) {
        if index < self.choice_count() {
            self.selected = Some(index);
            self.cursor = index;
        }
    }

    pub fn select_cursor(&mut self) {
        self.select(self.cursor);
    }

    pub(super) fn reset_selection(&mut self) {
        self.selected = None;
        self.cursor = 0;
    }

    pub fn show(&mut self, kind: DialogKind, title: &str, message: impl Into<String>) {
        self.dialogs.push_back(Dialog {
            kind,
            title: title.to_string(),
            message: message.into(),
        });
    }

    pub fn dialog(&self) -> Option<&Dialog> {
        self.dialogs.front()
    }

    pub fn dismiss_dialog(&mut self) {
        self.dialogs.pop_front();
    }

    /// Queue a blocking action for the runtime to run after the next redraw.
    pub fn request(&mut self, action: PendingAction) {
        self.pending = Some(action);
    }

    pub fn take_pending(&mut self) -> Option<PendingAction> {
        self.pending.take()
    }
}
