//! Quiz state: questions, answers and the per-playlist session.

mod question;
mod session;

pub use session::{QuizSession, Score, SessionState};
