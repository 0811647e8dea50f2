//! Excerpt playback.
//!
//! An [`AudioPlayer`] owns a background thread holding the rodio output
//! stream. Each excerpt is decoded on the caller's thread, handed over with a
//! random start offset, and stopped by the thread once its deadline passes.

mod excerpt;
mod player;
mod sink;
mod thread;
mod types;

pub use player::{AudioPlayer, ExcerptPlayer};
pub use types::PlaybackHandle;

#[cfg(test)]
pub(crate) use player::fake;
#[cfg(test)]
pub(crate) use types::PlaybackInfo;

#[cfg(test)]
mod tests;
