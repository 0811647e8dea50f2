//! Playlist model, fetcher and download cache.
//!
//! `fetch` turns the external tool's flat listing into `Track`s and `cache`
//! materialises one track's audio inside the per-session directory.

mod cache;
mod fetch;
mod model;

pub use cache::AudioCache;
pub use fetch::fetch_playlist;
pub use model::{Track, TrackId};
