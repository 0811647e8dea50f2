//! Application module: exposes the app model used by the TUI and runtime.
//!
//! The `App` model lives in `app::model`; the user actions that drive the
//! quiz session and the player live in `app::actions`.

mod actions;
mod model;

pub use model::*;
