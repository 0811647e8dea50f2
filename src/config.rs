//! Configuration loader and schema types.
//!
//! This module exposes the configuration schema used to drive the quiz,
//! the downloader invocation and logging, plus helpers to load it from disk.

mod load;
mod schema;

pub use schema::*;

#[cfg(test)]
mod tests;
