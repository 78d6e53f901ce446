//! Subtime Core - subtitle timing engine
//!
//! This crate contains the timing arithmetic of a subtitle editor with zero UI
//! dependencies. A host application owns the subtitle document and the user's
//! preferences; it hands both to the engine and surfaces the outcome.

pub mod config;
pub mod logging;
pub mod timing;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
