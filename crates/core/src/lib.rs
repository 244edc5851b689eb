//! vizscan-core
//!
//! Core library for screening music-visualizer presets for photosensitive
//! seizure triggers.
//!
//! This crate holds the preset language front end (lexer, parser, AST), the
//! static taint analyzer and its rule catalog, the background quality pass,
//! the dynamic flash detector with its render loop, and the hybrid policy that
//! fuses both phases into one disposition per file.
//!
//! All substantive logic lives here so it is fully testable and reusable from
//! multiple frontends (CLI, batch drivers, etc.).

pub mod analysis;
pub mod ast;
pub mod config;
pub mod dynamic;
pub mod hybrid;
pub mod lexer;
pub mod parser;
pub mod report;
pub mod rules;
pub mod scan;

/// Returns the library version as encoded at compile time.
///
/// Useful for tests and for frontends to report consistent version info.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
