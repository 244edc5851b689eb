//! Static analysis passes over a parsed preset.
//!
//! - [`taint`]: forward dataflow over time-dependence, frequency and hard
//!   edges; emits risk events.
//! - [`quality`]: background colour classification (informational only).

pub mod quality;
pub mod taint;

pub use quality::{BackgroundType, QualityAnalyzer, QualityReport};
pub use taint::{SafetyAnalyzer, TaintState};
