//! Hybrid policy: fuse static and dynamic findings into one disposition.
//!
//! 1. The static scan always runs.
//! 2. Any `BAN` static event fails the file and skips rendering entirely.
//! 3. Otherwise, if enabled, the dynamic scan runs; any dynamic event fails
//!    the file.
//! 4. A file still at `PASS` with any event from either phase becomes `WARN`.
//!
//! A `CRITICAL` static event on its own therefore yields `WARN`, not `FAIL`.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::analysis::QualityReport;
use crate::dynamic::{scan_dynamic, MockRenderer, RenderStats, Renderer};
use crate::rules::{RiskEvent, RiskLevel};
use crate::scan::scan_static;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Disposition {
    #[default]
    Pass,
    Warn,
    Fail,
}

impl Disposition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Disposition::Pass => "PASS",
            Disposition::Warn => "WARN",
            Disposition::Fail => "FAIL",
        }
    }
}

impl fmt::Display for Disposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caller-controlled knobs for a hybrid scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HybridOptions {
    pub enable_dynamic: bool,
    /// Render duration in seconds.
    pub duration: u32,
    pub fps: u32,
}

impl Default for HybridOptions {
    fn default() -> Self {
        Self { enable_dynamic: false, duration: 5, fps: 60 }
    }
}

/// Per-file outcome of a hybrid scan.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HybridReport {
    pub filepath: String,
    pub static_events: Vec<RiskEvent>,
    pub dynamic_events: Vec<RiskEvent>,
    pub final_disposition: Disposition,
    /// Present only when the dynamic phase ran.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub render_stats: Option<RenderStats>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality_report: Option<QualityReport>,
}

impl HybridReport {
    pub fn new(filepath: impl Into<String>) -> Self {
        Self { filepath: filepath.into(), ..Self::default() }
    }

    /// Static events followed by dynamic events.
    pub fn all_events(&self) -> impl Iterator<Item = &RiskEvent> {
        self.static_events.iter().chain(self.dynamic_events.iter())
    }
}

/// Hybrid scan using the reference [`MockRenderer`] for the dynamic phase.
pub fn run_hybrid(path: impl AsRef<Path>, options: &HybridOptions) -> HybridReport {
    run_hybrid_with(path, options, &mut MockRenderer::new())
}

pub fn run_hybrid_with(
    path: impl AsRef<Path>,
    options: &HybridOptions,
    renderer: &mut dyn Renderer,
) -> HybridReport {
    let path = path.as_ref();
    let filepath = path.display().to_string();
    let mut report = HybridReport::new(filepath.clone());

    let scan = scan_static(path);
    report.static_events = scan.events;
    report.quality_report = Some(scan.quality);

    // Static BAN findings are trusted; skip the render.
    let banned = report.static_events.iter().any(|e| e.risk_level == RiskLevel::Ban);
    if banned {
        report.final_disposition = Disposition::Fail;
    } else if options.enable_dynamic {
        let dynamic = scan_dynamic(renderer, &filepath, options.duration, options.fps);
        report.dynamic_events = dynamic.events;
        report.render_stats = Some(dynamic.stats);
        if !report.dynamic_events.is_empty() {
            report.final_disposition = Disposition::Fail;
        }
    }

    if report.final_disposition == Disposition::Pass
        && (!report.static_events.is_empty() || !report.dynamic_events.is_empty())
    {
        report.final_disposition = Disposition::Warn;
    }

    tracing::info!(
        path = %filepath,
        disposition = %report.final_disposition,
        static_events = report.static_events.len(),
        dynamic_events = report.dynamic_events.len(),
        "hybrid scan complete"
    );
    report
}
