use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use vizscan_core::config::{load_scan_config, ScanConfig};
use vizscan_core::hybrid::{run_hybrid, Disposition, HybridReport};
use vizscan_core::report::{generate_earl, write_earl};
use vizscan_core::rules::format_event;

use crate::{absolutize, collect_preset_files, display_name};

/// Command-line values that override the loaded [`ScanConfig`].
#[derive(Debug, Clone, Default)]
pub struct ScanOverrides {
    pub config: Option<PathBuf>,
    pub enable_dynamic: bool,
    pub duration: Option<u32>,
    pub fps: Option<u32>,
    pub output: Option<String>,
    pub score_quality: bool,
    pub details: bool,
}

impl ScanOverrides {
    /// Load the config file (if any) and apply the flags on top of it.
    pub fn resolve(&self) -> Result<ScanConfig> {
        let mut config = match &self.config {
            Some(path) => load_scan_config(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => ScanConfig::default(),
        };
        config.enable_dynamic |= self.enable_dynamic;
        config.score_quality |= self.score_quality;
        config.include_details |= self.details;
        if let Some(duration) = self.duration {
            config.duration = duration;
        }
        if let Some(fps) = self.fps {
            config.fps = fps;
        }
        if let Some(output) = &self.output {
            config.output = output.clone();
        }
        config.validate()?;
        Ok(config)
    }
}

/// Outcome of a batch scan.
#[derive(Debug)]
pub struct ScanSummary {
    pub reports: Vec<HybridReport>,
    pub report_path: PathBuf,
}

impl ScanSummary {
    pub fn any_failed(&self) -> bool {
        self.reports.iter().any(|r| r.final_disposition == Disposition::Fail)
    }
}

/// Scan one file with the hybrid policy. A panic inside the analysis is
/// reported as an error for this file only.
fn scan_one(path: &Path, config: &ScanConfig) -> Result<HybridReport> {
    let options = config.hybrid_options();
    panic::catch_unwind(AssertUnwindSafe(|| run_hybrid(path, &options))).map_err(|payload| {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "analysis panicked".to_string());
        tracing::error!(path = %path.display(), "scan panicked");
        anyhow::anyhow!(message)
    })
}

/// Scan a file or directory, print per-file dispositions and write the EARL
/// report.
pub fn scan_command(path: &str, recursive: bool, config: &ScanConfig) -> Result<ScanSummary> {
    let root = absolutize(path)?;
    let files = collect_preset_files(&root, recursive, &|p: &Path| config.matches_extension(p))?;

    println!("Scanning {} files...", files.len());

    let mut reports = Vec::new();
    for file in &files {
        match scan_one(file, config) {
            Ok(report) => {
                println!("[{}] {}", report.final_disposition, display_name(file));
                if config.score_quality {
                    if let Some(quality) = &report.quality_report {
                        println!("  Quality (Static): {}", quality.background_type.as_str());
                    }
                }
                if config.include_details {
                    for event in report.all_events() {
                        println!("    {}", format_event(event));
                    }
                }
                reports.push(report);
            }
            Err(err) => println!("  -> ERROR: {err}"),
        }
    }

    let report_path = absolutize(&config.output)?;
    let document = generate_earl(&reports, config.include_details);
    write_earl(&report_path, &document)?;
    println!();
    println!("Report written to {}", config.output);

    Ok(ScanSummary { reports, report_path })
}
