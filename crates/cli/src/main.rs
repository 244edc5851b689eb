use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use vizscan::commands::{help_scoring_command, scan_command, ScanOverrides};

/// Hybrid static/dynamic photosensitive-epilepsy scanner for visualizer presets.
///
/// This CLI is a thin wrapper around `vizscan-core` (exposed in code as
/// `vizscan_core`). All analysis lives in the library.
#[derive(Parser, Debug)]
#[command(
    name = "vizscan",
    version,
    about = "Hybrid Static/Dynamic Epilepsy Scanner",
    long_about = None
)]
struct Cli {
    /// File or directory to scan.
    path: Option<String>,

    /// Enable the rendering (dynamic) test.
    #[arg(long, default_value_t = false)]
    enable_dynamic: bool,

    /// Render duration in seconds.
    #[arg(long)]
    duration: Option<u32>,

    /// Simulation frames per second.
    #[arg(long)]
    fps: Option<u32>,

    /// Path of the EARL/JSON-LD report.
    #[arg(short, long)]
    output: Option<String>,

    /// Recursively scan directories.
    #[arg(long, default_value_t = false)]
    recursive: bool,

    /// Print the full rules ontology and exit.
    #[arg(long, default_value_t = false)]
    help_scoring: bool,

    /// Include quality scoring in output.
    #[arg(long, default_value_t = false)]
    score_quality: bool,

    /// List every finding per file and include them in the report.
    #[arg(long, default_value_t = false)]
    details: bool,

    /// Optional scan config (JSON or YAML).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Debug-level logging on stderr (overridden by VIZSCAN_LOG).
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    vizscan::init_tracing(cli.verbose);

    if cli.help_scoring {
        help_scoring_command()?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(path) = cli.path.as_deref() else {
        Cli::command().print_help()?;
        return Ok(ExitCode::FAILURE);
    };

    let overrides = ScanOverrides {
        config: cli.config.clone(),
        enable_dynamic: cli.enable_dynamic,
        duration: cli.duration,
        fps: cli.fps,
        output: cli.output.clone(),
        score_quality: cli.score_quality,
        details: cli.details,
    };
    let config = overrides.resolve()?;

    let summary = scan_command(path, cli.recursive, &config)?;
    if summary.any_failed() {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
