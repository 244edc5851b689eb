pub mod commands;

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter (e.g. `debug`, `vizscan_core=trace`).
pub const LOG_ENV: &str = "VIZSCAN_LOG";

/// Install the stderr log subscriber. `verbose` raises the default level to
/// `debug`; an explicit `VIZSCAN_LOG` always wins. Safe to call repeatedly.
pub fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Resolve a possibly relative path against the current working directory.
pub fn absolutize(path: &str) -> Result<PathBuf> {
    let path = Path::new(path);
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = env::current_dir().context("Failed to get current directory")?;
    Ok(cwd.join(path))
}

/// Collect the preset files to scan under `path`.
///
/// A file is always scanned as-is. A directory contributes files whose
/// extension passes `keep`, walking subdirectories only when `recursive` is
/// set. Symlinked files are included; symlinked directories are not entered.
/// Anything else (e.g. a missing path) yields no files. Only an unreadable
/// root is an error: nested directories and entries that cannot be read are
/// logged and skipped. Results are sorted for stable output.
pub fn collect_preset_files(
    path: &Path,
    recursive: bool,
    keep: &dyn Fn(&Path) -> bool,
) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    if path.is_file() {
        files.push(path.to_path_buf());
    } else if path.is_dir() {
        let entries =
            fs::read_dir(path).with_context(|| format!("Failed to read {}", path.display()))?;
        walk_entries(entries, recursive, keep, &mut files);
        files.sort();
    }
    Ok(files)
}

/// Open a nested directory for walking, logging and returning `None` when it
/// cannot be read.
pub fn read_subdir(dir: &Path) -> Option<fs::ReadDir> {
    match fs::read_dir(dir) {
        Ok(entries) => Some(entries),
        Err(err) => {
            tracing::warn!(path = %dir.display(), error = %err, "skipping unreadable directory");
            None
        }
    }
}

fn walk_entries(
    entries: fs::ReadDir,
    recursive: bool,
    keep: &dyn Fn(&Path) -> bool,
    files: &mut Vec<PathBuf>,
) {
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!(error = %err, "skipping unreadable directory entry");
                continue;
            }
        };
        let entry_path = entry.path();
        let is_link = entry.file_type().map(|t| t.is_symlink()).unwrap_or(false);

        if entry_path.is_dir() {
            if recursive && !is_link {
                if let Some(children) = read_subdir(&entry_path) {
                    walk_entries(children, recursive, keep, files);
                }
            }
        } else if entry_path.is_file() && keep(&entry_path) {
            files.push(entry_path);
        }
    }
}

/// File name for display, falling back to the full path.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .and_then(|os| os.to_str())
        .map(|s| s.to_string())
        .unwrap_or_else(|| path.display().to_string())
}
