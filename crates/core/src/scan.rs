//! Static scan orchestration: lex, parse and analyze the root preset text,
//! then each embedded shader program.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::analysis::{QualityAnalyzer, QualityReport, SafetyAnalyzer};
use crate::parser::parse_source;
use crate::rules::{RiskEvent, SafetyRegistry};

/// Shader kinds extracted from a preset, in extraction order.
pub const SHADER_KINDS: &[&str] = &["warp", "comp"];

/// Result of a static scan of one file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StaticScan {
    /// CPU events first, then each shader's events in extraction order.
    pub events: Vec<RiskEvent>,
    /// `// Expect: Rule=Count` annotations, used by verification tooling.
    pub metadata: BTreeMap<String, i64>,
    pub quality: QualityReport,
}

/// Parse `// Expect: RuleID=Count, RuleID2=Count2` comment lines.
///
/// A count that is not an integer stops parsing of that line; pairs before
/// it are kept.
pub fn parse_metadata(code: &str) -> BTreeMap<String, i64> {
    let mut metadata = BTreeMap::new();
    for line in code.lines().map(str::trim) {
        if !line.starts_with("//") {
            continue;
        }
        let Some((_, content)) = line.split_once("Expect:") else {
            continue;
        };
        for part in content.split(',') {
            let Some((key, value)) = part.split_once('=') else {
                continue;
            };
            match value.trim().parse::<i64>() {
                Ok(count) => {
                    metadata.insert(key.trim().to_string(), count);
                }
                Err(_) => break,
            }
        }
    }
    metadata
}

fn shader_patterns() -> &'static [(&'static str, Regex)] {
    static PATTERNS: OnceLock<Vec<(&'static str, Regex)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        SHADER_KINDS
            .iter()
            .filter_map(|kind| {
                Regex::new(&format!(r#"(?s){kind}_shader\s*=\s*"(.*?)";"#))
                    .ok()
                    .map(|re| (*kind, re))
            })
            .collect()
    })
}

/// Extract embedded `warp_shader = "...";` / `comp_shader = "...";` bodies,
/// unescaping `\"` and literal `\n`. Only the first body of each kind counts.
pub fn extract_shaders(code: &str) -> Vec<(String, String)> {
    shader_patterns()
        .iter()
        .filter_map(|(kind, re)| {
            let body = re.captures(code)?.get(1)?.as_str();
            Some((kind.to_string(), body.replace("\\\"", "\"").replace("\\n", "\n")))
        })
        .collect()
}

/// Read a preset as UTF-8, dropping undecodable bytes.
pub fn read_preset(path: &Path) -> std::io::Result<String> {
    let bytes = fs::read(path)?;
    let mut text = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid());
    }
    Ok(text)
}

/// Run the safety and quality passes over in-memory preset text.
pub fn scan_source(code: &str, registry: &SafetyRegistry) -> StaticScan {
    let metadata = parse_metadata(code);

    let ast = parse_source(code);
    let mut cpu = SafetyAnalyzer::with_registry(registry, "CPU");
    cpu.analyze(&ast);
    let mut events = cpu.into_events();
    tracing::debug!(events = events.len(), "CPU analysis complete");

    let mut quality = QualityAnalyzer::new();
    quality.analyze(&ast);
    let quality = quality.generate_report();

    for (kind, body) in extract_shaders(code) {
        if body.trim().is_empty() {
            continue;
        }
        let shader_ast = parse_source(&body);
        let mut gpu = SafetyAnalyzer::with_registry(registry, format!("GPU:{kind}"));
        gpu.analyze(&shader_ast);
        tracing::debug!(shader = %kind, events = gpu.events.len(), "shader analysis complete");
        events.extend(gpu.into_events());
    }

    StaticScan { events, metadata, quality }
}

/// Static scan of a file against the built-in rule catalog.
///
/// An unreadable file yields an empty scan rather than an error.
pub fn scan_static(path: impl AsRef<Path>) -> StaticScan {
    scan_static_with(path, crate::rules::registry())
}

pub fn scan_static_with(path: impl AsRef<Path>, registry: &SafetyRegistry) -> StaticScan {
    let path = path.as_ref();
    match read_preset(path) {
        Ok(code) => scan_source(&code, registry),
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "failed to read preset");
            StaticScan::default()
        }
    }
}
