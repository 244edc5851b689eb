//! EARL / JSON-LD serialization of hybrid scan results.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde_json::{json, Value};

use crate::hybrid::{Disposition, HybridReport};
use crate::rules::RiskEvent;

pub const TOOL_ID: &str = "urn:uuid:e8b2b7a0-0000-4000-8000-pes-hybrid-v1";
pub const TOOL_TITLE: &str = "PES Hybrid Scanner";
pub const EARL_NS: &str = "http://www.w3.org/ns/earl#";
pub const PES_NS: &str = "urn:pes:rules#";

fn error_entry(event: &RiskEvent) -> Value {
    json!({
        "rule": event.rule_id,
        "level": event.risk_level,
        "description": event.context,
        "line": event.line,
    })
}

/// Build one EARL assertion per report, preceded by the tool node.
///
/// With `include_details`, each result carries a `pes:errors` list covering
/// static then dynamic events.
pub fn generate_earl(reports: &[HybridReport], include_details: bool) -> Value {
    let mut graph = vec![json!({
        "@id": TOOL_ID,
        "@type": ["earl:Software", "earl:Assertor"],
        "dct:title": TOOL_TITLE,
        "dct:hasVersion": crate::version(),
    })];

    for report in reports {
        let outcome = if report.final_disposition == Disposition::Pass {
            "earl:passed"
        } else {
            "earl:failed"
        };
        let mut result = json!({
            "@type": "earl:TestResult",
            "earl:outcome": outcome,
            "pes:disposition": report.final_disposition,
            "pes:staticErrors": report.static_events.len(),
            "pes:dynamicErrors": report.dynamic_events.len(),
        });
        if include_details {
            result["pes:errors"] = report.all_events().map(error_entry).collect();
        }

        graph.push(json!({
            "@type": "earl:Assertion",
            "earl:assertedBy": TOOL_ID,
            "earl:subject": { "@id": format!("file://{}", report.filepath) },
            "earl:result": result,
        }));
    }

    json!({
        "@context": {
            "earl": EARL_NS,
            "pes": PES_NS,
            "dct": "http://purl.org/dc/terms/",
        },
        "dct:date": Utc::now().to_rfc3339(),
        "@graph": graph,
    })
}

/// Write an EARL document as pretty-printed JSON.
pub fn write_earl(path: &Path, document: &Value) -> Result<()> {
    let body =
        serde_json::to_string_pretty(document).context("Failed to serialize EARL report")?;
    fs::write(path, body)
        .with_context(|| format!("Failed to write report to {}", path.display()))?;
    Ok(())
}
