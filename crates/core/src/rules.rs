//! Rule catalog: named flash-risk rules with severities, scores and
//! regulatory citations.
//!
//! The built-in catalog is registered once (see [`registry`]) and only read
//! afterwards, so it can be shared across any number of concurrent scans.

use std::fmt;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

/// Ordered severity: `Info < Warning < Critical < Ban`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Info,
    Warning,
    Critical,
    Ban,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Info => "INFO",
            RiskLevel::Warning => "WARNING",
            RiskLevel::Critical => "CRITICAL",
            RiskLevel::Ban => "BAN",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A regulatory or guideline reference backing a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    pub name: String,
    pub url: String,
}

impl Citation {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self { name: name.into(), url: url.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleDefinition {
    pub id: String,
    pub name: String,
    pub description: String,
    pub base_score: u32,
    pub level: RiskLevel,
    pub citations: Vec<Citation>,
}

/// A single finding, static or dynamic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskEvent {
    pub rule_id: String,
    pub risk_level: RiskLevel,
    pub score: u32,
    pub context: String,
    pub line: u32,
    pub variables: Vec<String>,
    /// `CPU`, `GPU:<shader>` or `Dynamic`.
    pub source_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timecode: Option<f64>,
}

/// One catalog entry as exposed for `--help-scoring` style introspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OntologyEntry {
    #[serde(rename = "@id")]
    pub id: String,
    #[serde(rename = "dct:title")]
    pub title: String,
    #[serde(rename = "dct:description")]
    pub description: String,
    #[serde(rename = "pes:score")]
    pub score: u32,
    #[serde(rename = "pes:level")]
    pub level: RiskLevel,
    #[serde(rename = "pes:reasons")]
    pub reasons: Vec<Citation>,
}

/// Mapping from rule id to definition, kept in registration order.
#[derive(Debug, Clone, Default)]
pub struct SafetyRegistry {
    rules: Vec<RuleDefinition>,
}

impl SafetyRegistry {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Install a rule. Registering an existing id replaces it in place.
    pub fn register(
        &mut self,
        id: &str,
        name: &str,
        description: &str,
        base_score: u32,
        level: RiskLevel,
        citations: Vec<Citation>,
    ) -> &mut Self {
        let rule = RuleDefinition {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            base_score,
            level,
            citations,
        };
        match self.rules.iter_mut().find(|r| r.id == id) {
            Some(existing) => *existing = rule,
            None => self.rules.push(rule),
        }
        self
    }

    pub fn get(&self, id: &str) -> Option<&RuleDefinition> {
        self.rules.iter().find(|r| r.id == id)
    }

    pub fn rules(&self) -> &[RuleDefinition] {
        &self.rules
    }

    /// Stamp an event for `rule_id`. Unknown ids degrade to a zero-score
    /// `INFO` event.
    pub fn create_event(
        &self,
        rule_id: &str,
        context: impl Into<String>,
        line: u32,
        variables: Vec<String>,
        source_type: &str,
    ) -> RiskEvent {
        let (risk_level, score) =
            self.get(rule_id).map(|r| (r.level, r.base_score)).unwrap_or((RiskLevel::Info, 0));
        RiskEvent {
            rule_id: rule_id.to_string(),
            risk_level,
            score,
            context: context.into(),
            line,
            variables,
            source_type: source_type.to_string(),
            timecode: None,
        }
    }

    pub fn export_ontology(&self) -> Vec<OntologyEntry> {
        self.rules
            .iter()
            .map(|r| OntologyEntry {
                id: format!("pes:{}", r.id),
                title: r.name.clone(),
                description: r.description.clone(),
                score: r.base_score,
                level: r.level,
                reasons: r.citations.clone(),
            })
            .collect()
    }
}

pub mod ids {
    pub const INVERTER_STROBE: &str = "InverterStrobe";
    pub const FRAME_MODULO: &str = "FrameModulo";
    pub const HIGH_FREQ_OSC: &str = "HighFreqOsc";
    pub const TAN_COLOR: &str = "TanColor";
    pub const TAN_MOTION: &str = "TanMotion";
    pub const STEP_FUNCTION: &str = "StepFunction";
    /// Emitted by the flash detector; not part of the static catalog.
    pub const DYNAMIC_STROBE: &str = "DynamicStrobe";
}

const ITU_BT1702_URL: &str = "https://www.itu.int/rec/R-REC-BT.1702/en";
const WCAG_FLASH_URL: &str = "https://www.w3.org/TR/WCAG21/#three-flashes-or-below-threshold";

/// Build a registry holding the six built-in rules.
pub fn builtin_registry() -> SafetyRegistry {
    let mut registry = SafetyRegistry::new();
    registry
        .register(
            ids::INVERTER_STROBE,
            "Hard Strobe",
            "val = 1 - val (30Hz strobe)",
            150,
            RiskLevel::Ban,
            vec![Citation::new(
                "ITU-R BT.1702 (rapid alternating light/dark frames exceeding safe flash threshold)",
                ITU_BT1702_URL,
            )],
        )
        .register(
            ids::FRAME_MODULO,
            "Frame Modulo",
            "frame % N (Rapid flicker)",
            100,
            RiskLevel::Critical,
            vec![
                Citation::new("ITU-R BT.1702", ITU_BT1702_URL),
                Citation::new("WCAG 2.1 General Flash Threshold (>3Hz)", WCAG_FLASH_URL),
            ],
        )
        .register(
            ids::HIGH_FREQ_OSC,
            "High Frequency",
            "Oscillation > 3Hz",
            40,
            RiskLevel::Warning,
            vec![
                Citation::new("ITU-R BT.1702", ITU_BT1702_URL),
                Citation::new("WCAG 2.1 General Flash Threshold", WCAG_FLASH_URL),
            ],
        )
        .register(
            ids::TAN_COLOR,
            "Tangent Color",
            "Tan() on color (Flash Risk)",
            60,
            RiskLevel::Critical,
            vec![Citation::new(
                "ITU-R BT.1702 (high-contrast luminance transitions)",
                ITU_BT1702_URL,
            )],
        )
        .register(
            ids::TAN_MOTION,
            "Tangent Motion",
            "Tan() on geometry (Disorientation Risk)",
            30,
            RiskLevel::Warning,
            vec![Citation::new(
                "ITU-R BT.1702 (provocative spatial patterns and disorientation)",
                ITU_BT1702_URL,
            )],
        )
        .register(
            ids::STEP_FUNCTION,
            "Hard Step Edge",
            "Step/Fract function creating instant on/off",
            50,
            RiskLevel::Warning,
            vec![Citation::new(
                "ITU-R BT.1702 (high-contrast luminance transitions)",
                ITU_BT1702_URL,
            )],
        );
    registry
}

/// Process-wide built-in registry, initialized on first use.
pub fn registry() -> &'static SafetyRegistry {
    static REGISTRY: OnceLock<SafetyRegistry> = OnceLock::new();
    REGISTRY.get_or_init(builtin_registry)
}

/// Render an event as `[LEVEL] <source> Line <n>: <context>`.
pub fn format_event(event: &RiskEvent) -> String {
    format!("[{}] {} Line {}: {}", event.risk_level, event.source_type, event.line, event.context)
}
