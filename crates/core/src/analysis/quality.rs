//! Background colour classification from literal `ob_r`/`ob_g`/`ob_b`
//! assignments. Purely informational; never produces risk events.

use serde::{Deserialize, Serialize};

use crate::ast::Node;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BackgroundType {
    #[default]
    Unknown,
    Dark,
    Medium,
    Light,
    Dynamic,
}

impl BackgroundType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackgroundType::Unknown => "Unknown",
            BackgroundType::Dark => "Dark",
            BackgroundType::Medium => "Medium",
            BackgroundType::Light => "Light",
            BackgroundType::Dynamic => "Dynamic",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QualityReport {
    pub background_type: BackgroundType,
    pub avg_brightness_est: f64,
    pub is_grayscale: bool,
    pub attributes: Vec<String>,
}

/// Rec. 709 relative luminance.
pub fn luminance(r: f64, g: f64, b: f64) -> f64 {
    0.2126 * r + 0.7152 * g + 0.0722 * b
}

#[derive(Debug, Default)]
pub struct QualityAnalyzer {
    bg_color: [Option<f64>; 3],
    /// Sticky: once any channel is bound to a non-literal it stays set.
    is_dynamic_bg: bool,
}

impl QualityAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn analyze(&mut self, node: &Node) {
        match node {
            Node::Program { statements, .. } | Node::Block { statements, .. } => {
                for stmt in statements {
                    self.analyze(stmt);
                }
            }
            Node::Assignment { .. } => self.visit_assignment(node),
            _ => {}
        }
    }

    pub fn visit_assignment(&mut self, node: &Node) {
        let Node::Assignment { target, expr, .. } = node else {
            return;
        };
        let channel = match target.as_str() {
            "ob_r" => 0,
            "ob_g" => 1,
            "ob_b" => 2,
            _ => return,
        };
        match expr.as_ref() {
            Node::Literal { value, .. } => self.bg_color[channel] = Some(*value),
            _ => self.is_dynamic_bg = true,
        }
    }

    /// Literal value recorded for a channel (`'r'`, `'g'` or `'b'`).
    pub fn channel(&self, channel: char) -> Option<f64> {
        match channel {
            'r' => self.bg_color[0],
            'g' => self.bg_color[1],
            'b' => self.bg_color[2],
            _ => None,
        }
    }

    pub fn generate_report(&self) -> QualityReport {
        let mut report = QualityReport::default();

        if self.is_dynamic_bg {
            report.background_type = BackgroundType::Dynamic;
            report.attributes.push("Dynamic Background".to_string());
            return report;
        }

        if let [Some(r), Some(g), Some(b)] = self.bg_color {
            let lum = luminance(r, g, b);
            report.avg_brightness_est = lum;
            report.is_grayscale = r == g && g == b;
            if lum < 0.1 {
                report.background_type = BackgroundType::Dark;
                report.attributes.push("Dark Background".to_string());
            } else if lum > 0.9 {
                report.background_type = BackgroundType::Light;
                report.attributes.push("Light Background".to_string());
            } else {
                report.background_type = BackgroundType::Medium;
            }
        }

        report
    }
}
