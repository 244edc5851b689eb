use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::ast::{BinOp, Node};
use crate::rules::{self, ids, RiskEvent, SafetyRegistry};

/// Angular frequency above which `sin`/`cos` count as high frequency
/// (18 rad/s, about 2.86 Hz).
pub const HIGH_FREQ_THRESHOLD: f64 = 18.0;

/// Assignment targets that drive on-screen colour.
pub const COLOR_VARS: &[&str] =
    &["ob_r", "ob_g", "ob_b", "wave_r", "wave_g", "wave_b", "gl_FragColor", "ret"];

/// Assignment targets that drive geometry/motion.
pub const MOTION_VARS: &[&str] = &["rot", "zoom", "warp", "cx", "cy", "dx", "dy", "sx", "sy"];

const STEP_FUNCTIONS: &[&str] = &["step", "fract", "ceil", "floor"];

/// Dataflow fact for one expression or variable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaintState {
    pub is_time_dep: bool,
    pub freq: f64,
    pub hard_edge: bool,
    /// Provenance tag, e.g. `tan` or the step function that produced it.
    pub source: String,
}

impl TaintState {
    pub fn time(freq: f64) -> Self {
        Self { is_time_dep: true, freq, ..Self::default() }
    }

    fn hard_edge_from(source: &str) -> Self {
        Self { is_time_dep: true, hard_edge: true, source: source.to_string(), ..Self::default() }
    }
}

/// Single forward pass over a program.
///
/// The symbol table is one flat map: there is no block scoping, so a variable
/// assigned inside a nested block stays visible (and overwritable) for the
/// rest of the program. Last write wins.
pub struct SafetyAnalyzer<'r> {
    registry: &'r SafetyRegistry,
    source_type: String,
    symbols: HashMap<String, TaintState>,
    pub events: Vec<RiskEvent>,
}

impl SafetyAnalyzer<'static> {
    /// Analyzer backed by the built-in rule catalog.
    pub fn new(source_type: impl Into<String>) -> Self {
        Self::with_registry(rules::registry(), source_type)
    }
}

impl Default for SafetyAnalyzer<'static> {
    fn default() -> Self {
        Self::new("CPU")
    }
}

impl<'r> SafetyAnalyzer<'r> {
    pub fn with_registry(registry: &'r SafetyRegistry, source_type: impl Into<String>) -> Self {
        let mut symbols = HashMap::new();
        symbols.insert("time".to_string(), TaintState::time(1.0));
        symbols.insert(
            "frame".to_string(),
            TaintState { is_time_dep: true, hard_edge: true, ..TaintState::default() },
        );
        Self { registry, source_type: source_type.into(), symbols, events: Vec::new() }
    }

    pub fn source_type(&self) -> &str {
        &self.source_type
    }

    /// Current fact for `name`; unbound names are not time dependent.
    pub fn get_taint(&self, name: &str) -> TaintState {
        self.symbols.get(name).cloned().unwrap_or_default()
    }

    /// Walk statements. Expressions are only reached through assignments.
    pub fn analyze(&mut self, node: &Node) {
        match node {
            Node::Program { statements, .. } | Node::Block { statements, .. } => {
                for stmt in statements {
                    self.analyze(stmt);
                }
            }
            Node::Assignment { .. } => {
                self.visit_assignment(node);
            }
            _ => {}
        }
    }

    /// Consume the analyzer, returning the events in emission order.
    pub fn into_events(self) -> Vec<RiskEvent> {
        self.events
    }

    fn emit(&mut self, rule_id: &str, context: String, line: u32, variables: Vec<String>) {
        let event =
            self.registry.create_event(rule_id, context, line, variables, &self.source_type);
        tracing::debug!(rule = rule_id, line, source = %self.source_type, "rule fired");
        self.events.push(event);
    }

    /// Infer the dataflow fact for an expression.
    pub fn visit(&mut self, node: &Node) -> TaintState {
        match node {
            Node::Literal { .. } => TaintState::default(),
            Node::Identifier { name, .. } => self.get_taint(name),
            Node::BinaryOp { left, op, right, .. } => self.visit_binary(left, *op, right),
            Node::FunctionCall { line, name, args } => self.visit_call(*line, name, args),
            Node::MemberAccess { expr, .. } => self.visit(expr),
            Node::Program { .. } | Node::Block { .. } | Node::Assignment { .. } => {
                TaintState::default()
            }
        }
    }

    fn visit_binary(&mut self, left: &Node, op: BinOp, right: &Node) -> TaintState {
        let l = self.visit(left);
        let r = self.visit(right);

        let mut freq = l.freq.max(r.freq);
        // `time * k` scales the angular frequency by k.
        if op == BinOp::Mul {
            if let (true, Node::Literal { value, .. }) = (l.is_time_dep, right) {
                freq = l.freq * value;
            } else if let (true, Node::Literal { value, .. }) = (r.is_time_dep, left) {
                freq = r.freq * value;
            }
        }

        TaintState {
            is_time_dep: l.is_time_dep || r.is_time_dep,
            freq,
            hard_edge: l.hard_edge || r.hard_edge,
            source: String::new(),
        }
    }

    fn visit_call(&mut self, line: u32, name: &str, args: &[Node]) -> TaintState {
        let states: Vec<TaintState> = args.iter().map(|a| self.visit(a)).collect();
        let primary = states.into_iter().next().unwrap_or_default();

        match name {
            "sin" | "cos" => {
                if primary.freq > HIGH_FREQ_THRESHOLD {
                    self.emit(
                        ids::HIGH_FREQ_OSC,
                        format!("{name}(freq={:.1})", primary.freq),
                        line,
                        vec![name.to_string()],
                    );
                }
                TaintState {
                    is_time_dep: primary.is_time_dep,
                    freq: primary.freq,
                    ..TaintState::default()
                }
            }
            "tan" => TaintState::hard_edge_from("tan"),
            _ if STEP_FUNCTIONS.contains(&name) => {
                if primary.is_time_dep {
                    self.emit(
                        ids::STEP_FUNCTION,
                        format!("{name}() on time"),
                        line,
                        vec![name.to_string()],
                    );
                }
                TaintState::hard_edge_from(name)
            }
            _ => primary,
        }
    }

    /// Analyze one assignment: infer the right-hand side, run the pattern
    /// checks, then overwrite the target's symbol entry.
    pub fn visit_assignment(&mut self, node: &Node) -> TaintState {
        let Node::Assignment { line, target, expr, .. } = node else {
            return TaintState::default();
        };
        let line = *line;
        let state = self.visit(expr);

        if let Node::BinaryOp { op, right, .. } = expr.as_ref() {
            match (op, right.as_ref()) {
                // x = <anything> - x
                (BinOp::Sub, Node::Identifier { name, .. }) if name == target => {
                    self.emit(
                        ids::INVERTER_STROBE,
                        format!("{target} = 1 - {target}"),
                        line,
                        vec![target.clone()],
                    );
                }
                (BinOp::Mod, Node::Literal { value, .. }) if *value < 4.0 => {
                    self.emit(
                        ids::FRAME_MODULO,
                        format!("Modulo {value:?}"),
                        line,
                        vec![target.clone()],
                    );
                }
                _ => {}
            }
        }

        if state.source == "tan" {
            if COLOR_VARS.contains(&target.as_str()) {
                self.emit(ids::TAN_COLOR, format!("Tan -> {target}"), line, vec![target.clone()]);
            }
            if MOTION_VARS.contains(&target.as_str()) {
                self.emit(ids::TAN_MOTION, format!("Tan -> {target}"), line, vec![target.clone()]);
            }
        }

        self.symbols.insert(target.clone(), state.clone());
        state
    }
}
