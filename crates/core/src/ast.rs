//! Syntax tree for presets and embedded shader programs.
//!
//! The root [`Node::Program`] owns every descendant; nodes are never shared.
//! Each node records the source line it started on.

use serde::{Deserialize, Serialize};

/// Arithmetic operator. The parser gives all of them equal precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
}

impl BinOp {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "+" => Some(BinOp::Add),
            "-" => Some(BinOp::Sub),
            "*" => Some(BinOp::Mul),
            "/" => Some(BinOp::Div),
            "%" => Some(BinOp::Mod),
            "^" => Some(BinOp::Pow),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
            BinOp::Pow => "^",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum Node {
    Program {
        line: u32,
        statements: Vec<Node>,
    },
    Block {
        line: u32,
        statements: Vec<Node>,
    },
    /// `target = expr;` or a typed declaration (`float target = expr;`).
    Assignment {
        line: u32,
        target: String,
        expr: Box<Node>,
        is_decl: bool,
    },
    BinaryOp {
        line: u32,
        left: Box<Node>,
        op: BinOp,
        right: Box<Node>,
    },
    FunctionCall {
        line: u32,
        name: String,
        args: Vec<Node>,
    },
    Literal {
        line: u32,
        value: f64,
    },
    Identifier {
        line: u32,
        name: String,
    },
    /// Swizzle or field access (`col.rgb`).
    MemberAccess {
        line: u32,
        expr: Box<Node>,
        member: String,
    },
}

impl Node {
    pub fn line(&self) -> u32 {
        match self {
            Node::Program { line, .. }
            | Node::Block { line, .. }
            | Node::Assignment { line, .. }
            | Node::BinaryOp { line, .. }
            | Node::FunctionCall { line, .. }
            | Node::Literal { line, .. }
            | Node::Identifier { line, .. }
            | Node::MemberAccess { line, .. } => *line,
        }
    }

    pub fn literal(line: u32, value: f64) -> Self {
        Node::Literal { line, value }
    }

    pub fn identifier(line: u32, name: impl Into<String>) -> Self {
        Node::Identifier { line, name: name.into() }
    }

    pub fn binary(left: Node, op: BinOp, right: Node) -> Self {
        Node::BinaryOp { line: left.line(), left: Box::new(left), op, right: Box::new(right) }
    }

    pub fn call(line: u32, name: impl Into<String>, args: Vec<Node>) -> Self {
        Node::FunctionCall { line, name: name.into(), args }
    }

    pub fn assignment(line: u32, target: impl Into<String>, expr: Node) -> Self {
        Node::Assignment { line, target: target.into(), expr: Box::new(expr), is_decl: false }
    }

    pub fn member(line: u32, expr: Node, member: impl Into<String>) -> Self {
        Node::MemberAccess { line, expr: Box::new(expr), member: member.into() }
    }

    /// Statements of a `Program` or `Block`; empty for every other kind.
    pub fn statements(&self) -> &[Node] {
        match self {
            Node::Program { statements, .. } | Node::Block { statements, .. } => statements,
            _ => &[],
        }
    }
}
