//! Tokenizer for the preset expression language.
//!
//! Rules are tried in order at each position and the first match wins. The
//! final rule matches any single character, so tokenizing always consumes the
//! whole input. Characters nothing else recognizes come out as
//! [`TokenKind::Mismatch`] tokens; the parser skips them during recovery.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Token classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenKind {
    Comment,
    Number,
    /// Reserved GLSL/HLSL type names (`float`, `vec3`, ...).
    Type,
    Id,
    Assign,
    /// Arithmetic operator: one of `+ - * / % ^`.
    Op,
    LParen,
    RParen,
    LBrace,
    RBrace,
    /// Member access / swizzle.
    Dot,
    Comma,
    Semicolon,
    Skip,
    Newline,
    Mismatch,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Comment => "COMMENT",
            TokenKind::Number => "NUMBER",
            TokenKind::Type => "TYPE",
            TokenKind::Id => "ID",
            TokenKind::Assign => "ASSIGN",
            TokenKind::Op => "OP",
            TokenKind::LParen => "LPAREN",
            TokenKind::RParen => "RPAREN",
            TokenKind::LBrace => "LBRACE",
            TokenKind::RBrace => "RBRACE",
            TokenKind::Dot => "DOT",
            TokenKind::Comma => "COMMA",
            TokenKind::Semicolon => "SEMICOLON",
            TokenKind::Skip => "SKIP",
            TokenKind::Newline => "NEWLINE",
            TokenKind::Mismatch => "MISMATCH",
        }
    }
}

/// A lexed token. Line numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: u32,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, line: u32) -> Self {
        Self { kind, text: text.into(), line }
    }
}

const TOKEN_RULES: &[(TokenKind, &str)] = &[
    (TokenKind::Comment, r"//.*|/\*[\s\S]*?\*/"),
    (TokenKind::Number, r"[0-9]+(\.[0-9]*)?"),
    (TokenKind::Type, r"\b(float|int|vec2|vec3|vec4|float2|float3|float4)\b"),
    (TokenKind::Id, r"[a-zA-Z_][a-zA-Z0-9_]*"),
    (TokenKind::Assign, r"="),
    (TokenKind::Op, r"[+\-*/%^]"),
    (TokenKind::LParen, r"\("),
    (TokenKind::RParen, r"\)"),
    (TokenKind::LBrace, r"\{"),
    (TokenKind::RBrace, r"\}"),
    (TokenKind::Dot, r"\."),
    (TokenKind::Comma, r","),
    (TokenKind::Semicolon, r";"),
    (TokenKind::Skip, r"[ \t]+"),
    (TokenKind::Newline, r"\n"),
    (TokenKind::Mismatch, r"."),
];

/// Compiled, start-anchored versions of [`TOKEN_RULES`].
fn compiled_rules() -> &'static [(TokenKind, Regex)] {
    static RULES: OnceLock<Vec<(TokenKind, Regex)>> = OnceLock::new();
    RULES.get_or_init(|| {
        TOKEN_RULES
            .iter()
            .filter_map(|(kind, pattern)| {
                Regex::new(&format!("^(?:{pattern})")).ok().map(|re| (*kind, re))
            })
            .collect()
    })
}

/// Lexer over a single source text.
pub struct Lexer<'a> {
    source: &'a str,
    line: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source, line: 1 }
    }

    /// Tokenize the whole input. Newlines advance the line counter and are
    /// not emitted; whitespace and comments are dropped.
    pub fn tokenize(mut self) -> Vec<Token> {
        let rules = compiled_rules();
        let mut tokens = Vec::new();
        let mut pos = 0;

        while pos < self.source.len() {
            let rest = &self.source[pos..];
            // `\b` in the type rule must see the character before `pos`,
            // which the sliced haystack hides.
            let after_word = self.source[..pos]
                .chars()
                .next_back()
                .is_some_and(|c| c.is_alphanumeric() || c == '_');
            let matched = rules
                .iter()
                .filter(|(kind, _)| !(after_word && *kind == TokenKind::Type))
                .find_map(|(kind, re)| re.find(rest).map(|m| (*kind, m.as_str())))
                .filter(|(_, text)| !text.is_empty());

            let (kind, text) = match matched {
                Some(found) => found,
                None => {
                    let len = rest.chars().next().map(char::len_utf8).unwrap_or(1);
                    (TokenKind::Mismatch, &rest[..len])
                }
            };

            match kind {
                TokenKind::Newline => self.line += 1,
                TokenKind::Skip | TokenKind::Comment => {}
                _ => tokens.push(Token::new(kind, text, self.line)),
            }
            pos += text.len();
        }

        tokens
    }
}

/// Convenience wrapper: tokenize `source` from line 1.
pub fn tokenize(source: &str) -> Vec<Token> {
    Lexer::new(source).tokenize()
}
