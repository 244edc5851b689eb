//! Recursive-descent parser for the preset language.
//!
//! Grammar:
//!
//! ```text
//! program    := statement*
//! statement  := block | typed_decl | assignment
//! block      := '{' statement* '}'
//! typed_decl := TYPE ID ('=' expr)? ';'
//! assignment := ID '=' expr ';'
//! expr       := term (OP term)*
//! term       := NUMBER | ID ('(' arg_list ')' | ('.' ID)*) | '(' expr ')' | <other> -> 0
//! arg_list   := (expr (',' expr)*)?
//! ```
//!
//! Binary operators share one precedence level and associate left to right:
//! `a + b * c` is `(a + b) * c`. Frequency inference downstream depends on
//! that shape.
//!
//! When a statement fails to parse, the caller drops one token and retries,
//! so a malformed statement never aborts the rest of the program.
//!
//! Tree size is bounded so that analysis and drop stay within the stack on
//! hostile input. Groups nested deeper than [`MAX_NESTING`] are skipped as a
//! whole, and an operator chain or member chain stops growing once it would
//! exceed [`MAX_EXPR_HEIGHT`]; the remaining operands are still consumed.

use crate::ast::{BinOp, Node};
use crate::lexer::{Token, TokenKind};

/// Deepest nesting of parentheses, call argument lists and blocks.
pub const MAX_NESTING: usize = 128;

/// Tallest expression tree an operator or member chain may build.
pub const MAX_EXPR_HEIGHT: usize = 256;

pub struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    nesting: usize,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, pos: 0, nesting: 0 }
    }

    /// Current position in the token stream.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn peek_is(&self, kind: TokenKind) -> bool {
        self.peek().is_some_and(|t| t.kind == kind)
    }

    /// Take the next token regardless of kind.
    pub fn advance(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(token)
    }

    /// Take the next token only if it has kind `expected`. Does not advance
    /// on mismatch or at end of input.
    pub fn consume(&mut self, expected: TokenKind) -> Option<&'a Token> {
        match self.peek() {
            Some(token) if token.kind == expected => self.advance(),
            _ => None,
        }
    }

    pub fn parse(&mut self) -> Node {
        let mut statements = Vec::new();
        while self.pos < self.tokens.len() {
            match self.parse_statement() {
                Some(stmt) => statements.push(stmt),
                None => self.pos += 1,
            }
        }
        Node::Program { line: 1, statements }
    }

    pub fn parse_statement(&mut self) -> Option<Node> {
        let token = self.peek()?;

        match token.kind {
            TokenKind::LBrace => self.parse_block(),
            TokenKind::Type => {
                self.advance();
                let target = self.consume(TokenKind::Id)?;

                let mut expr = Node::literal(token.line, 0.0);
                if self.consume(TokenKind::Assign).is_some() {
                    expr = self.parse_expression();
                }
                self.consume(TokenKind::Semicolon);

                Some(Node::Assignment {
                    line: token.line,
                    target: target.text.clone(),
                    expr: Box::new(expr),
                    is_decl: true,
                })
            }
            TokenKind::Id => {
                let target = self.advance()?;
                // Bare expression statements (`f(x);`) are not statements.
                self.consume(TokenKind::Assign)?;
                let expr = self.parse_expression();
                self.consume(TokenKind::Semicolon);
                Some(Node::assignment(token.line, target.text.clone(), expr))
            }
            _ => None,
        }
    }

    /// Parse `{ statement* }`. Without a leading `{` there is no block at all.
    pub fn parse_block(&mut self) -> Option<Node> {
        let open = self.consume(TokenKind::LBrace)?;
        if self.nesting >= MAX_NESTING {
            self.skip_group(TokenKind::LBrace, TokenKind::RBrace);
            return Some(Node::Block { line: open.line, statements: Vec::new() });
        }

        self.nesting += 1;
        let mut statements = Vec::new();
        while self.peek().is_some() && !self.peek_is(TokenKind::RBrace) {
            match self.parse_statement() {
                Some(stmt) => statements.push(stmt),
                None => self.pos += 1,
            }
        }
        self.nesting -= 1;
        self.consume(TokenKind::RBrace);
        Some(Node::Block { line: open.line, statements })
    }

    /// Skip past the `close` matching an already consumed `open`, or to end
    /// of input.
    fn skip_group(&mut self, open: TokenKind, close: TokenKind) {
        let mut depth = 1usize;
        while let Some(token) = self.advance() {
            if token.kind == open {
                depth += 1;
            } else if token.kind == close {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
        }
    }

    pub fn parse_expression(&mut self) -> Node {
        self.expression().0
    }

    pub fn parse_term(&mut self) -> Node {
        self.term().0
    }

    pub fn parse_arg_list(&mut self) -> Vec<Node> {
        self.arg_list().into_iter().map(|(node, _)| node).collect()
    }

    // The helpers below return each node with its tree height.

    fn expression(&mut self) -> (Node, usize) {
        let (mut left, mut height) = self.term();
        while let Some(op_token) = self.consume(TokenKind::Op) {
            let Some(op) = BinOp::from_symbol(&op_token.text) else {
                break;
            };
            let (right, right_height) = self.term();
            let joined = height.max(right_height) + 1;
            if joined <= MAX_EXPR_HEIGHT {
                left = Node::binary(left, op, right);
                height = joined;
            }
        }
        (left, height)
    }

    fn term(&mut self) -> (Node, usize) {
        let Some(token) = self.peek() else {
            return (Node::literal(0, 0.0), 1);
        };

        match token.kind {
            TokenKind::Number => {
                self.advance();
                (Node::literal(token.line, token.text.parse().unwrap_or(0.0)), 1)
            }
            TokenKind::Id => {
                self.advance();
                if self.consume(TokenKind::LParen).is_some() {
                    if self.nesting >= MAX_NESTING {
                        self.skip_group(TokenKind::LParen, TokenKind::RParen);
                        return (Node::call(token.line, token.text.clone(), Vec::new()), 1);
                    }
                    self.nesting += 1;
                    let args = self.arg_list();
                    self.nesting -= 1;
                    self.consume(TokenKind::RParen);

                    let height = args.iter().map(|(_, h)| *h).max().unwrap_or(0) + 1;
                    let args = args.into_iter().map(|(node, _)| node).collect();
                    return (Node::call(token.line, token.text.clone(), args), height);
                }

                let mut node = Node::identifier(token.line, token.text.clone());
                let mut height = 1;
                while self.consume(TokenKind::Dot).is_some() {
                    if let Some(member) = self.consume(TokenKind::Id) {
                        if height < MAX_EXPR_HEIGHT {
                            node = Node::member(token.line, node, member.text.clone());
                            height += 1;
                        }
                    }
                }
                (node, height)
            }
            TokenKind::LParen => {
                self.advance();
                if self.nesting >= MAX_NESTING {
                    self.skip_group(TokenKind::LParen, TokenKind::RParen);
                    return (Node::literal(token.line, 0.0), 1);
                }
                self.nesting += 1;
                let inner = self.expression();
                self.nesting -= 1;
                self.consume(TokenKind::RParen);
                inner
            }
            _ => {
                self.advance();
                (Node::literal(token.line, 0.0), 1)
            }
        }
    }

    fn arg_list(&mut self) -> Vec<(Node, usize)> {
        let mut args = Vec::new();
        if self.peek().is_some() && !self.peek_is(TokenKind::RParen) {
            args.push(self.expression());
            while self.consume(TokenKind::Comma).is_some() {
                args.push(self.expression());
            }
        }
        args
    }
}

/// Lex and parse `source` into a `Program`.
pub fn parse_source(source: &str) -> Node {
    let tokens = crate::lexer::tokenize(source);
    Parser::new(&tokens).parse()
}
