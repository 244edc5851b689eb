use vizscan_core::lexer::{tokenize, Token, TokenKind};

fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
    tokens.iter().map(|t| t.kind).collect()
}

#[test]
fn lexes_types_and_blocks() {
    let tokens = tokenize("float x; { vec3 y; }");
    assert_eq!(
        kinds(&tokens),
        vec![
            TokenKind::Type,
            TokenKind::Id,
            TokenKind::Semicolon,
            TokenKind::LBrace,
            TokenKind::Type,
            TokenKind::Id,
            TokenKind::Semicolon,
            TokenKind::RBrace,
        ]
    );
    assert_eq!(tokens[0].text, "float");
    assert_eq!(tokens[4].text, "vec3");
}

#[test]
fn lexes_swizzle_as_id_dot_id() {
    let tokens = tokenize("col.rgb");
    assert_eq!(kinds(&tokens), vec![TokenKind::Id, TokenKind::Dot, TokenKind::Id]);
}

#[test]
fn unknown_character_becomes_mismatch_token() {
    let tokens = tokenize("x = @;");
    assert_eq!(tokens.len(), 4);
    assert_eq!(
        kinds(&tokens),
        vec![TokenKind::Id, TokenKind::Assign, TokenKind::Mismatch, TokenKind::Semicolon]
    );
    assert_eq!(tokens[2].text, "@");
}

#[test]
fn newlines_advance_line_numbers_and_are_not_emitted() {
    let tokens = tokenize("a = 1;\n\nb = 2;");
    assert!(tokens.iter().all(|t| t.kind != TokenKind::Newline));
    assert_eq!(tokens[0].line, 1);
    let b = tokens.iter().find(|t| t.text == "b").expect("b token");
    assert_eq!(b.line, 3);
}

#[test]
fn comments_and_whitespace_are_dropped() {
    let tokens = tokenize("// header\nx = 1; /* inline */ y\t= 2; // trailing");
    let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(texts, vec!["x", "=", "1", ";", "y", "=", "2", ";"]);
}

#[test]
fn operators_and_numbers() {
    let tokens = tokenize("a = 1.5 + 2. * 3 % 4 ^ 5 / 6 - 7;");
    let ops: Vec<&str> =
        tokens.iter().filter(|t| t.kind == TokenKind::Op).map(|t| t.text.as_str()).collect();
    assert_eq!(ops, vec!["+", "*", "%", "^", "/", "-"]);
    let numbers: Vec<&str> =
        tokens.iter().filter(|t| t.kind == TokenKind::Number).map(|t| t.text.as_str()).collect();
    assert_eq!(numbers, vec!["1.5", "2.", "3", "4", "5", "6", "7"]);
}

#[test]
fn type_name_needs_word_boundary() {
    // `floaty` is an identifier, not `float` + `y`.
    let tokens = tokenize("floaty");
    assert_eq!(kinds(&tokens), vec![TokenKind::Id]);

    // A digit directly before a type name suppresses the type rule.
    let tokens = tokenize("1float");
    assert_eq!(kinds(&tokens), vec![TokenKind::Number, TokenKind::Id]);
}

#[test]
fn tokenizing_is_total_on_odd_input() {
    for source in ["", "\"", "\r\n", "ö = ß;", "/* unterminated", "@@@", "\\n"] {
        let first = tokenize(source);
        let second = tokenize(source);
        assert_eq!(first, second, "lexing must be deterministic for {source:?}");
    }

    let tokens = tokenize("ö");
    assert_eq!(kinds(&tokens), vec![TokenKind::Mismatch]);
    assert_eq!(tokens[0].text, "ö");
}
