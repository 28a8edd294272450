use fdo_lexer::{tokenize, LexErrorKind, TokenKind};

#[test]
fn tokenizes_atom_with_arguments() {
    let toks = tokenize("mat_trigger_style <picture>\n").unwrap();
    let kinds: Vec<_> = toks.into_iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Identifier("mat_trigger_style".into()),
            TokenKind::Lt,
            TokenKind::Identifier("picture".into()),
            TokenKind::Gt,
            TokenKind::Newline,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn tokenizes_string_with_escapes() {
    let toks = tokenize(r#"ind_group <x, "line1\nline2\t\"quoted\"">"#).unwrap();
    let strings: Vec<String> = toks
        .into_iter()
        .filter_map(|t| match t.kind {
            TokenKind::String(s) => Some(s),
            _ => None,
        })
        .collect();
    assert_eq!(strings, vec!["line1\nline2\t\"quoted\""]);
}

#[test]
fn tokenizes_hex_literals_both_forms() {
    let toks = tokenize("a <0x1F, $2a>").unwrap();
    let hexes: Vec<Vec<u8>> = toks
        .into_iter()
        .filter_map(|t| match t.kind {
            TokenKind::HexLiteral(b) => Some(b),
            _ => None,
        })
        .collect();
    assert_eq!(hexes, vec![vec![0x1F], vec![0x2a]]);
}

#[test]
fn comment_runs_to_end_of_line() {
    let toks = tokenize("a <1> # trailing comment\nb <2>\n").unwrap();
    let idents: Vec<String> = toks
        .into_iter()
        .filter_map(|t| match t.kind {
            TokenKind::Identifier(s) => Some(s),
            _ => None,
        })
        .collect();
    assert_eq!(idents, vec!["a", "b"]);
}

#[test]
fn unterminated_string_is_reported_with_position() {
    let err = tokenize("a <\"unterminated").unwrap_err();
    assert_eq!(err.kind, LexErrorKind::UnterminatedString);
    assert_eq!(err.line, 1);
}

#[test]
fn invalid_escape_is_rejected() {
    let err = tokenize(r#"a <"\q">"#).unwrap_err();
    assert_eq!(err.kind, LexErrorKind::InvalidEscape('q'));
}

#[test]
fn stray_character_is_rejected() {
    let err = tokenize("a <@>").unwrap_err();
    assert_eq!(err.kind, LexErrorKind::StrayCharacter('@'));
}

#[test]
fn negative_numbers_are_tokenized() {
    let toks = tokenize("a <-5>").unwrap();
    let numbers: Vec<i64> = toks
        .into_iter()
        .filter_map(|t| match t.kind {
            TokenKind::Number(n) => Some(n),
            _ => None,
        })
        .collect();
    assert_eq!(numbers, vec![-5]);
}
