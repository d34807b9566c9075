//! Integration tests for the template scanner.

use lingo::parser::{Scanner, Token, TokenKind, scan};

fn kinds(source: &str) -> Vec<TokenKind> {
    scan(source).into_iter().map(|token| token.kind).collect()
}

fn lexemes(source: &str) -> Vec<String> {
    scan(source).into_iter().map(|token| token.lexeme).collect()
}

// =============================================================================
// Text mode
// =============================================================================

#[test]
fn plain_text_is_one_token() {
    assert_eq!(kinds("Hello, world!"), vec![TokenKind::Text, TokenKind::Eof]);
    assert_eq!(lexemes("Hello, world!")[0], "Hello, world!");
}

#[test]
fn empty_source_is_just_eof() {
    assert_eq!(scan(""), vec![Token::new(TokenKind::Eof, "", 0)]);
}

#[test]
fn expression_switches_modes() {
    assert_eq!(
        kinds("Hello, {name}!"),
        vec![
            TokenKind::Text,
            TokenKind::EnterExpr,
            TokenKind::Ident,
            TokenKind::LeaveExpr,
            TokenKind::Text,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn escaped_brace_and_backslash_stay_text() {
    let tokens = scan(r"a\{b\\c");
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0].kind, TokenKind::Text);
    assert_eq!(tokens[0].lexeme, r"a{b\c");
}

#[test]
fn other_backslashes_are_kept() {
    assert_eq!(lexemes(r"C:\path\n")[0], r"C:\path\n");
}

#[test]
fn closing_brace_in_text_is_text() {
    assert_eq!(kinds("a } b"), vec![TokenKind::Text, TokenKind::Eof]);
}

// =============================================================================
// Expression mode
// =============================================================================

#[test]
fn operators_prefer_two_character_forms() {
    assert_eq!(
        kinds("{== != >= <= => = > < !}"),
        vec![
            TokenKind::EnterExpr,
            TokenKind::EqualEqual,
            TokenKind::BangEqual,
            TokenKind::GreaterEqual,
            TokenKind::LessEqual,
            TokenKind::EqualGreater,
            TokenKind::Equal,
            TokenKind::Greater,
            TokenKind::Less,
            TokenKind::Bang,
            TokenKind::LeaveExpr,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn punctuation_and_arithmetic() {
    assert_eq!(
        kinds("{( ) [ ] , : + - * / %}"),
        vec![
            TokenKind::EnterExpr,
            TokenKind::LParen,
            TokenKind::RParen,
            TokenKind::LBrack,
            TokenKind::RBrack,
            TokenKind::Comma,
            TokenKind::Colon,
            TokenKind::Plus,
            TokenKind::Minus,
            TokenKind::Asterisk,
            TokenKind::Slash,
            TokenKind::Percent,
            TokenKind::LeaveExpr,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn word_operators_are_keywords() {
    assert_eq!(
        kinds("{a or b and c}"),
        vec![
            TokenKind::EnterExpr,
            TokenKind::Ident,
            TokenKind::Or,
            TokenKind::Ident,
            TokenKind::And,
            TokenKind::Ident,
            TokenKind::LeaveExpr,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn identifiers_allow_underscores_and_digits() {
    assert_eq!(lexemes("{_x string_var_jp2}")[1..3], ["_x", "string_var_jp2"]);
}

#[test]
fn numbers() {
    let tokens = scan("{42 1_000 2.5 3.}");
    assert_eq!(tokens[1].kind, TokenKind::Int);
    assert_eq!(tokens[2].kind, TokenKind::Int);
    assert_eq!(tokens[2].lexeme, "1_000");
    assert_eq!(tokens[3].kind, TokenKind::Float);
    assert_eq!(tokens[3].lexeme, "2.5");
    assert_eq!(tokens[4].kind, TokenKind::Unexpected);
    assert_eq!(tokens[4].lexeme, "3.");
}

#[test]
fn strings_use_three_quote_styles() {
    let tokens = scan(r#"{'single' "double" `back`}"#);
    assert_eq!(
        tokens[1..4]
            .iter()
            .map(|token| (token.kind, token.lexeme.as_str()))
            .collect::<Vec<_>>(),
        vec![
            (TokenKind::String, "single"),
            (TokenKind::String, "double"),
            (TokenKind::String, "back"),
        ]
    );
}

#[test]
fn strings_escape_their_quote_and_backslash() {
    let tokens = scan(r#"{'it\'s' "a \"b\" \\ \n"}"#);
    assert_eq!(tokens[1].lexeme, "it's");
    assert_eq!(tokens[2].lexeme, r#"a "b" \ \n"#);
}

#[test]
fn braces_inside_strings_do_not_close_the_expression() {
    let tokens = scan("{'}'}");
    assert_eq!(tokens[1].kind, TokenKind::String);
    assert_eq!(tokens[1].lexeme, "}");
    assert_eq!(tokens[2].kind, TokenKind::LeaveExpr);
}

#[test]
fn unknown_characters_are_unexpected() {
    let tokens = scan("{a # b}");
    assert_eq!(tokens[2].kind, TokenKind::Unexpected);
    assert_eq!(tokens[2].lexeme, "#");
    assert_eq!(tokens[3].kind, TokenKind::Ident);
}

#[test]
fn scanner_keeps_returning_eof() {
    let mut scanner = Scanner::new("x");
    assert_eq!(scanner.next_token().kind, TokenKind::Text);
    assert_eq!(scanner.next_token().kind, TokenKind::Eof);
    assert_eq!(scanner.next_token().kind, TokenKind::Eof);
}

#[test]
fn tokens_display_their_lexeme() {
    let tokens = scan("{count}");
    assert_eq!(tokens[1].to_string(), "count");
    assert_eq!(tokens[3].to_string(), "eof");
}
