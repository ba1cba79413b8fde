//! Tokenizer tests

use remod_common::CommentKind;
use remod_scanner::{ScannerState, SyntaxKind, is_identifier_text};

fn scan_all(source: &str) -> Vec<(SyntaxKind, String)> {
    let mut scanner = ScannerState::new(source);
    let mut tokens = Vec::new();
    loop {
        let kind = scanner.scan();
        if kind == SyntaxKind::EndOfFileToken {
            break;
        }
        tokens.push((kind, scanner.token_text().to_string()));
        assert_ne!(kind, SyntaxKind::Unknown, "unexpected token in {source:?}");
    }
    tokens
}

#[test]
fn test_keywords_and_identifiers() {
    let tokens = scan_all("var foo = function let");
    let kinds: Vec<_> = tokens.iter().map(|(k, _)| *k).collect();
    assert_eq!(
        kinds,
        vec![
            SyntaxKind::VarKeyword,
            SyntaxKind::Identifier,
            SyntaxKind::EqualsToken,
            SyntaxKind::FunctionKeyword,
            SyntaxKind::Identifier,
        ]
    );
    assert_eq!(tokens[4].1, "let");
}

#[test]
fn test_longest_match_operators() {
    let tokens = scan_all("a >>>= b ** c === d => e ?. f ?? g");
    let kinds: Vec<_> = tokens.iter().map(|(k, _)| *k).collect();
    assert!(kinds.contains(&SyntaxKind::GreaterThanGreaterThanGreaterThanEqualsToken));
    assert!(kinds.contains(&SyntaxKind::AsteriskAsteriskToken));
    assert!(kinds.contains(&SyntaxKind::EqualsEqualsEqualsToken));
    assert!(kinds.contains(&SyntaxKind::EqualsGreaterThanToken));
    assert!(kinds.contains(&SyntaxKind::QuestionDotToken));
    assert!(kinds.contains(&SyntaxKind::QuestionQuestionToken));
}

#[test]
fn test_string_value_is_cooked() {
    let mut scanner = ScannerState::new(r#"'use\x20strict' "a\nb""#);
    assert_eq!(scanner.scan(), SyntaxKind::StringLiteral);
    assert_eq!(scanner.token_value(), "use strict");
    assert_eq!(scanner.token_text(), r"'use\x20strict'");
    assert_eq!(scanner.scan(), SyntaxKind::StringLiteral);
    assert_eq!(scanner.token_value(), "a\nb");
}

#[test]
fn test_numbers() {
    let tokens = scan_all("0x1F 1.5e-3 .5 10n 1_000");
    let kinds: Vec<_> = tokens.iter().map(|(k, _)| *k).collect();
    assert_eq!(
        kinds,
        vec![
            SyntaxKind::NumericLiteral,
            SyntaxKind::NumericLiteral,
            SyntaxKind::NumericLiteral,
            SyntaxKind::BigIntLiteral,
            SyntaxKind::NumericLiteral,
        ]
    );
}

#[test]
fn test_regex_rescan() {
    let mut scanner = ScannerState::new("/[/]+\\//gi.test(x)");
    assert_eq!(scanner.scan(), SyntaxKind::SlashToken);
    assert_eq!(
        scanner.re_scan_slash_token(),
        SyntaxKind::RegularExpressionLiteral
    );
    assert_eq!(scanner.token_text(), "/[/]+\\//gi");
    assert_eq!(scanner.scan(), SyntaxKind::DotToken);
}

#[test]
fn test_template_continuation() {
    let mut scanner = ScannerState::new("`a${x}b${y}c`");
    assert_eq!(scanner.scan(), SyntaxKind::TemplateHead);
    assert_eq!(scanner.scan(), SyntaxKind::Identifier);
    assert_eq!(scanner.scan(), SyntaxKind::CloseBraceToken);
    assert_eq!(
        scanner.re_scan_template_continuation(),
        SyntaxKind::TemplateMiddle
    );
    assert_eq!(scanner.token_text(), "}b${");
    assert_eq!(scanner.scan(), SyntaxKind::Identifier);
    assert_eq!(scanner.scan(), SyntaxKind::CloseBraceToken);
    assert_eq!(
        scanner.re_scan_template_continuation(),
        SyntaxKind::TemplateTail
    );
    assert_eq!(scanner.scan(), SyntaxKind::EndOfFileToken);
}

#[test]
fn test_comments_and_line_breaks() {
    let source = "a // one\n/* two */ b";
    let mut scanner = ScannerState::new(source);
    scanner.scan();
    assert!(!scanner.has_preceding_line_break());
    scanner.scan();
    assert!(scanner.has_preceding_line_break());
    assert_eq!(scanner.token_text(), "b");

    let comments = scanner.comments();
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0].kind, CommentKind::SingleLine);
    assert!(!comments[0].has_preceding_new_line);
    assert_eq!(comments[1].get_text(source), "/* two */");
    assert!(comments[1].has_preceding_new_line);
}

#[test]
fn test_snapshot_restore_forgets_comments() {
    let mut scanner = ScannerState::new("let /* c */ x");
    scanner.scan();
    let snapshot = scanner.snapshot();
    scanner.scan();
    assert_eq!(scanner.comments().len(), 1);
    scanner.restore(snapshot);
    assert_eq!(scanner.comments().len(), 0);
    assert_eq!(scanner.token_text(), "let");
}

#[test]
fn test_unterminated_string_reports_error() {
    let mut scanner = ScannerState::new("'abc");
    assert_eq!(scanner.scan(), SyntaxKind::Unknown);
    assert_eq!(scanner.error().map(|e| e.pos), Some(0));
}

#[test]
fn test_identifier_text() {
    assert!(is_identifier_text("foo$1"));
    assert!(!is_identifier_text("foo-bar"));
    assert!(!is_identifier_text("1abc"));
}
