//! Scanner state machine.
//!
//! The scanner is pull-based: the parser calls `scan()` for the next
//! token. Tokens whose meaning depends on grammar context (a `/` that
//! starts a regular expression, a `}` that resumes a template literal)
//! are re-scanned on request of the parser.

use remod_common::comments::{is_line_break, is_whitespace_single_line};
use remod_common::{CommentKind, CommentRange};

use crate::SyntaxKind;

/// Lexical error with the byte offset where scanning failed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ScanError {
    pub message: String,
    pub pos: u32,
}

/// Saved scanner position for speculative parsing.
#[derive(Clone, Debug)]
pub struct ScannerSnapshot {
    pos: usize,
    token: SyntaxKind,
    token_start: usize,
    token_value: String,
    preceding_line_break: bool,
    comments_len: usize,
    had_error: bool,
}

pub struct ScannerState<'a> {
    text: &'a str,
    pos: usize,
    token: SyntaxKind,
    token_start: usize,
    token_value: String,
    preceding_line_break: bool,
    comments: Vec<CommentRange>,
    error: Option<ScanError>,
}

impl<'a> ScannerState<'a> {
    pub fn new(text: &'a str) -> Self {
        let mut scanner = ScannerState {
            text,
            pos: 0,
            token: SyntaxKind::Unknown,
            token_start: 0,
            token_value: String::new(),
            preceding_line_break: false,
            comments: Vec::new(),
            error: None,
        };
        scanner.skip_shebang();
        scanner
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn source_text(&self) -> &'a str {
        self.text
    }

    #[inline]
    pub fn token(&self) -> SyntaxKind {
        self.token
    }

    /// Start of the current token, trivia excluded.
    #[inline]
    pub fn token_pos(&self) -> u32 {
        self.token_start as u32
    }

    #[inline]
    pub fn token_end(&self) -> u32 {
        self.pos as u32
    }

    /// Identifier name, cooked string value, or raw literal text.
    #[inline]
    pub fn token_value(&self) -> &str {
        &self.token_value
    }

    /// Raw source text of the current token.
    pub fn token_text(&self) -> &'a str {
        &self.text[self.token_start..self.pos]
    }

    /// Whether a line break occurred between the previous token and this one.
    #[inline]
    pub fn has_preceding_line_break(&self) -> bool {
        self.preceding_line_break
    }

    /// First lexical error met, if any.
    pub fn error(&self) -> Option<&ScanError> {
        self.error.as_ref()
    }

    pub fn comments(&self) -> &[CommentRange] {
        &self.comments
    }

    pub fn take_comments(&mut self) -> Vec<CommentRange> {
        std::mem::take(&mut self.comments)
    }

    pub fn snapshot(&self) -> ScannerSnapshot {
        ScannerSnapshot {
            pos: self.pos,
            token: self.token,
            token_start: self.token_start,
            token_value: self.token_value.clone(),
            preceding_line_break: self.preceding_line_break,
            comments_len: self.comments.len(),
            had_error: self.error.is_some(),
        }
    }

    /// Rewind to a snapshot, forgetting comments and errors met since.
    pub fn restore(&mut self, snapshot: ScannerSnapshot) {
        if !snapshot.had_error {
            self.error = None;
        }
        self.pos = snapshot.pos;
        self.token = snapshot.token;
        self.token_start = snapshot.token_start;
        self.token_value = snapshot.token_value;
        self.preceding_line_break = snapshot.preceding_line_break;
        self.comments.truncate(snapshot.comments_len);
    }

    // =========================================================================
    // Character helpers
    // =========================================================================

    #[inline]
    fn peek_byte(&self, offset: usize) -> u8 {
        self.text.as_bytes().get(self.pos + offset).copied().unwrap_or(0)
    }

    #[inline]
    fn peek_char(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn fail(&mut self, message: impl Into<String>, pos: usize) -> SyntaxKind {
        if self.error.is_none() {
            self.error = Some(ScanError {
                message: message.into(),
                pos: pos as u32,
            });
        }
        self.token = SyntaxKind::Unknown;
        SyntaxKind::Unknown
    }

    fn skip_shebang(&mut self) {
        if self.text.starts_with("#!") {
            while let Some(ch) = self.peek_char() {
                if is_line_break(ch) {
                    break;
                }
                self.pos += ch.len_utf8();
            }
        }
    }

    /// Skip whitespace and comments, recording comments as they pass.
    fn skip_trivia(&mut self) {
        let mut seen_line_break = self.pos == 0;
        loop {
            let Some(ch) = self.peek_char() else {
                return;
            };
            if is_line_break(ch) {
                self.preceding_line_break = true;
                seen_line_break = true;
                self.pos += ch.len_utf8();
            } else if is_whitespace_single_line(ch) {
                self.pos += ch.len_utf8();
            } else if ch == '/' && self.peek_byte(1) == b'/' {
                let start = self.pos;
                while let Some(c) = self.peek_char() {
                    if is_line_break(c) {
                        break;
                    }
                    self.pos += c.len_utf8();
                }
                self.comments.push(CommentRange::new(
                    start as u32,
                    self.pos as u32,
                    CommentKind::SingleLine,
                    seen_line_break,
                ));
            } else if ch == '/' && self.peek_byte(1) == b'*' {
                let start = self.pos;
                let Some(close) = self.text[start + 2..].find("*/") else {
                    self.pos = self.text.len();
                    self.fail("Unterminated comment", start);
                    return;
                };
                let end = start + 2 + close + 2;
                if self.text[start..end].contains(is_line_break) {
                    self.preceding_line_break = true;
                }
                self.pos = end;
                self.comments.push(CommentRange::new(
                    start as u32,
                    end as u32,
                    CommentKind::MultiLine,
                    seen_line_break,
                ));
            } else {
                return;
            }
        }
    }

    // =========================================================================
    // Scanning
    // =========================================================================

    /// Scan the next token.
    pub fn scan(&mut self) -> SyntaxKind {
        self.preceding_line_break = false;
        self.skip_trivia();
        self.token_start = self.pos;
        self.token_value.clear();

        let Some(ch) = self.peek_char() else {
            self.token = SyntaxKind::EndOfFileToken;
            return self.token;
        };

        self.token = match ch {
            '{' => self.single(SyntaxKind::OpenBraceToken),
            '}' => self.single(SyntaxKind::CloseBraceToken),
            '(' => self.single(SyntaxKind::OpenParenToken),
            ')' => self.single(SyntaxKind::CloseParenToken),
            '[' => self.single(SyntaxKind::OpenBracketToken),
            ']' => self.single(SyntaxKind::CloseBracketToken),
            ';' => self.single(SyntaxKind::SemicolonToken),
            ',' => self.single(SyntaxKind::CommaToken),
            ':' => self.single(SyntaxKind::ColonToken),
            '~' => self.single(SyntaxKind::TildeToken),
            '.' => {
                if self.peek_byte(1).is_ascii_digit() {
                    self.scan_number()
                } else if self.peek_byte(1) == b'.' && self.peek_byte(2) == b'.' {
                    self.pos += 3;
                    SyntaxKind::DotDotDotToken
                } else {
                    self.single(SyntaxKind::DotToken)
                }
            }
            '?' => {
                if self.peek_byte(1) == b'.' && !self.peek_byte(2).is_ascii_digit() {
                    self.pos += 2;
                    SyntaxKind::QuestionDotToken
                } else if self.peek_byte(1) == b'?' {
                    self.operator(&[("??=", SyntaxKind::QuestionQuestionEqualsToken)], 2, SyntaxKind::QuestionQuestionToken)
                } else {
                    self.single(SyntaxKind::QuestionToken)
                }
            }
            '=' => self.operator(
                &[
                    ("===", SyntaxKind::EqualsEqualsEqualsToken),
                    ("==", SyntaxKind::EqualsEqualsToken),
                    ("=>", SyntaxKind::EqualsGreaterThanToken),
                ],
                1,
                SyntaxKind::EqualsToken,
            ),
            '!' => self.operator(
                &[
                    ("!==", SyntaxKind::ExclamationEqualsEqualsToken),
                    ("!=", SyntaxKind::ExclamationEqualsToken),
                ],
                1,
                SyntaxKind::ExclamationToken,
            ),
            '+' => self.operator(
                &[
                    ("++", SyntaxKind::PlusPlusToken),
                    ("+=", SyntaxKind::PlusEqualsToken),
                ],
                1,
                SyntaxKind::PlusToken,
            ),
            '-' => self.operator(
                &[
                    ("--", SyntaxKind::MinusMinusToken),
                    ("-=", SyntaxKind::MinusEqualsToken),
                ],
                1,
                SyntaxKind::MinusToken,
            ),
            '*' => self.operator(
                &[
                    ("**=", SyntaxKind::AsteriskAsteriskEqualsToken),
                    ("**", SyntaxKind::AsteriskAsteriskToken),
                    ("*=", SyntaxKind::AsteriskEqualsToken),
                ],
                1,
                SyntaxKind::AsteriskToken,
            ),
            '/' => self.operator(&[("/=", SyntaxKind::SlashEqualsToken)], 1, SyntaxKind::SlashToken),
            '%' => self.operator(&[("%=", SyntaxKind::PercentEqualsToken)], 1, SyntaxKind::PercentToken),
            '<' => self.operator(
                &[
                    ("<<=", SyntaxKind::LessThanLessThanEqualsToken),
                    ("<<", SyntaxKind::LessThanLessThanToken),
                    ("<=", SyntaxKind::LessThanEqualsToken),
                ],
                1,
                SyntaxKind::LessThanToken,
            ),
            '>' => self.operator(
                &[
                    (">>>=", SyntaxKind::GreaterThanGreaterThanGreaterThanEqualsToken),
                    (">>>", SyntaxKind::GreaterThanGreaterThanGreaterThanToken),
                    (">>=", SyntaxKind::GreaterThanGreaterThanEqualsToken),
                    (">>", SyntaxKind::GreaterThanGreaterThanToken),
                    (">=", SyntaxKind::GreaterThanEqualsToken),
                ],
                1,
                SyntaxKind::GreaterThanToken,
            ),
            '&' => self.operator(
                &[
                    ("&&=", SyntaxKind::AmpersandAmpersandEqualsToken),
                    ("&&", SyntaxKind::AmpersandAmpersandToken),
                    ("&=", SyntaxKind::AmpersandEqualsToken),
                ],
                1,
                SyntaxKind::AmpersandToken,
            ),
            '|' => self.operator(
                &[
                    ("||=", SyntaxKind::BarBarEqualsToken),
                    ("||", SyntaxKind::BarBarToken),
                    ("|=", SyntaxKind::BarEqualsToken),
                ],
                1,
                SyntaxKind::BarToken,
            ),
            '^' => self.operator(&[("^=", SyntaxKind::CaretEqualsToken)], 1, SyntaxKind::CaretToken),
            '"' | '\'' => self.scan_string(ch),
            '`' => {
                self.pos += 1;
                self.scan_template_span(true)
            }
            '0'..='9' => self.scan_number(),
            c if is_identifier_start(c) => self.scan_identifier(),
            _ => {
                let start = self.pos;
                self.pos += ch.len_utf8();
                self.fail(format!("Invalid character '{ch}'"), start)
            }
        };
        self.token
    }

    #[inline]
    fn single(&mut self, kind: SyntaxKind) -> SyntaxKind {
        self.pos += 1;
        kind
    }

    /// Longest-match among multi-character operators, else `fallback`.
    fn operator(
        &mut self,
        candidates: &[(&str, SyntaxKind)],
        fallback_len: usize,
        fallback: SyntaxKind,
    ) -> SyntaxKind {
        let rest = &self.text[self.pos..];
        for (text, kind) in candidates {
            if rest.starts_with(text) {
                self.pos += text.len();
                return *kind;
            }
        }
        self.pos += fallback_len;
        fallback
    }

    fn scan_identifier(&mut self) -> SyntaxKind {
        let start = self.pos;
        while let Some(ch) = self.peek_char() {
            if is_identifier_part(ch) {
                self.pos += ch.len_utf8();
            } else {
                break;
            }
        }
        let text = &self.text[start..self.pos];
        self.token_value.push_str(text);
        SyntaxKind::keyword_from_text(text).unwrap_or(SyntaxKind::Identifier)
    }

    fn scan_number(&mut self) -> SyntaxKind {
        let start = self.pos;
        let radix_prefix = if self.peek_byte(0) == b'0' {
            match self.peek_byte(1) {
                b'x' | b'X' => Some(16),
                b'o' | b'O' => Some(8),
                b'b' | b'B' => Some(2),
                _ => None,
            }
        } else {
            None
        };

        if let Some(radix) = radix_prefix {
            self.pos += 2;
            let digits_start = self.pos;
            while (self.peek_byte(0) as char).is_digit(radix) || self.peek_byte(0) == b'_' {
                self.pos += 1;
            }
            if self.pos == digits_start {
                return self.fail("Digit expected", self.pos);
            }
        } else {
            self.skip_decimal_digits();
            if self.peek_byte(0) == b'.' {
                self.pos += 1;
                self.skip_decimal_digits();
            }
            if matches!(self.peek_byte(0), b'e' | b'E') {
                let save = self.pos;
                self.pos += 1;
                if matches!(self.peek_byte(0), b'+' | b'-') {
                    self.pos += 1;
                }
                if self.peek_byte(0).is_ascii_digit() {
                    self.skip_decimal_digits();
                } else {
                    self.pos = save;
                }
            }
        }

        let kind = if self.peek_byte(0) == b'n' {
            self.pos += 1;
            SyntaxKind::BigIntLiteral
        } else {
            SyntaxKind::NumericLiteral
        };
        if let Some(ch) = self.peek_char()
            && is_identifier_start(ch)
        {
            return self.fail("An identifier cannot follow a numeric literal", self.pos);
        }
        self.token_value.push_str(&self.text[start..self.pos]);
        kind
    }

    fn skip_decimal_digits(&mut self) {
        while self.peek_byte(0).is_ascii_digit() || self.peek_byte(0) == b'_' {
            self.pos += 1;
        }
    }

    fn scan_string(&mut self, quote: char) -> SyntaxKind {
        let start = self.pos;
        self.pos += 1;
        let mut value = String::new();
        loop {
            let Some(ch) = self.peek_char() else {
                return self.fail("Unterminated string literal", start);
            };
            if ch == quote {
                self.pos += 1;
                break;
            }
            if is_line_break(ch) && ch != '\u{2028}' && ch != '\u{2029}' {
                return self.fail("Unterminated string literal", start);
            }
            if ch == '\\' {
                self.pos += 1;
                let Some(escaped) = self.peek_char() else {
                    return self.fail("Unterminated string literal", start);
                };
                self.pos += escaped.len_utf8();
                match escaped {
                    'n' => value.push('\n'),
                    't' => value.push('\t'),
                    'r' => value.push('\r'),
                    'b' => value.push('\u{0008}'),
                    'f' => value.push('\u{000C}'),
                    'v' => value.push('\u{000B}'),
                    '0' if !self.peek_byte(0).is_ascii_digit() => value.push('\0'),
                    'x' => {
                        let code = self.scan_hex_digits(2);
                        value.extend(code.and_then(char::from_u32));
                    }
                    'u' => {
                        let code = if self.peek_byte(0) == b'{' {
                            self.pos += 1;
                            let digits_start = self.pos;
                            while self.peek_byte(0).is_ascii_hexdigit() {
                                self.pos += 1;
                            }
                            let code = u32::from_str_radix(&self.text[digits_start..self.pos], 16).ok();
                            if self.peek_byte(0) == b'}' {
                                self.pos += 1;
                            }
                            code
                        } else {
                            self.scan_hex_digits(4)
                        };
                        value.extend(code.and_then(char::from_u32));
                    }
                    '\r' => {
                        if self.peek_byte(0) == b'\n' {
                            self.pos += 1;
                        }
                    }
                    '\n' | '\u{2028}' | '\u{2029}' => {}
                    other => value.push(other),
                }
                continue;
            }
            value.push(ch);
            self.pos += ch.len_utf8();
        }
        self.token_value = value;
        SyntaxKind::StringLiteral
    }

    fn scan_hex_digits(&mut self, count: usize) -> Option<u32> {
        let start = self.pos;
        for _ in 0..count {
            if !self.peek_byte(0).is_ascii_hexdigit() {
                return None;
            }
            self.pos += 1;
        }
        u32::from_str_radix(&self.text[start..self.pos], 16).ok()
    }

    /// Scan template characters after a '`' or a substitution's '}'.
    fn scan_template_span(&mut self, is_start: bool) -> SyntaxKind {
        let start = self.token_start;
        loop {
            let Some(ch) = self.peek_char() else {
                return self.fail("Unterminated template literal", start);
            };
            match ch {
                '`' => {
                    self.pos += 1;
                    self.token_value.push_str(&self.text[start..self.pos]);
                    return if is_start {
                        SyntaxKind::NoSubstitutionTemplateLiteral
                    } else {
                        SyntaxKind::TemplateTail
                    };
                }
                '$' if self.peek_byte(1) == b'{' => {
                    self.pos += 2;
                    self.token_value.push_str(&self.text[start..self.pos]);
                    return if is_start {
                        SyntaxKind::TemplateHead
                    } else {
                        SyntaxKind::TemplateMiddle
                    };
                }
                '\\' => {
                    self.pos += 1;
                    if let Some(escaped) = self.peek_char() {
                        self.pos += escaped.len_utf8();
                    }
                }
                _ => self.pos += ch.len_utf8(),
            }
        }
    }

    /// Re-scan the current `/` or `/=` token as a regular expression literal.
    pub fn re_scan_slash_token(&mut self) -> SyntaxKind {
        if !matches!(self.token, SyntaxKind::SlashToken | SyntaxKind::SlashEqualsToken) {
            return self.token;
        }
        let start = self.token_start;
        self.pos = start + 1;
        let mut in_class = false;
        loop {
            let Some(ch) = self.peek_char() else {
                return self.fail("Unterminated regular expression literal", start);
            };
            if is_line_break(ch) {
                return self.fail("Unterminated regular expression literal", start);
            }
            self.pos += ch.len_utf8();
            match ch {
                '\\' => {
                    if let Some(escaped) = self.peek_char() {
                        if is_line_break(escaped) {
                            return self.fail("Unterminated regular expression literal", start);
                        }
                        self.pos += escaped.len_utf8();
                    }
                }
                '[' => in_class = true,
                ']' => in_class = false,
                '/' if !in_class => break,
                _ => {}
            }
        }
        while let Some(ch) = self.peek_char() {
            if is_identifier_part(ch) {
                self.pos += ch.len_utf8();
            } else {
                break;
            }
        }
        self.token_value.clear();
        self.token_value.push_str(&self.text[start..self.pos]);
        self.token = SyntaxKind::RegularExpressionLiteral;
        self.token
    }

    /// Re-scan the current `}` as the continuation of a template literal.
    pub fn re_scan_template_continuation(&mut self) -> SyntaxKind {
        if self.token != SyntaxKind::CloseBraceToken {
            return self.token;
        }
        self.pos = self.token_start + 1;
        self.token_value.clear();
        self.token = self.scan_template_span(false);
        self.token
    }
}

pub fn is_identifier_start(ch: char) -> bool {
    ch == '$' || ch == '_' || ch.is_ascii_alphabetic() || (!ch.is_ascii() && ch.is_alphabetic())
}

pub fn is_identifier_part(ch: char) -> bool {
    is_identifier_start(ch)
        || ch.is_ascii_digit()
        || ch == '\u{200C}'
        || ch == '\u{200D}'
        || (!ch.is_ascii() && ch.is_alphanumeric())
}

/// Whether `text` is a valid identifier name (used for shorthand keys).
pub fn is_identifier_text(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if is_identifier_start(first) => chars.all(is_identifier_part),
        _ => false,
    }
}
