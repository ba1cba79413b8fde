//! Parser state: token cursor, context flags and the parse entry point.
//!
//! The grammar itself lives in `state_statements` and `state_expressions`.
//! Parsing does not recover from errors: the first problem aborts with a
//! `ParseError`, and callers never see a partial tree.

use super::base::NodeIndex;
use super::comment_attachment::attach_comments;
use super::node::{NodeKind, StatementList};
use super::node_arena::NodeArena;
use remod_common::LineMap;
use remod_scanner::{ScannerSnapshot, ScannerState, SyntaxKind};
use tracing::debug;

/// Malformed input.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message} ({line}:{column})")]
pub struct ParseError {
    pub message: String,
    pub pos: u32,
    pub line: u32,
    pub column: u32,
}

pub(crate) type ParseResult<T> = Result<T, ParseError>;

/// A parsed source file: the arena holding every node plus the root.
#[derive(Debug)]
pub struct ParsedFile {
    pub arena: NodeArena,
    pub root: NodeIndex,
}

/// Parse a whole program.
pub fn parse(source: &str) -> Result<ParsedFile, ParseError> {
    let mut parser = ParserState::new(source);
    let root = parser.parse_program()?;
    Ok(parser.finish(root))
}

// Context flags
pub(crate) const CONTEXT_IN_FUNCTION: u8 = 1 << 0;
pub(crate) const CONTEXT_IN_GENERATOR: u8 = 1 << 1;
pub(crate) const CONTEXT_IN_ASYNC: u8 = 1 << 2;
/// `in` is not a binary operator here (for-statement initializers).
pub(crate) const CONTEXT_DISALLOW_IN: u8 = 1 << 3;

pub struct ParserState<'a> {
    pub(crate) scanner: ScannerState<'a>,
    pub(crate) arena: NodeArena,
    /// End of the last consumed token.
    pub(crate) prev_end: u32,
    pub(crate) context_flags: u8,
}

impl<'a> ParserState<'a> {
    pub fn new(source: &'a str) -> Self {
        ParserState {
            scanner: ScannerState::new(source),
            arena: NodeArena::with_capacity(source.len() / 4),
            prev_end: 0,
            context_flags: 0,
        }
    }

    pub(crate) fn source(&self) -> &'a str {
        self.scanner.source_text()
    }

    /// Parse the program root.
    pub fn parse_program(&mut self) -> ParseResult<NodeIndex> {
        self.next_token();
        let statements = self.parse_statements_until(SyntaxKind::EndOfFileToken)?;
        let len = self.source().len() as u32;
        let root = self.arena.add(
            NodeKind::Program(StatementList::new(statements, 0, len)),
            0,
            len,
        );
        Ok(root)
    }

    /// Move the comment table into the arena and attach comments to nodes.
    pub fn finish(mut self, root: NodeIndex) -> ParsedFile {
        let comments = self.scanner.take_comments();
        debug!(
            nodes = self.arena.len(),
            comments = comments.len(),
            "parsed program"
        );
        self.arena.set_comments(comments);
        attach_comments(&mut self.arena, self.scanner.source_text());
        ParsedFile {
            arena: self.arena,
            root,
        }
    }

    // =========================================================================
    // Token cursor
    // =========================================================================

    #[inline]
    pub(crate) fn token(&self) -> SyntaxKind {
        self.scanner.token()
    }

    #[inline]
    pub(crate) fn token_pos(&self) -> u32 {
        self.scanner.token_pos()
    }

    #[inline]
    pub(crate) fn is_token(&self, kind: SyntaxKind) -> bool {
        self.scanner.token() == kind
    }

    /// Current token is the identifier `name` (contextual keywords).
    #[inline]
    pub(crate) fn is_identifier_named(&self, name: &str) -> bool {
        self.is_token(SyntaxKind::Identifier) && self.scanner.token_value() == name
    }

    pub(crate) fn next_token(&mut self) -> SyntaxKind {
        self.prev_end = self.scanner.token_end();
        self.scanner.scan()
    }

    pub(crate) fn parse_optional(&mut self, kind: SyntaxKind) -> bool {
        if self.is_token(kind) {
            self.next_token();
            true
        } else {
            false
        }
    }

    pub(crate) fn parse_expected(&mut self, kind: SyntaxKind) -> ParseResult<()> {
        if self.parse_optional(kind) {
            Ok(())
        } else {
            Err(self.error_expected(kind.token_text()))
        }
    }

    /// Whether a statement may end here (explicit `;` or inserted one).
    pub(crate) fn can_parse_semicolon(&self) -> bool {
        matches!(
            self.token(),
            SyntaxKind::SemicolonToken | SyntaxKind::CloseBraceToken | SyntaxKind::EndOfFileToken
        ) || self.scanner.has_preceding_line_break()
    }

    pub(crate) fn parse_semicolon(&mut self) -> ParseResult<()> {
        if self.parse_optional(SyntaxKind::SemicolonToken) || self.can_parse_semicolon() {
            Ok(())
        } else {
            Err(self.error_expected(";"))
        }
    }

    // =========================================================================
    // Speculation
    // =========================================================================

    pub(crate) fn mark(&self) -> (ScannerSnapshot, u32) {
        (self.scanner.snapshot(), self.prev_end)
    }

    pub(crate) fn rewind(&mut self, mark: (ScannerSnapshot, u32)) {
        self.scanner.restore(mark.0);
        self.prev_end = mark.1;
    }

    /// Run `f` and rewind afterwards, returning its answer.
    pub(crate) fn look_ahead<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let mark = self.mark();
        let result = f(self);
        self.rewind(mark);
        result
    }

    pub(crate) fn in_context(&self, flag: u8) -> bool {
        self.context_flags & flag != 0
    }

    /// Run `f` with the context flags replaced by `flags`.
    pub(crate) fn with_context<T>(
        &mut self,
        flags: u8,
        f: impl FnOnce(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<T> {
        let saved = self.context_flags;
        self.context_flags = flags;
        let result = f(self);
        self.context_flags = saved;
        result
    }

    // =========================================================================
    // Errors
    // =========================================================================

    pub(crate) fn error_at(&self, pos: u32, message: impl Into<String>) -> ParseError {
        let position = LineMap::build(self.source()).position_of(pos);
        ParseError {
            message: message.into(),
            pos,
            line: position.line,
            column: position.column,
        }
    }

    /// Error for the current token, preferring the scanner's own diagnosis.
    pub(crate) fn error_unexpected(&self) -> ParseError {
        if let Some(error) = self.scanner.error() {
            return self.error_at(error.pos, error.message.clone());
        }
        match self.token() {
            SyntaxKind::EndOfFileToken => self.error_at(self.token_pos(), "Unexpected end of input"),
            _ => self.error_at(
                self.token_pos(),
                format!("Unexpected token '{}'", self.scanner.token_text()),
            ),
        }
    }

    pub(crate) fn error_expected(&self, what: &str) -> ParseError {
        if let Some(error) = self.scanner.error() {
            return self.error_at(error.pos, error.message.clone());
        }
        self.error_at(self.token_pos(), format!("'{what}' expected"))
    }
}
