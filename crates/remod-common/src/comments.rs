//! Comment Preservation
//!
//! Comments are not part of the AST. The scanner records every comment it
//! skips as a `CommentRange`, and the parser attaches those ranges to
//! statements and members so transforms can move them with the code.

use serde::{Deserialize, Serialize};

/// Kind of comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommentKind {
    SingleLine, // // comment
    MultiLine,  // /* comment */
}

/// A range representing a comment in the source text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentRange {
    /// Start position (byte offset)
    pub pos: u32,
    /// End position (byte offset)
    pub end: u32,
    pub kind: CommentKind,
    /// Whether a line break precedes the comment (it starts its own line)
    pub has_preceding_new_line: bool,
}

impl CommentRange {
    pub fn new(pos: u32, end: u32, kind: CommentKind, has_preceding_new_line: bool) -> Self {
        CommentRange {
            pos,
            end,
            kind,
            has_preceding_new_line,
        }
    }

    /// Get the comment text from source.
    pub fn get_text<'a>(&self, source: &'a str) -> &'a str {
        let start = self.pos as usize;
        let end = self.end as usize;
        if end <= source.len() && start < end {
            &source[start..end]
        } else {
            ""
        }
    }

    #[inline]
    pub fn is_multi_line(&self) -> bool {
        self.kind == CommentKind::MultiLine
    }
}

/// Check if a character is a line break.
#[inline]
pub fn is_line_break(ch: char) -> bool {
    ch == '\n' || ch == '\r' || ch == '\u{2028}' || ch == '\u{2029}'
}

/// Check if a character is whitespace (but not a line break).
#[inline]
pub fn is_whitespace_single_line(ch: char) -> bool {
    ch == ' ' || ch == '\t' || ch == '\u{000B}' || ch == '\u{000C}' || ch == '\u{00A0}'
        || ch == '\u{FEFF}'
}

/// The run of whitespace (line breaks included) at the start of `text`.
pub fn leading_whitespace(text: &str) -> &str {
    let trimmed = text.trim_start_matches(|c: char| is_line_break(c) || is_whitespace_single_line(c));
    &text[..text.len() - trimmed.len()]
}

/// Indentation of the line containing `pos`: the whitespace between the
/// line start and the first non-blank character of that line.
pub fn line_indent_at(source: &str, pos: usize) -> &str {
    let pos = pos.min(source.len());
    let line_start = source[..pos]
        .rfind(|c: char| c == '\n' || c == '\r')
        .map_or(0, |i| i + 1);
    line_indent(&source[line_start..])
}

/// Leading blanks of `line`. A byte order mark at the start is not
/// indentation.
pub fn line_indent(line: &str) -> &str {
    let line = line.strip_prefix('\u{FEFF}').unwrap_or(line);
    let indent_len = line
        .find(|c: char| !is_whitespace_single_line(c))
        .unwrap_or(line.len());
    &line[..indent_len]
}

/// True when only blanks separate the start of `pos`'s line from `pos`.
pub fn starts_line(source: &str, pos: usize) -> bool {
    let pos = pos.min(source.len());
    source[..pos]
        .chars()
        .rev()
        .take_while(|c| !is_line_break(*c))
        .all(is_whitespace_single_line)
}

/// Check if a comment is a JSDoc comment.
pub fn is_jsdoc_comment(comment: &CommentRange, source: &str) -> bool {
    let text = comment.get_text(source);
    text.starts_with("/**") && !text.starts_with("/***")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_indent_at() {
        let source = "function f() {\n    return 1;\n}";
        let pos = source.find("return").unwrap();
        assert_eq!(line_indent_at(source, pos), "    ");
        assert_eq!(line_indent_at(source, 0), "");
        assert!(starts_line(source, pos));
        assert!(!starts_line(source, pos + 2));
    }

    #[test]
    fn test_byte_order_mark_is_not_indentation() {
        let source = "\u{FEFF}function C() {}\n";
        assert_eq!(line_indent_at(source, 3), "");
        assert_eq!(line_indent("\u{FEFF}  x"), "  ");
    }

    #[test]
    fn test_leading_whitespace_and_jsdoc() {
        assert_eq!(leading_whitespace("\n\n  // c\n"), "\n\n  ");
        let source = "/** doc */ /*** banner */";
        let doc = CommentRange::new(0, 10, CommentKind::MultiLine, false);
        let banner = CommentRange::new(11, 25, CommentKind::MultiLine, false);
        assert!(is_jsdoc_comment(&doc, source));
        assert!(!is_jsdoc_comment(&banner, source));
    }
}
