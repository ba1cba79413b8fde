//! Printer: dispatch between verbatim copy, splice and structural print.

mod statement_list;
mod synthesized;

use crate::source_writer::SourceWriter;
use remod_common::comments::line_indent_at;
use remod_parser::parser::{NodeFlags, NodeKind};
use remod_parser::{CommentId, NodeArena, NodeIndex};
use tracing::trace;

/// Formatting choices for synthesized code.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrintOptions {
    /// One level of indentation inside synthesized blocks and class bodies.
    pub indent_unit: String,
    /// Line terminator for lines the printer starts itself.
    pub newline: &'static str,
}

impl Default for PrintOptions {
    fn default() -> Self {
        PrintOptions {
            indent_unit: "  ".to_string(),
            newline: "\n",
        }
    }
}

impl PrintOptions {
    /// Pick the indentation unit the source already uses: a tab if any line
    /// is tab-indented, else the smallest space indentation (two spaces when
    /// nothing is indented). The newline follows the first line break.
    pub fn detect(source: &str) -> Self {
        let newline = detect_newline(source);
        let mut smallest: Option<usize> = None;
        for line in source.lines() {
            if line.starts_with('\t') {
                return PrintOptions {
                    indent_unit: "\t".to_string(),
                    newline,
                };
            }
            let spaces = line.len() - line.trim_start_matches(' ').len();
            let rest = &line[spaces..];
            // Skip blank lines and the ` * ` continuation lines of block comments.
            if spaces == 0 || rest.is_empty() || rest.starts_with('*') {
                continue;
            }
            smallest = Some(smallest.map_or(spaces, |current| current.min(spaces)));
        }
        let width = smallest.unwrap_or(2).min(8);
        PrintOptions {
            indent_unit: " ".repeat(width),
            newline,
        }
    }
}

/// `\r\n` when the first line break of `source` is one, else `\n`.
fn detect_newline(source: &str) -> &'static str {
    match memchr::memchr(b'\n', source.as_bytes()) {
        Some(at) if at > 0 && source.as_bytes()[at - 1] == b'\r' => "\r\n",
        _ => "\n",
    }
}

/// Print the tree rooted at `root`, detecting the indent unit from `source`.
pub fn print(arena: &NodeArena, source: &str, root: NodeIndex) -> String {
    let mut printer = Printer::new(arena, source, PrintOptions::detect(source));
    printer.print_node(root);
    printer.finish()
}

pub struct Printer<'a> {
    arena: &'a NodeArena,
    source: &'a str,
    options: PrintOptions,
    writer: SourceWriter,
}

impl<'a> Printer<'a> {
    pub fn new(arena: &'a NodeArena, source: &'a str, options: PrintOptions) -> Self {
        let mut writer = SourceWriter::with_capacity(source.len() + source.len() / 8);
        writer.set_newline(options.newline);
        Printer {
            arena,
            source,
            options,
            writer,
        }
    }

    pub fn finish(self) -> String {
        self.writer.into_string()
    }

    /// Print any node, choosing the strategy from its edit flags.
    pub fn print_node(&mut self, idx: NodeIndex) {
        let Some(node) = self.arena.get(idx) else {
            return;
        };
        let moved = node.is_synthesized()
            || self
                .arena
                .get(node.parent)
                .is_some_and(|parent| parent.is_synthesized());
        if moved && self.needs_parens(idx) {
            self.writer.write("(");
            self.print_node_unwrapped(idx);
            self.writer.write(")");
        } else {
            self.print_node_unwrapped(idx);
        }
    }

    fn print_node_unwrapped(&mut self, idx: NodeIndex) {
        let Some(node) = self.arena.get(idx) else {
            return;
        };
        if node.is_pristine() {
            self.copy_source(node.pos, node.end);
        } else if node.is_synthesized() {
            self.print_synthesized(idx);
        } else if node.flags.contains(NodeFlags::LIST_EDITED) && node.kind.statement_list().is_some()
        {
            self.print_edited_container(idx);
        } else {
            self.print_spliced(idx);
        }
    }

    // =========================================================================
    // Source copies
    // =========================================================================

    /// Copy `source[pos..end]`, re-indenting continuation lines to the
    /// current output line.
    fn copy_source(&mut self, pos: u32, end: u32) {
        if end <= pos {
            return;
        }
        let Some(text) = self.source.get(pos as usize..end as usize) else {
            return;
        };
        let base = line_indent_at(self.source, pos as usize);
        self.writer.write_copied(text, base);
    }

    fn source_text(&self, pos: u32, end: u32) -> &'a str {
        if end <= pos {
            return "";
        }
        self.source.get(pos as usize..end as usize).unwrap_or("")
    }

    fn write_comment(&mut self, id: CommentId) {
        if let Some(comment) = self.arena.comment(id) {
            self.copy_source(comment.pos, comment.end);
        }
    }

    // =========================================================================
    // Splice
    // =========================================================================

    /// Original node with edited descendants: copy the source between
    /// children and print the children themselves.
    fn print_spliced(&mut self, idx: NodeIndex) {
        let Some(node) = self.arena.get(idx) else {
            return;
        };
        let children = self.arena.children(idx);
        if !self.children_tile_span(node.pos, node.end, &children) {
            trace!(kind = node.kind.name(), "children left their span, printing structurally");
            self.print_structural(idx);
            return;
        }

        let mut cursor = node.pos;
        if let NodeKind::VariableDeclarationList(list) = &node.kind {
            self.writer.write(list.kind.keyword());
            cursor = node.pos + list.original_kind.keyword().len() as u32;
        }
        for child in children {
            let Some(child_node) = self.arena.get(child) else {
                continue;
            };
            self.copy_source(cursor, child_node.pos);
            self.print_node(child);
            cursor = child_node.end;
        }
        self.copy_source(cursor, node.end);
    }

    /// Whether the children still sit in source order inside the parent's
    /// span, so the gaps between them are meaningful.
    fn children_tile_span(&self, pos: u32, end: u32, children: &[NodeIndex]) -> bool {
        let mut cursor = pos;
        for &child in children {
            let Some(node) = self.arena.get(child) else {
                return false;
            };
            let spanless = node.is_synthesized() && node.origin.is_none();
            if spanless || node.pos < cursor || node.end > end {
                return false;
            }
            cursor = node.end;
        }
        true
    }

    // =========================================================================
    // Indentation helpers
    // =========================================================================

    fn indent_unit(&self) -> String {
        self.options.indent_unit.clone()
    }

    fn current_indent(&self) -> String {
        self.writer.current_line_indent().to_string()
    }

    /// Indentation of the source line holding `pos`.
    fn source_indent(&self, pos: u32) -> &'a str {
        line_indent_at(self.source, pos as usize)
    }
}

/// Leading run of whitespace, stopping at the first comment or code.
fn whitespace_prefix(text: &str) -> &str {
    remod_common::comments::leading_whitespace(text)
}

fn has_line_break(text: &str) -> bool {
    text.contains(remod_common::comments::is_line_break)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_prefers_tabs() {
        assert_eq!(PrintOptions::detect("a {\n\tb;\n}").indent_unit, "\t");
    }

    #[test]
    fn detect_uses_smallest_space_indent() {
        let source = "function f() {\n    if (x) {\n        y();\n    }\n}\n/**\n * doc\n */";
        assert_eq!(PrintOptions::detect(source).indent_unit, "    ");
    }

    #[test]
    fn detect_defaults_to_two_spaces() {
        assert_eq!(PrintOptions::detect("a();\nb();").indent_unit, "  ");
    }

    #[test]
    fn detect_newline_from_first_line_break() {
        assert_eq!(PrintOptions::detect("a();\r\nb();\n").newline, "\r\n");
        assert_eq!(PrintOptions::detect("a();\nb();\r\n").newline, "\n");
        assert_eq!(PrintOptions::detect("a();").newline, "\n");
    }

    #[test]
    fn pristine_tree_prints_byte_identical() {
        let source = "// head\nvar a = 1;  /* keep */\n\nfunction f(x) {\n    return x*x;\n}\n";
        let file = remod_parser::parse(source).unwrap();
        assert_eq!(print(&file.arena, source, file.root), source);
    }
}
