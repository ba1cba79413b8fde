//! Layout of statement containers whose child sequence was edited.
//!
//! Each original statement `i` owns two source regions: its lead (the
//! whitespace and leading comments between the previous statement's
//! trailing comments and its own start) and its tail (its trailing
//! comments). Kept statements print with their own regions; a
//! synthesized statement borrows the whitespace of the statement it
//! replaced and prints its attached comments itself.

use super::{Printer, has_line_break, whitespace_prefix};
use remod_parser::parser::{NodeKind, StatementList};
use remod_parser::NodeIndex;
use rustc_hash::FxHashMap;

/// How a statement of the current sequence relates to the original one.
enum Slot {
    /// Original statement at this index of the original sequence.
    Kept(usize),
    /// Synthesized statement standing in for the original at this index.
    Anchored(usize),
    /// Statement with no place in the original sequence.
    Inserted,
}

impl<'a> Printer<'a> {
    pub(super) fn print_edited_container(&mut self, idx: NodeIndex) {
        let Some(node) = self.arena.get(idx) else {
            return;
        };
        let Some(list) = node.kind.statement_list() else {
            return;
        };
        let (pos, end) = (node.pos, node.end);

        // Opening: `{`, `case x:` or nothing for a program.
        match &node.kind {
            NodeKind::CaseClause { expression, .. } if expression.is_some() => {
                let expr_span = self.arena.get(*expression).map(|e| (e.pos, e.end));
                match expr_span {
                    Some((expr_pos, expr_end)) if expr_pos >= pos && expr_end <= list.inner_pos => {
                        self.copy_source(pos, expr_pos);
                        self.print_node(*expression);
                        self.copy_source(expr_end, list.inner_pos);
                    }
                    _ => self.copy_source(pos, list.inner_pos),
                }
            }
            _ => self.copy_source(pos, list.inner_pos),
        }

        self.print_statement_sequence(list);
        self.copy_source(list.inner_end, end);
    }

    fn print_statement_sequence(&mut self, list: &StatementList) {
        let original_index: FxHashMap<NodeIndex, usize> = list
            .original
            .iter()
            .enumerate()
            .map(|(i, &statement)| (statement, i))
            .collect();

        // Last original index printed, and the indent statements use.
        let mut previous: Option<usize> = None;
        let mut indent = self.sequence_indent(list);
        let mut printed_any = false;

        for &statement in &list.statements {
            let Some(node) = self.arena.get(statement) else {
                continue;
            };
            let slot = if node.is_synthesized() {
                match original_index.get(&node.origin) {
                    Some(&i) if previous != Some(i) => Slot::Anchored(i),
                    _ => Slot::Inserted,
                }
            } else {
                match original_index.get(&statement) {
                    Some(&i) => Slot::Kept(i),
                    None => Slot::Inserted,
                }
            };

            match slot {
                Slot::Kept(i) => {
                    let lead = self.lead_region(list, i);
                    self.write_lead(lead, i, previous, printed_any, list);
                    self.print_node(statement);
                    let tail_end = self.arena.trailing_end(list.original[i]);
                    self.copy_source(node.end, tail_end);
                    indent = self.source_indent(node.pos).to_string();
                    previous = Some(i);
                }
                Slot::Anchored(i) => {
                    let lead = self.lead_region(list, i);
                    let contiguous = is_contiguous(previous, i, printed_any);
                    let whitespace = if printed_any && !contiguous && !has_line_break(lead) {
                        format!("{}{}", self.writer.newline(), self.source_indent(self.original_pos(list, i)))
                    } else if !printed_any && i != 0 {
                        whitespace_prefix(self.lead_region(list, 0)).to_string()
                    } else {
                        whitespace_prefix(lead).to_string()
                    };
                    self.writer.write(&whitespace);
                    let anchor_pos = self.original_pos(list, i);
                    indent = self.source_indent(anchor_pos).to_string();
                    self.print_statement_with_comments(statement, &indent);
                    previous = Some(i);
                }
                Slot::Inserted => {
                    if printed_any || !list.original.is_empty() || list.inner_end > list.inner_pos {
                        self.writer.write_line(&indent);
                    }
                    self.print_statement_with_comments(statement, &indent);
                }
            }
            printed_any = true;
        }

        // Closing region: whatever followed the last original statement.
        let closing_start = list
            .original
            .last()
            .map_or(list.inner_pos, |&last| self.arena.trailing_end(last));
        let closing = self.source_text(closing_start, list.inner_end);
        if printed_any && list.original.is_empty() && !has_line_break(closing) {
            let outer = self.source_indent(list.inner_pos).to_string();
            self.writer.write_line(&outer);
        }
        self.copy_source(closing_start, list.inner_end);
    }

    /// Write the lead region of kept original `i`.
    fn write_lead(
        &mut self,
        lead: &'a str,
        i: usize,
        previous: Option<usize>,
        printed_any: bool,
        list: &StatementList,
    ) {
        let lead_start = self.lead_start(list, i);
        if is_contiguous(previous, i, printed_any) {
            self.copy_source(lead_start, lead_start + lead.len() as u32);
            return;
        }
        let trimmed = lead.trim_start();
        let trimmed_start = lead_start + (lead.len() - trimmed.len()) as u32;
        if !printed_any {
            let head = whitespace_prefix(self.lead_region(list, 0));
            self.writer.write(head);
        } else if !has_line_break(lead) {
            let indent = self.source_indent(self.original_pos(list, i)).to_string();
            self.writer.write_line(&indent);
        } else {
            self.writer.write(whitespace_prefix(lead));
        }
        self.copy_source(trimmed_start, trimmed_start + trimmed.len() as u32);
    }

    /// Leading comments, the statement, then trailing comments.
    fn print_statement_with_comments(&mut self, statement: NodeIndex, indent: &str) {
        let leading: Vec<_> = self.arena.leading_comments(statement).to_vec();
        for comment in leading {
            self.write_comment(comment);
            self.writer.write_line(indent);
        }
        self.print_node(statement);
        let trailing: Vec<_> = self.arena.trailing_comments(statement).to_vec();
        for comment in trailing {
            self.writer.write_char(' ');
            self.write_comment(comment);
        }
    }

    fn lead_start(&self, list: &StatementList, i: usize) -> u32 {
        if i == 0 {
            list.inner_pos
        } else {
            self.arena.trailing_end(list.original[i - 1])
        }
    }

    fn lead_region(&self, list: &StatementList, i: usize) -> &'a str {
        self.source_text(self.lead_start(list, i), self.original_pos(list, i))
    }

    fn original_pos(&self, list: &StatementList, i: usize) -> u32 {
        self.arena.get(list.original[i]).map_or(list.inner_pos, |node| node.pos)
    }

    /// Indent for statements inserted before any original one is printed.
    fn sequence_indent(&self, list: &StatementList) -> String {
        match list.original.first() {
            Some(&first) => {
                let pos = self.arena.get(first).map_or(list.inner_pos, |node| node.pos);
                self.source_indent(pos).to_string()
            }
            None => {
                let outer = self.source_indent(list.inner_pos);
                if list.inner_pos == 0 {
                    outer.to_string()
                } else {
                    format!("{outer}{}", self.indent_unit())
                }
            }
        }
    }
}

/// Whether original `i` directly follows what was printed last, so the
/// source between them can be copied as is.
fn is_contiguous(previous: Option<usize>, i: usize, printed_any: bool) -> bool {
    match previous {
        Some(prev) => printed_any && prev + 1 == i,
        None => !printed_any && i == 0,
    }
}
