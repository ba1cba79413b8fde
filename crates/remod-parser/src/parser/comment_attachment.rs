//! Attach comments to the members of sequence containers.
//!
//! Only comments sitting *between* the elements of a statement list,
//! object literal or class body are attached; comments inside an element
//! travel with that element's source text. A gap comment that starts on
//! the line where the previous element ends trails that element; any other
//! gap comment leads the next element. Comments after the last element
//! that are not on its line stay with the container.

use super::base::{CommentId, NodeIndex};
use super::node::NodeKind;
use super::node_arena::NodeArena;
use remod_common::comments::is_line_break;

pub(crate) fn attach_comments(arena: &mut NodeArena, source: &str) {
    if arena.comments().is_empty() {
        return;
    }
    let mut assignments: Vec<(NodeIndex, CommentId, bool)> = Vec::new();
    for index in 0..arena.len() {
        let index = NodeIndex(index as u32);
        let Some((elements, range_start, range_end)) = container_elements(arena, index) else {
            continue;
        };
        collect_gap_comments(arena, source, &elements, range_start, range_end, &mut assignments);
    }
    for (node, comment, trailing) in assignments {
        if trailing {
            arena.add_trailing_comment(node, comment);
        } else {
            arena.add_leading_comment(node, comment);
        }
    }
}

/// Elements and inner source range of a sequence container.
fn container_elements(arena: &NodeArena, index: NodeIndex) -> Option<(Vec<NodeIndex>, u32, u32)> {
    let node = arena.get(index)?;
    match &node.kind {
        NodeKind::Program(list) | NodeKind::Block(list) => {
            Some((list.statements.clone(), list.inner_pos, list.inner_end))
        }
        NodeKind::CaseClause { statements, .. } => Some((
            statements.statements.clone(),
            statements.inner_pos,
            statements.inner_end,
        )),
        NodeKind::ObjectLiteral { properties } => {
            Some((properties.nodes.clone(), properties.pos, properties.end))
        }
        NodeKind::ClassDeclaration(data) | NodeKind::ClassExpression(data) => {
            Some((data.members.nodes.clone(), data.members.pos, data.members.end))
        }
        _ => None,
    }
}

fn collect_gap_comments(
    arena: &NodeArena,
    source: &str,
    elements: &[NodeIndex],
    range_start: u32,
    range_end: u32,
    out: &mut Vec<(NodeIndex, CommentId, bool)>,
) {
    let comments = arena.comments();
    let mut previous: Option<(NodeIndex, u32)> = None;
    let mut cursor = range_start;

    let spans = elements
        .iter()
        .filter_map(|&element| arena.get(element).map(|node| (Some(element), node.pos, node.end)))
        .chain(std::iter::once((None, range_end, range_end)));

    for (element, gap_end, element_end) in spans {
        let first = comments.partition_point(|comment| comment.pos < cursor);
        for (offset, comment) in comments[first..].iter().enumerate() {
            if comment.end > gap_end {
                break;
            }
            let id = CommentId((first + offset) as u32);
            match previous {
                Some((prev, prev_end)) if !spans_line_break(source, prev_end, comment.pos) => {
                    out.push((prev, id, true));
                }
                _ => {
                    if let Some(next) = element {
                        out.push((next, id, false));
                    }
                }
            }
        }
        if let Some(element) = element {
            previous = Some((element, element_end));
            cursor = element_end;
        }
    }
}

fn spans_line_break(source: &str, start: u32, end: u32) -> bool {
    source
        .get(start as usize..end as usize)
        .is_some_and(|text| text.contains(is_line_break))
}

#[cfg(test)]
mod tests {
    use crate::parser::parse;

    #[test]
    fn comment_on_statement_line_trails_it() {
        let file = parse("a(); // one\nb();").unwrap();
        let statements = &file.arena.statement_list(file.root).unwrap().statements;
        assert_eq!(file.arena.trailing_comments(statements[0]).len(), 1);
        assert!(file.arena.leading_comments(statements[1]).is_empty());
    }

    #[test]
    fn comment_inside_statement_is_not_attached() {
        let file = parse("f(/* arg */ 1);").unwrap();
        let statements = &file.arena.statement_list(file.root).unwrap().statements;
        assert!(file.arena.attached_comments(statements[0]).is_none());
    }
}
