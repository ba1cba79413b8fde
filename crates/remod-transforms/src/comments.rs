//! Comment harvesting for nodes that are about to be removed.

use indexmap::IndexSet;
use remod_parser::parser::AttachedComments;
use remod_parser::{CommentId, NodeArena, NodeIndex};

/// Comments attached to `nodes`, in order: for each node its leading
/// comments, then its trailing ones. A comment shared by two nodes is
/// returned once, at its first position.
pub fn extract_comments(arena: &NodeArena, nodes: &[NodeIndex]) -> Vec<CommentId> {
    let mut seen: IndexSet<CommentId> = IndexSet::new();
    for &node in nodes {
        seen.extend(arena.leading_comments(node).iter().copied());
        seen.extend(arena.trailing_comments(node).iter().copied());
    }
    seen.into_iter().collect()
}

/// Attach harvested comments to a synthesized node so they print ahead
/// of it.
pub fn attach_leading(arena: &mut NodeArena, node: NodeIndex, comments: Vec<CommentId>) {
    if comments.is_empty() {
        return;
    }
    let mut attached = arena.attached_comments(node).cloned().unwrap_or_default();
    attached.leading.extend(comments);
    arena.set_attached_comments(node, attached);
}

/// Move every comment of `from` onto `to`, keeping leading and trailing
/// sides apart.
pub fn transfer_comments(arena: &mut NodeArena, from: NodeIndex, to: NodeIndex) {
    let Some(source) = arena.attached_comments(from).cloned() else {
        return;
    };
    let mut target = arena.attached_comments(to).cloned().unwrap_or_default();
    target.leading.extend(source.leading);
    target.trailing.extend(source.trailing);
    arena.set_attached_comments(to, target);
    arena.set_attached_comments(from, AttachedComments::default());
}

#[cfg(test)]
mod tests {
    use super::*;
    use remod_parser::parse;

    #[test]
    fn leading_then_trailing_per_node() {
        let file = parse("// a\nf(); // b\n// c\ng(); // d\n").unwrap();
        let stmts = file.arena.statement_list(file.root).unwrap().statements.clone();
        let comments = extract_comments(&file.arena, &stmts);
        let texts: Vec<_> = comments
            .iter()
            .map(|id| {
                let range = file.arena.comment(*id).unwrap();
                &"// a\nf(); // b\n// c\ng(); // d\n"[range.pos as usize..range.end as usize]
            })
            .collect();
        assert_eq!(texts, ["// a", "// b", "// c", "// d"]);
    }

    #[test]
    fn repeated_nodes_do_not_duplicate_comments() {
        let file = parse("// a\nf();\n").unwrap();
        let stmt = file.arena.statement_list(file.root).unwrap().statements[0];
        let once = extract_comments(&file.arena, &[stmt]);
        let twice = extract_comments(&file.arena, &[stmt, stmt]);
        assert_eq!(once, twice);
        assert_eq!(once, extract_comments(&file.arena, &[stmt]));
    }
}
