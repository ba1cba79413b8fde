//! Statement-set replacement.
//!
//! Rewrites a container's statement sequence in one step: the anchor and
//! every other listed node are removed, and the replacements take the
//! anchor's place. The new sequence is computed in full before anything
//! is written, so a failed instruction leaves the container untouched.

use crate::contract::TransformError;
use indexmap::IndexSet;
use remod_parser::{NodeArena, NodeIndex};
use tracing::debug;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReplacementInstruction {
    /// Statement container (program, block or `case` clause).
    pub parent: NodeIndex,
    /// Statement whose position the replacements take.
    pub anchor: NodeIndex,
    /// Further siblings to delete.
    pub others: IndexSet<NodeIndex>,
    /// Nodes to insert at the anchor's position, in order. May be empty.
    pub replacements: Vec<NodeIndex>,
}

impl ReplacementInstruction {
    pub fn new(parent: NodeIndex, anchor: NodeIndex) -> Self {
        ReplacementInstruction {
            parent,
            anchor,
            others: IndexSet::new(),
            replacements: Vec::new(),
        }
    }

    /// Delete `anchor` without putting anything in its place.
    pub fn removal(parent: NodeIndex, anchor: NodeIndex) -> Self {
        ReplacementInstruction::new(parent, anchor)
    }

    pub fn with_others(mut self, others: impl IntoIterator<Item = NodeIndex>) -> Self {
        self.others.extend(others);
        self.others.shift_remove(&self.anchor);
        self
    }

    pub fn with_replacements(mut self, replacements: Vec<NodeIndex>) -> Self {
        self.replacements = replacements;
        self
    }
}

/// Execute one instruction against the arena.
///
/// Fails with `StructuralMismatch` when `parent` is not a statement
/// container, or when the anchor or one of the other nodes is no longer
/// among its statements.
pub fn apply(arena: &mut NodeArena, instruction: &ReplacementInstruction) -> Result<(), TransformError> {
    let parent_pos = arena.get(instruction.parent).map_or(0, |node| node.pos);
    let Some(list) = arena.statement_list(instruction.parent) else {
        return Err(TransformError::mismatch(
            parent_pos,
            "replacement parent is not a statement container",
        ));
    };
    let current = &list.statements;

    let Some(anchor_index) = current.iter().position(|&s| s == instruction.anchor) else {
        return Err(TransformError::mismatch(
            arena.get(instruction.anchor).map_or(parent_pos, |node| node.pos),
            "anchor is not a member of its container",
        ));
    };
    if let Some(&missing) = instruction.others.iter().find(|other| !current.contains(other)) {
        return Err(TransformError::mismatch(
            arena.get(missing).map_or(parent_pos, |node| node.pos),
            "statement scheduled for removal is not a member of the container",
        ));
    }

    let mut statements = Vec::with_capacity(current.len() + instruction.replacements.len());
    for (index, &statement) in current.iter().enumerate() {
        if index == anchor_index {
            statements.extend(instruction.replacements.iter().copied());
        } else if !instruction.others.contains(&statement) {
            statements.push(statement);
        }
    }

    debug!(
        anchor = instruction.anchor.0,
        removed = instruction.others.len() + 1,
        inserted = instruction.replacements.len(),
        "replacing statements"
    );
    adopt_anchor_span(arena, instruction.anchor, &instruction.replacements);
    arena.set_statements(instruction.parent, statements);
    Ok(())
}

/// Synthesized replacements stand in for the anchor: they take its span and
/// record the original statement it came from.
fn adopt_anchor_span(arena: &mut NodeArena, anchor: NodeIndex, replacements: &[NodeIndex]) {
    let Some(anchor_node) = arena.get(anchor) else {
        return;
    };
    let (pos, end) = (anchor_node.pos, anchor_node.end);
    let origin = if anchor_node.is_synthesized() && anchor_node.origin.is_some() {
        anchor_node.origin
    } else {
        anchor
    };
    for &replacement in replacements {
        if let Some(node) = arena.get_mut(replacement) {
            if node.is_synthesized() {
                node.pos = pos;
                node.end = end;
                node.origin = origin;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use remod_parser::parse;
    use remod_parser::parser::NodeKind;

    #[test]
    fn removes_and_inserts_at_anchor() {
        let mut file = parse("a();\nb();\nc();\nd();").unwrap();
        let stmts = file.arena.statement_list(file.root).unwrap().statements.clone();
        let new = file.arena.add_synthesized(NodeKind::EmptyStatement);
        let instruction = ReplacementInstruction::new(file.root, stmts[1])
            .with_others([stmts[3]])
            .with_replacements(vec![new]);
        apply(&mut file.arena, &instruction).unwrap();

        let after = &file.arena.statement_list(file.root).unwrap().statements;
        assert_eq!(after, &vec![stmts[0], new, stmts[2]]);
        let new_node = file.arena.get(new).unwrap();
        assert_eq!(new_node.origin, stmts[1]);
        assert_eq!(new_node.parent, file.root);
    }

    #[test]
    fn missing_anchor_fails_without_touching_the_container() {
        let mut file = parse("a();\nb();").unwrap();
        let stmts = file.arena.statement_list(file.root).unwrap().statements.clone();
        let removal = ReplacementInstruction::removal(file.root, stmts[0]);
        apply(&mut file.arena, &removal).unwrap();

        let again = ReplacementInstruction::removal(file.root, stmts[0]).with_others([stmts[1]]);
        let error = apply(&mut file.arena, &again).unwrap_err();
        assert!(matches!(error, TransformError::StructuralMismatch { .. }));
        assert_eq!(
            file.arena.statement_list(file.root).unwrap().statements,
            vec![stmts[1]]
        );
    }

    #[test]
    fn non_container_parent_is_a_mismatch() {
        let mut file = parse("f();").unwrap();
        let stmt = file.arena.statement_list(file.root).unwrap().statements[0];
        let error = apply(&mut file.arena, &ReplacementInstruction::removal(stmt, stmt)).unwrap_err();
        assert!(matches!(error, TransformError::StructuralMismatch { .. }));
    }
}
