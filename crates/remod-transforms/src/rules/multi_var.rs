//! `var a = 1, b = 2;` → one declaration per statement.

use crate::comments::attach_leading;
use crate::contract::{Rewrite, Transform, TransformCtx, TransformError};
use crate::replacer::ReplacementInstruction;
use remod_parser::parser::{AttachedComments, NodeKind, VariableDeclarationListData};
use remod_parser::{NodeArena, NodeIndex, NodeList};

#[derive(Debug, Default)]
pub struct MultiVar;

impl Transform for MultiVar {
    fn name(&self) -> &'static str {
        "multi-var"
    }

    fn visit(&mut self, ctx: &mut TransformCtx<'_>, node: NodeIndex) -> Result<Rewrite, TransformError> {
        let Some(list) = ctx.arena.statement_list(node) else {
            return Ok(Rewrite::Skip);
        };
        let statements = list.statements.clone();
        let mut instructions = Vec::new();
        for statement in statements {
            if let Some(replacements) = split_statement(ctx.arena, statement) {
                instructions.push(ReplacementInstruction::new(node, statement).with_replacements(replacements));
            }
        }
        if instructions.is_empty() {
            return Ok(Rewrite::Skip);
        }
        Ok(Rewrite::ReplaceRange(instructions))
    }
}

/// One synthesized statement per declarator, or `None` when the statement
/// declares a single name (or is not a declaration at all).
fn split_statement(arena: &mut NodeArena, statement: NodeIndex) -> Option<Vec<NodeIndex>> {
    let Some(NodeKind::VariableStatement { declaration_list }) = arena.kind(statement) else {
        return None;
    };
    let Some(NodeKind::VariableDeclarationList(data)) = arena.kind(*declaration_list) else {
        return None;
    };
    if data.declarations.len() < 2 {
        return None;
    }
    let (kind, declarations) = (data.kind, data.declarations.nodes.clone());

    let replacements: Vec<NodeIndex> = declarations
        .into_iter()
        .map(|declaration| {
            let list = arena.add_synthesized(NodeKind::VariableDeclarationList(VariableDeclarationListData {
                kind,
                declarations: NodeList::new(vec![declaration]),
                original_kind: kind,
            }));
            arena.add_synthesized(NodeKind::VariableStatement {
                declaration_list: list,
            })
        })
        .collect();

    // Comments above the statement go above the first declaration; a
    // comment after it stays at the end.
    let comments = arena.attached_comments(statement).cloned().unwrap_or_default();
    if let (Some(&first), Some(&last)) = (replacements.first(), replacements.last()) {
        attach_leading(arena, first, comments.leading.to_vec());
        if !comments.trailing.is_empty() {
            let leading = arena.leading_comments(last).iter().copied().collect();
            arena.set_attached_comments(
                last,
                AttachedComments {
                    leading,
                    trailing: comments.trailing,
                },
            );
        }
    }
    Some(replacements)
}
