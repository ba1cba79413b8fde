//! Removal of `"use strict"` directives, which modules and classes make
//! redundant.

use crate::contract::{Rewrite, Transform, TransformCtx, TransformError};
use crate::replacer::ReplacementInstruction;
use remod_parser::NodeIndex;
use remod_parser::parser::NodeKind;

#[derive(Debug, Default)]
pub struct NoStrict;

impl Transform for NoStrict {
    fn name(&self) -> &'static str {
        "no-strict"
    }

    fn visit(&mut self, ctx: &mut TransformCtx<'_>, node: NodeIndex) -> Result<Rewrite, TransformError> {
        let arena = &*ctx.arena;
        let has_prologue = match arena.kind(node) {
            Some(NodeKind::Program(_)) => true,
            Some(NodeKind::Block(_)) => arena
                .kind(arena.parent(node))
                .is_some_and(|parent| parent.is_function_like()),
            _ => false,
        };
        let Some(list) = arena.statement_list(node).filter(|_| has_prologue) else {
            return Ok(Rewrite::Skip);
        };

        let mut removals = Vec::new();
        for &statement in &list.statements {
            let Some(NodeKind::ExpressionStatement { expression }) = arena.kind(statement) else {
                break;
            };
            if !matches!(arena.kind(*expression), Some(NodeKind::StringLiteral { .. })) {
                break;
            }
            // Directives are matched on their raw text: an escaped
            // "use\x20strict" is not a directive.
            let raw = ctx.text_of(*expression);
            if raw == "\"use strict\"" || raw == "'use strict'" {
                removals.push(ReplacementInstruction::removal(node, statement));
            }
        }
        if removals.is_empty() {
            return Ok(Rewrite::Skip);
        }
        Ok(Rewrite::ReplaceRange(removals))
    }
}
