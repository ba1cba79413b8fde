//! `var` → `let` / `const`.

use crate::contract::{Rewrite, Transform, TransformCtx, TransformError};
use crate::scope::{ListVerdict, ScopeAnalysis};
use remod_parser::NodeIndex;
use remod_parser::parser::{DeclarationKind, NodeKind};

pub const UNABLE_TO_TRANSFORM: &str = "Unable to transform var";

#[derive(Debug, Default)]
pub struct LetDeclarations {
    analysis: ScopeAnalysis,
}

impl LetDeclarations {
    pub fn new() -> Self {
        LetDeclarations::default()
    }
}

impl Transform for LetDeclarations {
    fn name(&self) -> &'static str {
        "let"
    }

    fn prepare(&mut self, ctx: &mut TransformCtx<'_>) -> Result<(), TransformError> {
        self.analysis = ScopeAnalysis::analyze(ctx.arena, ctx.root);
        Ok(())
    }

    fn visit(&mut self, ctx: &mut TransformCtx<'_>, node: NodeIndex) -> Result<Rewrite, TransformError> {
        let Some(NodeKind::VariableDeclarationList(list)) = ctx.arena.kind(node) else {
            return Ok(Rewrite::Skip);
        };
        if list.kind != DeclarationKind::Var {
            return Ok(Rewrite::Skip);
        }
        let kind = match self.analysis.verdict(node) {
            Some(ListVerdict::Const) => DeclarationKind::Const,
            Some(ListVerdict::Let) => DeclarationKind::Let,
            Some(ListVerdict::Unsafe) => {
                let pos = ctx.pos_of(node);
                ctx.warn(pos, UNABLE_TO_TRANSFORM);
                return Ok(Rewrite::Skip);
            }
            None => return Ok(Rewrite::Skip),
        };
        if let Some(NodeKind::VariableDeclarationList(list)) = ctx.arena.get_mut(node).map(|n| &mut n.kind) {
            list.kind = kind;
        }
        Ok(Rewrite::Edited)
    }
}
