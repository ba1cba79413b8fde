//! `x => { return y; }` → `x => y`.

use super::single_return_expression;
use crate::contract::{Rewrite, Transform, TransformCtx, TransformError};
use remod_parser::NodeIndex;
use remod_parser::parser::{ArrowFunctionData, NodeKind};

#[derive(Debug, Default)]
pub struct ArrowReturn;

impl Transform for ArrowReturn {
    fn name(&self) -> &'static str {
        "arrow-return"
    }

    fn visit(&mut self, ctx: &mut TransformCtx<'_>, node: NodeIndex) -> Result<Rewrite, TransformError> {
        let Some(NodeKind::ArrowFunction(data)) = ctx.arena.kind(node) else {
            return Ok(Rewrite::Skip);
        };
        let Some(expression) = single_return_expression(ctx.arena, data.body) else {
            return Ok(Rewrite::Skip);
        };
        let arrow = ArrowFunctionData {
            parameters: data.parameters.clone(),
            body: expression,
            is_async: data.is_async,
            bare_parameter: data.bare_parameter,
        };
        Ok(Rewrite::Replace(ctx.arena.add_synthesized(NodeKind::ArrowFunction(arrow))))
    }
}
