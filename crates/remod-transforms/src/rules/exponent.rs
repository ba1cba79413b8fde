//! `Math.pow(a, b)` → `a ** b`.

use crate::contract::{Rewrite, Transform, TransformCtx, TransformError};
use remod_parser::NodeIndex;
use remod_parser::parser::NodeKind;
use remod_parser::syntax::transform_utils::member_path;
use remod_scanner::SyntaxKind;

#[derive(Debug, Default)]
pub struct Exponent;

impl Transform for Exponent {
    fn name(&self) -> &'static str {
        "exponent"
    }

    fn visit(&mut self, ctx: &mut TransformCtx<'_>, node: NodeIndex) -> Result<Rewrite, TransformError> {
        let arena = &*ctx.arena;
        let Some(NodeKind::CallExpression {
            expression,
            arguments,
            optional: false,
        }) = arena.kind(node)
        else {
            return Ok(Rewrite::Skip);
        };
        if !member_path(arena, *expression).is_some_and(|path| path.as_slice() == ["Math", "pow"]) {
            return Ok(Rewrite::Skip);
        }
        let &[base, exponent] = arguments.nodes.as_slice() else {
            return Ok(Rewrite::Skip);
        };
        let spread = |argument| matches!(arena.kind(argument), Some(NodeKind::SpreadElement { .. }));
        if spread(base) || spread(exponent) {
            return Ok(Rewrite::Skip);
        }
        let power = NodeKind::BinaryExpression {
            left: base,
            operator: SyntaxKind::AsteriskAsteriskToken,
            right: exponent,
        };
        Ok(Rewrite::Replace(ctx.arena.add_synthesized(power)))
    }
}
