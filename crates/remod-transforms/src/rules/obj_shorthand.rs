//! `{ x: x }` → `{ x }`.

use crate::contract::{Rewrite, Transform, TransformCtx, TransformError};
use remod_parser::NodeIndex;
use remod_parser::parser::NodeKind;

#[derive(Debug, Default)]
pub struct ObjShorthand;

impl Transform for ObjShorthand {
    fn name(&self) -> &'static str {
        "obj-shorthand"
    }

    fn visit(&mut self, ctx: &mut TransformCtx<'_>, node: NodeIndex) -> Result<Rewrite, TransformError> {
        let arena = &*ctx.arena;
        let Some(NodeKind::PropertyAssignment { name, initializer }) = arena.kind(node) else {
            return Ok(Rewrite::Skip);
        };
        let (Some(key), Some(value)) = (arena.identifier_name(*name), arena.identifier_name(*initializer)) else {
            return Ok(Rewrite::Skip);
        };
        if key != value {
            return Ok(Rewrite::Skip);
        }
        let shorthand = NodeKind::ShorthandPropertyAssignment {
            name: *initializer,
            initializer: NodeIndex::NONE,
        };
        Ok(Rewrite::Replace(ctx.arena.add_synthesized(shorthand)))
    }
}
