//! `{ f: function() {} }` → `{ f() {} }`.

use crate::class::builder::references_name;
use crate::contract::{Rewrite, Transform, TransformCtx, TransformError};
use remod_parser::NodeIndex;
use remod_parser::parser::{MethodData, MethodKind, NodeKind};
use remod_parser::syntax::transform_utils::skip_parentheses;

#[derive(Debug, Default)]
pub struct ObjMethod;

impl Transform for ObjMethod {
    fn name(&self) -> &'static str {
        "obj-method"
    }

    fn visit(&mut self, ctx: &mut TransformCtx<'_>, node: NodeIndex) -> Result<Rewrite, TransformError> {
        let arena = &*ctx.arena;
        let Some(NodeKind::PropertyAssignment { name, initializer }) = arena.kind(node) else {
            return Ok(Rewrite::Skip);
        };
        if !matches!(arena.kind(arena.parent(node)), Some(NodeKind::ObjectLiteral { .. })) {
            return Ok(Rewrite::Skip);
        }
        let Some(NodeKind::FunctionExpression(function)) = arena.kind(skip_parentheses(arena, *initializer)) else {
            return Ok(Rewrite::Skip);
        };
        // A named function expression may call itself by that name; a
        // method has no such binding.
        if let Some(own_name) = arena.identifier_name(function.name) {
            if references_name(arena, function.body, own_name) {
                return Ok(Rewrite::Skip);
            }
        }
        let method = MethodData {
            kind: MethodKind::Method,
            is_static: false,
            name: *name,
            parameters: function.parameters.clone(),
            body: function.body,
            is_async: function.is_async,
            is_generator: function.is_generator,
        };
        Ok(Rewrite::Replace(ctx.arena.add_synthesized(NodeKind::MethodDeclaration(method))))
    }
}
