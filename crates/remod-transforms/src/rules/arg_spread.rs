//! `f.apply(undefined, xs)` → `f(...xs)` and `o.m.apply(o, xs)` → `o.m(...xs)`.

use crate::contract::{Rewrite, Transform, TransformCtx, TransformError};
use remod_parser::parser::NodeKind;
use remod_parser::{NodeArena, NodeIndex, NodeList};

#[derive(Debug, Default)]
pub struct ArgSpread;

impl Transform for ArgSpread {
    fn name(&self) -> &'static str {
        "arg-spread"
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
        let Some(NodeKind::PropertyAccessExpression {
            expression: target,
            name,
            optional: false,
        }) = arena.kind(*expression)
        else {
            return Ok(Rewrite::Skip);
        };
        if arena.identifier_name(*name) != Some("apply") {
            return Ok(Rewrite::Skip);
        }
        let &[this_arg, spread_arg] = arguments.nodes.as_slice() else {
            return Ok(Rewrite::Skip);
        };
        if matches!(arena.kind(spread_arg), Some(NodeKind::SpreadElement { .. })) {
            return Ok(Rewrite::Skip);
        }
        let target = *target;
        let receiver_matches = match arena.kind(target) {
            Some(NodeKind::Identifier { .. }) => is_null_or_undefined(arena, this_arg),
            Some(
                NodeKind::PropertyAccessExpression { expression: object, .. }
                | NodeKind::ElementAccessExpression { expression: object, .. },
            ) => same_reference(arena, *object, this_arg),
            _ => false,
        };
        if !receiver_matches {
            return Ok(Rewrite::Skip);
        }

        let spread = ctx.arena.add_synthesized(NodeKind::SpreadElement {
            expression: spread_arg,
        });
        let call = ctx.arena.add_synthesized(NodeKind::CallExpression {
            expression: target,
            arguments: NodeList::new(vec![spread]),
            optional: false,
        });
        Ok(Rewrite::Replace(call))
    }
}

fn is_null_or_undefined(arena: &NodeArena, node: NodeIndex) -> bool {
    matches!(arena.kind(node), Some(NodeKind::NullLiteral)) || arena.identifier_name(node) == Some("undefined")
}

/// Structural equality of side-effect-free receivers: `this`, identifiers
/// and property chains over them.
fn same_reference(arena: &NodeArena, a: NodeIndex, b: NodeIndex) -> bool {
    match (arena.kind(a), arena.kind(b)) {
        (Some(NodeKind::ThisExpression), Some(NodeKind::ThisExpression)) => true,
        (Some(NodeKind::Identifier { name: x }), Some(NodeKind::Identifier { name: y })) => x == y,
        (
            Some(NodeKind::PropertyAccessExpression {
                expression: left_object,
                name: left_name,
                optional: false,
            }),
            Some(NodeKind::PropertyAccessExpression {
                expression: right_object,
                name: right_name,
                optional: false,
            }),
        ) => {
            arena.identifier_name(*left_name) == arena.identifier_name(*right_name)
                && same_reference(arena, *left_object, *right_object)
        }
        _ => false,
    }
}
