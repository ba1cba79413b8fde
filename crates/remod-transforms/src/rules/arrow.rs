//! Callback `function` expressions → arrow functions.
//!
//! A function converts when it is anonymous, not a generator, and does not
//! use `this`, `super` or `arguments`; `function() {}.bind(this)` converts
//! even when it uses `this`. A body that is a single `return` becomes an
//! expression body.

use super::{is_single_plain_parameter, single_return_expression};
use crate::contract::{Rewrite, Transform, TransformCtx, TransformError};
use remod_parser::parser::{ArrowFunctionData, FunctionData, NodeKind};
use remod_parser::syntax::transform_utils::{contains_arguments_reference, contains_this_reference, skip_parentheses};
use remod_parser::{NodeArena, NodeIndex};

pub const ARGUMENTS_IN_ARROW: &str = "Can not use arguments in arrow function";

#[derive(Debug, Default)]
pub struct Arrow;

impl Transform for Arrow {
    fn name(&self) -> &'static str {
        "arrow"
    }

    fn visit(&mut self, ctx: &mut TransformCtx<'_>, node: NodeIndex) -> Result<Rewrite, TransformError> {
        match ctx.arena.kind(node) {
            Some(NodeKind::FunctionExpression(_)) => visit_function(ctx, node),
            Some(NodeKind::CallExpression { .. }) => visit_bind_call(ctx, node),
            _ => Ok(Rewrite::Skip),
        }
    }
}

fn visit_function(ctx: &mut TransformCtx<'_>, function: NodeIndex) -> Result<Rewrite, TransformError> {
    let arena = &*ctx.arena;
    let Some(NodeKind::FunctionExpression(data)) = arena.kind(function) else {
        return Ok(Rewrite::Skip);
    };
    if enclosing_bind_call(arena, function).is_some() || !is_convertible(arena, data) {
        return Ok(Rewrite::Skip);
    }
    // Object members are left to `obj-method`; arrows cannot be constructed.
    match arena.kind(arena.parent(function)) {
        Some(NodeKind::PropertyAssignment { .. }) => return Ok(Rewrite::Skip),
        Some(NodeKind::NewExpression { expression, .. }) if *expression == function => {
            return Ok(Rewrite::Skip);
        }
        _ => {}
    }
    if contains_this_reference(arena, data.body) || parameters_use(arena, data, contains_this_reference) {
        return Ok(Rewrite::Skip);
    }
    if uses_arguments(arena, data) {
        let pos = ctx.pos_of(function);
        ctx.warn(pos, ARGUMENTS_IN_ARROW);
        return Ok(Rewrite::Skip);
    }
    let arrow = arrow_from(arena, data);
    Ok(Rewrite::Replace(ctx.arena.add_synthesized(NodeKind::ArrowFunction(arrow))))
}

/// `function() { ... }.bind(this)`: the whole call becomes the arrow.
fn visit_bind_call(ctx: &mut TransformCtx<'_>, call: NodeIndex) -> Result<Rewrite, TransformError> {
    let arena = &*ctx.arena;
    let Some(function) = bound_function_call(arena, call) else {
        return Ok(Rewrite::Skip);
    };
    let Some(NodeKind::FunctionExpression(data)) = arena.kind(function) else {
        return Ok(Rewrite::Skip);
    };
    if !is_convertible(arena, data) {
        return Ok(Rewrite::Skip);
    }
    if uses_arguments(arena, data) {
        let pos = ctx.pos_of(function);
        ctx.warn(pos, ARGUMENTS_IN_ARROW);
        return Ok(Rewrite::Skip);
    }
    let arrow = arrow_from(arena, data);
    Ok(Rewrite::Replace(ctx.arena.add_synthesized(NodeKind::ArrowFunction(arrow))))
}

/// The function expression of `<function>.bind(this)` when `call` is one.
fn bound_function_call(arena: &NodeArena, call: NodeIndex) -> Option<NodeIndex> {
    let NodeKind::CallExpression {
        expression,
        arguments,
        optional: false,
    } = arena.kind(call)?
    else {
        return None;
    };
    let NodeKind::PropertyAccessExpression {
        expression: target,
        name,
        optional: false,
    } = arena.kind(*expression)?
    else {
        return None;
    };
    if arena.identifier_name(*name) != Some("bind") {
        return None;
    }
    let [this_arg] = arguments.nodes.as_slice() else {
        return None;
    };
    if !matches!(arena.kind(*this_arg), Some(NodeKind::ThisExpression)) {
        return None;
    }
    let function = skip_parentheses(arena, *target);
    matches!(arena.kind(function), Some(NodeKind::FunctionExpression(_))).then_some(function)
}

/// The `.bind(this)` call `function` is the target of, if any.
fn enclosing_bind_call(arena: &NodeArena, function: NodeIndex) -> Option<NodeIndex> {
    let mut access = arena.parent(function);
    while matches!(arena.kind(access), Some(NodeKind::ParenthesizedExpression { .. })) {
        access = arena.parent(access);
    }
    let call = arena.parent(access);
    (bound_function_call(arena, call) == Some(function)).then_some(call)
}

/// Anonymous, not a generator: there is no arrow form otherwise.
fn is_convertible(arena: &NodeArena, data: &FunctionData) -> bool {
    data.name.is_none() && !data.is_generator && arena.statement_list(data.body).is_some()
}

fn parameters_use(arena: &NodeArena, data: &FunctionData, test: fn(&NodeArena, NodeIndex) -> bool) -> bool {
    data.parameters.nodes.iter().any(|&parameter| test(arena, parameter))
}

fn uses_arguments(arena: &NodeArena, data: &FunctionData) -> bool {
    contains_arguments_reference(arena, data.body) || parameters_use(arena, data, contains_arguments_reference)
}

fn arrow_from(arena: &NodeArena, data: &FunctionData) -> ArrowFunctionData {
    let body = single_return_expression(arena, data.body).unwrap_or(data.body);
    ArrowFunctionData {
        parameters: data.parameters.clone(),
        body,
        is_async: data.is_async,
        bare_parameter: is_single_plain_parameter(arena, &data.parameters),
    }
}
