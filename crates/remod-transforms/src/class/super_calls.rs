//! Rewriting explicit superclass calls into `super`.
//!
//! ```javascript
//! Base.call(this, a, b);              // constructor → super(a, b);
//! Base.apply(this, arguments);        // constructor → super(...arguments);
//! Base.prototype.m.call(this, a);     // method      → super.m(a);
//! ```

use super::method_candidate::SuperClass;
use remod_parser::parser::NodeKind;
use remod_parser::syntax::transform_utils::{member_path, skip_parentheses};
use remod_parser::{NodeArena, NodeIndex, NodeList};
use tracing::trace;

/// Arguments of a forwarded call, after the `this` argument.
enum Forwarded {
    List(Vec<NodeIndex>),
    /// `.apply(this, arguments)`
    Arguments(NodeIndex),
}

/// `target.call(this, ...)` or `target.apply(this, arguments)` where the
/// path of `target` equals `expected`.
fn forwarded_call(arena: &NodeArena, call: NodeIndex, expected: &[&str]) -> Option<Forwarded> {
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
    let path = member_path(arena, *target)?;
    if path.as_slice() != expected {
        return None;
    }
    let (&this_arg, rest) = arguments.nodes.split_first()?;
    if !matches!(arena.kind(skip_parentheses(arena, this_arg)), Some(NodeKind::ThisExpression)) {
        return None;
    }
    match arena.identifier_name(*name)? {
        "call" => Some(Forwarded::List(rest.to_vec())),
        "apply" => match rest {
            [args] if arena.identifier_name(*args) == Some("arguments") => Some(Forwarded::Arguments(*args)),
            _ => None,
        },
        _ => None,
    }
}

fn base_path(super_class: &SuperClass) -> Vec<&str> {
    super_class.path.iter().map(String::as_str).collect()
}

/// Call expression of a top-level `Base.call(this, ...)` statement.
fn constructor_call_of(arena: &NodeArena, statement: NodeIndex, base: &[&str]) -> Option<NodeIndex> {
    let NodeKind::ExpressionStatement { expression } = arena.kind(statement)? else {
        return None;
    };
    forwarded_call(arena, *expression, base).map(|_| *expression)
}

/// Position of the top-level superclass constructor call in `body`.
pub fn find_constructor_call(arena: &NodeArena, body: NodeIndex, super_class: &SuperClass) -> Option<usize> {
    let base = base_path(super_class);
    arena
        .statement_list(body)?
        .statements
        .iter()
        .position(|&statement| constructor_call_of(arena, statement, &base).is_some())
}

fn synthesize_arguments(arena: &mut NodeArena, forwarded: Forwarded) -> NodeList {
    match forwarded {
        Forwarded::List(nodes) => NodeList::new(nodes),
        Forwarded::Arguments(arguments) => {
            let spread = arena.add_synthesized(NodeKind::SpreadElement {
                expression: arguments,
            });
            NodeList::new(vec![spread])
        }
    }
}

/// Turn the top-level superclass constructor calls of a constructor body
/// into `super(...)`.
pub fn rewrite_constructor_body(arena: &mut NodeArena, body: NodeIndex, super_class: Option<&SuperClass>) {
    let Some(super_class) = super_class else {
        return;
    };
    let base = base_path(super_class);
    let statements = arena
        .statement_list(body)
        .map(|list| list.statements.clone())
        .unwrap_or_default();
    let calls: Vec<(NodeIndex, Forwarded)> = statements
        .into_iter()
        .filter_map(|statement| {
            let call = constructor_call_of(arena, statement, &base)?;
            Some((call, forwarded_call(arena, call, &base)?))
        })
        .collect();

    for (call, forwarded) in calls {
        let callee = arena.add_synthesized(NodeKind::SuperExpression);
        let arguments = synthesize_arguments(arena, forwarded);
        let super_call = arena.add_synthesized(NodeKind::CallExpression {
            expression: callee,
            arguments,
            optional: false,
        });
        trace!(call = call.0, "superclass constructor call becomes super()");
        arena.replace_node(call, super_call);
    }
}

/// Turn `Base.prototype.m.call(this, ...)` anywhere in a method body into
/// `super.m(...)`. Nested non-arrow functions have their own `this` and are
/// left alone.
pub fn rewrite_method_body(arena: &mut NodeArena, body: NodeIndex, super_class: Option<&SuperClass>) {
    let Some(super_class) = super_class else {
        return;
    };
    let mut found: Vec<(NodeIndex, String, Forwarded)> = Vec::new();
    let mut pending = vec![body];
    while let Some(node) = pending.pop() {
        let Some(kind) = arena.kind(node) else {
            continue;
        };
        if node != body
            && matches!(
                kind,
                NodeKind::FunctionExpression(_)
                    | NodeKind::FunctionDeclaration(_)
                    | NodeKind::MethodDeclaration(_)
                    | NodeKind::ClassDeclaration(_)
                    | NodeKind::ClassExpression(_)
            )
        {
            continue;
        }
        if let Some((method, forwarded)) = super_method_call(arena, node, super_class) {
            found.push((node, method, forwarded));
        }
        pending.extend(arena.children(node).into_iter().rev());
    }

    for (call, method, forwarded) in found {
        let receiver = arena.add_synthesized(NodeKind::SuperExpression);
        let name = arena.synthesize_identifier(&method);
        let callee = arena.add_synthesized(NodeKind::PropertyAccessExpression {
            expression: receiver,
            name,
            optional: false,
        });
        let arguments = synthesize_arguments(arena, forwarded);
        let super_call = arena.add_synthesized(NodeKind::CallExpression {
            expression: callee,
            arguments,
            optional: false,
        });
        trace!(call = call.0, method = %method, "superclass method call becomes super.m()");
        arena.replace_node(call, super_call);
    }
}

/// `Base.prototype.<m>.call(this, ...)`: the method name and arguments.
fn super_method_call(arena: &NodeArena, call: NodeIndex, super_class: &SuperClass) -> Option<(String, Forwarded)> {
    let NodeKind::CallExpression { expression, .. } = arena.kind(call)? else {
        return None;
    };
    let NodeKind::PropertyAccessExpression { expression: target, .. } = arena.kind(*expression)? else {
        return None;
    };
    let path = member_path(arena, *target)?;
    let base = base_path(super_class);
    let method = match path.as_slice() {
        [head @ .., "prototype", method] if head == base.as_slice() => method.to_string(),
        _ => return None,
    };
    let mut expected = base;
    expected.push("prototype");
    expected.push(&method);
    let forwarded = forwarded_call(arena, call, &expected)?;
    Some((method, forwarded))
}
