//! The single-site rewrites.
//!
//! Each rule looks at one node shape and either rewrites it or leaves it
//! alone; none of them needs to see more than the node and its immediate
//! surroundings, except `let`, which runs a scope analysis up front.

mod arg_spread;
mod arrow;
mod arrow_return;
mod exponent;
mod let_decl;
mod multi_var;
mod no_strict;
mod obj_method;
mod obj_shorthand;

pub use arg_spread::ArgSpread;
pub use arrow::Arrow;
pub use arrow_return::ArrowReturn;
pub use exponent::Exponent;
pub use let_decl::LetDeclarations;
pub use multi_var::MultiVar;
pub use no_strict::NoStrict;
pub use obj_method::ObjMethod;
pub use obj_shorthand::ObjShorthand;

use remod_parser::parser::NodeKind;
use remod_parser::{NodeArena, NodeIndex, NodeList};

/// The returned expression of a `{ return expr; }` block, provided no
/// comment sits in the block outside that expression.
pub(crate) fn single_return_expression(arena: &NodeArena, body: NodeIndex) -> Option<NodeIndex> {
    let [statement] = arena.statement_list(body)?.statements.as_slice() else {
        return None;
    };
    let NodeKind::ReturnStatement { expression } = arena.kind(*statement)? else {
        return None;
    };
    if expression.is_none() {
        return None;
    }
    let block = arena.get(body)?;
    let returned = arena.get(*expression)?;
    let stray_comment = arena.comments().iter().any(|comment| {
        comment.pos >= block.pos
            && comment.end <= block.end
            && !(comment.pos >= returned.pos && comment.end <= returned.end)
    });
    (!stray_comment).then_some(*expression)
}

/// Whether a parameter list is one plain identifier (`x => ...`).
pub(crate) fn is_single_plain_parameter(arena: &NodeArena, parameters: &NodeList) -> bool {
    let [parameter] = parameters.nodes.as_slice() else {
        return false;
    };
    match arena.kind(*parameter) {
        Some(NodeKind::Parameter {
            name,
            initializer,
            is_rest: false,
        }) => initializer.is_none() && arena.identifier_name(*name).is_some(),
        _ => false,
    }
}
