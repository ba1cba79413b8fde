//! Transform utilities for syntax analysis.
//!
//! Shape queries used by several transforms: `this`/`arguments` capture,
//! binding names of declarations and patterns, reference positions, and
//! dotted member paths such as `Foo.prototype.bar`.

use crate::parser::{NodeArena, NodeIndex, NodeKind};
use smallvec::SmallVec;

#[derive(Clone, Copy)]
enum ReferenceTarget {
    Arguments,
    This,
}

impl ReferenceTarget {
    const fn identifier_name(self) -> &'static str {
        match self {
            Self::Arguments => "arguments",
            Self::This => "this",
        }
    }

    const fn include_keyword_check(self) -> bool {
        matches!(self, Self::This)
    }
}

/// Check if an AST node contains a reference to `this` or `super`.
///
/// Ordinary functions and methods bind their own `this`, so they are not
/// searched; arrow functions are.
#[must_use]
pub fn contains_this_reference(arena: &NodeArena, node_idx: NodeIndex) -> bool {
    contains_target_reference(arena, node_idx, ReferenceTarget::This)
}

/// Check if a node contains a reference to `arguments`.
///
/// Regular functions have their own `arguments`, so we don't recurse into
/// them. Only arrow functions inherit the parent's `arguments`.
#[must_use]
pub fn contains_arguments_reference(arena: &NodeArena, node_idx: NodeIndex) -> bool {
    contains_target_reference(arena, node_idx, ReferenceTarget::Arguments)
}

fn contains_target_reference(
    arena: &NodeArena,
    node_idx: NodeIndex,
    target: ReferenceTarget,
) -> bool {
    let Some(node) = arena.get(node_idx) else {
        return false;
    };

    match &node.kind {
        NodeKind::ThisExpression | NodeKind::SuperExpression => {
            return target.include_keyword_check();
        }
        NodeKind::Identifier { name } => {
            return name == target.identifier_name() && is_reference_identifier(arena, node_idx);
        }
        _ => {}
    }

    target_reference_children(arena, node_idx)
        .into_iter()
        .any(|child_idx| contains_target_reference(arena, child_idx, target))
}

fn target_reference_children(arena: &NodeArena, node_idx: NodeIndex) -> SmallVec<[NodeIndex; 8]> {
    let Some(node) = arena.get(node_idx) else {
        return SmallVec::new();
    };

    match &node.kind {
        NodeKind::FunctionDeclaration(_) | NodeKind::FunctionExpression(_) => SmallVec::new(),
        NodeKind::MethodDeclaration(method) => {
            // Only a computed key is evaluated in the enclosing scope.
            SmallVec::from_slice(&[method.name])
        }
        _ => arena.children(node_idx),
    }
}

/// Whether an identifier node is a variable reference rather than a
/// property name (`a.name`, `{ name: v }`, method keys) or a label.
#[must_use]
pub fn is_reference_identifier(arena: &NodeArena, node_idx: NodeIndex) -> bool {
    let parent = arena.parent(node_idx);
    match arena.kind(parent) {
        Some(NodeKind::PropertyAccessExpression { name, .. }) => *name != node_idx,
        Some(NodeKind::PropertyAssignment { name, .. }) => *name != node_idx,
        Some(NodeKind::MethodDeclaration(method)) => method.name != node_idx,
        Some(NodeKind::LabeledStatement { label, .. }) => *label != node_idx,
        Some(NodeKind::BreakStatement { .. } | NodeKind::ContinueStatement { .. }) => false,
        _ => true,
    }
}

/// Names bound by a declaration target: an identifier or a destructuring
/// pattern built from object/array literals.
pub fn binding_names(arena: &NodeArena, target: NodeIndex) -> Vec<NodeIndex> {
    let mut names = Vec::new();
    collect_binding_names(arena, target, &mut names);
    names
}

fn collect_binding_names(arena: &NodeArena, target: NodeIndex, out: &mut Vec<NodeIndex>) {
    let Some(node) = arena.get(target) else {
        return;
    };
    match &node.kind {
        NodeKind::Identifier { .. } => out.push(target),
        NodeKind::ObjectLiteral { properties } => {
            for &property in &properties.nodes {
                match arena.kind(property) {
                    Some(NodeKind::PropertyAssignment { initializer, .. }) => {
                        collect_binding_names(arena, *initializer, out);
                    }
                    Some(NodeKind::ShorthandPropertyAssignment { name, .. }) => out.push(*name),
                    Some(NodeKind::SpreadElement { expression }) => {
                        collect_binding_names(arena, *expression, out);
                    }
                    _ => {}
                }
            }
        }
        NodeKind::ArrayLiteral { elements } => {
            for &element in &elements.nodes {
                collect_binding_names(arena, element, out);
            }
        }
        NodeKind::SpreadElement { expression } | NodeKind::ParenthesizedExpression { expression } => {
            collect_binding_names(arena, *expression, out);
        }
        NodeKind::Parameter { name, .. } => collect_binding_names(arena, *name, out),
        // `a = default` inside a pattern
        NodeKind::BinaryExpression { left, .. } => collect_binding_names(arena, *left, out),
        _ => {}
    }
}

/// Dotted path of a member chain made of identifiers and string-keyed
/// element accesses: `Foo.prototype['bar']` gives `["Foo", "prototype", "bar"]`.
/// `None` for anything else (calls, computed non-literal keys, `this`).
pub fn member_path(arena: &NodeArena, node_idx: NodeIndex) -> Option<SmallVec<[&str; 4]>> {
    let mut path = SmallVec::new();
    collect_member_path(arena, node_idx, &mut path)?;
    Some(path)
}

fn collect_member_path<'a>(
    arena: &'a NodeArena,
    node_idx: NodeIndex,
    path: &mut SmallVec<[&'a str; 4]>,
) -> Option<()> {
    match arena.kind(node_idx)? {
        NodeKind::Identifier { name } => {
            path.push(name);
            Some(())
        }
        NodeKind::PropertyAccessExpression {
            expression,
            name,
            optional: false,
        } => {
            collect_member_path(arena, *expression, path)?;
            path.push(arena.identifier_name(*name)?);
            Some(())
        }
        NodeKind::ElementAccessExpression {
            expression,
            argument,
            optional: false,
        } => {
            collect_member_path(arena, *expression, path)?;
            match arena.kind(*argument)? {
                NodeKind::StringLiteral { value } => path.push(value),
                _ => return None,
            }
            Some(())
        }
        _ => None,
    }
}

/// Strip any number of wrapping parentheses.
pub fn skip_parentheses(arena: &NodeArena, mut node_idx: NodeIndex) -> NodeIndex {
    while let Some(NodeKind::ParenthesizedExpression { expression }) = arena.kind(node_idx) {
        node_idx = *expression;
    }
    node_idx
}

/// Nearest ancestor (excluding the node itself) matching `predicate`.
pub fn find_ancestor(
    arena: &NodeArena,
    node_idx: NodeIndex,
    predicate: impl Fn(&NodeKind) -> bool,
) -> Option<NodeIndex> {
    let mut current = arena.parent(node_idx);
    while let Some(node) = arena.get(current) {
        if predicate(&node.kind) {
            return Some(current);
        }
        current = node.parent;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn expression_of_first_statement(file: &crate::ParsedFile) -> NodeIndex {
        let statement = file.arena.statement_list(file.root).unwrap().statements[0];
        match file.arena.kind(statement) {
            Some(NodeKind::ExpressionStatement { expression }) => *expression,
            _ => panic!("expected expression statement"),
        }
    }

    #[test]
    fn this_inside_nested_function_is_not_captured() {
        let file = parse("(function() { return function() { return this; }; });").unwrap();
        let expression = expression_of_first_statement(&file);
        let NodeKind::ParenthesizedExpression { expression } = file.arena.kind(expression).unwrap()
        else {
            panic!("expected parentheses");
        };
        let NodeKind::FunctionExpression(data) = file.arena.kind(*expression).unwrap() else {
            panic!("expected function");
        };
        assert!(!contains_this_reference(&file.arena, data.body));
    }

    #[test]
    fn this_inside_arrow_is_captured() {
        let file = parse("f(() => this.x);").unwrap();
        let expression = expression_of_first_statement(&file);
        assert!(contains_this_reference(&file.arena, expression));
    }

    #[test]
    fn property_named_arguments_is_not_a_reference() {
        let file = parse("a.arguments + b;").unwrap();
        let expression = expression_of_first_statement(&file);
        assert!(!contains_arguments_reference(&file.arena, expression));
    }

    #[test]
    fn member_path_reads_dotted_and_string_keys() {
        let file = parse("Foo.prototype['bar'];").unwrap();
        let expression = expression_of_first_statement(&file);
        let path = member_path(&file.arena, expression).unwrap();
        assert_eq!(path.as_slice(), &["Foo", "prototype", "bar"]);
    }

    #[test]
    fn binding_names_walk_patterns() {
        let file = parse("var {a, b: [c, ...d], e = 1} = o;").unwrap();
        let statement = file.arena.statement_list(file.root).unwrap().statements[0];
        let Some(NodeKind::VariableStatement { declaration_list }) = file.arena.kind(statement)
        else {
            panic!("expected variable statement");
        };
        let Some(NodeKind::VariableDeclarationList(list)) = file.arena.kind(*declaration_list)
        else {
            panic!("expected declaration list");
        };
        let Some(NodeKind::VariableDeclaration { name, .. }) =
            file.arena.kind(list.declarations.nodes[0])
        else {
            panic!("expected declaration");
        };
        let names: Vec<_> = binding_names(&file.arena, *name)
            .into_iter()
            .filter_map(|n| file.arena.identifier_name(n))
            .collect();
        assert_eq!(names, ["a", "c", "d", "e"]);
    }
}
