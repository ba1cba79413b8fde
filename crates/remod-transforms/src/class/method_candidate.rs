//! One method of a class being assembled.

use super::super_calls;
use crate::comments::{attach_leading, extract_comments};
use indexmap::IndexSet;
use remod_parser::parser::{MethodData, MethodKind, NodeKind};
use remod_parser::{CommentId, NodeArena, NodeIndex, NodeList};

/// Identity of a class candidate within one transform pass. Methods refer
/// to their class through it instead of holding the class itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ClassId(pub u32);

/// Method flavour, which also selects how the body is synthesized.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CandidateKind {
    Method,
    Get,
    Set,
}

impl CandidateKind {
    pub fn method_kind(self) -> MethodKind {
        match self {
            CandidateKind::Method => MethodKind::Method,
            CandidateKind::Get => MethodKind::Get,
            CandidateKind::Set => MethodKind::Set,
        }
    }
}

/// The pieces of a function value carried into a method.
#[derive(Clone, Debug)]
pub struct FunctionParts {
    pub parameters: NodeList,
    pub body: NodeIndex,
    pub is_async: bool,
    pub is_generator: bool,
}

impl FunctionParts {
    /// Parts of a `function` expression or an object-literal method.
    pub fn of(arena: &NodeArena, node: NodeIndex) -> Option<FunctionParts> {
        match arena.kind(node)? {
            NodeKind::FunctionExpression(data) | NodeKind::FunctionDeclaration(data) => Some(FunctionParts {
                parameters: data.parameters.clone(),
                body: data.body,
                is_async: data.is_async,
                is_generator: data.is_generator,
            }),
            NodeKind::MethodDeclaration(data) => Some(FunctionParts {
                parameters: data.parameters.clone(),
                body: data.body,
                is_async: data.is_async,
                is_generator: data.is_generator,
            }),
            _ => None,
        }
    }

    pub fn has_empty_body(&self, arena: &NodeArena) -> bool {
        arena
            .statement_list(self.body)
            .is_none_or(|list| list.statements.is_empty())
    }
}

/// Superclass of a candidate: the original expression naming it and its
/// dotted path, used to spot `Base.prototype.m.call(this, ...)`.
#[derive(Clone, Debug)]
pub struct SuperClass {
    pub node: NodeIndex,
    pub path: Vec<String>,
}

/// Body treatment per method kind.
type BodyStrategy = fn(&mut NodeArena, NodeIndex, Option<&SuperClass>);

fn body_strategy(kind: CandidateKind) -> BodyStrategy {
    match kind {
        CandidateKind::Method => super_calls::rewrite_method_body,
        CandidateKind::Get | CandidateKind::Set => keep_body,
    }
}

fn keep_body(_arena: &mut NodeArena, _body: NodeIndex, _super_class: Option<&SuperClass>) {}

#[derive(Clone, Debug)]
pub struct MethodCandidate {
    pub name: String,
    pub kind: CandidateKind,
    pub is_static: bool,
    pub function: FunctionParts,
    /// Statement deleted once the class is emitted.
    pub source_statement: NodeIndex,
    /// Nodes whose comments move onto the method.
    pub comment_sources: IndexSet<NodeIndex>,
    pub owner: ClassId,
}

impl MethodCandidate {
    pub fn new(
        name: impl Into<String>,
        kind: CandidateKind,
        is_static: bool,
        function: FunctionParts,
        source_statement: NodeIndex,
        owner: ClassId,
    ) -> Self {
        let mut comment_sources = IndexSet::new();
        comment_sources.insert(source_statement);
        MethodCandidate {
            name: name.into(),
            kind,
            is_static,
            function,
            source_statement,
            comment_sources,
            owner,
        }
    }

    /// An empty body is a no-op override; such methods are still emitted.
    pub fn is_empty(&self, arena: &NodeArena) -> bool {
        self.function.has_empty_body(arena)
    }

    pub fn schedule_removal(&self, removals: &mut IndexSet<NodeIndex>) {
        removals.insert(self.source_statement);
    }

    /// Build the class member. Comments already placed elsewhere in the
    /// class (listed in `harvested`) are not attached twice.
    pub fn synthesize(
        &self,
        arena: &mut NodeArena,
        super_class: Option<&SuperClass>,
        harvested: &mut IndexSet<CommentId>,
    ) -> NodeIndex {
        body_strategy(self.kind)(arena, self.function.body, super_class);

        let name = synthesize_key(arena, &self.name);
        let method = arena.add_synthesized(NodeKind::MethodDeclaration(MethodData {
            kind: self.kind.method_kind(),
            is_static: self.is_static,
            name,
            parameters: self.function.parameters.clone(),
            body: self.function.body,
            is_async: self.function.is_async,
            is_generator: self.function.is_generator,
        }));

        let sources: Vec<_> = self.comment_sources.iter().copied().collect();
        let comments: Vec<_> = extract_comments(arena, &sources)
            .into_iter()
            .filter(|comment| harvested.insert(*comment))
            .collect();
        attach_leading(arena, method, comments);
        method
    }
}

/// Method key node: a bare identifier when the name allows it, otherwise a
/// string literal.
pub(crate) fn synthesize_key(arena: &mut NodeArena, name: &str) -> NodeIndex {
    if is_identifier_name(name) {
        arena.synthesize_identifier(name)
    } else {
        arena.add_synthesized(NodeKind::StringLiteral {
            value: name.to_string(),
        })
    }
}

fn is_identifier_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_alphabetic() || first == '_' || first == '$')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_names() {
        assert!(is_identifier_name("foo"));
        assert!(is_identifier_name("$_a1"));
        assert!(!is_identifier_name("1a"));
        assert!(!is_identifier_name("foo-bar"));
        assert!(!is_identifier_name(""));
    }
}
