//! A class assembled from a constructor function and its prototype
//! statements, ready to be turned into one replacement instruction.

use super::method_candidate::{CandidateKind, ClassId, FunctionParts, MethodCandidate, SuperClass};
use super::super_calls;
use crate::comments::{attach_leading, extract_comments};
use crate::replacer::ReplacementInstruction;
use indexmap::{IndexMap, IndexSet};
use remod_parser::parser::{ClassData, MethodData, MethodKind, NodeKind};
use remod_parser::syntax::transform_utils::contains_this_reference;
use remod_parser::{CommentId, NodeArena, NodeIndex, NodeList};
use tracing::debug;

/// Slot identity of a method: a later definition with the same key
/// overwrites the earlier one in place.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MethodKey {
    pub name: String,
    pub is_static: bool,
    pub kind: CandidateKind,
}

/// The constructor function: its statement and its function value.
#[derive(Clone, Debug)]
pub struct ConstructorParts {
    pub statement: NodeIndex,
    pub function: FunctionParts,
}

/// Why an assembled candidate is not turned into a class.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Rejection {
    /// Nothing on the prototype and no superclass.
    NoPrototypeMembers,
    /// A derived constructor with a body but no superclass constructor call.
    MissingSuperCall,
    /// `this` is used before the superclass constructor call.
    ThisBeforeSuperCall,
    /// A consumed statement left the container the class is built in.
    ForeignContainer(NodeIndex),
}

#[derive(Debug)]
pub struct ClassCandidate {
    pub id: ClassId,
    pub name: String,
    pub constructor: ConstructorParts,
    pub super_class: Option<SuperClass>,
    pub parent_container: NodeIndex,
    methods: IndexMap<MethodKey, MethodCandidate>,
    removals: IndexSet<NodeIndex>,
    /// Nodes whose comments go onto the class itself.
    class_comment_sources: IndexSet<NodeIndex>,
}

impl ClassCandidate {
    pub fn new(
        id: ClassId,
        name: impl Into<String>,
        constructor: ConstructorParts,
        parent_container: NodeIndex,
    ) -> Self {
        let mut class_comment_sources = IndexSet::new();
        class_comment_sources.insert(constructor.statement);
        ClassCandidate {
            id,
            name: name.into(),
            constructor,
            super_class: None,
            parent_container,
            methods: IndexMap::new(),
            removals: IndexSet::new(),
            class_comment_sources,
        }
    }

    pub fn methods(&self) -> impl Iterator<Item = &MethodCandidate> {
        self.methods.values()
    }

    pub fn method_count(&self) -> usize {
        self.methods.len()
    }

    pub fn has_methods(&self) -> bool {
        !self.methods.is_empty()
    }

    /// Whether any instance method or accessor has been collected.
    pub fn has_prototype_members(&self) -> bool {
        self.methods.keys().any(|key| !key.is_static)
    }

    /// Statements consumed so far, constructor excluded.
    pub fn removals(&self) -> &IndexSet<NodeIndex> {
        &self.removals
    }

    /// Append a method, or overwrite the body of an earlier one with the
    /// same key. The superseded definition's statement is still removed
    /// and its comments are kept.
    pub fn add_method(&mut self, method: MethodCandidate) {
        debug_assert_eq!(method.owner, self.id);
        method.schedule_removal(&mut self.removals);
        let key = MethodKey {
            name: method.name.clone(),
            is_static: method.is_static,
            kind: method.kind,
        };
        match self.methods.get_mut(&key) {
            Some(existing) => {
                debug!(class = %self.name, method = %key.name, "later definition overwrites method");
                existing.function = method.function;
                existing.comment_sources.extend(method.comment_sources);
            }
            None => {
                self.methods.insert(key, method);
            }
        }
    }

    /// Consume a statement whose comments belong to the class itself
    /// (inheritance wiring, `constructor` fix-ups, separators).
    pub fn absorb_statement(&mut self, statement: NodeIndex) {
        self.removals.insert(statement);
        self.class_comment_sources.insert(statement);
    }

    pub fn set_super_class(&mut self, super_class: SuperClass, statement: NodeIndex) {
        self.super_class = Some(super_class);
        self.absorb_statement(statement);
    }

    /// Acceptance check. Read-only: a rejected candidate leaves no trace.
    pub fn validate(&self, arena: &NodeArena) -> Result<(), Rejection> {
        if !self.has_prototype_members() && self.super_class.is_none() {
            return Err(Rejection::NoPrototypeMembers);
        }
        if let Some(foreign) = self
            .removals
            .iter()
            .chain(std::iter::once(&self.constructor.statement))
            .find(|&&statement| arena.parent(statement) != self.parent_container)
        {
            return Err(Rejection::ForeignContainer(*foreign));
        }
        if let Some(super_class) = &self.super_class {
            let body = self.constructor.function.body;
            if !self.constructor.function.has_empty_body(arena) {
                let Some(index) = super_calls::find_constructor_call(arena, body, super_class) else {
                    return Err(Rejection::MissingSuperCall);
                };
                let statements = arena
                    .statement_list(body)
                    .map(|list| list.statements.as_slice())
                    .unwrap_or_default();
                if statements[..index]
                    .iter()
                    .any(|&statement| contains_this_reference(arena, statement))
                {
                    return Err(Rejection::ThisBeforeSuperCall);
                }
            }
        }
        Ok(())
    }

    /// The constructor member is omitted when it would be `constructor() {}`.
    fn needs_constructor(&self, arena: &NodeArena) -> bool {
        let function = &self.constructor.function;
        !function.parameters.is_empty() || !function.has_empty_body(arena)
    }

    /// Synthesize the class and the instruction that puts it in place of
    /// the constructor, deleting every consumed statement.
    pub fn into_instruction(self, arena: &mut NodeArena) -> ReplacementInstruction {
        let mut harvested: IndexSet<CommentId> = IndexSet::new();
        let class_sources: Vec<_> = self.class_comment_sources.iter().copied().collect();
        let class_comments: Vec<_> = extract_comments(arena, &class_sources)
            .into_iter()
            .filter(|comment| harvested.insert(*comment))
            .collect();

        let mut members = Vec::with_capacity(self.methods.len() + 1);
        if self.needs_constructor(arena) {
            members.push(self.synthesize_constructor(arena));
        }
        for method in self.methods.values() {
            members.push(method.synthesize(arena, self.super_class.as_ref(), &mut harvested));
        }

        let name = arena.synthesize_identifier(&self.name);
        let class = arena.add_synthesized(NodeKind::ClassDeclaration(ClassData {
            name,
            heritage: self
                .super_class
                .as_ref()
                .map_or(NodeIndex::NONE, |super_class| super_class.node),
            members: NodeList::new(members),
        }));
        attach_leading(arena, class, class_comments);
        debug!(
            class = %self.name,
            methods = self.methods.len(),
            removed = self.removals.len(),
            "class synthesized"
        );

        ReplacementInstruction::new(self.parent_container, self.constructor.statement)
            .with_others(self.removals)
            .with_replacements(vec![class])
    }

    fn synthesize_constructor(&self, arena: &mut NodeArena) -> NodeIndex {
        let function = &self.constructor.function;
        super_calls::rewrite_constructor_body(arena, function.body, self.super_class.as_ref());
        super_calls::rewrite_method_body(arena, function.body, self.super_class.as_ref());
        arena.add_synthesized(NodeKind::MethodDeclaration(MethodData {
            kind: MethodKind::Constructor,
            is_static: false,
            name: NodeIndex::NONE,
            parameters: function.parameters.clone(),
            body: function.body,
            is_async: false,
            is_generator: false,
        }))
    }
}
