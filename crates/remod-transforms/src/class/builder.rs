//! Recognition of the ES5 class idiom in a statement list.
//!
//! Starting at a constructor function, the builder walks forward over the
//! following siblings and classifies each one. The run stops at the first
//! statement that is not part of the idiom; there is no backtracking.

use super::candidate::{ClassCandidate, ConstructorParts};
use super::method_candidate::{CandidateKind, ClassId, FunctionParts, MethodCandidate, SuperClass};
use remod_parser::parser::{MethodKind, NodeKind};
use remod_parser::syntax::transform_utils::{is_reference_identifier, member_path, skip_parentheses};
use remod_parser::{NodeArena, NodeIndex};
use remod_scanner::SyntaxKind;
use tracing::debug;

pub const UNSUPPORTED_DESCRIPTOR: &str = "Unsupported Object.defineProperty descriptor";

/// One object-literal member that becomes a class member.
#[derive(Debug)]
struct ObjectMember {
    property: NodeIndex,
    name: String,
    kind: CandidateKind,
    function: FunctionParts,
}

/// Classification of a statement following a constructor.
#[derive(Debug)]
enum Shape {
    /// `C.prototype.m = function() {}` or `C.m = function() {}`.
    Method {
        name: String,
        is_static: bool,
        function: FunctionParts,
    },
    /// `Object.defineProperty(C.prototype, 'x', { get, set })`.
    Accessors {
        name: String,
        is_static: bool,
        get: Option<FunctionParts>,
        set: Option<FunctionParts>,
    },
    /// `C.prototype = { ... }`.
    PrototypeObject(Vec<ObjectMember>),
    /// `C.prototype = Object.create(B.prototype)`, `C.prototype = new B()`,
    /// `util.inherits(C, B)`.
    Inheritance(SuperClass),
    /// `C.prototype.constructor = C`.
    ConstructorFix,
    Empty,
    /// A `defineProperty` call on the class with a descriptor that has no
    /// class equivalent.
    UnsupportedDescriptor,
    Other,
}

/// Result of scanning from one statement.
#[derive(Debug, Default)]
pub struct Scan {
    pub candidate: Option<ClassCandidate>,
    /// Index of the first statement after the consumed run.
    pub resume_at: usize,
    pub warnings: Vec<(u32, &'static str)>,
}

pub struct ClassCandidateBuilder<'a> {
    arena: &'a NodeArena,
    container: NodeIndex,
    statements: &'a [NodeIndex],
}

impl<'a> ClassCandidateBuilder<'a> {
    pub fn new(arena: &'a NodeArena, container: NodeIndex, statements: &'a [NodeIndex]) -> Self {
        ClassCandidateBuilder {
            arena,
            container,
            statements,
        }
    }

    /// Try to assemble a class whose constructor is `statements[start]`.
    pub fn scan_from(&self, start: usize, id: ClassId) -> Scan {
        let mut scan = Scan {
            resume_at: start + 1,
            ..Scan::default()
        };
        let Some(&statement) = self.statements.get(start) else {
            return scan;
        };
        let Some((name, function)) = self.constructor_of(statement) else {
            return scan;
        };
        // A class binding is not hoisted.
        let used_earlier = self.statements[..start]
            .iter()
            .any(|&earlier| references_name(self.arena, earlier, &name));
        if used_earlier {
            debug!(class = %name, "constructor referenced before its declaration");
            return scan;
        }

        let mut candidate = ClassCandidate::new(
            id,
            name.clone(),
            ConstructorParts { statement, function },
            self.container,
        );
        let mut pending_empty = Vec::new();
        let mut index = start + 1;
        while let Some(&next) = self.statements.get(index) {
            match self.classify(next, &name) {
                Shape::Empty => {
                    pending_empty.push(next);
                    index += 1;
                    continue;
                }
                Shape::Other => break,
                Shape::UnsupportedDescriptor => {
                    let pos = self.arena.get(next).map_or(0, |node| node.pos);
                    scan.warnings.push((pos, UNSUPPORTED_DESCRIPTOR));
                    break;
                }
                Shape::Inheritance(super_class) => {
                    if candidate.has_methods() || candidate.super_class.is_some() {
                        break;
                    }
                    candidate.set_super_class(super_class, next);
                }
                Shape::ConstructorFix => candidate.absorb_statement(next),
                Shape::Method {
                    name: method,
                    is_static,
                    function,
                } => {
                    let kind = CandidateKind::Method;
                    candidate.add_method(MethodCandidate::new(method, kind, is_static, function, next, id));
                }
                Shape::Accessors {
                    name: property,
                    is_static,
                    get,
                    set,
                } => {
                    for (kind, function) in [(CandidateKind::Get, get), (CandidateKind::Set, set)] {
                        if let Some(function) = function {
                            let accessor = MethodCandidate::new(property.clone(), kind, is_static, function, next, id);
                            candidate.add_method(accessor);
                        }
                    }
                }
                Shape::PrototypeObject(members) => {
                    if candidate.has_prototype_members() || candidate.super_class.is_some() {
                        break;
                    }
                    candidate.absorb_statement(next);
                    for member in members {
                        let mut method =
                            MethodCandidate::new(member.name, member.kind, false, member.function, next, id);
                        method.comment_sources.shift_remove(&next);
                        method.comment_sources.insert(member.property);
                        candidate.add_method(method);
                    }
                }
            }
            for empty in pending_empty.drain(..) {
                candidate.absorb_statement(empty);
            }
            index += 1;
        }

        match candidate.validate(self.arena) {
            Ok(()) => {
                debug!(class = %name, methods = candidate.method_count(), "class candidate accepted");
                scan.resume_at = index - pending_empty.len();
                scan.candidate = Some(candidate);
            }
            Err(rejection) => {
                debug!(class = %name, ?rejection, "class candidate rejected");
            }
        }
        scan
    }

    // =========================================================================
    // Constructor
    // =========================================================================

    /// `function C() {}` or `var C = function() {};`.
    fn constructor_of(&self, statement: NodeIndex) -> Option<(String, FunctionParts)> {
        let arena = self.arena;
        let (name, function) = match arena.kind(statement)? {
            NodeKind::FunctionDeclaration(data) => (arena.identifier_name(data.name)?, statement),
            NodeKind::VariableStatement { declaration_list } => {
                let NodeKind::VariableDeclarationList(list) = arena.kind(*declaration_list)? else {
                    return None;
                };
                let [declaration] = list.declarations.nodes.as_slice() else {
                    return None;
                };
                let NodeKind::VariableDeclaration { name, initializer } = arena.kind(*declaration)? else {
                    return None;
                };
                let function = skip_parentheses(arena, *initializer);
                if !self.is_plain_function_value(function) {
                    return None;
                }
                (arena.identifier_name(*name)?, function)
            }
            _ => return None,
        };
        let parts = FunctionParts::of(arena, function)?;
        if parts.is_async || parts.is_generator {
            return None;
        }
        Some((name.to_string(), parts))
    }

    /// A `function` expression whose own name, if any, is not used inside
    /// it (a method has no such binding).
    fn is_plain_function_value(&self, node: NodeIndex) -> bool {
        let Some(NodeKind::FunctionExpression(data)) = self.arena.kind(node) else {
            return false;
        };
        match self.arena.identifier_name(data.name) {
            Some(own_name) => !references_name(self.arena, data.body, own_name),
            None => true,
        }
    }

    // =========================================================================
    // Following statements
    // =========================================================================

    fn classify(&self, statement: NodeIndex, class: &str) -> Shape {
        let arena = self.arena;
        match arena.kind(statement) {
            Some(NodeKind::EmptyStatement) => Shape::Empty,
            Some(NodeKind::ExpressionStatement { expression }) => {
                let expression = skip_parentheses(arena, *expression);
                match arena.kind(expression) {
                    Some(NodeKind::BinaryExpression {
                        left,
                        operator: SyntaxKind::EqualsToken,
                        right,
                    }) => self.classify_assignment(*left, *right, class),
                    Some(NodeKind::CallExpression { .. }) => self.classify_call(expression, class),
                    _ => Shape::Other,
                }
            }
            _ => Shape::Other,
        }
    }

    fn classify_assignment(&self, left: NodeIndex, right: NodeIndex, class: &str) -> Shape {
        let arena = self.arena;
        let Some(path) = member_path(arena, left) else {
            return Shape::Other;
        };
        let right = skip_parentheses(arena, right);
        match path.as_slice() {
            [head, "prototype", "constructor"] if *head == class => {
                if arena.identifier_name(right) == Some(class) {
                    Shape::ConstructorFix
                } else {
                    Shape::Other
                }
            }
            [head, "prototype", method] if *head == class => match self.method_value(right) {
                Some(function) => Shape::Method {
                    name: method.to_string(),
                    is_static: false,
                    function,
                },
                None => Shape::Other,
            },
            [head, "prototype"] if *head == class => self.classify_prototype_value(right, class),
            [head, method] if *head == class => match self.method_value(right) {
                Some(function) => Shape::Method {
                    name: method.to_string(),
                    is_static: true,
                    function,
                },
                None => Shape::Other,
            },
            _ => Shape::Other,
        }
    }

    fn method_value(&self, node: NodeIndex) -> Option<FunctionParts> {
        if !self.is_plain_function_value(node) {
            return None;
        }
        FunctionParts::of(self.arena, node)
    }

    /// Right-hand side of `C.prototype = ...`.
    fn classify_prototype_value(&self, value: NodeIndex, class: &str) -> Shape {
        let arena = self.arena;
        match arena.kind(value) {
            // Object.create(B.prototype)
            Some(NodeKind::CallExpression {
                expression,
                arguments,
                optional: false,
            }) => {
                let is_create = member_path(arena, *expression)
                    .is_some_and(|path| path.as_slice() == ["Object", "create"]);
                let [argument] = arguments.nodes.as_slice() else {
                    return Shape::Other;
                };
                let Some(NodeKind::PropertyAccessExpression {
                    expression: base,
                    name,
                    optional: false,
                }) = arena.kind(*argument)
                else {
                    return Shape::Other;
                };
                if !is_create || arena.identifier_name(*name) != Some("prototype") {
                    return Shape::Other;
                }
                self.super_class(*base, class).map_or(Shape::Other, Shape::Inheritance)
            }
            // new B()
            Some(NodeKind::NewExpression {
                expression,
                arguments,
            }) => {
                if arguments.as_ref().is_some_and(|list| !list.is_empty()) {
                    return Shape::Other;
                }
                self.super_class(*expression, class).map_or(Shape::Other, Shape::Inheritance)
            }
            Some(NodeKind::ObjectLiteral { properties }) => {
                let mut members = Vec::with_capacity(properties.len());
                for &property in &properties.nodes {
                    match self.object_member(property) {
                        Some(member) => members.push(member),
                        None => return Shape::Other,
                    }
                }
                Shape::PrototypeObject(members)
            }
            _ => Shape::Other,
        }
    }

    fn object_member(&self, property: NodeIndex) -> Option<ObjectMember> {
        let arena = self.arena;
        match arena.kind(property)? {
            NodeKind::PropertyAssignment { name, initializer } => {
                let value = skip_parentheses(arena, *initializer);
                Some(ObjectMember {
                    property,
                    name: property_key(arena, *name)?,
                    kind: CandidateKind::Method,
                    function: self.method_value(value)?,
                })
            }
            NodeKind::MethodDeclaration(data) if !data.is_static => {
                let kind = match data.kind {
                    MethodKind::Method => CandidateKind::Method,
                    MethodKind::Get => CandidateKind::Get,
                    MethodKind::Set => CandidateKind::Set,
                    MethodKind::Constructor => return None,
                };
                Some(ObjectMember {
                    property,
                    name: property_key(arena, data.name)?,
                    kind,
                    function: FunctionParts::of(arena, property)?,
                })
            }
            _ => None,
        }
    }

    fn classify_call(&self, call: NodeIndex, class: &str) -> Shape {
        let arena = self.arena;
        let Some(NodeKind::CallExpression {
            expression,
            arguments,
            optional: false,
        }) = arena.kind(call)
        else {
            return Shape::Other;
        };
        let Some(callee) = member_path(arena, *expression) else {
            return Shape::Other;
        };
        match (callee.as_slice(), arguments.nodes.as_slice()) {
            (["inherits"] | [_, "inherits"], [child, base]) => {
                if arena.identifier_name(*child) != Some(class) {
                    return Shape::Other;
                }
                self.super_class(*base, class).map_or(Shape::Other, Shape::Inheritance)
            }
            (["Object", "defineProperty"], [target, key, descriptor]) => {
                let is_static = match member_path(arena, *target) {
                    Some(path) if path.as_slice() == [class, "prototype"] => false,
                    Some(path) if path.as_slice() == [class] => true,
                    _ => return Shape::Other,
                };
                let Some(NodeKind::StringLiteral { value: name }) = arena.kind(*key) else {
                    return Shape::UnsupportedDescriptor;
                };
                self.accessor_descriptor(*descriptor)
                    .map_or(Shape::UnsupportedDescriptor, |(get, set)| Shape::Accessors {
                        name: name.clone(),
                        is_static,
                        get,
                        set,
                    })
            }
            _ => Shape::Other,
        }
    }

    /// `{ get: function() {}, set(v) {}, enumerable: false, configurable: true }`.
    ///
    /// Class accessors are non-enumerable, so `enumerable: true` has no
    /// equivalent; `value` and `writable` describe data properties.
    fn accessor_descriptor(&self, descriptor: NodeIndex) -> Option<(Option<FunctionParts>, Option<FunctionParts>)> {
        let arena = self.arena;
        let NodeKind::ObjectLiteral { properties } = arena.kind(descriptor)? else {
            return None;
        };
        let (mut get, mut set) = (None, None);
        for &property in &properties.nodes {
            let (key, value) = match arena.kind(property)? {
                NodeKind::PropertyAssignment { name, initializer } => (property_key(arena, *name)?, *initializer),
                NodeKind::MethodDeclaration(data) if data.kind == MethodKind::Method => {
                    (property_key(arena, data.name)?, property)
                }
                _ => return None,
            };
            match (key.as_str(), arena.kind(value)?) {
                ("get", _) => get = Some(self.accessor_value(value)?),
                ("set", _) => set = Some(self.accessor_value(value)?),
                ("enumerable", NodeKind::BooleanLiteral { value: false }) => {}
                ("configurable", NodeKind::BooleanLiteral { .. }) => {}
                _ => return None,
            }
        }
        if get.is_none() && set.is_none() {
            return None;
        }
        Some((get, set))
    }

    fn accessor_value(&self, value: NodeIndex) -> Option<FunctionParts> {
        match self.arena.kind(value)? {
            NodeKind::MethodDeclaration(_) => FunctionParts::of(self.arena, value),
            _ => self.method_value(skip_parentheses(self.arena, value)),
        }
    }

    /// A superclass expression: an identifier or dotted path, never the
    /// class itself.
    fn super_class(&self, node: NodeIndex, class: &str) -> Option<SuperClass> {
        let path = member_path(self.arena, node)?;
        if path.as_slice() == [class] {
            return None;
        }
        Some(SuperClass {
            node,
            path: path.iter().map(|segment| segment.to_string()).collect(),
        })
    }
}

/// Name of a non-computed property key.
fn property_key(arena: &NodeArena, name: NodeIndex) -> Option<String> {
    match arena.kind(name)? {
        NodeKind::Identifier { name } => Some(name.clone()),
        NodeKind::StringLiteral { value } => Some(value.clone()),
        NodeKind::NumericLiteral { text } => Some(text.clone()),
        _ => None,
    }
}

/// Whether `name` is referenced anywhere below `root`.
pub(crate) fn references_name(arena: &NodeArena, root: NodeIndex, name: &str) -> bool {
    let mut pending = vec![root];
    while let Some(node) = pending.pop() {
        if arena.identifier_name(node) == Some(name) && is_reference_identifier(arena, node) {
            return true;
        }
        pending.extend(arena.children(node));
    }
    false
}
