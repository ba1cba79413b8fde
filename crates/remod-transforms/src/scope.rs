//! Variable scoping analysis for the `let` transform.
//!
//! Two walks over the tree. The first collects every binding per function
//! scope; the second resolves each identifier reference to the binding it
//! sees and checks it against the `var` it may belong to. A `var` list is
//! narrowed to block scope only when every name it declares passes:
//!
//! - it is the only binding of that name in its function scope;
//! - every reference sits inside the block (or `for` head) holding the
//!   declaration;
//! - no reference precedes the declaration, whether from the same function
//!   or a nested one, and no hoisted function reading it is called before
//!   the declaration;
//! - it is not declared in a loop body without an initializer, and it is
//!   not captured by a nested function when declared inside a loop.

use remod_parser::parser::{DeclarationKind, FunctionData, NodeKind};
use remod_parser::syntax::transform_utils::{binding_names, is_reference_identifier};
use remod_parser::{NodeArena, NodeIndex};
use remod_scanner::SyntaxKind;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::trace;

/// What the `let` transform may do with one `var` declaration list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListVerdict {
    Unsafe,
    Let,
    Const,
}

type ScopeId = usize;

#[derive(Clone, Copy, Debug)]
enum Binding {
    Var(usize),
    /// A hoisted `function` declaration.
    Function(NodeIndex),
    Other,
}

#[derive(Debug, Default)]
struct FunctionScope {
    parent: Option<ScopeId>,
    bindings: FxHashMap<String, SmallVec<[Binding; 1]>>,
}

#[derive(Debug)]
struct VarBinding {
    list: NodeIndex,
    name: String,
    scope: ScopeId,
    /// Innermost block or `for` statement the declaration is scoped to.
    block: Option<NodeIndex>,
    /// End of the declarator: references before it see the hoisted `var`.
    declared_at: u32,
    initialized: bool,
    in_loop: bool,
    unsafe_use: bool,
    written: bool,
    /// Hoisted functions of the declaring scope that read or write it.
    readers: SmallVec<[NodeIndex; 1]>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mode {
    Read,
    Write,
    Bind,
}

/// Verdicts for every `var` declaration list in a tree.
#[derive(Debug, Default)]
pub struct ScopeAnalysis {
    verdicts: FxHashMap<NodeIndex, ListVerdict>,
}

impl ScopeAnalysis {
    pub fn analyze(arena: &NodeArena, root: NodeIndex) -> Self {
        let mut analyzer = Analyzer {
            arena,
            scopes: vec![FunctionScope::default()],
            scope_of: FxHashMap::default(),
            vars: Vec::new(),
            hoisted: Vec::new(),
            first_call: FxHashMap::default(),
        };
        analyzer.collect(root, 0);
        analyzer.resolve(root, 0, Mode::Read);
        ScopeAnalysis {
            verdicts: analyzer.verdicts(),
        }
    }

    /// `None` for lists that are not `var` lists.
    pub fn verdict(&self, list: NodeIndex) -> Option<ListVerdict> {
        self.verdicts.get(&list).copied()
    }
}

struct Analyzer<'a> {
    arena: &'a NodeArena,
    scopes: Vec<FunctionScope>,
    scope_of: FxHashMap<NodeIndex, ScopeId>,
    vars: Vec<VarBinding>,
    /// Enclosing `function` declarations and the scope each is declared in.
    hoisted: Vec<(NodeIndex, ScopeId)>,
    /// Earliest reference to each hoisted function.
    first_call: FxHashMap<NodeIndex, u32>,
}

impl<'a> Analyzer<'a> {
    // =========================================================================
    // Declarations
    // =========================================================================

    fn declare(&mut self, scope: ScopeId, name: &str, binding: Binding) {
        self.scopes[scope]
            .bindings
            .entry(name.to_string())
            .or_default()
            .push(binding);
    }

    fn declare_names(&mut self, scope: ScopeId, target: NodeIndex) {
        for name_node in binding_names(self.arena, target) {
            if let Some(name) = self.arena.identifier_name(name_node) {
                self.declare(scope, name, Binding::Other);
            }
        }
    }

    fn open_scope(&mut self, function: NodeIndex, parent: ScopeId) -> ScopeId {
        let id = self.scopes.len();
        self.scopes.push(FunctionScope {
            parent: Some(parent),
            bindings: FxHashMap::default(),
        });
        self.scope_of.insert(function, id);
        id
    }

    fn collect(&mut self, node: NodeIndex, scope: ScopeId) {
        let arena = self.arena;
        let Some(kind) = arena.kind(node) else {
            return;
        };
        match kind {
            NodeKind::FunctionDeclaration(data) => {
                if let Some(name) = arena.identifier_name(data.name) {
                    self.declare(scope, name, Binding::Function(node));
                }
                let inner = self.open_scope(node, scope);
                self.collect_function(data, inner);
            }
            NodeKind::FunctionExpression(data) => {
                let inner = self.open_scope(node, scope);
                if let Some(name) = arena.identifier_name(data.name) {
                    self.declare(inner, name, Binding::Other);
                }
                self.collect_function(data, inner);
            }
            NodeKind::ArrowFunction(data) => {
                let inner = self.open_scope(node, scope);
                for &parameter in &data.parameters.nodes {
                    self.declare_names(inner, parameter);
                    self.collect(parameter, inner);
                }
                self.collect(data.body, inner);
            }
            NodeKind::MethodDeclaration(data) => {
                self.collect(data.name, scope);
                let inner = self.open_scope(node, scope);
                for &parameter in &data.parameters.nodes {
                    self.declare_names(inner, parameter);
                    self.collect(parameter, inner);
                }
                self.collect(data.body, inner);
            }
            NodeKind::ClassDeclaration(data) => {
                if let Some(name) = arena.identifier_name(data.name) {
                    self.declare(scope, name, Binding::Other);
                }
                self.collect_children(node, scope);
            }
            NodeKind::CatchClause { variable, .. } => {
                self.declare_names(scope, *variable);
                self.collect_children(node, scope);
            }
            NodeKind::VariableDeclarationList(data) => {
                for &declaration in &data.declarations.nodes {
                    self.collect_declaration(node, data.kind, declaration, scope);
                }
                self.collect_children(node, scope);
            }
            _ => self.collect_children(node, scope),
        }
    }

    fn collect_children(&mut self, node: NodeIndex, scope: ScopeId) {
        for child in self.arena.children(node) {
            self.collect(child, scope);
        }
    }

    fn collect_function(&mut self, data: &FunctionData, inner: ScopeId) {
        for &parameter in &data.parameters.nodes {
            self.declare_names(inner, parameter);
            self.collect(parameter, inner);
        }
        self.collect(data.body, inner);
    }

    fn collect_declaration(
        &mut self,
        list: NodeIndex,
        kind: DeclarationKind,
        declaration: NodeIndex,
        scope: ScopeId,
    ) {
        let arena = self.arena;
        let Some(NodeKind::VariableDeclaration { name, initializer }) = arena.kind(declaration) else {
            return;
        };
        if kind != DeclarationKind::Var {
            self.declare_names(scope, *name);
            return;
        }
        let (in_loop_body, for_head) = loop_context(arena, list);
        let block = declaring_block(arena, list);
        let declared_at = arena.get(declaration).map_or(0, |node| node.end);
        for name_node in binding_names(arena, *name) {
            let Some(name) = arena.identifier_name(name_node) else {
                continue;
            };
            let index = self.vars.len();
            self.vars.push(VarBinding {
                list,
                name: name.to_string(),
                scope,
                block,
                declared_at,
                initialized: initializer.is_some() || for_in_of_head(arena, list),
                in_loop: in_loop_body || for_head,
                unsafe_use: block.is_none() || (in_loop_body && initializer.is_none()),
                written: false,
                readers: SmallVec::new(),
            });
            self.declare(scope, name, Binding::Var(index));
        }
    }

    // =========================================================================
    // References
    // =========================================================================

    fn resolve(&mut self, node: NodeIndex, scope: ScopeId, mode: Mode) {
        let arena = self.arena;
        let Some(kind) = arena.kind(node) else {
            return;
        };
        match kind {
            NodeKind::Identifier { name } => {
                if mode != Mode::Bind && is_reference_identifier(arena, node) {
                    self.reference(name, node, scope, mode == Mode::Write);
                }
            }
            NodeKind::FunctionDeclaration(data) => {
                let inner = self.scope_of.get(&node).copied().unwrap_or(scope);
                self.hoisted.push((node, scope));
                for &parameter in &data.parameters.nodes {
                    self.resolve(parameter, inner, Mode::Bind);
                }
                self.resolve(data.body, inner, Mode::Read);
                self.hoisted.pop();
            }
            NodeKind::FunctionExpression(data) => {
                let inner = self.scope_of.get(&node).copied().unwrap_or(scope);
                for &parameter in &data.parameters.nodes {
                    self.resolve(parameter, inner, Mode::Bind);
                }
                self.resolve(data.body, inner, Mode::Read);
            }
            NodeKind::ArrowFunction(data) => {
                let inner = self.scope_of.get(&node).copied().unwrap_or(scope);
                for &parameter in &data.parameters.nodes {
                    self.resolve(parameter, inner, Mode::Bind);
                }
                self.resolve(data.body, inner, Mode::Read);
            }
            NodeKind::MethodDeclaration(data) => {
                if let Some(NodeKind::ComputedPropertyName { expression }) = arena.kind(data.name) {
                    self.resolve(*expression, scope, Mode::Read);
                }
                let inner = self.scope_of.get(&node).copied().unwrap_or(scope);
                for &parameter in &data.parameters.nodes {
                    self.resolve(parameter, inner, Mode::Bind);
                }
                self.resolve(data.body, inner, Mode::Read);
            }
            NodeKind::ClassDeclaration(data) | NodeKind::ClassExpression(data) => {
                self.resolve(data.heritage, scope, Mode::Read);
                for &member in &data.members.nodes {
                    self.resolve(member, scope, Mode::Read);
                }
            }
            NodeKind::VariableDeclaration { name, initializer } => {
                self.resolve(*name, scope, Mode::Bind);
                self.resolve(*initializer, scope, Mode::Read);
            }
            NodeKind::CatchClause { variable, block } => {
                self.resolve(*variable, scope, Mode::Bind);
                self.resolve(*block, scope, Mode::Read);
            }
            NodeKind::Parameter { name, initializer, .. } => {
                self.resolve(*name, scope, Mode::Bind);
                self.resolve(*initializer, scope, Mode::Read);
            }
            NodeKind::BinaryExpression { left, operator, right } if operator.is_assignment_operator() => {
                let target = if mode == Mode::Bind { Mode::Bind } else { Mode::Write };
                self.resolve(*left, scope, target);
                self.resolve(*right, scope, Mode::Read);
            }
            NodeKind::PrefixUnaryExpression { operator, operand }
            | NodeKind::PostfixUnaryExpression { operand, operator } => {
                let updates = matches!(operator, SyntaxKind::PlusPlusToken | SyntaxKind::MinusMinusToken);
                self.resolve(*operand, scope, if updates { Mode::Write } else { Mode::Read });
            }
            NodeKind::ForInStatement {
                initializer,
                expression,
                statement,
            }
            | NodeKind::ForOfStatement {
                initializer,
                expression,
                statement,
            } => {
                self.resolve(*expression, scope, Mode::Read);
                let declares = matches!(arena.kind(*initializer), Some(NodeKind::VariableDeclarationList(_)));
                self.resolve(*initializer, scope, if declares { Mode::Read } else { Mode::Write });
                self.resolve(*statement, scope, Mode::Read);
            }
            // Patterns pass the target mode down to their elements.
            NodeKind::ObjectLiteral { .. }
            | NodeKind::ArrayLiteral { .. }
            | NodeKind::SpreadElement { .. }
            | NodeKind::ParenthesizedExpression { .. }
                if mode != Mode::Read =>
            {
                for child in arena.children(node) {
                    self.resolve(child, scope, mode);
                }
            }
            NodeKind::PropertyAssignment { name, initializer } if mode != Mode::Read => {
                if let Some(NodeKind::ComputedPropertyName { expression }) = arena.kind(*name) {
                    self.resolve(*expression, scope, Mode::Read);
                }
                self.resolve(*initializer, scope, mode);
            }
            NodeKind::ShorthandPropertyAssignment { name, initializer } => {
                self.resolve(*name, scope, mode);
                self.resolve(*initializer, scope, Mode::Read);
            }
            _ => {
                for child in arena.children(node) {
                    self.resolve(child, scope, Mode::Read);
                }
            }
        }
    }

    fn lookup(&self, name: &str, mut scope: ScopeId) -> Option<(ScopeId, &[Binding])> {
        loop {
            if let Some(bindings) = self.scopes[scope].bindings.get(name) {
                return Some((scope, bindings));
            }
            scope = self.scopes[scope].parent?;
        }
    }

    fn reference(&mut self, name: &str, node: NodeIndex, scope: ScopeId, write: bool) {
        let Some((_, bindings)) = self.lookup(name, scope) else {
            return;
        };
        let Some(node_data) = self.arena.get(node) else {
            return;
        };
        let (pos, synthesized) = (node_data.pos, node_data.is_synthesized());
        let bindings: SmallVec<[Binding; 2]> = bindings.iter().copied().collect();
        let mut vars: SmallVec<[usize; 2]> = SmallVec::new();
        for binding in bindings {
            match binding {
                Binding::Var(index) => vars.push(index),
                Binding::Function(function) if !synthesized => {
                    let first = self.first_call.entry(function).or_insert(pos);
                    *first = (*first).min(pos);
                }
                Binding::Function(_) | Binding::Other => {}
            }
        }
        for index in vars {
            let var = &mut self.vars[index];
            if write {
                var.written = true;
            }
            let nested = scope != var.scope;
            let outside = var
                .block
                .is_none_or(|block| !self.arena.is_ancestor_or_self(block, node));
            let early = !synthesized && pos < var.declared_at;
            if outside || early || (nested && var.in_loop) {
                trace!(name = %var.name, pos, outside, early, nested, "var cannot be narrowed");
                var.unsafe_use = true;
            }
            let reader = self
                .hoisted
                .iter()
                .find(|(_, declared_in)| *declared_in == var.scope)
                .map(|(function, _)| *function);
            if let Some(function) = reader.filter(|function| !var.readers.contains(function)) {
                var.readers.push(function);
            }
        }
    }

    fn verdicts(self) -> FxHashMap<NodeIndex, ListVerdict> {
        let mut verdicts: FxHashMap<NodeIndex, ListVerdict> = FxHashMap::default();
        for var in &self.vars {
            let called_early = var.readers.iter().any(|function| {
                self.first_call
                    .get(function)
                    .is_some_and(|&pos| pos < var.declared_at)
            });
            let redeclared = self.scopes[var.scope]
                .bindings
                .get(&var.name)
                .is_some_and(|bindings| bindings.len() > 1);
            let own = if var.unsafe_use || called_early || redeclared {
                ListVerdict::Unsafe
            } else if var.initialized && !var.written {
                ListVerdict::Const
            } else {
                ListVerdict::Let
            };
            let merged = match (verdicts.get(&var.list).copied(), own) {
                (None, own) => own,
                (Some(ListVerdict::Unsafe), _) | (_, ListVerdict::Unsafe) => ListVerdict::Unsafe,
                (Some(ListVerdict::Let), _) | (_, ListVerdict::Let) => ListVerdict::Let,
                (Some(ListVerdict::Const), ListVerdict::Const) => ListVerdict::Const,
            };
            verdicts.insert(var.list, merged);
        }
        verdicts
    }
}

/// The block a `let` in place of this list would be scoped to.
fn declaring_block(arena: &NodeArena, list: NodeIndex) -> Option<NodeIndex> {
    let parent = arena.parent(list);
    match arena.kind(parent)? {
        NodeKind::VariableStatement { .. } => {
            let container = arena.parent(parent);
            match arena.kind(container)? {
                // Other clauses of the switch can run without this one, so a
                // `let` here is only safe when used within its own clause.
                NodeKind::Program(_) | NodeKind::Block(_) | NodeKind::CaseClause { .. } => Some(container),
                _ => None,
            }
        }
        NodeKind::ForStatement { initializer, .. }
        | NodeKind::ForInStatement { initializer, .. }
        | NodeKind::ForOfStatement { initializer, .. }
            if *initializer == list =>
        {
            Some(parent)
        }
        _ => None,
    }
}

fn is_for_head(arena: &NodeArena, parent: NodeIndex, child: NodeIndex) -> bool {
    match arena.kind(parent) {
        Some(
            NodeKind::ForStatement { initializer, .. }
            | NodeKind::ForInStatement { initializer, .. }
            | NodeKind::ForOfStatement { initializer, .. },
        ) => *initializer == child,
        _ => false,
    }
}

fn for_in_of_head(arena: &NodeArena, list: NodeIndex) -> bool {
    let parent = arena.parent(list);
    matches!(
        arena.kind(parent),
        Some(NodeKind::ForInStatement { .. } | NodeKind::ForOfStatement { .. })
    ) && is_for_head(arena, parent, list)
}

/// `(inside a loop body, is a for-loop head)` up to the enclosing function.
fn loop_context(arena: &NodeArena, list: NodeIndex) -> (bool, bool) {
    let for_head = is_for_head(arena, arena.parent(list), list);
    let mut child = list;
    let mut current = arena.parent(list);
    while let Some(node) = arena.get(current) {
        if node.kind.is_function_like() || matches!(node.kind, NodeKind::Program(_)) {
            break;
        }
        if node.kind.is_loop() && !is_for_head(arena, current, child) {
            return (true, for_head);
        }
        child = current;
        current = node.parent;
    }
    (false, for_head)
}

#[cfg(test)]
mod tests {
    use super::*;
    use remod_parser::parse;

    /// Verdicts of every `var` list in source order.
    fn verdicts(source: &str) -> Vec<ListVerdict> {
        let file = parse(source).unwrap();
        let analysis = ScopeAnalysis::analyze(&file.arena, file.root);
        let mut lists: Vec<_> = (0..file.arena.len() as u32)
            .map(NodeIndex)
            .filter_map(|i| analysis.verdict(i).map(|v| (file.arena.get(i).unwrap().pos, v)))
            .collect();
        lists.sort_by_key(|(pos, _)| *pos);
        lists.into_iter().map(|(_, v)| v).collect()
    }

    #[test]
    fn unused_initialized_var_is_const() {
        assert_eq!(verdicts("var a = 1; f(a);"), [ListVerdict::Const]);
    }

    #[test]
    fn reassigned_var_is_let() {
        assert_eq!(verdicts("var a = 1; a = 2; a++;"), [ListVerdict::Let]);
        assert_eq!(verdicts("var a; f(a);"), [ListVerdict::Let]);
    }

    #[test]
    fn reference_outside_block_is_unsafe() {
        assert_eq!(verdicts("if (true) { var x = 10; }\n x = 12;\n"), [ListVerdict::Unsafe]);
    }

    #[test]
    fn use_before_declaration_is_unsafe() {
        assert_eq!(verdicts("f(a); var a = 1;"), [ListVerdict::Unsafe]);
        assert_eq!(verdicts("function g() { return a; } var a = 1;"), [ListVerdict::Unsafe]);
        assert_eq!(verdicts("var a = 1; function g() { return a; }"), [ListVerdict::Const]);
    }

    #[test]
    fn hoisted_reader_called_before_declaration_is_unsafe() {
        assert_eq!(
            verdicts("function f() { return g(); function g() { return v; } var v = 1; }"),
            [ListVerdict::Unsafe]
        );
        assert_eq!(
            verdicts("g(); var v = 1; function g() { return v; }"),
            [ListVerdict::Unsafe]
        );
        assert_eq!(
            verdicts("var v = 1; g(); function g() { return v; }"),
            [ListVerdict::Const]
        );
    }

    #[test]
    fn case_clause_var_used_in_another_clause_is_unsafe() {
        assert_eq!(
            verdicts("switch (k) { case 1: var z = 1; break; case 2: z = 2; }"),
            [ListVerdict::Unsafe]
        );
        assert_eq!(
            verdicts("switch (k) { case 1: var z = 1; f(z); break; }"),
            [ListVerdict::Const]
        );
    }

    #[test]
    fn redeclaration_is_unsafe() {
        assert_eq!(verdicts("var a = 1; var a = 2;"), [ListVerdict::Unsafe, ListVerdict::Unsafe]);
    }

    #[test]
    fn loops() {
        assert_eq!(verdicts("for (var i = 0; i < 3; i++) { f(i); }"), [ListVerdict::Let]);
        assert_eq!(verdicts("for (var k in o) { f(k); }"), [ListVerdict::Const]);
        assert_eq!(verdicts("while (c) { var x; f(x); }"), [ListVerdict::Unsafe]);
        assert_eq!(
            verdicts("for (var i = 0; i < 3; i++) { g(function() { return i; }); }"),
            [ListVerdict::Unsafe]
        );
    }

    #[test]
    fn destructuring_assignment_counts_as_write() {
        assert_eq!(verdicts("var a = 1; [a] = b;"), [ListVerdict::Let]);
        assert_eq!(verdicts("var {a, b} = o; f(a, b);"), [ListVerdict::Const]);
    }

    #[test]
    fn shadowing_parameter_hides_the_var() {
        assert_eq!(
            verdicts("var a = 1; function f(a) { a = 2; }"),
            [ListVerdict::Const]
        );
    }
}
