//! NodeArena: storage, child access and edit tracking.
//!
//! All nodes live in one `Vec<Node>`; edges are `NodeIndex` values. Edits
//! never free nodes: a replaced node simply stops being referenced, which
//! keeps indices stable for the whole transform run.

use super::base::{CommentId, NodeIndex, NodeList};
use super::flags::NodeFlags;
use super::node::{Node, NodeKind, StatementList};
use remod_common::CommentRange;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// Comments owned by a node: leading ones print before it, trailing ones
/// after it on the same line.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AttachedComments {
    pub leading: SmallVec<[CommentId; 2]>,
    pub trailing: SmallVec<[CommentId; 2]>,
}

impl AttachedComments {
    pub fn is_empty(&self) -> bool {
        self.leading.is_empty() && self.trailing.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct NodeArena {
    nodes: Vec<Node>,
    comments: Vec<CommentRange>,
    attached: FxHashMap<NodeIndex, AttachedComments>,
}

/// Visit every child slot of a node kind in source order.
///
/// `$kind` is either `&NodeKind` or `&mut NodeKind`; `$iter` is `iter` or
/// `iter_mut` to match, and `$slot` binds `&NodeIndex` / `&mut NodeIndex`.
macro_rules! for_each_slot {
    ($kind:expr, $iter:ident, |$slot:ident| $body:block) => {{
        match $kind {
            NodeKind::Program(list) | NodeKind::Block(list) => {
                for $slot in list.statements.$iter() $body
            }
            NodeKind::EmptyStatement
            | NodeKind::DebuggerStatement
            | NodeKind::Identifier { .. }
            | NodeKind::ThisExpression
            | NodeKind::SuperExpression
            | NodeKind::NullLiteral
            | NodeKind::BooleanLiteral { .. }
            | NodeKind::NumericLiteral { .. }
            | NodeKind::BigIntLiteral { .. }
            | NodeKind::StringLiteral { .. }
            | NodeKind::RegularExpressionLiteral { .. }
            | NodeKind::OmittedExpression => {}
            NodeKind::ExpressionStatement { expression }
            | NodeKind::ReturnStatement { expression }
            | NodeKind::ThrowStatement { expression }
            | NodeKind::ComputedPropertyName { expression }
            | NodeKind::SpreadElement { expression }
            | NodeKind::ParenthesizedExpression { expression }
            | NodeKind::YieldExpression { expression, .. }
            | NodeKind::AwaitExpression { expression } => {
                let $slot = expression;
                $body
            }
            NodeKind::VariableStatement { declaration_list } => {
                let $slot = declaration_list;
                $body
            }
            NodeKind::VariableDeclarationList(data) => {
                for $slot in data.declarations.nodes.$iter() $body
            }
            NodeKind::VariableDeclaration { name, initializer }
            | NodeKind::PropertyAssignment { name, initializer }
            | NodeKind::ShorthandPropertyAssignment { name, initializer }
            | NodeKind::Parameter { name, initializer, .. } => {
                {
                    let $slot = name;
                    $body
                }
                {
                    let $slot = initializer;
                    $body
                }
            }
            NodeKind::FunctionDeclaration(data) | NodeKind::FunctionExpression(data) => {
                for $slot in std::iter::once(data_name!($iter, data))
                    .chain(data.parameters.nodes.$iter())
                    .chain(std::iter::once(data_body!($iter, data)))
                    $body
            }
            NodeKind::ArrowFunction(data) => {
                for $slot in data
                    .parameters
                    .nodes
                    .$iter()
                    .chain(std::iter::once(data_body!($iter, data)))
                    $body
            }
            NodeKind::ClassDeclaration(data) | NodeKind::ClassExpression(data) => {
                for $slot in std::iter::once(data_name!($iter, data))
                    .chain(std::iter::once(data_heritage!($iter, data)))
                    .chain(data.members.nodes.$iter())
                    $body
            }
            NodeKind::MethodDeclaration(data) => {
                for $slot in std::iter::once(data_name!($iter, data))
                    .chain(data.parameters.nodes.$iter())
                    .chain(std::iter::once(data_body!($iter, data)))
                    $body
            }
            NodeKind::IfStatement {
                expression,
                then_statement,
                else_statement,
            } => {
                for $slot in [expression, then_statement, else_statement] $body
            }
            NodeKind::ForStatement {
                initializer,
                condition,
                incrementor,
                statement,
            } => {
                for $slot in [initializer, condition, incrementor, statement] $body
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
                for $slot in [initializer, expression, statement] $body
            }
            NodeKind::WhileStatement {
                expression,
                statement,
            }
            | NodeKind::WithStatement {
                expression,
                statement,
            } => {
                for $slot in [expression, statement] $body
            }
            NodeKind::DoStatement {
                statement,
                expression,
            } => {
                for $slot in [statement, expression] $body
            }
            NodeKind::BreakStatement { label } | NodeKind::ContinueStatement { label } => {
                let $slot = label;
                $body
            }
            NodeKind::TryStatement {
                try_block,
                catch_clause,
                finally_block,
            } => {
                for $slot in [try_block, catch_clause, finally_block] $body
            }
            NodeKind::CatchClause { variable, block } => {
                for $slot in [variable, block] $body
            }
            NodeKind::SwitchStatement {
                expression,
                clauses,
            } => {
                for $slot in std::iter::once(expression).chain(clauses.nodes.$iter()) $body
            }
            NodeKind::CaseClause {
                expression,
                statements,
            } => {
                for $slot in std::iter::once(expression).chain(statements.statements.$iter()) $body
            }
            NodeKind::LabeledStatement { label, statement } => {
                for $slot in [label, statement] $body
            }
            NodeKind::TemplateLiteral(data) => {
                for $slot in data.expressions.nodes.$iter() $body
            }
            NodeKind::TaggedTemplateExpression { tag, template } => {
                for $slot in [tag, template] $body
            }
            NodeKind::ArrayLiteral { elements } => {
                for $slot in elements.nodes.$iter() $body
            }
            NodeKind::ObjectLiteral { properties } => {
                for $slot in properties.nodes.$iter() $body
            }
            NodeKind::CallExpression {
                expression,
                arguments,
                ..
            } => {
                for $slot in std::iter::once(expression).chain(arguments.nodes.$iter()) $body
            }
            NodeKind::NewExpression {
                expression,
                arguments,
            } => {
                {
                    let $slot = expression;
                    $body
                }
                if let Some(arguments) = arguments {
                    for $slot in arguments.nodes.$iter() $body
                }
            }
            NodeKind::PropertyAccessExpression {
                expression, name, ..
            } => {
                for $slot in [expression, name] $body
            }
            NodeKind::ElementAccessExpression {
                expression,
                argument,
                ..
            } => {
                for $slot in [expression, argument] $body
            }
            NodeKind::PrefixUnaryExpression { operand, .. }
            | NodeKind::PostfixUnaryExpression { operand, .. } => {
                let $slot = operand;
                $body
            }
            NodeKind::BinaryExpression { left, right, .. } => {
                for $slot in [left, right] $body
            }
            NodeKind::ConditionalExpression {
                condition,
                when_true,
                when_false,
            } => {
                for $slot in [condition, when_true, when_false] $body
            }
        }
    }};
}

macro_rules! data_name {
    (iter, $data:ident) => {
        &$data.name
    };
    (iter_mut, $data:ident) => {
        &mut $data.name
    };
}

macro_rules! data_body {
    (iter, $data:ident) => {
        &$data.body
    };
    (iter_mut, $data:ident) => {
        &mut $data.body
    };
}

macro_rules! data_heritage {
    (iter, $data:ident) => {
        &$data.heritage
    };
    (iter_mut, $data:ident) => {
        &mut $data.heritage
    };
}

impl NodeArena {
    pub fn new() -> NodeArena {
        NodeArena::default()
    }

    pub fn with_capacity(capacity: usize) -> NodeArena {
        NodeArena {
            nodes: Vec::with_capacity(capacity),
            ..NodeArena::default()
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn get(&self, index: NodeIndex) -> Option<&Node> {
        if index.is_none() {
            return None;
        }
        self.nodes.get(index.0 as usize)
    }

    #[inline]
    pub fn get_mut(&mut self, index: NodeIndex) -> Option<&mut Node> {
        if index.is_none() {
            return None;
        }
        self.nodes.get_mut(index.0 as usize)
    }

    #[inline]
    pub fn kind(&self, index: NodeIndex) -> Option<&NodeKind> {
        self.get(index).map(|node| &node.kind)
    }

    // =========================================================================
    // Creation
    // =========================================================================

    /// Add an original (parsed) node and link its children to it.
    pub fn add(&mut self, kind: NodeKind, pos: u32, end: u32) -> NodeIndex {
        self.push(kind, pos, end, NodeFlags::empty())
    }

    /// Add a node created by a transform. It has no source text of its own
    /// until it takes the place of an original node.
    ///
    /// Its children keep their current parent links until the node is put
    /// into the tree (`replace_node`, `set_statements`), so a new node may
    /// wrap the very node it is about to replace.
    pub fn add_synthesized(&mut self, kind: NodeKind) -> NodeIndex {
        self.push(kind, 0, 0, NodeFlags::SYNTHESIZED)
    }

    /// Synthesized identifier.
    pub fn synthesize_identifier(&mut self, name: &str) -> NodeIndex {
        self.add_synthesized(NodeKind::Identifier {
            name: name.to_string(),
        })
    }

    fn push(&mut self, kind: NodeKind, pos: u32, end: u32, flags: NodeFlags) -> NodeIndex {
        let index = NodeIndex(self.nodes.len() as u32);
        let link_children = !flags.contains(NodeFlags::SYNTHESIZED);
        self.nodes.push(Node {
            kind,
            pos,
            end,
            parent: NodeIndex::NONE,
            origin: NodeIndex::NONE,
            flags,
        });
        if link_children {
            self.adopt_children(index);
        }
        index
    }

    /// Point the children of `index` back at it, descending through
    /// synthesized children so a freshly built subtree is linked throughout.
    fn adopt_children(&mut self, index: NodeIndex) {
        let mut pending = vec![index];
        while let Some(current) = pending.pop() {
            for child in self.children(current) {
                let Some(node) = self.get_mut(child) else {
                    continue;
                };
                node.parent = current;
                if node.is_synthesized() {
                    pending.push(child);
                }
            }
        }
    }

    // =========================================================================
    // Children
    // =========================================================================

    /// Children of a node in source order, absent slots skipped.
    pub fn children(&self, index: NodeIndex) -> SmallVec<[NodeIndex; 8]> {
        match self.get(index) {
            Some(node) => children_of(&node.kind),
            None => SmallVec::new(),
        }
    }

    pub fn parent(&self, index: NodeIndex) -> NodeIndex {
        self.get(index).map_or(NodeIndex::NONE, |node| node.parent)
    }

    /// Whether `ancestor` is `index` or one of its ancestors.
    pub fn is_ancestor_or_self(&self, ancestor: NodeIndex, index: NodeIndex) -> bool {
        let mut current = index;
        while current.is_some() {
            if current == ancestor {
                return true;
            }
            current = self.parent(current);
        }
        false
    }

    pub fn statement_list(&self, index: NodeIndex) -> Option<&StatementList> {
        self.get(index).and_then(|node| node.kind.statement_list())
    }

    pub fn identifier_name(&self, index: NodeIndex) -> Option<&str> {
        match self.kind(index) {
            Some(NodeKind::Identifier { name }) => Some(name),
            _ => None,
        }
    }

    pub fn is_pristine(&self, index: NodeIndex) -> bool {
        self.get(index).is_some_and(Node::is_pristine)
    }

    // =========================================================================
    // Edits
    // =========================================================================

    /// Re-link `child` under `parent` (used when a transform moves an
    /// original subtree into a synthesized node).
    pub fn set_parent(&mut self, child: NodeIndex, parent: NodeIndex) {
        if let Some(node) = self.get_mut(child) {
            node.parent = parent;
        }
    }

    /// Mark `index` and all of its ancestors as modified.
    pub fn mark_modified(&mut self, index: NodeIndex) {
        let mut current = index;
        while let Some(node) = self.get_mut(current) {
            if node.flags.contains(NodeFlags::MODIFIED) {
                break;
            }
            node.flags.insert(NodeFlags::MODIFIED);
            current = node.parent;
        }
    }

    /// Mark a statement container whose child sequence was re-sequenced.
    pub fn mark_list_edited(&mut self, index: NodeIndex) {
        if let Some(node) = self.get_mut(index) {
            node.flags.insert(NodeFlags::LIST_EDITED);
        }
        self.mark_modified(index);
    }

    /// Put `new` in the slot `old` occupies in its parent.
    ///
    /// `new` takes over the parent link, the source span and the attached
    /// comments of `old`, and records `old` as its origin. Returns `false`
    /// when `old` has no parent slot (the root, or a detached node).
    pub fn replace_node(&mut self, old: NodeIndex, new: NodeIndex) -> bool {
        let Some(old_node) = self.get(old) else {
            return false;
        };
        let parent = old_node.parent;
        let (pos, end) = (old_node.pos, old_node.end);
        let origin = if old_node.is_synthesized() && old_node.origin.is_some() {
            old_node.origin
        } else {
            old
        };

        let replaced = match self.get_mut(parent) {
            Some(parent_node) => {
                let mut found = false;
                for_each_slot!(&mut parent_node.kind, iter_mut, |slot| {
                    if *slot == old {
                        *slot = new;
                        found = true;
                    }
                });
                found
            }
            None => false,
        };
        if !replaced {
            return false;
        }

        if let Some(new_node) = self.get_mut(new) {
            new_node.parent = parent;
            if new_node.is_synthesized() {
                new_node.pos = pos;
                new_node.end = end;
                new_node.origin = origin;
            }
        }
        if self.get(new).is_some_and(Node::is_synthesized) {
            self.adopt_children(new);
        }
        if let Some(comments) = self.attached.remove(&old) {
            self.attached.entry(new).or_default().merge(comments);
        }
        self.mark_modified(parent);
        true
    }

    /// Replace a statement container's child sequence.
    pub fn set_statements(&mut self, container: NodeIndex, statements: Vec<NodeIndex>) -> bool {
        let Some(list) = self
            .get_mut(container)
            .and_then(|node| node.kind.statement_list_mut())
        else {
            return false;
        };
        list.statements = statements.clone();
        for statement in statements {
            self.set_parent(statement, container);
            if self.get(statement).is_some_and(Node::is_synthesized) {
                self.adopt_children(statement);
            }
        }
        self.mark_list_edited(container);
        true
    }

    // =========================================================================
    // Comments
    // =========================================================================

    pub fn set_comments(&mut self, comments: Vec<CommentRange>) {
        self.comments = comments;
    }

    pub fn comments(&self) -> &[CommentRange] {
        &self.comments
    }

    pub fn comment(&self, id: CommentId) -> Option<&CommentRange> {
        self.comments.get(id.0 as usize)
    }

    pub fn attached_comments(&self, index: NodeIndex) -> Option<&AttachedComments> {
        self.attached.get(&index)
    }

    pub fn leading_comments(&self, index: NodeIndex) -> &[CommentId] {
        self.attached
            .get(&index)
            .map_or(&[], |comments| comments.leading.as_slice())
    }

    pub fn trailing_comments(&self, index: NodeIndex) -> &[CommentId] {
        self.attached
            .get(&index)
            .map_or(&[], |comments| comments.trailing.as_slice())
    }

    pub fn add_leading_comment(&mut self, index: NodeIndex, comment: CommentId) {
        self.attached.entry(index).or_default().leading.push(comment);
    }

    pub fn add_trailing_comment(&mut self, index: NodeIndex, comment: CommentId) {
        self.attached.entry(index).or_default().trailing.push(comment);
    }

    /// Replace the comments owned by a node.
    pub fn set_attached_comments(&mut self, index: NodeIndex, comments: AttachedComments) {
        if comments.is_empty() {
            self.attached.remove(&index);
        } else {
            self.attached.insert(index, comments);
        }
    }

    /// End of the last trailing comment of `index`, or the node's own end.
    pub fn trailing_end(&self, index: NodeIndex) -> u32 {
        let end = self.get(index).map_or(0, |node| node.end);
        self.trailing_comments(index)
            .iter()
            .filter_map(|id| self.comment(*id))
            .map(|comment| comment.end)
            .fold(end, u32::max)
    }
}

impl AttachedComments {
    fn merge(&mut self, other: AttachedComments) {
        self.leading.extend(other.leading);
        self.trailing.extend(other.trailing);
    }
}

/// Children of a node kind in source order, absent slots skipped.
pub fn children_of(kind: &NodeKind) -> SmallVec<[NodeIndex; 8]> {
    let mut out = SmallVec::new();
    for_each_slot!(kind, iter, |slot| {
        if slot.is_some() {
            out.push(*slot);
        }
    });
    out
}

/// Replace `old` with `new` wherever it occurs among a list's nodes.
pub fn replace_in_list(list: &mut NodeList, old: NodeIndex, new: NodeIndex) -> bool {
    let mut found = false;
    for slot in &mut list.nodes {
        if *slot == old {
            *slot = new;
            found = true;
        }
    }
    found
}
