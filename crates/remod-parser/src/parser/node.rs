//! AST node types.
//!
//! Every node is a `Node` header (span, parent link, origin, flags) plus a
//! `NodeKind` payload. `NodeKind` is a closed enum: code that inspects the
//! tree matches on it exhaustively, and shapes it does not recognize fall
//! through to "does not apply".

use super::base::{NodeIndex, NodeList};
use super::flags::NodeFlags;
use remod_scanner::SyntaxKind;
use serde::Serialize;

/// A node header plus its payload.
#[derive(Clone, Debug, Serialize)]
pub struct Node {
    pub kind: NodeKind,
    /// Start position in source (byte offset)
    pub pos: u32,
    /// End position in source (byte offset)
    pub end: u32,
    pub parent: NodeIndex,
    /// For a synthesized node, the original node whose place it took.
    pub origin: NodeIndex,
    #[serde(skip)]
    pub flags: NodeFlags,
}

impl Node {
    #[inline]
    pub fn is_synthesized(&self) -> bool {
        self.flags.contains(NodeFlags::SYNTHESIZED)
    }

    #[inline]
    pub fn is_modified(&self) -> bool {
        self.flags.contains(NodeFlags::MODIFIED)
    }

    /// Original and untouched: prints as a verbatim source copy.
    #[inline]
    pub fn is_pristine(&self) -> bool {
        !self.flags.intersects(NodeFlags::SYNTHESIZED | NodeFlags::MODIFIED)
    }

    /// Whether `pos..end` refers to real source text.
    #[inline]
    pub fn has_span(&self) -> bool {
        self.end > self.pos || (!self.is_synthesized() && self.end == self.pos)
    }
}

/// `var`, `let` or `const`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum DeclarationKind {
    Var,
    Let,
    Const,
}

impl DeclarationKind {
    pub fn keyword(self) -> &'static str {
        match self {
            DeclarationKind::Var => "var",
            DeclarationKind::Let => "let",
            DeclarationKind::Const => "const",
        }
    }
}

/// Method flavour of object-literal and class members.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum MethodKind {
    Method,
    Get,
    Set,
    Constructor,
}

impl MethodKind {
    pub fn keyword(self) -> Option<&'static str> {
        match self {
            MethodKind::Get => Some("get"),
            MethodKind::Set => Some("set"),
            MethodKind::Method | MethodKind::Constructor => None,
        }
    }
}

// =============================================================================
// Payloads
// =============================================================================

/// A statement sequence (program, block, `case` clause) plus a frozen copy
/// of its original sequence, used to recover layout after edits.
#[derive(Clone, Debug, Default, Serialize)]
pub struct StatementList {
    pub statements: Vec<NodeIndex>,
    pub original: Vec<NodeIndex>,
    /// Source range between the container's delimiters.
    pub inner_pos: u32,
    pub inner_end: u32,
}

impl StatementList {
    pub fn new(statements: Vec<NodeIndex>, inner_pos: u32, inner_end: u32) -> Self {
        StatementList {
            original: statements.clone(),
            statements,
            inner_pos,
            inner_end,
        }
    }

    pub fn synthesized(statements: Vec<NodeIndex>) -> Self {
        StatementList {
            statements,
            original: Vec::new(),
            inner_pos: 0,
            inner_end: 0,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct FunctionData {
    pub name: NodeIndex,
    pub parameters: NodeList,
    pub body: NodeIndex,
    pub is_async: bool,
    pub is_generator: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct ArrowFunctionData {
    pub parameters: NodeList,
    /// A `Block` or an expression.
    pub body: NodeIndex,
    pub is_async: bool,
    /// Single unparenthesized parameter (`x => ...`).
    pub bare_parameter: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct ClassData {
    pub name: NodeIndex,
    pub heritage: NodeIndex,
    pub members: NodeList,
}

#[derive(Clone, Debug, Serialize)]
pub struct MethodData {
    pub kind: MethodKind,
    pub is_static: bool,
    pub name: NodeIndex,
    pub parameters: NodeList,
    pub body: NodeIndex,
    pub is_async: bool,
    pub is_generator: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct VariableDeclarationListData {
    pub kind: DeclarationKind,
    pub declarations: NodeList,
    /// The kind the source text spelled; its keyword occupies
    /// `pos..pos + original_kind.keyword().len()`.
    pub original_kind: DeclarationKind,
}

#[derive(Clone, Debug, Serialize)]
pub struct TemplateData {
    /// Raw literal pieces including delimiters (`` `a${ ``, `}b${`, `` }c` ``).
    pub quasis: Vec<String>,
    pub expressions: NodeList,
}

// =============================================================================
// NodeKind
// =============================================================================

#[derive(Clone, Debug, Serialize)]
pub enum NodeKind {
    // Containers
    Program(StatementList),
    Block(StatementList),

    // Statements
    EmptyStatement,
    ExpressionStatement {
        expression: NodeIndex,
    },
    VariableStatement {
        declaration_list: NodeIndex,
    },
    VariableDeclarationList(VariableDeclarationListData),
    VariableDeclaration {
        name: NodeIndex,
        initializer: NodeIndex,
    },
    FunctionDeclaration(FunctionData),
    ClassDeclaration(ClassData),
    IfStatement {
        expression: NodeIndex,
        then_statement: NodeIndex,
        else_statement: NodeIndex,
    },
    ForStatement {
        initializer: NodeIndex,
        condition: NodeIndex,
        incrementor: NodeIndex,
        statement: NodeIndex,
    },
    ForInStatement {
        initializer: NodeIndex,
        expression: NodeIndex,
        statement: NodeIndex,
    },
    ForOfStatement {
        initializer: NodeIndex,
        expression: NodeIndex,
        statement: NodeIndex,
    },
    WhileStatement {
        expression: NodeIndex,
        statement: NodeIndex,
    },
    DoStatement {
        statement: NodeIndex,
        expression: NodeIndex,
    },
    ReturnStatement {
        expression: NodeIndex,
    },
    ThrowStatement {
        expression: NodeIndex,
    },
    BreakStatement {
        label: NodeIndex,
    },
    ContinueStatement {
        label: NodeIndex,
    },
    TryStatement {
        try_block: NodeIndex,
        catch_clause: NodeIndex,
        finally_block: NodeIndex,
    },
    CatchClause {
        variable: NodeIndex,
        block: NodeIndex,
    },
    SwitchStatement {
        expression: NodeIndex,
        clauses: NodeList,
    },
    /// `case expr:` or `default:` (expression is NONE).
    CaseClause {
        expression: NodeIndex,
        statements: StatementList,
    },
    LabeledStatement {
        label: NodeIndex,
        statement: NodeIndex,
    },
    WithStatement {
        expression: NodeIndex,
        statement: NodeIndex,
    },
    DebuggerStatement,

    // Members and bindings
    Parameter {
        name: NodeIndex,
        initializer: NodeIndex,
        is_rest: bool,
    },
    PropertyAssignment {
        name: NodeIndex,
        initializer: NodeIndex,
    },
    /// `{ a }` or, in patterns, `{ a = 1 }`.
    ShorthandPropertyAssignment {
        name: NodeIndex,
        initializer: NodeIndex,
    },
    MethodDeclaration(MethodData),
    ComputedPropertyName {
        expression: NodeIndex,
    },
    SpreadElement {
        expression: NodeIndex,
    },

    // Expressions
    Identifier {
        name: String,
    },
    ThisExpression,
    SuperExpression,
    NullLiteral,
    BooleanLiteral {
        value: bool,
    },
    NumericLiteral {
        text: String,
    },
    BigIntLiteral {
        text: String,
    },
    StringLiteral {
        /// Cooked value.
        value: String,
    },
    RegularExpressionLiteral {
        text: String,
    },
    TemplateLiteral(TemplateData),
    TaggedTemplateExpression {
        tag: NodeIndex,
        template: NodeIndex,
    },
    ArrayLiteral {
        elements: NodeList,
    },
    ObjectLiteral {
        properties: NodeList,
    },
    FunctionExpression(FunctionData),
    ArrowFunction(ArrowFunctionData),
    ClassExpression(ClassData),
    ParenthesizedExpression {
        expression: NodeIndex,
    },
    CallExpression {
        expression: NodeIndex,
        arguments: NodeList,
        optional: bool,
    },
    NewExpression {
        expression: NodeIndex,
        /// `None` for `new Foo` without parentheses.
        arguments: Option<NodeList>,
    },
    PropertyAccessExpression {
        expression: NodeIndex,
        name: NodeIndex,
        optional: bool,
    },
    ElementAccessExpression {
        expression: NodeIndex,
        argument: NodeIndex,
        optional: bool,
    },
    PrefixUnaryExpression {
        operator: SyntaxKind,
        operand: NodeIndex,
    },
    PostfixUnaryExpression {
        operand: NodeIndex,
        operator: SyntaxKind,
    },
    /// Binary, logical, assignment and comma expressions.
    BinaryExpression {
        left: NodeIndex,
        operator: SyntaxKind,
        right: NodeIndex,
    },
    ConditionalExpression {
        condition: NodeIndex,
        when_true: NodeIndex,
        when_false: NodeIndex,
    },
    YieldExpression {
        expression: NodeIndex,
        delegate: bool,
    },
    AwaitExpression {
        expression: NodeIndex,
    },
    /// Array hole (`[a, , b]`).
    OmittedExpression,
}

impl NodeKind {
    /// Short name of the variant, for logs and errors.
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Program(_) => "Program",
            NodeKind::Block(_) => "Block",
            NodeKind::EmptyStatement => "EmptyStatement",
            NodeKind::ExpressionStatement { .. } => "ExpressionStatement",
            NodeKind::VariableStatement { .. } => "VariableStatement",
            NodeKind::VariableDeclarationList(_) => "VariableDeclarationList",
            NodeKind::VariableDeclaration { .. } => "VariableDeclaration",
            NodeKind::FunctionDeclaration(_) => "FunctionDeclaration",
            NodeKind::ClassDeclaration(_) => "ClassDeclaration",
            NodeKind::IfStatement { .. } => "IfStatement",
            NodeKind::ForStatement { .. } => "ForStatement",
            NodeKind::ForInStatement { .. } => "ForInStatement",
            NodeKind::ForOfStatement { .. } => "ForOfStatement",
            NodeKind::WhileStatement { .. } => "WhileStatement",
            NodeKind::DoStatement { .. } => "DoStatement",
            NodeKind::ReturnStatement { .. } => "ReturnStatement",
            NodeKind::ThrowStatement { .. } => "ThrowStatement",
            NodeKind::BreakStatement { .. } => "BreakStatement",
            NodeKind::ContinueStatement { .. } => "ContinueStatement",
            NodeKind::TryStatement { .. } => "TryStatement",
            NodeKind::CatchClause { .. } => "CatchClause",
            NodeKind::SwitchStatement { .. } => "SwitchStatement",
            NodeKind::CaseClause { .. } => "CaseClause",
            NodeKind::LabeledStatement { .. } => "LabeledStatement",
            NodeKind::WithStatement { .. } => "WithStatement",
            NodeKind::DebuggerStatement => "DebuggerStatement",
            NodeKind::Parameter { .. } => "Parameter",
            NodeKind::PropertyAssignment { .. } => "PropertyAssignment",
            NodeKind::ShorthandPropertyAssignment { .. } => "ShorthandPropertyAssignment",
            NodeKind::MethodDeclaration(_) => "MethodDeclaration",
            NodeKind::ComputedPropertyName { .. } => "ComputedPropertyName",
            NodeKind::SpreadElement { .. } => "SpreadElement",
            NodeKind::Identifier { .. } => "Identifier",
            NodeKind::ThisExpression => "ThisExpression",
            NodeKind::SuperExpression => "SuperExpression",
            NodeKind::NullLiteral => "NullLiteral",
            NodeKind::BooleanLiteral { .. } => "BooleanLiteral",
            NodeKind::NumericLiteral { .. } => "NumericLiteral",
            NodeKind::BigIntLiteral { .. } => "BigIntLiteral",
            NodeKind::StringLiteral { .. } => "StringLiteral",
            NodeKind::RegularExpressionLiteral { .. } => "RegularExpressionLiteral",
            NodeKind::TemplateLiteral(_) => "TemplateLiteral",
            NodeKind::TaggedTemplateExpression { .. } => "TaggedTemplateExpression",
            NodeKind::ArrayLiteral { .. } => "ArrayLiteral",
            NodeKind::ObjectLiteral { .. } => "ObjectLiteral",
            NodeKind::FunctionExpression(_) => "FunctionExpression",
            NodeKind::ArrowFunction(_) => "ArrowFunction",
            NodeKind::ClassExpression(_) => "ClassExpression",
            NodeKind::ParenthesizedExpression { .. } => "ParenthesizedExpression",
            NodeKind::CallExpression { .. } => "CallExpression",
            NodeKind::NewExpression { .. } => "NewExpression",
            NodeKind::PropertyAccessExpression { .. } => "PropertyAccessExpression",
            NodeKind::ElementAccessExpression { .. } => "ElementAccessExpression",
            NodeKind::PrefixUnaryExpression { .. } => "PrefixUnaryExpression",
            NodeKind::PostfixUnaryExpression { .. } => "PostfixUnaryExpression",
            NodeKind::BinaryExpression { .. } => "BinaryExpression",
            NodeKind::ConditionalExpression { .. } => "ConditionalExpression",
            NodeKind::YieldExpression { .. } => "YieldExpression",
            NodeKind::AwaitExpression { .. } => "AwaitExpression",
            NodeKind::OmittedExpression => "OmittedExpression",
        }
    }

    pub fn is_statement(&self) -> bool {
        matches!(
            self,
            NodeKind::Block(_)
                | NodeKind::EmptyStatement
                | NodeKind::ExpressionStatement { .. }
                | NodeKind::VariableStatement { .. }
                | NodeKind::FunctionDeclaration(_)
                | NodeKind::ClassDeclaration(_)
                | NodeKind::IfStatement { .. }
                | NodeKind::ForStatement { .. }
                | NodeKind::ForInStatement { .. }
                | NodeKind::ForOfStatement { .. }
                | NodeKind::WhileStatement { .. }
                | NodeKind::DoStatement { .. }
                | NodeKind::ReturnStatement { .. }
                | NodeKind::ThrowStatement { .. }
                | NodeKind::BreakStatement { .. }
                | NodeKind::ContinueStatement { .. }
                | NodeKind::TryStatement { .. }
                | NodeKind::SwitchStatement { .. }
                | NodeKind::LabeledStatement { .. }
                | NodeKind::WithStatement { .. }
                | NodeKind::DebuggerStatement
        )
    }

    /// Function-like nodes open a new `var` scope.
    pub fn is_function_like(&self) -> bool {
        matches!(
            self,
            NodeKind::FunctionDeclaration(_)
                | NodeKind::FunctionExpression(_)
                | NodeKind::ArrowFunction(_)
                | NodeKind::MethodDeclaration(_)
        )
    }

    pub fn is_loop(&self) -> bool {
        matches!(
            self,
            NodeKind::ForStatement { .. }
                | NodeKind::ForInStatement { .. }
                | NodeKind::ForOfStatement { .. }
                | NodeKind::WhileStatement { .. }
                | NodeKind::DoStatement { .. }
        )
    }

    pub fn statement_list(&self) -> Option<&StatementList> {
        match self {
            NodeKind::Program(list) | NodeKind::Block(list) => Some(list),
            NodeKind::CaseClause { statements, .. } => Some(statements),
            _ => None,
        }
    }

    pub fn statement_list_mut(&mut self) -> Option<&mut StatementList> {
        match self {
            NodeKind::Program(list) | NodeKind::Block(list) => Some(list),
            NodeKind::CaseClause { statements, .. } => Some(statements),
            _ => None,
        }
    }
}
