//! Parser module: arena AST plus the recursive-descent parser.

pub mod base;
pub mod comment_attachment;
pub mod flags;
pub mod node;
pub mod node_arena;
pub mod state;
mod state_expressions;
mod state_statements;

pub use base::{CommentId, NodeIndex, NodeList};
pub use flags::NodeFlags;
pub use node::{
    ArrowFunctionData, ClassData, DeclarationKind, FunctionData, MethodData, MethodKind, Node,
    NodeKind, StatementList, TemplateData, VariableDeclarationListData,
};
pub use node_arena::{AttachedComments, NodeArena, children_of};
pub use state::{ParseError, ParsedFile, ParserState, parse};
