//! JavaScript parser and AST types for the remod modernizer.
//!
//! - `parser::NodeArena` owns every node; nodes refer to each other by
//!   `NodeIndex`. The arena is mutable so transforms can edit the tree in
//!   place, and every edit is tracked through `NodeFlags` so the printer
//!   knows which source ranges are still byte-identical.
//! - `ParserState` is a recursive-descent parser over `remod_scanner`.
//! - `syntax` holds shape queries shared by the transforms.

pub mod parser;
pub use parser::{
    CommentId, NodeArena, NodeFlags, NodeIndex, NodeKind, NodeList, ParseError, ParsedFile,
    ParserState, parse,
};

pub mod syntax;
