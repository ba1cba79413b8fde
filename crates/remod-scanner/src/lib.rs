//! JavaScript scanner/tokenizer for the remod modernizer.
//!
//! This crate provides the lexical analysis phase:
//! - `SyntaxKind` - Token types
//! - `ScannerState` - Tokenizer state machine with parser-driven rescans
//!   for regular expressions and template continuations

pub mod syntax_kind;
pub use syntax_kind::SyntaxKind;

pub mod scanner_impl;
pub use scanner_impl::{
    ScanError, ScannerSnapshot, ScannerState, is_identifier_part, is_identifier_start,
    is_identifier_text,
};
