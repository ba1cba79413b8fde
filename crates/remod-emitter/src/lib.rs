//! Source-preserving printer.
//!
//! The printer turns an edited arena back into text while keeping every
//! untouched byte of the input:
//! - pristine nodes are copied verbatim from the source;
//! - modified original nodes are spliced: the source between their
//!   children is copied and the children are printed recursively;
//! - statement lists whose sequence changed are re-laid out from each
//!   statement's original leading/trailing regions;
//! - synthesized nodes are printed structurally.

pub mod printer;
pub mod source_writer;

pub use printer::{PrintOptions, Printer, print};
pub use source_writer::SourceWriter;
