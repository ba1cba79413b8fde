//! Syntax transforms for the remod modernizer.
//!
//! Every rewrite implements the [`Transform`] contract and runs as one
//! post-order pass over the arena ([`traversal::run_transform`]). A
//! transform either skips a site, replaces a node, edits it in place, or
//! hands the [`replacer`] a set of statement-level replacement
//! instructions. Sites it declines are reported through the per-file
//! [`WarningReporter`], never as errors.
//!
//! The `class` transform is the heaviest: [`class::builder`] recognizes
//! the ES5 constructor/prototype idiom and assembles a
//! [`class::ClassCandidate`] before anything in the tree changes.

pub mod class;
pub mod comments;
pub mod contract;
pub mod registry;
pub mod replacer;
pub mod rules;
pub mod scope;
pub mod traversal;
pub mod warnings;

pub use contract::{Rewrite, Transform, TransformCtx, TransformError};
pub use registry::{TransformId, TransformSet, available_transforms};
pub use replacer::ReplacementInstruction;
pub use traversal::{run_transform, run_transforms};
pub use warnings::WarningReporter;
