//! remod rewrites legacy JavaScript into modern syntax.
//!
//! The pipeline for one source text is parse → transform → print:
//!
//! ```
//! use remod::{TransformSet, transform_source};
//!
//! let transforms = TransformSet::parse("let,arrow").unwrap();
//! let outcome = transform_source("var a = 1;\nf(function(x) { return x; });", &transforms).unwrap();
//! assert_eq!(outcome.code, "const a = 1;\nf(x => x);");
//! assert!(outcome.warnings.is_empty());
//! ```
//!
//! Untouched regions of the input are copied byte for byte; only rewritten
//! nodes are printed anew. Every call owns its arena and its warning list,
//! so independent sources may be processed on different threads.

pub mod tracing_config;

pub use remod_common::Warning;
pub use remod_parser::ParseError;
pub use remod_transforms::{TransformError, TransformId, TransformSet, available_transforms};

use anyhow::Context;
use remod_common::LineMap;
use remod_transforms::{WarningReporter, run_transforms};
use serde::Serialize;
use tracing::debug;

/// Result of transforming one source text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Outcome {
    /// The rewritten source.
    pub code: String,
    /// Declined rewrites, in source order.
    pub warnings: Vec<Warning>,
}

/// Run the selected transforms, in order, over `source`.
///
/// Fails when the source does not parse or a transform finds the tree in a
/// shape it did not expect; nothing is produced in either case.
pub fn transform_source(source: &str, transforms: &TransformSet) -> anyhow::Result<Outcome> {
    let _span = tracing::debug_span!("transform_source", bytes = source.len()).entered();

    let mut file = remod_parser::parse(source).context("failed to parse source")?;
    let line_map = LineMap::build(source);
    let mut reporter = WarningReporter::new();
    let mut instances = transforms.instantiate();
    run_transforms(
        &mut instances,
        &mut file.arena,
        source,
        file.root,
        &line_map,
        &mut reporter,
    )
    .context("failed to apply transforms")?;

    let code = remod_emitter::print(&file.arena, source, file.root);
    let warnings = reporter.into_sorted();
    debug!(warnings = warnings.len(), "source transformed");
    Ok(Outcome { code, warnings })
}
