//! The contract every transform implements.

use crate::replacer::ReplacementInstruction;
use crate::warnings::WarningReporter;
use remod_common::LineMap;
use remod_parser::{NodeArena, NodeIndex};
use thiserror::Error;

/// What a transform decided for one visited node.
#[derive(Debug)]
pub enum Rewrite {
    /// Leave the node alone.
    Skip,
    /// Put this synthesized node where the visited node was.
    Replace(NodeIndex),
    /// The visited node's own attributes were changed in place.
    Edited,
    /// Statement-level edits: remove and replace sets of siblings.
    ReplaceRange(Vec<ReplacementInstruction>),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    /// The tree no longer has the shape an edit assumed.
    #[error("structural mismatch at offset {pos}: {detail}")]
    StructuralMismatch { pos: u32, detail: String },
    #[error("Unknown transform \"{0}\".")]
    UnknownTransform(String),
}

impl TransformError {
    pub fn mismatch(pos: u32, detail: impl Into<String>) -> Self {
        TransformError::StructuralMismatch {
            pos,
            detail: detail.into(),
        }
    }
}

/// State one transform pass works against.
pub struct TransformCtx<'a> {
    pub arena: &'a mut NodeArena,
    pub source: &'a str,
    pub root: NodeIndex,
    line_map: &'a LineMap,
    reporter: &'a mut WarningReporter,
    transform: &'static str,
}

impl<'a> TransformCtx<'a> {
    pub fn new(
        arena: &'a mut NodeArena,
        source: &'a str,
        root: NodeIndex,
        line_map: &'a LineMap,
        reporter: &'a mut WarningReporter,
        transform: &'static str,
    ) -> Self {
        TransformCtx {
            arena,
            source,
            root,
            line_map,
            reporter,
            transform,
        }
    }

    /// Report a declined rewrite at `pos` on behalf of the running transform.
    pub fn warn(&mut self, pos: u32, message: impl Into<String>) {
        self.reporter
            .warn_at(self.line_map, self.transform, pos, message);
    }

    pub fn transform_name(&self) -> &'static str {
        self.transform
    }

    /// Source text of an original node; empty for synthesized ones.
    pub fn text_of(&self, node: NodeIndex) -> &'a str {
        let source = self.source;
        match self.arena.get(node) {
            Some(node) if !node.is_synthesized() => source
                .get(node.pos as usize..node.end as usize)
                .unwrap_or(""),
            _ => "",
        }
    }

    pub fn pos_of(&self, node: NodeIndex) -> u32 {
        self.arena.get(node).map_or(0, |node| node.pos)
    }
}

/// A named syntax rewrite.
///
/// `prepare` runs once over the whole tree before the pass (for analyses
/// such as variable scoping); `visit` is then called for every node in
/// post-order, children before parents.
pub trait Transform: Send {
    fn name(&self) -> &'static str;

    fn prepare(&mut self, _ctx: &mut TransformCtx<'_>) -> Result<(), TransformError> {
        Ok(())
    }

    fn visit(&mut self, ctx: &mut TransformCtx<'_>, node: NodeIndex)
    -> Result<Rewrite, TransformError>;
}
