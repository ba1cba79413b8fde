//! Post-order traversal driving one transform over a tree.

use crate::contract::{Rewrite, Transform, TransformCtx, TransformError};
use crate::replacer;
use crate::warnings::WarningReporter;
use remod_common::LineMap;
use remod_parser::{NodeArena, NodeIndex};
use smallvec::SmallVec;
use tracing::{debug, trace};

/// One node on the explicit traversal stack, with the snapshot of its
/// children taken when it was first reached.
struct Frame {
    node: NodeIndex,
    children: SmallVec<[NodeIndex; 8]>,
    next: usize,
}

impl Frame {
    fn new(arena: &NodeArena, node: NodeIndex) -> Self {
        Frame {
            node,
            children: arena.children(node),
            next: 0,
        }
    }
}

/// Run one transform over the tree rooted at `root`.
///
/// Children are visited before their parent. The child set of each node is
/// snapshotted on entry, so nodes a rewrite introduces are not revisited
/// in the same pass.
pub fn run_transform(
    transform: &mut dyn Transform,
    arena: &mut NodeArena,
    source: &str,
    root: NodeIndex,
    line_map: &LineMap,
    reporter: &mut WarningReporter,
) -> Result<(), TransformError> {
    let name = transform.name();
    let mut ctx = TransformCtx::new(arena, source, root, line_map, reporter, name);
    transform.prepare(&mut ctx)?;

    let mut stack = vec![Frame::new(ctx.arena, root)];
    let mut rewrites = 0usize;
    while let Some(frame) = stack.last_mut() {
        if let Some(&child) = frame.children.get(frame.next) {
            frame.next += 1;
            let child_frame = Frame::new(ctx.arena, child);
            stack.push(child_frame);
            continue;
        }
        let node = frame.node;
        stack.pop();

        let rewrite = transform.visit(&mut ctx, node)?;
        if !matches!(rewrite, Rewrite::Skip) {
            rewrites += 1;
        }
        apply_rewrite(ctx.arena, node, rewrite)?;
    }

    debug!(transform = name, rewrites, "transform pass finished");
    Ok(())
}

fn apply_rewrite(arena: &mut NodeArena, node: NodeIndex, rewrite: Rewrite) -> Result<(), TransformError> {
    match rewrite {
        Rewrite::Skip => {}
        Rewrite::Edited => {
            trace!(node = node.0, "edited in place");
            arena.mark_modified(node);
        }
        Rewrite::Replace(new) => {
            trace!(node = node.0, new = new.0, "replacing node");
            if !arena.replace_node(node, new) {
                let pos = arena.get(node).map_or(0, |n| n.pos);
                return Err(TransformError::mismatch(pos, "replaced node has no parent slot"));
            }
        }
        Rewrite::ReplaceRange(instructions) => {
            for instruction in &instructions {
                replacer::apply(arena, instruction)?;
            }
        }
    }
    Ok(())
}

/// Run a sequence of transforms, one full pass each, in order.
pub fn run_transforms(
    transforms: &mut [Box<dyn Transform>],
    arena: &mut NodeArena,
    source: &str,
    root: NodeIndex,
    line_map: &LineMap,
    reporter: &mut WarningReporter,
) -> Result<(), TransformError> {
    for transform in transforms.iter_mut() {
        run_transform(transform.as_mut(), arena, source, root, line_map, reporter)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use remod_parser::parse;
    use remod_parser::parser::NodeKind;

    /// Records the kinds it sees.
    struct Recorder(Vec<&'static str>);

    impl Transform for Recorder {
        fn name(&self) -> &'static str {
            "recorder"
        }

        fn visit(&mut self, ctx: &mut TransformCtx<'_>, node: NodeIndex) -> Result<Rewrite, TransformError> {
            if let Some(kind) = ctx.arena.kind(node) {
                self.0.push(kind.name());
            }
            Ok(Rewrite::Skip)
        }
    }

    #[test]
    fn children_are_visited_before_parents() {
        let source = "f(a);";
        let mut file = parse(source).unwrap();
        let map = LineMap::build(source);
        let mut reporter = WarningReporter::new();
        let mut recorder = Recorder(Vec::new());
        run_transform(&mut recorder, &mut file.arena, source, file.root, &map, &mut reporter).unwrap();
        assert_eq!(
            recorder.0,
            ["Identifier", "Identifier", "CallExpression", "ExpressionStatement", "Program"]
        );
    }

    /// Replaces every numeric literal with `0`.
    struct Zero;

    impl Transform for Zero {
        fn name(&self) -> &'static str {
            "zero"
        }

        fn visit(&mut self, ctx: &mut TransformCtx<'_>, node: NodeIndex) -> Result<Rewrite, TransformError> {
            if let Some(NodeKind::NumericLiteral { .. }) = ctx.arena.kind(node) {
                let zero = ctx.arena.add_synthesized(NodeKind::NumericLiteral { text: "0".into() });
                return Ok(Rewrite::Replace(zero));
            }
            Ok(Rewrite::Skip)
        }
    }

    #[test]
    fn replacement_of_the_root_is_a_mismatch() {
        struct ReplaceRoot;
        impl Transform for ReplaceRoot {
            fn name(&self) -> &'static str {
                "root"
            }
            fn visit(&mut self, ctx: &mut TransformCtx<'_>, node: NodeIndex) -> Result<Rewrite, TransformError> {
                if node == ctx.root {
                    return Ok(Rewrite::Replace(ctx.arena.add_synthesized(NodeKind::EmptyStatement)));
                }
                Ok(Rewrite::Skip)
            }
        }
        let source = "a;";
        let mut file = parse(source).unwrap();
        let map = LineMap::build(source);
        let mut reporter = WarningReporter::new();
        let error = run_transform(&mut ReplaceRoot, &mut file.arena, source, file.root, &map, &mut reporter)
            .unwrap_err();
        assert!(matches!(error, TransformError::StructuralMismatch { .. }));
    }

    #[test]
    fn replaced_nodes_take_the_original_span() {
        let source = "x = 1 + 2;";
        let mut file = parse(source).unwrap();
        let map = LineMap::build(source);
        let mut reporter = WarningReporter::new();
        run_transform(&mut Zero, &mut file.arena, source, file.root, &map, &mut reporter).unwrap();

        let statement = file.arena.statement_list(file.root).unwrap().statements[0];
        assert!(file.arena.get(statement).unwrap().is_modified());
        let zeros = (0..file.arena.len() as u32)
            .map(NodeIndex)
            .filter(|&i| file.arena.get(i).unwrap().is_synthesized())
            .map(|i| file.arena.get(i).unwrap().pos)
            .collect::<Vec<_>>();
        assert_eq!(zeros, [4, 8]);
    }
}
