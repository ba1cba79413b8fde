//! Base index types shared by the arena and its clients.

use serde::Serialize;

/// Index of a node in the `NodeArena`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeIndex(pub u32);

impl NodeIndex {
    pub const NONE: NodeIndex = NodeIndex(u32::MAX);

    #[inline]
    pub fn is_none(self) -> bool {
        self == Self::NONE
    }

    #[inline]
    pub fn is_some(self) -> bool {
        self != Self::NONE
    }
}

/// An ordered list of child nodes, with the source range its contents span.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct NodeList {
    pub nodes: Vec<NodeIndex>,
    pub pos: u32,
    pub end: u32,
}

impl NodeList {
    pub fn new(nodes: Vec<NodeIndex>) -> Self {
        NodeList {
            nodes,
            pos: 0,
            end: 0,
        }
    }

    pub fn with_range(nodes: Vec<NodeIndex>, pos: u32, end: u32) -> Self {
        NodeList { nodes, pos, end }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Identity of a comment in the arena's comment table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct CommentId(pub u32);
