//! Node flags.

use bitflags::bitflags;

bitflags! {
    /// Edit-tracking flags. A node with neither flag set is pristine and
    /// prints as a verbatim copy of its source range.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u16 {
        /// Created by a transform; has no source text of its own.
        const SYNTHESIZED = 1 << 0;
        /// Original node whose subtree was edited.
        const MODIFIED = 1 << 1;
        /// The list of a statement container was re-sequenced.
        const LIST_EDITED = 1 << 2;
    }
}
