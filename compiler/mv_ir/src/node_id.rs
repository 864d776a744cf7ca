//! Node identifiers for the syntax arena.

use std::fmt;

/// Index into a [`SyntaxTree`](crate::SyntaxTree).
///
/// Stable for the lifetime of a tree snapshot, so it doubles as the key of
/// every inference and resolution map. Back references (a node's enclosing
/// module, a spec's target function) are plain `NodeId`s rather than owning
/// pointers, which keeps the mutually referencing parts of a module free of
/// ownership cycles.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct NodeId(u32);

impl NodeId {
    /// Sentinel that never names an allocated node.
    pub const INVALID: NodeId = NodeId(u32::MAX);

    #[inline]
    pub const fn new(index: u32) -> Self {
        NodeId(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn is_valid(self) -> bool {
        self.0 != u32::MAX
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "NodeId({})", self.0)
        } else {
            write!(f, "NodeId::INVALID")
        }
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::INVALID
    }
}

/// Index of a package (compilation unit) in a [`Project`](crate::Project).
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct PackageId(pub u32);

impl PackageId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}
