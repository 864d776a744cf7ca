//! Paths and type expressions.

use crate::{AddressRef, Name, NodeId};

/// `qualifier::segment<type_args>`
///
/// `0x1::m::f` is three nested paths: `0x1`, `0x1::m` and `0x1::m::f`,
/// each holding the previous one as its qualifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Path {
    pub qualifier: Option<NodeId>,
    pub segment: PathSegment,
    pub type_args: Vec<NodeId>,
}

impl Path {
    /// Identifier segment, if the segment is not an address.
    #[inline]
    pub fn name(&self) -> Option<Name> {
        match self.segment {
            PathSegment::Name(name) => Some(name),
            PathSegment::Address(_) => None,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Name(Name),
    /// Numeric address literal used as a qualifier: `0x1`.
    Address(AddressRef),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeExprKind {
    /// Builtins, structs, enums and type parameters: `u8`, `vector<T>`, `m::S<T>`.
    Path(NodeId),
    Ref {
        mutable: bool,
        inner: NodeId,
    },
    Tuple(Vec<NodeId>),
    Unit,
    /// `|u8, bool| -> u64`
    Lambda {
        params: Vec<NodeId>,
        ret: Option<NodeId>,
    },
}
