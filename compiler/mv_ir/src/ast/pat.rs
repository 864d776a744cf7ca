//! Patterns.

use crate::{Name, NodeId};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PatKind {
    /// Introduces a local.
    Binding { name: Name },
    Wild,
    Unit,
    Tuple(Vec<NodeId>),
    /// `S { a, b: p, .. }` or `E::V { .. }`; fields are `PatField` nodes.
    Struct {
        path: NodeId,
        fields: Vec<NodeId>,
        has_rest: bool,
    },
    /// Unit variant or constant: `E::V`.
    Path(NodeId),
}

/// `name: pat` in a struct pattern.
///
/// Shorthand `S { x }` carries `shorthand` and a `Binding` pattern named
/// after the field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatField {
    pub name: Name,
    pub pat: NodeId,
    pub shorthand: bool,
}
