//! Path classification and namespaces implied by a path's position.

use mv_ir::ast::{ExprKind, NodeKind, PatKind, PathSegment};
use mv_ir::{AddressRef, Name, NodeId, SyntaxTree};

use crate::Namespace;

/// Shape of a path, deciding how it is resolved.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PathKind {
    /// `0x1` or a named address on its own; never resolves.
    BareAddress,
    /// `name`
    Unqualified { name: Name },
    /// `0x1::m`, or `std::m` inside a `use` declaration.
    AddressModule { address: AddressRef, name: Name },
    /// `q::name` where `q` is a module, an enum, or a named address.
    Qualified { qualifier: NodeId, name: Name },
    /// `name` inside the group of `use root::{name}`.
    UseGroupMember { root: NodeId, name: Name },
}

/// Classify `path`.
///
/// `in_use` marks paths inside `use` declarations, where a bare qualifier
/// can only be an address.
pub fn classify(tree: &SyntaxTree, path: NodeId, in_use: bool) -> PathKind {
    let Some(p) = tree.as_path(path) else {
        return PathKind::BareAddress;
    };
    let PathSegment::Name(name) = p.segment else {
        return PathKind::BareAddress;
    };
    let Some(qualifier) = p.qualifier else {
        return match group_root(tree, path) {
            Some(root) => PathKind::UseGroupMember { root, name },
            None => PathKind::Unqualified { name },
        };
    };
    let Some(q) = tree.as_path(qualifier) else {
        return PathKind::Qualified { qualifier, name };
    };
    match (q.qualifier, q.segment) {
        (None, PathSegment::Address(address)) => PathKind::AddressModule { address, name },
        (None, PathSegment::Name(named)) if in_use => PathKind::AddressModule {
            address: AddressRef::Named(named),
            name,
        },
        _ => PathKind::Qualified { qualifier, name },
    }
}

/// Root path of the `use` group `path` is a member of.
fn group_root(tree: &SyntaxTree, path: NodeId) -> Option<NodeId> {
    let speck = tree.parent(path)?;
    tree.as_use_speck(speck)?;
    let root = tree.parent(speck)?;
    tree.as_use_speck(root).map(|r| r.path)
}

/// Namespaces a path is looked up in, from its syntactic role.
pub fn path_namespaces(tree: &SyntaxTree, path: NodeId) -> Namespace {
    let Some(parent) = tree.parent(path) else {
        return Namespace::all();
    };
    match tree.kind(parent) {
        NodeKind::Path(_) => Namespace::QUALIFIER,
        NodeKind::Type(_) => Namespace::TYPE,
        NodeKind::Expr(ExprKind::Path(_) | ExprKind::Call { .. }) => Namespace::VALUE,
        NodeKind::Expr(ExprKind::StructLit { .. }) | NodeKind::Pat(PatKind::Struct { .. }) => {
            Namespace::TYPE
        }
        NodeKind::Pat(PatKind::Path(_)) => Namespace::VALUE,
        NodeKind::Friend(_) => Namespace::MODULE,
        _ => Namespace::all(),
    }
}
