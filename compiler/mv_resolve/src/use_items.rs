//! Flattening of `use` declarations into named imports.

use mv_ir::ast::PathSegment;
use mv_ir::{Name, NodeId, Project};

use crate::ItemScope;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum UseKind {
    /// `use 0x1::m;` or a member of `use 0x1::{m, n};`
    Module,
    /// `use 0x1::m::{Self};`
    SelfModule,
    /// `use 0x1::m::f;` or a member of `use 0x1::m::{f, g};`
    Item,
}

/// One name introduced by a `use` declaration.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct UseItem {
    /// Name visible in the importing scope: the alias, else the last segment.
    pub name: Name,
    pub speck: NodeId,
    pub kind: UseKind,
    pub scope: ItemScope,
}

/// Path naming the module an import refers into.
///
/// For `Module` imports that is the speck path itself, for members of a group
/// it is the group's root path, otherwise the qualifier of the speck path.
pub fn use_module_path(project: &Project, item: &UseItem) -> Option<NodeId> {
    let tree = project.tree();
    let speck = tree.as_use_speck(item.speck)?;
    if let Some(root) = tree.parent(item.speck).and_then(|p| tree.as_use_speck(p)) {
        return match item.kind {
            // `use 0x1::{m}`: the member itself is the module.
            UseKind::Module => Some(speck.path),
            UseKind::SelfModule | UseKind::Item => Some(root.path),
        };
    }
    match item.kind {
        UseKind::Module => Some(speck.path),
        UseKind::SelfModule | UseKind::Item => tree.as_path(speck.path)?.qualifier,
    }
}

/// All imports introduced by the `UseStmt` `stmt`.
pub fn use_items(project: &Project, stmt: NodeId) -> Vec<UseItem> {
    let tree = project.tree();
    let known = project.known();
    let Some(root_speck) = tree.as_use_stmt(stmt).map(|s| s.speck) else {
        return Vec::new();
    };
    let Some(root) = tree.as_use_speck(root_speck) else {
        return Vec::new();
    };
    let scope = ItemScope::of(project, stmt);
    let Some(root_path) = tree.as_path(root.path) else {
        return Vec::new();
    };

    if root.group.is_empty() {
        let Some(last) = root_path.name() else {
            return Vec::new();
        };
        // `use a::m` names a module when its qualifier is a bare address.
        let qualifier_is_bare = root_path
            .qualifier
            .and_then(|q| tree.as_path(q))
            .is_some_and(|q| q.qualifier.is_none());
        let (kind, default_name) = if qualifier_is_bare {
            (UseKind::Module, last)
        } else if last == known.self_module {
            let module_name = root_path
                .qualifier
                .and_then(|q| tree.as_path(q))
                .and_then(mv_ir::ast::Path::name)
                .unwrap_or(last);
            (UseKind::SelfModule, module_name)
        } else {
            (UseKind::Item, last)
        };
        return vec![UseItem {
            name: root.alias.unwrap_or(default_name),
            speck: root_speck,
            kind,
            scope,
        }];
    }

    // `use 0x1::{a, b}` groups modules, `use 0x1::m::{a, b}` groups items.
    let members_are_modules = root_path.qualifier.is_none();
    let module_name = match root_path.segment {
        PathSegment::Name(name) => Some(name),
        PathSegment::Address(_) => None,
    };
    root.group
        .iter()
        .filter_map(|&member| {
            let speck = tree.as_use_speck(member)?;
            let name = tree.as_path(speck.path)?.name()?;
            let (kind, default_name) = if members_are_modules {
                (UseKind::Module, name)
            } else if name == known.self_module {
                (UseKind::SelfModule, module_name?)
            } else {
                (UseKind::Item, name)
            };
            Some(UseItem {
                name: speck.alias.unwrap_or(default_name),
                speck: member,
                kind,
                scope,
            })
        })
        .collect()
}
