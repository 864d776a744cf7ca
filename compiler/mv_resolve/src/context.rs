//! Per-query resolution context.

use mv_ir::ast::NodeKind;
use mv_ir::{NodeId, PackageId, Project};

/// Build flavour an item or a reference belongs to.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ItemScope {
    #[default]
    Main,
    /// `#[test]` / `#[test_only]`
    Test,
    /// `#[verify_only]`
    Verify,
}

impl ItemScope {
    /// Scope of `node`, inherited from the innermost annotated ancestor.
    pub fn of(project: &Project, node: NodeId) -> ItemScope {
        if project.is_test_code(node) {
            ItemScope::Test
        } else if project.is_verify_only(node) {
            ItemScope::Verify
        } else {
            ItemScope::Main
        }
    }
}

/// Everything about the reference site that resolution looks at.
///
/// Rebuilt for each query.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ResolutionContext {
    pub element: NodeId,
    /// Enclosing module, or the target module of an enclosing module spec.
    pub module: Option<NodeId>,
    pub package: Option<PackageId>,
    /// Inside a `use` declaration.
    pub in_use: bool,
    /// Inside specification code.
    pub in_spec: bool,
    pub item_scope: ItemScope,
}

impl ResolutionContext {
    pub fn new(project: &Project, element: NodeId) -> Self {
        let tree = project.tree();
        let module = tree.containing_module(element).or_else(|| {
            tree.containing_module_spec(element)
                .and_then(|spec| project.module_spec_target(spec))
        });
        let in_use = tree
            .ancestors_or_self(element)
            .any(|node| matches!(tree.kind(node), NodeKind::UseStmt(_)));
        ResolutionContext {
            element,
            module,
            package: project.package_id_of(element),
            in_use,
            in_spec: tree.is_in_spec(element),
            item_scope: ItemScope::of(project, element),
        }
    }

    /// Whether dev-addresses apply to named address lookups.
    #[inline]
    pub fn test_aware(&self) -> bool {
        self.item_scope == ItemScope::Test
    }

    /// Whether something declared in `scope` is reachable from here.
    pub fn allows(&self, scope: ItemScope) -> bool {
        match scope {
            ItemScope::Main => true,
            ItemScope::Test => self.item_scope == ItemScope::Test,
            ItemScope::Verify => self.item_scope == ItemScope::Verify || self.in_spec,
        }
    }
}
