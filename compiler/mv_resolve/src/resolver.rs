//! Path resolution.
//!
//! [`Resolver::resolve`] turns a `Path` node into its candidate declarations.
//! Paths are classified first (see [`PathKind`]):
//!
//! - unqualified names walk the scope chain and stop at the first level with
//!   a match, so inner bindings shadow outer ones;
//! - `q::name` resolves `q` as a module or enum, falling back to treating a
//!   bare `q` as a named address when a module is acceptable;
//! - `0x1::m` goes straight to the project's module index.
//!
//! Every candidate is returned with its visibility; ambiguous paths keep all
//! of them. Unresolvable qualifiers produce an empty list rather than an
//! error.

use std::sync::Arc;

use mv_ir::ast::{NodeKind, PathSegment};
use mv_ir::{AddressRef, Name, NodeId, Project};
use mv_stack::{CancellationFlag, Cancelled};

use crate::address::resolve_named_address;
use crate::entry::{scope_entries, EntryTarget};
use crate::path_kind::{classify, path_namespaces, PathKind};
use crate::scope::{scope_chain, Scope, ScopeKind};
use crate::use_items::{use_module_path, UseItem, UseKind};
use crate::{Namespace, ResolutionContext, ResolveCache};

/// One candidate declaration for a path.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ResolvedPath {
    pub element: NodeId,
    pub is_visible: bool,
}

impl ResolvedPath {
    /// The candidate to act on when only one can be used: the first visible
    /// one, else the first.
    pub fn preferred(candidates: &[ResolvedPath]) -> Option<NodeId> {
        candidates
            .iter()
            .find(|c| c.is_visible)
            .or_else(|| candidates.first())
            .map(|c| c.element)
    }
}

/// Resolves paths against one project snapshot.
///
/// Cheap to construct; holds only borrows. With a [`ResolveCache`] attached,
/// results of [`resolve`](Self::resolve) are memoized per path node.
#[derive(Copy, Clone)]
pub struct Resolver<'a> {
    project: &'a Project,
    cache: Option<&'a ResolveCache>,
    cancel: Option<&'a CancellationFlag>,
}

impl<'a> Resolver<'a> {
    pub fn new(project: &'a Project) -> Self {
        Resolver {
            project,
            cache: None,
            cancel: None,
        }
    }

    #[must_use]
    pub fn with_cache(mut self, cache: &'a ResolveCache) -> Self {
        self.cache = Some(cache);
        self
    }

    #[must_use]
    pub fn with_cancellation(mut self, flag: &'a CancellationFlag) -> Self {
        self.cancel = Some(flag);
        self
    }

    #[inline]
    pub fn project(&self) -> &'a Project {
        self.project
    }

    #[inline]
    pub(crate) fn check_cancelled(&self) -> Result<(), Cancelled> {
        self.cancel.map_or(Ok(()), CancellationFlag::check)
    }

    /// Candidates for `path` in the namespaces its position implies.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn resolve(&self, path: NodeId) -> Result<Vec<ResolvedPath>, Cancelled> {
        self.check_cancelled()?;
        let token = self.project.dependency_token(path);
        if let Some(hit) = self.cache.and_then(|cache| cache.get(path, token)) {
            tracing::trace!("resolve cache hit");
            return Ok(hit.to_vec());
        }
        let ns = path_namespaces(self.project.tree(), path);
        let resolved = self.resolve_uncached(path, ns)?;
        if let Some(cache) = self.cache {
            cache.insert(path, token, Arc::from(resolved.as_slice()));
        }
        Ok(resolved)
    }

    /// Unqualified lookup of `name` as seen from `element`.
    pub fn resolve_local_name(
        &self,
        element: NodeId,
        name: Name,
        ns: Namespace,
    ) -> Result<Vec<ResolvedPath>, Cancelled> {
        self.check_cancelled()?;
        let ctx = ResolutionContext::new(self.project, element);
        let decls = self.resolve_unqualified(&ctx, name, ns)?;
        self.with_visibility(&ctx, decls)
    }

    /// Items named `name` declared in `module` or its module specs.
    pub fn module_items(
        &self,
        module: NodeId,
        name: Name,
        ns: Namespace,
    ) -> Result<Vec<NodeId>, Cancelled> {
        self.check_cancelled()?;
        let tree = self.project.tree();
        let own = tree.as_module(module).map_or(&[][..], |m| m.items.as_slice());
        let spec_items = self
            .project
            .module_specs_of(module)
            .iter()
            .filter_map(|&spec| tree.as_module_spec(spec))
            .flat_map(|spec| spec.items.iter());
        Ok(own
            .iter()
            .chain(spec_items)
            .copied()
            .filter(|&item| {
                let kind = tree.kind(item);
                kind.decl_name() == Some(name) && Namespace::of_decl(kind).intersects(ns)
            })
            .collect())
    }

    fn resolve_uncached(&self, path: NodeId, ns: Namespace) -> Result<Vec<ResolvedPath>, Cancelled> {
        let ctx = ResolutionContext::new(self.project, path);
        let decls = self.resolve_decls(&ctx, path, ns)?;
        self.with_visibility(&ctx, decls)
    }

    /// Declarations `path` names, before visibility is attached.
    fn resolve_decls(
        &self,
        ctx: &ResolutionContext,
        path: NodeId,
        ns: Namespace,
    ) -> Result<Vec<NodeId>, Cancelled> {
        match classify(self.project.tree(), path, ctx.in_use) {
            PathKind::BareAddress => Ok(Vec::new()),
            PathKind::Unqualified { name } => self.resolve_unqualified(ctx, name, ns),
            PathKind::AddressModule { address, name } => {
                Ok(self.modules_at_address(ctx, address, name, ns))
            }
            PathKind::Qualified { qualifier, name } => {
                self.resolve_qualified(ctx, qualifier, name, ns)
            }
            PathKind::UseGroupMember { root, name } => {
                self.resolve_group_member(ctx, root, name, ns)
            }
        }
    }

    fn with_visibility(
        &self,
        ctx: &ResolutionContext,
        decls: Vec<NodeId>,
    ) -> Result<Vec<ResolvedPath>, Cancelled> {
        let mut out: Vec<ResolvedPath> = Vec::with_capacity(decls.len());
        for element in decls {
            if out.iter().any(|r| r.element == element) {
                continue;
            }
            let is_visible = self.is_visible(ctx, element)?;
            out.push(ResolvedPath {
                element,
                is_visible,
            });
        }
        Ok(out)
    }

    fn resolve_unqualified(
        &self,
        ctx: &ResolutionContext,
        name: Name,
        ns: Namespace,
    ) -> Result<Vec<NodeId>, Cancelled> {
        if name == self.project.known().self_module && ns.contains(Namespace::MODULE) {
            if let Some(module) = ctx.module {
                return Ok(vec![module]);
            }
        }
        for scope in scope_chain(self.project, ctx.element) {
            let found = self.lookup_in_scope(ctx, &scope, name, ns)?;
            if !found.is_empty() {
                return Ok(found);
            }
        }
        Ok(Vec::new())
    }

    fn lookup_in_scope(
        &self,
        ctx: &ResolutionContext,
        scope: &Scope,
        name: Name,
        ns: Namespace,
    ) -> Result<Vec<NodeId>, Cancelled> {
        if matches!(scope.kind, ScopeKind::ModuleItems) {
            self.check_cancelled()?;
        }
        let mut found = Vec::new();
        for entry in scope_entries(self.project, scope) {
            if entry.name != name || !entry.ns.intersects(ns) || !ctx.allows(entry.scope) {
                continue;
            }
            match entry.target {
                EntryTarget::Decl(decl) => found.push(decl),
                EntryTarget::Use(item) => found.extend(self.resolve_use_item(&item, ns)?),
            }
        }
        Ok(found)
    }

    /// Declarations an import stands for, filtered by `ns`.
    fn resolve_use_item(
        &self,
        item: &UseItem,
        ns: Namespace,
    ) -> Result<Vec<NodeId>, Cancelled> {
        let Some(module_path) = use_module_path(self.project, item) else {
            return Ok(Vec::new());
        };
        match item.kind {
            UseKind::Module | UseKind::SelfModule => {
                if !ns.contains(Namespace::MODULE) {
                    return Ok(Vec::new());
                }
                self.modules_of_path(module_path)
            }
            UseKind::Item => {
                let tree = self.project.tree();
                let Some(original) = tree
                    .as_use_speck(item.speck)
                    .and_then(|s| tree.as_path(s.path))
                    .and_then(mv_ir::ast::Path::name)
                else {
                    return Ok(Vec::new());
                };
                let mut out = Vec::new();
                for module in self.modules_of_path(module_path)? {
                    out.extend(self.module_items(module, original, ns)?);
                }
                Ok(out)
            }
        }
    }

    /// Modules a path inside a `use` declaration names.
    fn modules_of_path(&self, path: NodeId) -> Result<Vec<NodeId>, Cancelled> {
        let ctx = ResolutionContext::new(self.project, path);
        let tree = self.project.tree();
        Ok(self
            .resolve_decls(&ctx, path, Namespace::MODULE)?
            .into_iter()
            .filter(|&decl| matches!(tree.kind(decl), NodeKind::Module(_)))
            .collect())
    }

    fn modules_at_address(
        &self,
        ctx: &ResolutionContext,
        address: AddressRef,
        name: Name,
        ns: Namespace,
    ) -> Vec<NodeId> {
        if !ns.contains(Namespace::MODULE) {
            return Vec::new();
        }
        let numeric = match address {
            AddressRef::Value(value) => Some(value),
            AddressRef::Named(named) => {
                resolve_named_address(self.project, ctx.element, named, ctx.test_aware())
            }
        };
        numeric.map_or_else(Vec::new, |addr| self.project.modules_at(addr, name).to_vec())
    }

    fn resolve_qualified(
        &self,
        ctx: &ResolutionContext,
        qualifier: NodeId,
        name: Name,
        ns: Namespace,
    ) -> Result<Vec<NodeId>, Cancelled> {
        let tree = self.project.tree();
        let targets = self.resolve(qualifier)?;
        if targets.is_empty() {
            // `std::vector` with no `std` in scope: `std` is a named address.
            let bare = tree
                .as_path(qualifier)
                .filter(|q| q.qualifier.is_none())
                .and_then(mv_ir::ast::Path::name);
            return Ok(match bare {
                Some(named) => {
                    self.modules_at_address(ctx, AddressRef::Named(named), name, ns)
                }
                None => Vec::new(),
            });
        }

        let mut out = Vec::new();
        for target in targets {
            match tree.kind(target.element) {
                NodeKind::Module(_) => {
                    if name == self.project.known().self_module {
                        if ns.contains(Namespace::MODULE) {
                            out.push(target.element);
                        }
                    } else {
                        out.extend(self.module_items(target.element, name, ns)?);
                    }
                }
                NodeKind::Enum(e) => {
                    if ns.intersects(Namespace::TYPE | Namespace::VALUE) {
                        out.extend(e.variants.iter().copied().filter(|&variant| {
                            tree.kind(variant).decl_name() == Some(name)
                        }));
                    }
                }
                _ => {}
            }
        }
        Ok(out)
    }

    fn resolve_group_member(
        &self,
        ctx: &ResolutionContext,
        root: NodeId,
        name: Name,
        ns: Namespace,
    ) -> Result<Vec<NodeId>, Cancelled> {
        let tree = self.project.tree();
        let Some(root_path) = tree.as_path(root) else {
            return Ok(Vec::new());
        };
        if root_path.qualifier.is_none() {
            // `use 0x1::{m, n}`
            let address = match root_path.segment {
                PathSegment::Address(address) => address,
                PathSegment::Name(named) => AddressRef::Named(named),
            };
            return Ok(self.modules_at_address(ctx, address, name, ns));
        }
        let modules = self.modules_of_path(root)?;
        if name == self.project.known().self_module {
            return Ok(if ns.contains(Namespace::MODULE) {
                modules
            } else {
                Vec::new()
            });
        }
        let mut out = Vec::new();
        for module in modules {
            out.extend(self.module_items(module, name, ns)?);
        }
        Ok(out)
    }
}
