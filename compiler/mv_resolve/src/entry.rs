//! Entries contributed by each scope level.

use rustc_hash::FxHashSet;

use mv_ir::ast::{ExprKind, NodeKind, PatKind, StmtKind};
use mv_ir::{Name, NodeId, Project, SyntaxTree};

use crate::scope::{item_spec_target, Scope, ScopeKind};
use crate::use_items::{use_items, UseItem, UseKind};
use crate::{ItemScope, Namespace};

/// What a scope entry points at.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EntryTarget {
    Decl(NodeId),
    /// Import resolved on demand.
    Use(UseItem),
}

/// A named candidate binding visible at some scope level.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ScopeEntry {
    pub name: Name,
    pub target: EntryTarget,
    pub ns: Namespace,
    pub scope: ItemScope,
}

impl ScopeEntry {
    fn decl(project: &Project, name: Name, decl: NodeId) -> Self {
        ScopeEntry {
            name,
            target: EntryTarget::Decl(decl),
            ns: Namespace::of_decl(project.tree().kind(decl)),
            scope: ItemScope::Main,
        }
    }

    fn item(project: &Project, decl: NodeId) -> Option<Self> {
        let name = project.tree().kind(decl).decl_name()?;
        Some(ScopeEntry {
            scope: ItemScope::of(project, decl),
            ..ScopeEntry::decl(project, name, decl)
        })
    }

    fn import(item: UseItem) -> Self {
        let ns = match item.kind {
            UseKind::Module | UseKind::SelfModule => Namespace::MODULE,
            UseKind::Item => Namespace::all(),
        };
        ScopeEntry {
            name: item.name,
            target: EntryTarget::Use(item),
            ns,
            scope: item.scope,
        }
    }
}

/// Binding patterns introduced by `pat`, in source order.
pub fn pattern_bindings(tree: &SyntaxTree, pat: NodeId, out: &mut Vec<NodeId>) {
    match tree.as_pat(pat) {
        Some(PatKind::Binding { .. }) => out.push(pat),
        Some(PatKind::Tuple(items)) => {
            for &item in items {
                pattern_bindings(tree, item, out);
            }
        }
        Some(PatKind::Struct { fields, .. }) => {
            for &field in fields {
                if let Some(f) = tree.as_pat_field(field) {
                    pattern_bindings(tree, f.pat, out);
                }
            }
        }
        Some(PatKind::Wild | PatKind::Unit | PatKind::Path(_)) | None => {}
    }
}

fn binding_entries(project: &Project, pats: impl IntoIterator<Item = NodeId>, out: &mut Vec<ScopeEntry>) {
    let tree = project.tree();
    let mut bindings = Vec::new();
    for pat in pats {
        pattern_bindings(tree, pat, &mut bindings);
    }
    for binding in bindings {
        if let Some(name) = tree.kind(binding).decl_name() {
            out.push(ScopeEntry::decl(project, name, binding));
        }
    }
}

fn param_pats<'t>(tree: &'t SyntaxTree, params: &'t [NodeId]) -> impl Iterator<Item = NodeId> + 't {
    params
        .iter()
        .filter_map(|&param| tree.as_param(param).map(|p| p.pat))
}

fn type_param_entries(project: &Project, type_params: &[NodeId], out: &mut Vec<ScopeEntry>) {
    for &tp in type_params {
        if let Some(name) = project.tree().kind(tp).decl_name() {
            out.push(ScopeEntry::decl(project, name, tp));
        }
    }
}

fn function_entries(project: &Project, function: NodeId, out: &mut Vec<ScopeEntry>) {
    let tree = project.tree();
    if let Some(f) = tree.as_function(function) {
        binding_entries(project, param_pats(tree, &f.params), out);
        type_param_entries(project, &f.type_params, out);
    }
}

fn use_stmt_entries(project: &Project, stmts: &[NodeId], out: &mut Vec<ScopeEntry>) {
    for &stmt in stmts {
        if matches!(project.tree().kind(stmt), NodeKind::UseStmt(_)) {
            out.extend(use_items(project, stmt).into_iter().map(ScopeEntry::import));
        }
    }
}

fn item_entries(project: &Project, items: &[NodeId], out: &mut Vec<ScopeEntry>) {
    for &item in items {
        if matches!(project.tree().kind(item), NodeKind::ItemSpec(_)) {
            continue;
        }
        out.extend(ScopeEntry::item(project, item));
    }
}

/// Entries one scope level contributes.
///
/// Within a block, later `let`s shadow earlier ones, so only the innermost
/// binding of each name is returned.
pub fn scope_entries(project: &Project, scope: &Scope) -> Vec<ScopeEntry> {
    let tree = project.tree();
    let mut out = Vec::new();
    match scope.kind {
        ScopeKind::MatchArm => {
            if let Some(arm) = tree.as_match_arm(scope.owner) {
                binding_entries(project, [arm.pat], &mut out);
            }
        }
        ScopeKind::Lambda => {
            if let Some(ExprKind::Lambda { params, .. }) = tree.as_expr(scope.owner) {
                binding_entries(project, param_pats(tree, params), &mut out);
            }
        }
        ScopeKind::Quant => {
            if let Some(ExprKind::Quant { bindings, .. }) = tree.as_expr(scope.owner) {
                binding_entries(project, param_pats(tree, bindings), &mut out);
            }
        }
        ScopeKind::Block { visible } => {
            if let Some(block) = tree.as_block(scope.owner) {
                let lets = block.stmts[..visible.min(block.stmts.len())]
                    .iter()
                    .rev()
                    .filter_map(|&stmt| match tree.as_stmt(stmt) {
                        Some(StmtKind::Let { pat, .. }) => Some(*pat),
                        _ => None,
                    });
                let mut locals = Vec::new();
                binding_entries(project, lets, &mut locals);
                let mut seen = FxHashSet::default();
                out.extend(locals.into_iter().filter(|entry| seen.insert(entry.name)));
            }
        }
        ScopeKind::BlockUses => {
            if let Some(block) = tree.as_block(scope.owner) {
                use_stmt_entries(project, &block.stmts, &mut out);
            }
        }
        ScopeKind::Function => function_entries(project, scope.owner, &mut out),
        ScopeKind::ItemSpec => {
            if let Some(target) = item_spec_target(project, scope.owner) {
                match tree.kind(target) {
                    NodeKind::Function(_) => {
                        function_entries(project, target, &mut out);
                        out.push(ScopeEntry::decl(project, project.known().result, scope.owner));
                    }
                    NodeKind::Struct(s) => {
                        for &field in &s.fields {
                            out.extend(ScopeEntry::item(project, field));
                        }
                        type_param_entries(project, &s.type_params, &mut out);
                    }
                    _ => {}
                }
            }
        }
        ScopeKind::Schema => {
            if let Some(schema) = tree.as_schema(scope.owner) {
                type_param_entries(project, &schema.type_params, &mut out);
                if let Some(body) = tree.as_block(schema.body) {
                    for &stmt in &body.stmts {
                        if matches!(tree.kind(stmt), NodeKind::SchemaField(_)) {
                            out.extend(ScopeEntry::item(project, stmt));
                        }
                    }
                }
            }
        }
        ScopeKind::TypeParams => {
            let type_params = match tree.kind(scope.owner) {
                NodeKind::Struct(s) => s.type_params.as_slice(),
                NodeKind::Enum(e) => e.type_params.as_slice(),
                NodeKind::GlobalVar(g) => g.type_params.as_slice(),
                _ => &[],
            };
            type_param_entries(project, type_params, &mut out);
        }
        ScopeKind::ModuleItems => {
            if let Some(module) = tree.as_module(scope.owner) {
                item_entries(project, &module.items, &mut out);
            }
        }
        ScopeKind::ModuleUses => {
            if let Some(module) = tree.as_module(scope.owner) {
                use_stmt_entries(project, &module.uses, &mut out);
            }
        }
        ScopeKind::ModuleSpecItems => {
            for &spec in project.module_specs_of(scope.owner) {
                if let Some(spec) = tree.as_module_spec(spec) {
                    item_entries(project, &spec.items, &mut out);
                }
            }
        }
        ScopeKind::SpecBlockItems => {
            if let Some(spec) = tree.as_module_spec(scope.owner) {
                item_entries(project, &spec.items, &mut out);
            }
        }
        ScopeKind::SpecBlockUses => {
            if let Some(spec) = tree.as_module_spec(scope.owner) {
                use_stmt_entries(project, &spec.uses, &mut out);
            }
        }
    }
    out
}
