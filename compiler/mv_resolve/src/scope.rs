//! Lexical scope chains.
//!
//! A scope chain lists, innermost first, every scope level whose entries a
//! reference at some node can see. Levels are computed from the tree shape
//! alone; what each level contributes is produced by [`scope_entries`].
//!
//! Order, innermost to outermost:
//!
//! 1. match arm bindings, lambda parameters, quantifier bindings
//! 2. block locals (only `let`s before the current statement), then the
//!    block's `use` items
//! 3. function parameters and type parameters; item spec targets; schema
//!    fields; struct and enum type parameters
//! 4. module items, module `use` items, items of attached module specs
//!
//! [`scope_entries`]: crate::scope_entries

use mv_ir::ast::{ExprKind, ItemSpecTarget, NodeKind};
use mv_ir::{NodeId, Project};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    MatchArm,
    Lambda,
    Quant,
    /// Locals of the first `visible` statements of a block.
    Block { visible: usize },
    /// `use` statements of a block.
    BlockUses,
    Function,
    ItemSpec,
    Schema,
    /// Type parameters of a struct, enum or global variable.
    TypeParams,
    ModuleItems,
    ModuleUses,
    /// Spec-only items of the module specs attached to a module.
    ModuleSpecItems,
    /// Items declared directly in a module spec.
    SpecBlockItems,
    SpecBlockUses,
}

/// One level of a scope chain.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Scope {
    /// Node the level belongs to: the block, function, module...
    pub owner: NodeId,
    pub kind: ScopeKind,
}

impl Scope {
    #[inline]
    fn new(owner: NodeId, kind: ScopeKind) -> Self {
        Scope { owner, kind }
    }
}

/// Scopes visible from `element`, innermost first.
pub fn scope_chain(project: &Project, element: NodeId) -> Vec<Scope> {
    let tree = project.tree();
    let mut scopes = Vec::new();
    let mut prev = element;
    for node in tree.ancestors(element) {
        match tree.kind(node) {
            NodeKind::MatchArm(arm) => {
                if arm.pat != prev {
                    scopes.push(Scope::new(node, ScopeKind::MatchArm));
                }
            }
            NodeKind::Expr(ExprKind::Lambda { body, .. }) => {
                if *body == prev {
                    scopes.push(Scope::new(node, ScopeKind::Lambda));
                }
            }
            NodeKind::Expr(ExprKind::Quant { bindings, .. }) => {
                if !bindings.contains(&prev) {
                    scopes.push(Scope::new(node, ScopeKind::Quant));
                }
            }
            NodeKind::Block(block) => {
                let visible = block
                    .stmts
                    .iter()
                    .position(|&stmt| stmt == prev)
                    .unwrap_or(block.stmts.len());
                scopes.push(Scope::new(node, ScopeKind::Block { visible }));
                scopes.push(Scope::new(node, ScopeKind::BlockUses));
            }
            NodeKind::Function(_) => scopes.push(Scope::new(node, ScopeKind::Function)),
            NodeKind::ItemSpec(_) => scopes.push(Scope::new(node, ScopeKind::ItemSpec)),
            NodeKind::Schema(_) => scopes.push(Scope::new(node, ScopeKind::Schema)),
            NodeKind::Struct(_) | NodeKind::Enum(_) | NodeKind::GlobalVar(_) => {
                scopes.push(Scope::new(node, ScopeKind::TypeParams));
            }
            NodeKind::Module(_) => push_module_scopes(&mut scopes, node),
            NodeKind::ModuleSpec(_) => {
                scopes.push(Scope::new(node, ScopeKind::SpecBlockItems));
                scopes.push(Scope::new(node, ScopeKind::SpecBlockUses));
                if let Some(target) = project.module_spec_target(node) {
                    push_module_scopes(&mut scopes, target);
                }
            }
            NodeKind::File(_)
            | NodeKind::UseStmt(_)
            | NodeKind::UseSpeck(_)
            | NodeKind::Friend(_)
            | NodeKind::Variant(_)
            | NodeKind::Field(_)
            | NodeKind::Param(_)
            | NodeKind::TypeParam(_)
            | NodeKind::Const(_)
            | NodeKind::SchemaField(_)
            | NodeKind::Attr(_)
            | NodeKind::Stmt(_)
            | NodeKind::Expr(_)
            | NodeKind::Pat(_)
            | NodeKind::PatField(_)
            | NodeKind::StructLitField(_)
            | NodeKind::Path(_)
            | NodeKind::Type(_) => {}
        }
        prev = node;
    }
    scopes
}

fn push_module_scopes(scopes: &mut Vec<Scope>, module: NodeId) {
    scopes.push(Scope::new(module, ScopeKind::ModuleItems));
    scopes.push(Scope::new(module, ScopeKind::ModuleUses));
    scopes.push(Scope::new(module, ScopeKind::ModuleSpecItems));
}

/// Declaration an item spec describes: a function or struct of the
/// enclosing module (or of the module a module spec is attached to).
pub fn item_spec_target(project: &Project, item_spec: NodeId) -> Option<NodeId> {
    let tree = project.tree();
    let ItemSpecTarget::Item(name) = tree.as_item_spec(item_spec)?.target else {
        return None;
    };
    let module = tree.containing_module(item_spec).or_else(|| {
        tree.containing_module_spec(item_spec)
            .and_then(|spec| project.module_spec_target(spec))
    })?;
    tree.as_module(module)?.items.iter().copied().find(|&item| {
        matches!(
            tree.kind(item),
            NodeKind::Function(f) if f.name == name
        ) || matches!(tree.kind(item), NodeKind::Struct(s) if s.name == name)
    })
}
