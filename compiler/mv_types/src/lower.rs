//! Lowering of type expressions and declared signatures to [`Ty`].
//!
//! Type paths resolve in the type namespace. Builtin names are recognized
//! before resolution; spec-only builtins (`num`, `range`, `bv`) only in spec
//! context. A struct or enum applied to fewer arguments than it declares is
//! padded with `Unknown`, anything unresolvable lowers to `Unknown`.

use mv_ir::ast::{NodeKind, TypeExprKind};
use mv_ir::{NodeId, Project, SyntaxTree};
use mv_resolve::{ResolvedPath, Resolver};
use mv_stack::{ensure_sufficient_stack, Cancelled};

use crate::fold::Substitution;
use crate::ty::{CallableKind, IntKind, Ty};

/// Lowers syntax to types for one inference run.
#[derive(Copy, Clone)]
pub struct TyLowering<'a> {
    resolver: Resolver<'a>,
    msl: bool,
}

impl<'a> TyLowering<'a> {
    pub fn new(resolver: Resolver<'a>, msl: bool) -> Self {
        TyLowering { resolver, msl }
    }

    #[inline]
    fn project(&self) -> &'a Project {
        self.resolver.project()
    }

    /// Lower a `Type` node.
    pub fn lower_type(&self, ty: NodeId) -> Result<Ty, Cancelled> {
        ensure_sufficient_stack(|| self.lower_type_inner(ty))
    }

    /// Lower an optional annotation; a missing one is `Unknown`.
    pub fn lower_opt(&self, ty: Option<NodeId>) -> Result<Ty, Cancelled> {
        ty.map_or(Ok(Ty::Unknown), |ty| self.lower_type(ty))
    }

    fn lower_type_inner(&self, ty: NodeId) -> Result<Ty, Cancelled> {
        let Some(kind) = self.project().tree().as_type(ty) else {
            return Ok(Ty::Unknown);
        };
        Ok(match kind {
            TypeExprKind::Path(path) => self.lower_path(*path)?,
            TypeExprKind::Ref { mutable, inner } => Ty::reference(self.lower_type(*inner)?, *mutable),
            TypeExprKind::Tuple(items) => Ty::Tuple(self.lower_all(items)?),
            TypeExprKind::Unit => Ty::Unit,
            TypeExprKind::Lambda { params, ret } => Ty::Callable {
                params: self.lower_all(params)?,
                ret: Box::new(match ret {
                    Some(ret) => self.lower_type(*ret)?,
                    None => Ty::Unit,
                }),
                kind: CallableKind::Lambda,
            },
        })
    }

    fn lower_all(&self, tys: &[NodeId]) -> Result<Vec<Ty>, Cancelled> {
        tys.iter().map(|&ty| self.lower_type(ty)).collect()
    }

    fn lower_path(&self, path: NodeId) -> Result<Ty, Cancelled> {
        let project = self.project();
        let tree = project.tree();
        let Some(p) = tree.as_path(path) else {
            return Ok(Ty::Unknown);
        };
        if p.qualifier.is_none() {
            if let Some(builtin) = self.lower_builtin(path)? {
                return Ok(builtin);
            }
        }

        let resolved = self.resolver.resolve(path)?;
        let Some(decl) = ResolvedPath::preferred(&resolved) else {
            return Ok(Ty::Unknown);
        };
        Ok(match tree.kind(decl) {
            NodeKind::Struct(_) | NodeKind::Enum(_) => {
                let mut args = self.lower_all(&p.type_args)?;
                args.resize(type_params_of(tree, decl).len(), Ty::Unknown);
                Ty::Adt { item: decl, args }
            }
            NodeKind::TypeParam(_) => Ty::TypeParam(decl),
            _ => Ty::Unknown,
        })
    }

    fn lower_builtin(&self, path: NodeId) -> Result<Option<Ty>, Cancelled> {
        let project = self.project();
        let known = project.known();
        let Some(p) = project.tree().as_path(path) else {
            return Ok(None);
        };
        let Some(name) = p.name() else {
            return Ok(None);
        };
        if let Some(kind) = IntKind::from_name(project, name) {
            return Ok(Some(Ty::Integer(kind)));
        }
        let ty = match name {
            n if n == known.bool => Ty::Bool,
            n if n == known.address => Ty::Address,
            n if n == known.signer => Ty::Signer,
            n if n == known.vector => {
                let item = match p.type_args.first() {
                    Some(&arg) => self.lower_type(arg)?,
                    None => Ty::Unknown,
                };
                Ty::vector(item)
            }
            n if self.msl && n == known.num => Ty::Num,
            n if self.msl && known.is_spec_builtin_type(n) => Ty::Primitive(n),
            _ => return Ok(None),
        };
        Ok(Some(ty))
    }

    /// Declared callable type of a function, in terms of its own type
    /// parameters.
    pub fn function_ty(&self, func: NodeId) -> Result<Ty, Cancelled> {
        let tree = self.project().tree();
        let Some(decl) = tree.as_function(func) else {
            return Ok(Ty::Unknown);
        };
        let params = decl
            .params
            .iter()
            .map(|&param| self.lower_opt(tree.as_param(param).and_then(|p| p.ty)))
            .collect::<Result<Vec<_>, _>>()?;
        let ret = match decl.ret {
            Some(ret) => self.lower_type(ret)?,
            None => Ty::Unit,
        };
        Ok(Ty::Callable {
            params,
            ret: Box::new(ret),
            kind: CallableKind::Function(func),
        })
    }

    /// Declared return type of a function; `()` when omitted.
    pub fn return_ty(&self, func: NodeId) -> Result<Ty, Cancelled> {
        match self.project().tree().as_function(func).map(|f| f.ret) {
            Some(Some(ret)) => self.lower_type(ret),
            Some(None) => Ok(Ty::Unit),
            None => Ok(Ty::Unknown),
        }
    }

    /// Declared type of a value declaration: constant, struct or variant
    /// field, schema field or global variable.
    pub fn decl_ty(&self, decl: NodeId) -> Result<Ty, Cancelled> {
        let tree = self.project().tree();
        let ty = match tree.get(decl).map(|n| &n.kind) {
            Some(NodeKind::Const(c)) => c.ty,
            Some(NodeKind::Field(f)) => f.ty,
            Some(NodeKind::SchemaField(f)) => f.ty,
            Some(NodeKind::GlobalVar(g)) => g.ty,
            _ => return Ok(Ty::Unknown),
        };
        self.lower_type(ty)
    }
}

/// A struct or enum applied to its own type parameters.
pub fn item_ty(tree: &SyntaxTree, item: NodeId) -> Ty {
    Ty::Adt {
        item,
        args: type_params_of(tree, item)
            .iter()
            .map(|&param| Ty::TypeParam(param))
            .collect(),
    }
}

/// Type parameters declared by `item`; a variant uses its enum's.
pub fn type_params_of(tree: &SyntaxTree, item: NodeId) -> &[NodeId] {
    match tree.get(item).map(|n| &n.kind) {
        Some(NodeKind::Struct(s)) => &s.type_params,
        Some(NodeKind::Enum(e)) => &e.type_params,
        Some(NodeKind::Function(f)) => &f.type_params,
        Some(NodeKind::Schema(s)) => &s.type_params,
        Some(NodeKind::GlobalVar(g)) => &g.type_params,
        Some(NodeKind::Variant(_)) => tree
            .parent(item)
            .map_or(&[][..], |parent| type_params_of(tree, parent)),
        _ => &[],
    }
}

/// Field declarations of a struct or enum variant.
pub fn fields_of(tree: &SyntaxTree, item: NodeId) -> &[NodeId] {
    match tree.get(item).map(|n| &n.kind) {
        Some(NodeKind::Struct(s)) => &s.fields,
        Some(NodeKind::Variant(v)) => &v.fields,
        _ => &[],
    }
}

/// The struct or enum that owns the type parameters of `item`.
pub fn adt_item(tree: &SyntaxTree, item: NodeId) -> Option<NodeId> {
    match tree.get(item).map(|n| &n.kind) {
        Some(NodeKind::Struct(_) | NodeKind::Enum(_)) => Some(item),
        Some(NodeKind::Variant(_)) => tree.parent(item),
        _ => None,
    }
}

/// Map the type parameters of `item` to `args`, positionally.
pub fn adt_substitution(tree: &SyntaxTree, item: NodeId, args: &[Ty]) -> Substitution {
    type_params_of(tree, item)
        .iter()
        .copied()
        .zip(args.iter().cloned())
        .collect()
}

#[cfg(test)]
mod tests;
