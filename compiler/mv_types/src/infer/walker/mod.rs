//! The inference walker.
//!
//! One [`TypeWalker`] types one owner (function, item spec, schema or
//! constant) in a single pass over its syntax:
//!
//! 1. parameters are bound to their declared types,
//! 2. attribute values are inferred,
//! 3. the body is walked bottom-up while expectations flow top-down,
//! 4. lambda bodies queued during the walk are drained in FIFO order,
//! 5. integers are defaulted and every recorded type is resolved.
//!
//! Expression handlers live in submodules grouped by expression family and
//! take the walker as their first argument. Every handler returns
//! [`Walk`], since resolution and lowering can observe cancellation.

mod blocks;
mod calls;
mod control_flow;
mod expr;
mod identifiers;
mod lambdas;
mod operators;
mod patterns;
mod sequences;
mod structs;

pub use patterns::BindingMode;

use mv_ir::ast::NodeKind;
use mv_ir::{NodeId, Project, SyntaxTree};
use mv_resolve::{item_spec_target, ResolvedPath, Resolver};
use mv_stack::{CancellationFlag, Cancelled};

use crate::config::InferConfig;
use crate::fold::Substitution;
use crate::lower::{type_params_of, TyLowering};
use crate::ty::Ty;
use crate::type_error::{TypeError, TypeErrorKind};

use super::{Expected, InferenceContext, InferenceResult};

/// Result of a walker step; only cancellation aborts a walk.
pub(crate) type Walk<T> = Result<T, Cancelled>;

/// Walks one inference owner.
pub struct TypeWalker<'a> {
    pub(crate) ctx: InferenceContext<'a>,
    resolver: Resolver<'a>,
    lowering: TyLowering<'a>,
    config: InferConfig,
    cancel: Option<&'a CancellationFlag>,
    /// Declared return type of the function being walked.
    ret_ty: Ty,
}

impl<'a> TypeWalker<'a> {
    pub fn new(
        resolver: Resolver<'a>,
        msl: bool,
        config: InferConfig,
        cancel: Option<&'a CancellationFlag>,
    ) -> Self {
        let resolver = match cancel {
            Some(flag) => resolver.with_cancellation(flag),
            None => resolver,
        };
        TypeWalker {
            ctx: InferenceContext::new(resolver.project(), msl),
            resolver,
            lowering: TyLowering::new(resolver, msl),
            config,
            cancel,
            ret_ty: Ty::Unknown,
        }
    }

    #[inline]
    fn project(&self) -> &'a Project {
        self.ctx.project()
    }

    #[inline]
    fn tree(&self) -> &'a SyntaxTree {
        self.ctx.project().tree()
    }

    fn check_cancelled(&self) -> Walk<()> {
        self.cancel.map_or(Ok(()), CancellationFlag::check)
    }

    /// Type `owner` and freeze the result.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn run(mut self, owner: NodeId) -> Walk<InferenceResult> {
        self.check_cancelled()?;
        let tree = self.tree();
        match tree.kind(owner) {
            NodeKind::Function(func) => {
                self.ret_ty = self.lowering.return_ty(owner)?;
                self.bind_params(&func.params)?;
                self.infer_attrs(&func.attrs.items)?;
                if let Some(body) = func.body {
                    let expected = Expected::from(self.ret_ty.clone());
                    blocks::infer_block(&mut self, body, expected, true)?;
                }
            }
            NodeKind::ItemSpec(spec) => {
                let target = item_spec_target(self.project(), owner);
                if let Some(func) = target.and_then(|target| tree.as_function(target)) {
                    self.bind_params(&func.params)?;
                }
                blocks::infer_block(&mut self, spec.body, Expected::NoValue, false)?;
            }
            NodeKind::Schema(schema) => {
                blocks::infer_block(&mut self, schema.body, Expected::NoValue, false)?;
            }
            NodeKind::Const(decl) => {
                self.infer_attrs(&decl.attrs.items)?;
                if let Some(init) = decl.init {
                    let ty = self.lowering.decl_ty(owner)?;
                    expr::infer_expr_coercable_to(&mut self, init, ty)?;
                }
            }
            other => tracing::debug!(kind = other.label(), "not an inference owner"),
        }
        lambdas::drain_lambdas(&mut self)?;
        Ok(self.ctx.finish(owner, self.config.strict))
    }

    /// Bind each parameter pattern to its lowered declared type.
    fn bind_params(&mut self, params: &[NodeId]) -> Walk<()> {
        for &param in params {
            let Some(decl) = self.tree().as_param(param) else {
                continue;
            };
            let ty = self.lowering.lower_opt(decl.ty)?;
            patterns::collect_bindings(self, decl.pat, &ty, BindingMode::ByValue)?;
        }
        Ok(())
    }

    fn infer_attrs(&mut self, attrs: &[NodeId]) -> Walk<()> {
        for &attr in attrs {
            let Some(item) = self.tree().as_attr(attr) else {
                continue;
            };
            if let Some(value) = item.value {
                expr::infer_expr(self, value, Expected::NoValue)?;
            }
            self.infer_attrs(&item.nested)?;
        }
        Ok(())
    }

    // ==================== Resolution ====================

    /// Resolve `path`, record every candidate and return the preferred one:
    /// the first visible candidate, else the first.
    fn resolve_path(&mut self, path: NodeId) -> Walk<Option<NodeId>> {
        let candidates = self.resolver.resolve(path)?;
        let preferred = ResolvedPath::preferred(&candidates);
        self.ctx.write_resolved_path(path, candidates);
        Ok(preferred)
    }

    /// Fresh variables for the type parameters of `item`, constrained by
    /// explicit type arguments where given.
    fn instantiate_item(&mut self, item: NodeId, type_args: &[NodeId]) -> Walk<Substitution> {
        let params = type_params_of(self.tree(), item);
        let subst = self.ctx.instantiate(params);
        for (param, &arg) in params.iter().zip(type_args) {
            let arg_ty = self.lowering.lower_type(arg)?;
            let Some(var) = subst.get(param) else {
                continue;
            };
            if let Err(mismatch) = self.ctx.combine_types(var, &arg_ty) {
                let kind = TypeErrorKind::TypeMismatch {
                    expected: mismatch.expected,
                    actual: mismatch.actual,
                };
                self.ctx.report(TypeError::new(arg, kind));
            }
        }
        Ok(subst)
    }

    /// Instantiate `item` with the type arguments written on `path`.
    fn instantiate_path(&mut self, path: NodeId, item: NodeId) -> Walk<Substitution> {
        let type_args = self
            .tree()
            .as_path(path)
            .map_or(&[][..], |p| p.type_args.as_slice());
        self.instantiate_item(item, type_args)
    }

    /// `adt` applied to the variables of `subst`.
    fn instantiated_adt(&self, adt: NodeId, subst: &Substitution) -> Ty {
        Ty::Adt {
            item: adt,
            args: type_params_of(self.tree(), adt)
                .iter()
                .map(|param| subst.get(param).cloned().unwrap_or(Ty::Unknown))
                .collect(),
        }
    }

    // ==================== Coercion ====================

    /// Combine `actual` into `expected`, reporting failures on `node`.
    ///
    /// Returns whether the coercion succeeded. Diverging expressions
    /// coerce to anything.
    fn coerce_types(&mut self, node: NodeId, actual: &Ty, expected: &Ty) -> bool {
        if actual.is_never() {
            return true;
        }
        let resolved_actual = self.ctx.resolve_vars_if_possible(actual);
        let resolved_expected = self.ctx.resolve_vars_if_possible(expected);
        if self
            .ctx
            .combine_types(&resolved_expected, &resolved_actual)
            .is_err()
        {
            self.ctx.report(TypeError::new(
                node,
                TypeErrorKind::TypeMismatch {
                    expected: resolved_expected,
                    actual: resolved_actual,
                },
            ));
            return false;
        }
        if let Err(missing) = self.ctx.abilities_compatible(expected, actual) {
            let ty = self.ctx.resolve_vars_if_possible(actual);
            self.ctx.report(TypeError::new(
                node,
                TypeErrorKind::AbilitiesMismatch { ty, missing },
            ));
            return false;
        }
        true
    }

    /// Coerce every branch to the first one that does not diverge.
    ///
    /// `Never` if all branches diverge or there are none.
    fn intersect_types(&mut self, branches: &[(NodeId, Ty)]) -> Ty {
        let mut rest = branches.iter().skip_while(|(_, ty)| ty.is_never());
        let Some((_, target)) = rest.next() else {
            return Ty::Never;
        };
        for (node, ty) in rest {
            self.coerce_types(*node, ty, target);
        }
        self.ctx.resolve_vars_if_possible(target)
    }

    /// Combine `ty` with the expected type when that can succeed, so that
    /// an expectation fixes otherwise free type arguments.
    fn unify_with_expected(&mut self, ty: &Ty, expected: &Expected) {
        if let Some(expected) = expected.ty() {
            if self.ctx.is_compatible(expected, ty) {
                let _ = self.ctx.combine_types(expected, ty);
            }
        }
    }

    /// Parameter types implied by requiring the callee to return the
    /// expected type, computed speculatively. Empty when nothing is known.
    fn expected_inputs_for_expected_output(
        &mut self,
        expected: &Expected,
        ret: &Ty,
        params: &[Ty],
    ) -> Vec<Ty> {
        let Some(expected) = expected.ty() else {
            return Vec::new();
        };
        self.ctx.speculate(|ctx| {
            if ctx.combine_types(expected, ret).is_err() {
                return Vec::new();
            }
            params
                .iter()
                .map(|param| ctx.resolve_vars_if_possible(param))
                .collect()
        })
    }
}
