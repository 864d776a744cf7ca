//! Mutable state of one inference run.

use std::collections::VecDeque;

use rustc_hash::FxHashMap;

use mv_ir::{NodeId, Project};
use mv_resolve::ResolvedPath;

use crate::fold::Substitution;
use crate::type_error::TypeError;
use crate::ty::{IntKind, IntVar, Ty, TyVar};
use crate::unify::UnificationTable;

use super::result::InferenceResult;

/// Everything an inference run accumulates before it is frozen into an
/// [`InferenceResult`].
///
/// Owned by a single walker; nothing here is shared between runs.
pub struct InferenceContext<'a> {
    pub(crate) project: &'a Project,
    /// Specification-language typing rules apply.
    pub(crate) msl: bool,

    pub(crate) expr_types: FxHashMap<NodeId, Ty>,
    pub(crate) expr_expected_types: FxHashMap<NodeId, Ty>,
    pub(crate) pat_types: FxHashMap<NodeId, Ty>,
    pub(crate) pat_field_types: FxHashMap<NodeId, Ty>,
    pub(crate) callable_types: FxHashMap<NodeId, Ty>,
    pub(crate) lambda_types: FxHashMap<NodeId, Ty>,

    pub(crate) resolved_paths: FxHashMap<NodeId, Vec<ResolvedPath>>,
    pub(crate) resolved_fields: FxHashMap<NodeId, Option<NodeId>>,
    pub(crate) resolved_method_calls: FxHashMap<NodeId, Option<NodeId>>,
    pub(crate) resolved_bindings: FxHashMap<NodeId, Option<NodeId>>,

    /// Lambdas whose bodies still have to be walked, oldest first.
    pub(crate) lambda_queue: VecDeque<NodeId>,
    pub(crate) type_errors: Vec<TypeError>,

    pub(crate) var_table: UnificationTable<TyVar>,
    pub(crate) int_table: UnificationTable<IntVar>,
}

impl<'a> InferenceContext<'a> {
    pub fn new(project: &'a Project, msl: bool) -> Self {
        InferenceContext {
            project,
            msl,
            expr_types: FxHashMap::default(),
            expr_expected_types: FxHashMap::default(),
            pat_types: FxHashMap::default(),
            pat_field_types: FxHashMap::default(),
            callable_types: FxHashMap::default(),
            lambda_types: FxHashMap::default(),
            resolved_paths: FxHashMap::default(),
            resolved_fields: FxHashMap::default(),
            resolved_method_calls: FxHashMap::default(),
            resolved_bindings: FxHashMap::default(),
            lambda_queue: VecDeque::new(),
            type_errors: Vec::new(),
            var_table: UnificationTable::new(),
            int_table: UnificationTable::new(),
        }
    }

    #[inline]
    pub fn project(&self) -> &'a Project {
        self.project
    }

    #[inline]
    pub fn msl(&self) -> bool {
        self.msl
    }

    // ==================== Variables ====================

    /// Fresh type variable, optionally remembering the type parameter it
    /// stands for.
    pub fn fresh_ty_var(&mut self, origin: Option<NodeId>) -> Ty {
        Ty::ty_var(self.var_table.new_key(|id| TyVar { id, origin }))
    }

    pub fn fresh_int_var(&mut self) -> Ty {
        Ty::int_var(self.int_table.new_key(IntVar))
    }

    /// Map each of `params` to a fresh variable originating from it.
    pub fn instantiate(&mut self, params: &[NodeId]) -> Substitution {
        params
            .iter()
            .map(|&param| (param, self.fresh_ty_var(Some(param))))
            .collect()
    }

    // ==================== Recording ====================

    pub fn write_expr_ty(&mut self, expr: NodeId, ty: Ty) {
        self.expr_types.insert(expr, ty);
    }

    pub fn write_expected_expr_ty(&mut self, expr: NodeId, ty: Ty) {
        self.expr_expected_types.insert(expr, ty);
    }

    pub fn write_pat_ty(&mut self, pat: NodeId, ty: Ty) {
        self.pat_types.insert(pat, ty);
    }

    pub fn write_pat_field_ty(&mut self, field: NodeId, ty: Ty) {
        self.pat_field_types.insert(field, ty);
    }

    pub fn write_callable_ty(&mut self, node: NodeId, ty: Ty) {
        self.callable_types.insert(node, ty);
    }

    pub fn write_resolved_path(&mut self, path: NodeId, candidates: Vec<ResolvedPath>) {
        self.resolved_paths.insert(path, candidates);
    }

    pub fn report(&mut self, error: TypeError) {
        tracing::trace!(?error, "type error");
        self.type_errors.push(error);
    }

    // ==================== Speculation ====================

    /// Run `f` and undo every unification and reported error it caused.
    pub fn speculate<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        let vars = self.var_table.snapshot();
        let ints = self.int_table.snapshot();
        let errors = self.type_errors.len();
        let result = f(self);
        self.type_errors.truncate(errors);
        self.int_table.rollback_to(ints);
        self.var_table.rollback_to(vars);
        result
    }

    /// Whether `actual` could be combined into `expected`, without
    /// committing to it.
    pub fn is_compatible(&mut self, expected: &Ty, actual: &Ty) -> bool {
        self.speculate(|ctx| ctx.combine_types(expected, actual).is_ok())
    }

    // ==================== Finishing ====================

    /// Substitute what is known so far into every recorded type.
    pub fn resolve_all_vars_if_possible(&mut self) {
        let exprs = std::mem::take(&mut self.expr_types);
        self.expr_types = self.resolve_map(exprs, Self::resolve_vars_if_possible);
        let pats = std::mem::take(&mut self.pat_types);
        self.pat_types = self.resolve_map(pats, Self::resolve_vars_if_possible);
        let fields = std::mem::take(&mut self.pat_field_types);
        self.pat_field_types = self.resolve_map(fields, Self::resolve_vars_if_possible);
    }

    fn resolve_map(
        &mut self,
        types: FxHashMap<NodeId, Ty>,
        mut resolve: impl FnMut(&mut Self, &Ty) -> Ty,
    ) -> FxHashMap<NodeId, Ty> {
        types
            .into_iter()
            .map(|(node, ty)| {
                let resolved = resolve(self, &ty);
                (node, resolved)
            })
            .collect()
    }

    /// Bind every integer variable still unbound to the default integer.
    pub fn default_int_vars(&mut self) {
        let count = u32::try_from(self.int_table.len()).unwrap_or(u32::MAX);
        for index in 0..count {
            let var = IntVar(index);
            if self.int_table.value_of(var).is_none() {
                self.int_table
                    .unify_var_value(var, Ty::Integer(IntKind::Default));
            }
        }
    }

    /// Default integers, resolve everything and freeze the run.
    pub fn finish(mut self, owner: NodeId, strict: bool) -> InferenceResult {
        self.default_int_vars();

        let expr_types = std::mem::take(&mut self.expr_types);
        let expr_types = self.resolve_map(expr_types, Self::fully_resolve);
        let pat_types = std::mem::take(&mut self.pat_types);
        let pat_types = self.resolve_map(pat_types, Self::fully_resolve);
        let pat_field_types = std::mem::take(&mut self.pat_field_types);
        let pat_field_types = self.resolve_map(pat_field_types, Self::fully_resolve);
        let expected = std::mem::take(&mut self.expr_expected_types);
        let expr_expected_types = self.resolve_map(expected, Self::fully_resolve_with_origins);
        // Left with their variables so that callers can spot missing
        // annotations.
        let callable_types = std::mem::take(&mut self.callable_types);
        let callable_types = self.resolve_map(callable_types, Self::resolve_vars_if_possible);

        let errors = std::mem::take(&mut self.type_errors);
        let type_errors = errors
            .into_iter()
            .map(|error| error.map_types(|ty| self.fully_resolve_with_origins(ty)))
            .collect();

        tracing::debug!(
            exprs = expr_types.len(),
            pats = pat_types.len(),
            "inference finished"
        );

        InferenceResult {
            owner,
            msl: self.msl,
            strict,
            expr_types,
            expr_expected_types,
            pat_types,
            pat_field_types,
            callable_types,
            resolved_paths: self.resolved_paths,
            resolved_fields: self.resolved_fields,
            resolved_method_calls: self.resolved_method_calls,
            resolved_bindings: self.resolved_bindings,
            type_errors,
        }
    }
}
