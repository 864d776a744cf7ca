//! Frozen output of an inference run.

use rustc_hash::FxHashMap;

use mv_ir::{NodeId, SyntaxTree};
use mv_resolve::ResolvedPath;

use crate::error::InferenceError;
use crate::type_error::TypeError;
use crate::ty::Ty;

/// Types and resolutions for one inference owner.
///
/// Free of inference variables except in [`callable_type`], which keeps
/// them so that callers can tell where an explicit annotation is needed.
///
/// The typed getters treat a missing entry as a bug in the walker: in
/// strict mode they panic with an [`InferenceError`], otherwise they log it
/// and fall back to [`Ty::Unknown`].
///
/// [`callable_type`]: InferenceResult::callable_type
#[derive(Clone, Debug)]
pub struct InferenceResult {
    pub owner: NodeId,
    pub msl: bool,
    pub(crate) strict: bool,
    pub(crate) expr_types: FxHashMap<NodeId, Ty>,
    pub(crate) expr_expected_types: FxHashMap<NodeId, Ty>,
    pub(crate) pat_types: FxHashMap<NodeId, Ty>,
    pub(crate) pat_field_types: FxHashMap<NodeId, Ty>,
    pub(crate) callable_types: FxHashMap<NodeId, Ty>,
    pub(crate) resolved_paths: FxHashMap<NodeId, Vec<ResolvedPath>>,
    pub(crate) resolved_fields: FxHashMap<NodeId, Option<NodeId>>,
    pub(crate) resolved_method_calls: FxHashMap<NodeId, Option<NodeId>>,
    pub(crate) resolved_bindings: FxHashMap<NodeId, Option<NodeId>>,
    pub(crate) type_errors: Vec<TypeError>,
}

impl InferenceResult {
    pub fn expr_type(&self, tree: &SyntaxTree, expr: NodeId) -> Ty {
        self.lookup(&self.expr_types, tree, expr)
    }

    pub fn pat_type(&self, tree: &SyntaxTree, pat: NodeId) -> Ty {
        self.lookup(&self.pat_types, tree, pat)
    }

    pub fn pat_field_type(&self, tree: &SyntaxTree, field: NodeId) -> Ty {
        self.lookup(&self.pat_field_types, tree, field)
    }

    fn lookup(&self, types: &FxHashMap<NodeId, Ty>, tree: &SyntaxTree, node: NodeId) -> Ty {
        if let Some(ty) = types.get(&node) {
            return ty.clone();
        }
        let error = InferenceError::never_inferred(tree, node);
        if self.strict {
            panic!("{error}");
        }
        tracing::warn!(%error, "using unknown type");
        Ty::Unknown
    }

    /// Type of `expr` if it was inferred; never falls back.
    pub fn try_expr_type(&self, expr: NodeId) -> Option<&Ty> {
        self.expr_types.get(&expr)
    }

    pub fn try_pat_type(&self, pat: NodeId) -> Option<&Ty> {
        self.pat_types.get(&pat)
    }

    /// Type the context expected for `expr`, if it expected one.
    pub fn expected_type(&self, expr: NodeId) -> Option<&Ty> {
        self.expr_expected_types.get(&expr)
    }

    pub fn callable_type(&self, node: NodeId) -> Option<&Ty> {
        self.callable_types.get(&node)
    }

    /// Every candidate the path resolved to during inference.
    pub fn resolved_path(&self, path: NodeId) -> Option<&[ResolvedPath]> {
        self.resolved_paths.get(&path).map(Vec::as_slice)
    }

    /// Field declaration a field access or struct literal field refers to.
    ///
    /// `Some(None)` means the access was inferred but the field was not
    /// found.
    pub fn resolved_field(&self, node: NodeId) -> Option<Option<NodeId>> {
        self.resolved_fields.get(&node).copied()
    }

    pub fn resolved_method(&self, call: NodeId) -> Option<Option<NodeId>> {
        self.resolved_method_calls.get(&call).copied()
    }

    /// Constant or variant a match arm binding turned out to name.
    pub fn resolved_binding(&self, pat: NodeId) -> Option<Option<NodeId>> {
        self.resolved_bindings.get(&pat).copied()
    }

    pub fn type_errors(&self) -> &[TypeError] {
        &self.type_errors
    }

    /// Expressions with a recorded type.
    pub fn expr_types(&self) -> impl Iterator<Item = (NodeId, &Ty)> + '_ {
        self.expr_types.iter().map(|(&node, ty)| (node, ty))
    }

    /// Patterns with a recorded type.
    pub fn pat_types(&self) -> impl Iterator<Item = (NodeId, &Ty)> + '_ {
        self.pat_types.iter().map(|(&node, ty)| (node, ty))
    }
}
