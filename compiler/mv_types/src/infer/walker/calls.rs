//! Function calls, method calls and argument checking.
//!
//! A call is typed by instantiating the callee's signature with fresh
//! variables, deriving argument expectations from the expected result, and
//! coercing each argument to its parameter type. The instantiated callable
//! is recorded before resolution so that unconstrained type parameters stay
//! visible to callers.

use mv_ir::ast::{NodeKind, PatKind};
use mv_ir::{Name, NodeId, NumericAddress, Project};

use crate::fold::substitute;
use crate::lower::type_params_of;
use crate::ty::Ty;

use super::expr::infer_expr;
use super::{Expected, TypeWalker, Walk};

pub(super) fn infer_call(
    walker: &mut TypeWalker<'_>,
    call: NodeId,
    path: NodeId,
    args: &[NodeId],
    expected: &Expected,
) -> Walk<Ty> {
    let callee = walker.resolve_path(path)?;
    let tree = walker.tree();
    let callable = match callee {
        Some(func) if tree.as_function(func).is_some() => {
            let subst = walker.instantiate_path(path, func)?;
            substitute(&walker.lowering.function_ty(func)?, &subst)
        }
        Some(local) if tree.as_pat(local).is_some() => {
            let ty = walker.ctx.pat_types.get(&local).cloned().unwrap_or(Ty::Unknown);
            walker.ctx.resolve_vars_if_possible(&ty)
        }
        _ => Ty::Unknown,
    };
    let Ty::Callable { params, ret, .. } = &callable else {
        infer_unexpected_args(walker, args)?;
        return Ok(Ty::Unknown);
    };
    walker.ctx.write_callable_ty(call, callable.clone());

    let expected_inputs = walker.expected_inputs_for_expected_output(expected, ret, params);
    infer_arguments(walker, args, params, &expected_inputs)?;
    Ok(walker.ctx.resolve_vars_if_possible(ret))
}

/// `receiver.name<type_args>(args)`, resolved to a receiver-style function
/// of the module that declares the receiver's type.
pub(super) fn infer_method_call(
    walker: &mut TypeWalker<'_>,
    call: NodeId,
    receiver: NodeId,
    name: Name,
    type_args: &[NodeId],
    args: &[NodeId],
    expected: &Expected,
) -> Walk<Ty> {
    let receiver_ty = infer_expr(walker, receiver, Expected::NoValue)?;
    let receiver_ty = walker.ctx.resolve_vars_if_possible(&receiver_ty);
    let method = if walker.config.receiver_style_functions {
        find_method(walker, &receiver_ty, name)?
    } else {
        None
    };
    walker.ctx.resolved_method_calls.insert(call, method);
    let Some(method) = method else {
        infer_unexpected_args(walker, args)?;
        return Ok(Ty::Unknown);
    };

    let subst = walker.instantiate_item(method, type_args)?;
    let callable = substitute(&walker.lowering.function_ty(method)?, &subst);
    walker.ctx.write_callable_ty(call, callable.clone());
    let Ty::Callable { params, ret, .. } = &callable else {
        return Ok(Ty::Unknown);
    };
    let Some((self_ty, rest)) = params.split_first() else {
        return Ok(Ty::Unknown);
    };

    let expected_inputs = walker.expected_inputs_for_expected_output(expected, ret, params);
    let borrowed = autoborrow(&receiver_ty, self_ty);
    walker.coerce_types(receiver, &borrowed, self_ty);
    infer_arguments(
        walker,
        args,
        rest,
        expected_inputs.get(1..).unwrap_or_default(),
    )?;
    Ok(walker.ctx.resolve_vars_if_possible(ret))
}

/// Infer `args` against `formal`, taking expectations from
/// `expected_inputs` where available. Surplus arguments are inferred
/// without expectation.
fn infer_arguments(
    walker: &mut TypeWalker<'_>,
    args: &[NodeId],
    formal: &[Ty],
    expected_inputs: &[Ty],
) -> Walk<()> {
    for (index, &arg) in args.iter().enumerate() {
        let Some(formal_ty) = formal.get(index) else {
            infer_expr(walker, arg, Expected::NoValue)?;
            continue;
        };
        let expectation = expected_inputs.get(index).unwrap_or(formal_ty).clone();
        let actual = infer_expr(walker, arg, Expected::from(expectation))?;
        walker.coerce_types(arg, &actual, formal_ty);
    }
    Ok(())
}

fn infer_unexpected_args(walker: &mut TypeWalker<'_>, args: &[NodeId]) -> Walk<()> {
    for &arg in args {
        infer_expr(walker, arg, Expected::NoValue)?;
    }
    Ok(())
}

/// First receiver-style function named `name` whose `self` parameter
/// accepts `receiver_ty` after autoborrow.
fn find_method(
    walker: &mut TypeWalker<'_>,
    receiver_ty: &Ty,
    name: Name,
) -> Walk<Option<NodeId>> {
    let project = walker.project();
    let tree = project.tree();
    let module = match receiver_ty.innermost() {
        Ty::Vector(_) => vector_module(project),
        Ty::Adt { item, .. } => tree.containing_module(*item),
        _ => None,
    };
    let Some(module) = module else {
        return Ok(None);
    };

    let candidates: Vec<NodeId> = project
        .non_test_functions(module)
        .filter(|&func| is_receiver_function(project, func, name))
        .collect();
    for func in candidates {
        let function_ty = walker.lowering.function_ty(func)?;
        let params = type_params_of(tree, func);
        let fits = walker.ctx.speculate(|ctx| {
            let subst = ctx.instantiate(params);
            let Ty::Callable { params, .. } = substitute(&function_ty, &subst) else {
                return false;
            };
            params.first().is_some_and(|self_ty| {
                let borrowed = autoborrow(receiver_ty, self_ty);
                ctx.combine_types(self_ty, &borrowed).is_ok()
            })
        });
        if fits {
            tracing::trace!(?func, "method resolved");
            return Ok(Some(func));
        }
    }
    Ok(None)
}

/// `std::vector`, the module that owns methods on vectors.
fn vector_module(project: &Project) -> Option<NodeId> {
    project
        .modules_at(NumericAddress::ONE, project.known().vector)
        .first()
        .copied()
}

/// Named `name` and taking `self` as its first parameter.
fn is_receiver_function(project: &Project, func: NodeId, name: Name) -> bool {
    let tree = project.tree();
    let Some(decl) = tree.as_function(func) else {
        return false;
    };
    decl.name == name
        && decl
            .params
            .first()
            .and_then(|&param| tree.as_param(param))
            .is_some_and(|param| {
                matches!(
                    tree.kind(param.pat),
                    NodeKind::Pat(PatKind::Binding { name: param_name })
                        if *param_name == project.known().self_param
                )
            })
}

/// The receiver as the `self` parameter wants to see it: borrowed when a
/// reference is required, dereferenced when a value is.
fn autoborrow(receiver: &Ty, required: &Ty) -> Ty {
    match (receiver, required) {
        (Ty::Reference { .. }, Ty::Reference { .. }) => receiver.clone(),
        (_, Ty::Reference { mutable, .. }) => Ty::reference(receiver.clone(), *mutable),
        (Ty::Reference { referenced, .. }, _) => (**referenced).clone(),
        _ => receiver.clone(),
    }
}
