use super::*;
use crate::ty::{IntKind, IntVar, TyVar};
use pretty_assertions::assert_eq;

fn param(raw: u32) -> NodeId {
    NodeId::new(raw)
}

#[test]
fn substitute_keeps_unmentioned_parameters() {
    let ty = Ty::Tuple(vec![Ty::TypeParam(param(1)), Ty::TypeParam(param(2))]);
    let mut subst = Substitution::default();
    subst.insert(param(1), Ty::Bool);

    assert_eq!(
        substitute(&ty, &subst),
        Ty::Tuple(vec![Ty::Bool, Ty::TypeParam(param(2))])
    );
    assert_eq!(
        substitute_or_unknown(&ty, &subst),
        Ty::Tuple(vec![Ty::Bool, Ty::Unknown])
    );
}

#[test]
fn substitution_reaches_callable_and_adt_children() {
    let t = param(7);
    let ty = Ty::Callable {
        params: vec![Ty::reference(Ty::TypeParam(t), true)],
        ret: Box::new(Ty::Adt {
            item: param(50),
            args: vec![Ty::vector(Ty::TypeParam(t))],
        }),
        kind: CallableKind::Lambda,
    };
    let mut subst = Substitution::default();
    subst.insert(t, Ty::Integer(IntKind::U8));

    let expected = Ty::Callable {
        params: vec![Ty::reference(Ty::Integer(IntKind::U8), true)],
        ret: Box::new(Ty::Adt {
            item: param(50),
            args: vec![Ty::vector(Ty::Integer(IntKind::U8))],
        }),
        kind: CallableKind::Lambda,
    };
    assert_eq!(substitute(&ty, &subst), expected);
}

#[test]
fn infer_folding_and_visiting() {
    let var = TyVar { id: 3, origin: None };
    let ty = Ty::vector(Ty::Tuple(vec![Ty::ty_var(var), Ty::int_var(IntVar(0))]));

    let folded = fold_ty_infer_with(&ty, |infer| match infer {
        TyInfer::TyVar(_) => Ty::Bool,
        TyInfer::IntVar(_) => Ty::DEFAULT_INTEGER,
    });
    assert_eq!(
        folded,
        Ty::vector(Ty::Tuple(vec![Ty::Bool, Ty::DEFAULT_INTEGER]))
    );

    assert_eq!(
        collect_ty_infers(&ty),
        vec![TyInfer::TyVar(var), TyInfer::IntVar(IntVar(0))]
    );
    assert!(visit_ty_infers(&ty, |infer| matches!(infer, TyInfer::IntVar(_))));
    assert!(!visit_ty_infers(&Ty::Bool, |_| true));
}

#[test]
fn deep_types_fold_without_overflow() {
    let mut ty = Ty::TypeParam(param(0));
    for _ in 0..2_000 {
        ty = Ty::vector(ty);
    }
    let mut subst = Substitution::default();
    subst.insert(param(0), Ty::Bool);
    let folded = substitute(&ty, &subst);
    assert!(!folded.flags().contains(crate::TypeFlags::HAS_TYPE_PARAM));
}
