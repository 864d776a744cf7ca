use super::*;
use crate::test_support;
use crate::ty::{CallableKind, IntKind};
use mv_ir::{NodeId, PackageId, Project, StringInterner, TreeBuilder};
use pretty_assertions::assert_eq;

struct Fixture {
    project: Project,
    coin: NodeId,
    other: NodeId,
    /// `U: copy` of `f`.
    param: NodeId,
}

fn fixture() -> Fixture {
    let b = TreeBuilder::new(StringInterner::shared());
    let coin = b.struct_("Coin").abilities("store").type_param("T", "").build();
    let other = b.struct_("Other").abilities("copy, drop").build();
    let f = b.function("f").type_param("U", "copy").build();
    let module = b.module("0x1", "m").items([coin, other, f]).build();
    b.file(PackageId(0), vec![module], vec![]);
    let project = test_support::project(b);
    let param = project
        .tree()
        .as_function(f)
        .map_or(NodeId::INVALID, |decl| decl.type_params[0]);
    Fixture {
        project,
        coin,
        other,
        param,
    }
}

const U8: Ty = Ty::Integer(IntKind::U8);
const U64: Ty = Ty::Integer(IntKind::U64);

// ==================== Variables ====================

#[test]
fn type_variable_binds_to_concrete_type() {
    let fx = fixture();
    let mut ctx = InferenceContext::new(&fx.project, false);
    let var = ctx.fresh_ty_var(None);

    assert_eq!(ctx.combine_types(&var, &Ty::vector(U8)), Ok(()));
    assert_eq!(ctx.resolve_vars_if_possible(&var), Ty::vector(U8));
}

#[test]
fn unioned_variables_share_their_binding() {
    let fx = fixture();
    let mut ctx = InferenceContext::new(&fx.project, false);
    let a = ctx.fresh_ty_var(None);
    let b = ctx.fresh_ty_var(None);

    assert_eq!(ctx.combine_types(&a, &b), Ok(()));
    assert_eq!(ctx.combine_types(&Ty::Bool, &b), Ok(()));
    assert_eq!(ctx.resolve_vars_if_possible(&a), Ty::Bool);
}

#[test]
fn cyclic_binding_falls_back_to_unknown() {
    let fx = fixture();
    let mut ctx = InferenceContext::new(&fx.project, false);
    let var = ctx.fresh_ty_var(None);

    assert_eq!(ctx.combine_types(&var, &Ty::vector(var.clone())), Ok(()));
    assert_eq!(ctx.fully_resolve(&var), Ty::Unknown);
}

#[test]
fn integer_variables_only_take_integers() {
    let fx = fixture();
    let mut ctx = InferenceContext::new(&fx.project, false);
    let a = ctx.fresh_int_var();
    let b = ctx.fresh_int_var();
    let c = ctx.fresh_int_var();

    assert_eq!(ctx.combine_types(&a, &b), Ok(()));
    assert_eq!(ctx.combine_types(&U64, &b), Ok(()));
    assert_eq!(ctx.resolve_vars_if_possible(&a), U64);

    assert!(ctx.combine_types(&c, &Ty::Bool).is_err());
    assert_eq!(ctx.combine_types(&c, &Ty::Unknown), Ok(()));
    assert_eq!(ctx.combine_types(&Ty::Never, &c), Ok(()));
    assert!(matches!(
        ctx.resolve_vars_if_possible(&c),
        Ty::Infer(TyInfer::IntVar(_))
    ));
}

#[test]
fn type_variable_bound_to_integer_variable_follows_it() {
    let fx = fixture();
    let mut ctx = InferenceContext::new(&fx.project, false);
    let var = ctx.fresh_ty_var(None);
    let int = ctx.fresh_int_var();

    assert_eq!(ctx.combine_types(&var, &int), Ok(()));
    assert_eq!(ctx.combine_types(&int, &U8), Ok(()));
    assert_eq!(ctx.resolve_vars_if_possible(&var), U8);
}

// ==================== Structural rules ====================

#[test]
fn unknown_poisons_variables_on_the_other_side() {
    let fx = fixture();
    let mut ctx = InferenceContext::new(&fx.project, false);
    let var = ctx.fresh_ty_var(None);
    let nested = Ty::vector(Ty::Tuple(vec![var.clone(), Ty::Bool]));

    assert_eq!(ctx.combine_types(&Ty::Unknown, &nested), Ok(()));
    assert_eq!(ctx.resolve_vars_if_possible(&var), Ty::Unknown);
}

#[test]
fn never_combines_with_anything() {
    let fx = fixture();
    let mut ctx = InferenceContext::new(&fx.project, false);
    assert_eq!(ctx.combine_types(&Ty::Never, &Ty::Signer), Ok(()));
    assert_eq!(ctx.combine_types(&Ty::vector(U8), &Ty::Never), Ok(()));
}

#[test]
fn integer_widths_must_agree_unless_default() {
    let fx = fixture();
    let mut ctx = InferenceContext::new(&fx.project, false);
    assert_eq!(ctx.combine_types(&U8, &Ty::DEFAULT_INTEGER), Ok(()));
    assert_eq!(
        ctx.combine_types(&U8, &U64),
        Err(TypeMismatch {
            expected: U8,
            actual: U64,
        })
    );
}

#[test]
fn mutable_reference_cannot_be_satisfied_by_immutable_one() {
    let fx = fixture();
    let mut ctx = InferenceContext::new(&fx.project, false);
    let shared = Ty::reference(U8, false);
    let exclusive = Ty::reference(U8, true);

    assert_eq!(ctx.combine_types(&shared, &exclusive), Ok(()));
    assert!(ctx.combine_types(&exclusive, &shared).is_err());

    let mut spec = InferenceContext::new(&fx.project, true);
    assert_eq!(spec.combine_types(&exclusive, &shared), Ok(()));
}

#[test]
fn specs_see_through_references_and_widths() {
    let fx = fixture();
    let mut ctx = InferenceContext::new(&fx.project, true);
    assert_eq!(ctx.combine_types(&Ty::Num, &Ty::reference(U8, false)), Ok(()));
    assert_eq!(ctx.combine_types(&U64, &U8), Ok(()));
}

#[test]
fn structs_need_the_same_declaration() {
    let fx = fixture();
    let mut ctx = InferenceContext::new(&fx.project, false);
    let coin = |arg| Ty::Adt {
        item: fx.coin,
        args: vec![arg],
    };
    let other = Ty::Adt {
        item: fx.other,
        args: vec![],
    };

    assert!(ctx.combine_types(&coin(U8), &other).is_err());
    let var = ctx.fresh_ty_var(None);
    assert_eq!(ctx.combine_types(&coin(var.clone()), &coin(U64)), Ok(()));
    assert_eq!(ctx.resolve_vars_if_possible(&var), U64);
}

#[test]
fn every_pair_is_combined_and_first_error_is_reported() {
    let fx = fixture();
    let mut ctx = InferenceContext::new(&fx.project, false);
    let var = ctx.fresh_ty_var(None);
    let expected = Ty::Tuple(vec![Ty::Bool, var.clone()]);
    let actual = Ty::Tuple(vec![U8, U64]);

    assert_eq!(
        ctx.combine_types(&expected, &actual),
        Err(TypeMismatch {
            expected: Ty::Bool,
            actual: U8,
        })
    );
    assert_eq!(ctx.resolve_vars_if_possible(&var), U64);
    assert!(ctx
        .combine_types(&Ty::Tuple(vec![U8]), &Ty::Tuple(vec![U8, U8]))
        .is_err());
}

#[test]
fn callables_ignore_extra_parameters() {
    let fx = fixture();
    let mut ctx = InferenceContext::new(&fx.project, false);
    let callable = |params| Ty::Callable {
        params,
        ret: Box::new(Ty::Bool),
        kind: CallableKind::Lambda,
    };

    assert_eq!(
        ctx.combine_types(&callable(vec![U8]), &callable(vec![U8, U64])),
        Ok(())
    );
    assert!(ctx
        .combine_types(&callable(vec![U64]), &callable(vec![U8]))
        .is_err());
}

// ==================== Speculation ====================

#[test]
fn compatibility_check_leaves_no_trace() {
    let fx = fixture();
    let mut ctx = InferenceContext::new(&fx.project, false);
    let var = ctx.fresh_ty_var(None);

    assert!(ctx.is_compatible(&var, &U8));
    assert!(matches!(
        ctx.resolve_vars_if_possible(&var),
        Ty::Infer(TyInfer::TyVar(_))
    ));
    assert!(!ctx.is_compatible(&Ty::Bool, &U8));
}

#[test]
fn nested_speculations_roll_back_independently() {
    let fx = fixture();
    let mut ctx = InferenceContext::new(&fx.project, false);
    let a = ctx.fresh_ty_var(None);
    let b = ctx.fresh_ty_var(None);

    let inner_saw = ctx.speculate(|outer| {
        let _ = outer.combine_types(&a, &Ty::Bool);
        let inner = outer.speculate(|inner| {
            let _ = inner.combine_types(&b, &U8);
            inner.resolve_vars_if_possible(&b)
        });
        (inner, outer.resolve_vars_if_possible(&a), outer.resolve_vars_if_possible(&b))
    });

    assert_eq!(inner_saw.0, U8);
    assert_eq!(inner_saw.1, Ty::Bool);
    assert!(matches!(inner_saw.2, Ty::Infer(TyInfer::TyVar(_))));
    assert!(matches!(
        ctx.resolve_vars_if_possible(&a),
        Ty::Infer(TyInfer::TyVar(_))
    ));
}

// ==================== Abilities ====================

#[test]
fn instantiated_parameter_demands_its_bounds() {
    let fx = fixture();
    let mut ctx = InferenceContext::new(&fx.project, false);
    let var = ctx.fresh_ty_var(Some(fx.param));
    let coin = Ty::Adt {
        item: fx.coin,
        args: vec![U8],
    };
    let other = Ty::Adt {
        item: fx.other,
        args: vec![],
    };

    assert_eq!(ctx.abilities_compatible(&var, &coin), Err(Abilities::COPY));
    assert_eq!(ctx.abilities_compatible(&var, &other), Ok(()));

    let anonymous = ctx.fresh_ty_var(None);
    assert_eq!(ctx.abilities_compatible(&anonymous, &coin), Ok(()));
    assert_eq!(ctx.abilities_compatible(&Ty::Bool, &coin), Ok(()));
}

#[test]
fn specs_skip_ability_checks() {
    let fx = fixture();
    let mut ctx = InferenceContext::new(&fx.project, true);
    let var = ctx.fresh_ty_var(Some(fx.param));
    let coin = Ty::Adt {
        item: fx.coin,
        args: vec![U8],
    };
    assert_eq!(ctx.abilities_compatible(&var, &coin), Ok(()));
}

// ==================== Properties ====================

mod proptest_combine {
    use super::*;
    use proptest::prelude::*;

    /// Concrete types without references, where mutability makes the
    /// relation one-directional.
    fn arb_ty() -> impl Strategy<Value = Ty> {
        let leaf = prop_oneof![
            Just(Ty::Unknown),
            Just(Ty::Never),
            Just(Ty::Unit),
            Just(Ty::Num),
            Just(Ty::Bool),
            Just(Ty::Address),
            Just(Ty::Signer),
            Just(U8),
            Just(U64),
            Just(Ty::DEFAULT_INTEGER),
        ];
        leaf.prop_recursive(3, 24, 3, |inner| {
            prop_oneof![
                inner.clone().prop_map(Ty::vector),
                proptest::collection::vec(inner, 0..3).prop_map(Ty::Tuple),
            ]
        })
    }

    proptest! {
        #[test]
        fn combine_is_symmetric(a in arb_ty(), b in arb_ty()) {
            let fx = fixture();
            let forward = InferenceContext::new(&fx.project, false).combine_types(&a, &b).is_ok();
            let backward = InferenceContext::new(&fx.project, false).combine_types(&b, &a).is_ok();
            prop_assert_eq!(forward, backward);
        }

        #[test]
        fn every_type_combines_with_itself(a in arb_ty()) {
            let fx = fixture();
            let mut ctx = InferenceContext::new(&fx.project, false);
            prop_assert!(ctx.combine_types(&a, &a).is_ok());
        }
    }
}
