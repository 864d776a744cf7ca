use super::*;
use crate::test_support;
use mv_ir::{PackageId, StringInterner, TreeBuilder};
use pretty_assertions::assert_eq;

struct Fixture {
    project: Project,
    coin: NodeId,
    func: NodeId,
    color: NodeId,
}

/// `f<T>` declares one parameter per type under test.
fn fixture(param_types: &[&str]) -> Fixture {
    let b = TreeBuilder::new(StringInterner::shared());
    let coin = b.struct_("Coin").abilities("store").type_param("X", "").build();
    let color = b
        .enum_("Color")
        .type_param("C", "")
        .variant("Rgb", &[("r", "C")])
        .build();
    let mut func = b.function("f").type_param("T", "copy");
    for (i, ty) in param_types.iter().enumerate() {
        func = func.param(&format!("p{i}"), ty);
    }
    let func = func.ret("bool").build();
    let module = b.module("0x1", "m").items([coin, color, func]).build();
    b.file(PackageId(0), vec![module], vec![]);
    Fixture {
        project: test_support::project(b),
        coin,
        func,
        color,
    }
}

/// Lowered declared parameter types of `f`.
fn lowered_params(fx: &Fixture, msl: bool) -> Vec<Ty> {
    let lowering = TyLowering::new(Resolver::new(&fx.project), msl);
    let tree = fx.project.tree();
    let params = tree.as_function(fx.func).map_or(&[][..], |f| f.params.as_slice());
    params
        .iter()
        .map(|&param| {
            lowering
                .lower_opt(tree.as_param(param).and_then(|p| p.ty))
                .unwrap_or_else(|e| panic!("{e}"))
        })
        .collect()
}

fn type_param(fx: &Fixture) -> NodeId {
    fx.project
        .tree()
        .as_function(fx.func)
        .map_or(NodeId::INVALID, |f| f.type_params[0])
}

// ==================== Builtins ====================

#[test]
fn builtin_types() {
    let fx = fixture(&["u8", "u256", "bool", "address", "signer", "vector<u64>", "&mut vector<u8>", "()"]);
    assert_eq!(
        lowered_params(&fx, false),
        vec![
            Ty::Integer(IntKind::U8),
            Ty::Integer(IntKind::U256),
            Ty::Bool,
            Ty::Address,
            Ty::Signer,
            Ty::vector(Ty::Integer(IntKind::U64)),
            Ty::reference(Ty::vector(Ty::Integer(IntKind::U8)), true),
            Ty::Unit,
        ]
    );
}

#[test]
fn spec_builtins_only_in_specs() {
    let fx = fixture(&["num"]);
    assert_eq!(lowered_params(&fx, true), vec![Ty::Num]);
    assert_eq!(lowered_params(&fx, false), vec![Ty::Unknown]);
}

// ==================== Declared types ====================

#[test]
fn structs_are_padded_to_their_arity() {
    let fx = fixture(&["Coin<u8>", "Coin", "Coin<u8, bool>"]);
    let u8 = Ty::Integer(IntKind::U8);
    assert_eq!(
        lowered_params(&fx, false),
        vec![
            Ty::Adt {
                item: fx.coin,
                args: vec![u8.clone()]
            },
            Ty::Adt {
                item: fx.coin,
                args: vec![Ty::Unknown]
            },
            Ty::Adt {
                item: fx.coin,
                args: vec![u8]
            },
        ]
    );
}

#[test]
fn type_params_and_unresolved_names() {
    let fx = fixture(&["T", "Missing", "(T, bool)"]);
    let t = Ty::TypeParam(type_param(&fx));
    assert_eq!(
        lowered_params(&fx, false),
        vec![t.clone(), Ty::Unknown, Ty::Tuple(vec![t, Ty::Bool])]
    );
}

#[test]
fn function_signature() {
    let fx = fixture(&["&T", "|u8| -> bool"]);
    let lowering = TyLowering::new(Resolver::new(&fx.project), false);
    let t = Ty::TypeParam(type_param(&fx));
    assert_eq!(
        lowering.function_ty(fx.func),
        Ok(Ty::Callable {
            params: vec![
                Ty::reference(t, false),
                Ty::Callable {
                    params: vec![Ty::Integer(IntKind::U8)],
                    ret: Box::new(Ty::Bool),
                    kind: CallableKind::Lambda,
                },
            ],
            ret: Box::new(Ty::Bool),
            kind: CallableKind::Function(fx.func),
        })
    );
    assert_eq!(lowering.return_ty(fx.func), Ok(Ty::Bool));
    assert_eq!(lowering.return_ty(fx.coin), Ok(Ty::Unknown));
}

// ==================== Items ====================

#[test]
fn variants_share_their_enum_parameters() {
    let fx = fixture(&[]);
    let tree = fx.project.tree();
    let rgb = tree.as_enum(fx.color).map_or(NodeId::INVALID, |e| e.variants[0]);
    let param = type_params_of(tree, fx.color)[0];

    assert_eq!(adt_item(tree, rgb), Some(fx.color));
    assert_eq!(type_params_of(tree, rgb), &[param]);
    assert_eq!(
        item_ty(tree, fx.color),
        Ty::Adt {
            item: fx.color,
            args: vec![Ty::TypeParam(param)]
        }
    );

    let subst = adt_substitution(tree, rgb, &[Ty::Bool]);
    let field = fields_of(tree, rgb)[0];
    let lowering = TyLowering::new(Resolver::new(&fx.project), false);
    let field_ty = lowering.decl_ty(field).unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(field_ty, Ty::TypeParam(param));
    assert_eq!(crate::fold::substitute(&field_ty, &subst), Ty::Bool);
}
