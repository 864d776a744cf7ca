use super::*;
use mv_ir::{NamedAddresses, Package, PackageId, StringInterner, StructureVersions, TreeBuilder};
use pretty_assertions::assert_eq;

struct Fixture {
    project: Project,
    coin: NodeId,
    token: NodeId,
    param: NodeId,
}

fn fixture() -> Fixture {
    let b = TreeBuilder::new(StringInterner::shared());
    let coin = b.struct_("Coin").abilities("store").type_param("T", "").build();
    let token = b.struct_("Token").abilities("copy, drop").build();
    let f = b.function("f").type_param("U", "copy").build();
    let module = b.module("0x1", "m").items([coin, token, f]).build();
    b.file(PackageId(0), vec![module], vec![]);
    let interner = b.interner().clone();
    let package = Package {
        name: interner.intern("app"),
        addresses: NamedAddresses::new(),
    };
    let project = Project::new(b.finish(), interner, vec![package], StructureVersions::new());
    let param = project
        .tree()
        .as_function(f)
        .map(|decl| decl.type_params[0])
        .unwrap_or(NodeId::INVALID);
    Fixture {
        project,
        coin,
        token,
        param,
    }
}

// ==================== Display ====================

#[test]
fn display_renders_surface_syntax() {
    let fx = fixture();
    let p = &fx.project;
    assert_eq!(
        Ty::reference(Ty::vector(Ty::Integer(IntKind::U8)), true).display(p),
        "&mut vector<u8>"
    );
    assert_eq!(
        Ty::Adt {
            item: fx.coin,
            args: vec![Ty::Integer(IntKind::U64)],
        }
        .display(p),
        "Coin<u64>"
    );
    assert_eq!(
        Ty::Callable {
            params: vec![Ty::Integer(IntKind::U8)],
            ret: Box::new(Ty::Bool),
            kind: CallableKind::Lambda,
        }
        .display(p),
        "|u8| -> bool"
    );
    assert_eq!(Ty::Tuple(vec![Ty::Bool, Ty::Address]).display(p), "(bool, address)");
    assert_eq!(Ty::DEFAULT_INTEGER.display(p), "integer");
}

#[test]
fn display_names_variables_after_their_origin() {
    let fx = fixture();
    let p = &fx.project;
    let named = Ty::ty_var(TyVar {
        id: 0,
        origin: Some(fx.param),
    });
    let anonymous = Ty::ty_var(TyVar { id: 1, origin: None });
    assert_eq!(named.display(p), "?U");
    assert_eq!(anonymous.display(p), "?_");
    assert_eq!(Ty::int_var(IntVar(0)).display(p), "?int");
}

// ==================== Flags ====================

#[test]
fn flags_see_through_nesting() {
    let var = Ty::ty_var(TyVar { id: 0, origin: None });
    let ty = Ty::vector(Ty::reference(Ty::Tuple(vec![var, Ty::Unknown]), false));
    let flags = ty.flags();
    assert!(flags.contains(TypeFlags::HAS_TY_VAR));
    assert!(flags.contains(TypeFlags::HAS_UNKNOWN));
    assert!(flags.contains(TypeFlags::HAS_REFERENCE));
    assert!(!flags.contains(TypeFlags::HAS_INT_VAR));
    assert!(ty.has_infer());
    assert!(!Ty::vector(Ty::Bool).has_infer());
}

// ==================== Spec refinement ====================

#[test]
fn spec_refinement_strips_references_and_widens_integers() {
    let ty = Ty::reference(Ty::reference(Ty::Integer(IntKind::U8), true), false);
    assert_eq!(ty.refine_for_specs(true), Ty::Num);
    assert_eq!(ty.refine_for_specs(false), ty);
    assert_eq!(
        Ty::reference(Ty::vector(Ty::Bool), false).refine_for_specs(true),
        Ty::vector(Ty::Bool)
    );
}

// ==================== Abilities ====================

#[test]
fn abilities_follow_declarations() {
    let fx = fixture();
    let p = &fx.project;
    let coin = Ty::Adt {
        item: fx.coin,
        args: vec![Ty::Bool],
    };
    assert_eq!(coin.abilities(p), Abilities::STORE);
    assert_eq!(
        Ty::vector(Ty::Adt {
            item: fx.token,
            args: vec![],
        })
        .abilities(p),
        Abilities::COPY | Abilities::DROP
    );
    assert_eq!(Ty::Signer.abilities(p), Abilities::DROP);
    assert_eq!(Ty::TypeParam(fx.param).abilities(p), Abilities::COPY);
    assert_eq!(
        Ty::ty_var(TyVar {
            id: 0,
            origin: Some(fx.param),
        })
        .abilities(p),
        Abilities::COPY
    );
    assert_eq!(Ty::Unknown.abilities(p), Abilities::all());
}

#[test]
fn integer_kinds_unify_with_default() {
    assert!(IntKind::U8.is_compatible(IntKind::Default));
    assert!(IntKind::Default.is_compatible(IntKind::U256));
    assert!(IntKind::U64.is_compatible(IntKind::U64));
    assert!(!IntKind::U8.is_compatible(IntKind::U64));
}
