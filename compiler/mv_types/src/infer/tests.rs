use super::*;
use crate::fold::fold_type_params_with;
use crate::test_support;
use crate::ty::{CallableKind, IntKind, Ty};
use crate::type_error::TypeErrorKind;
use mv_ir::ast::{Abilities, ExprKind, IntSuffix, PatKind};
use mv_ir::{PackageId, Project, StringInterner, TreeBuilder};
use mv_resolve::ResolvedPath;
use pretty_assertions::assert_eq;

const U8: Ty = Ty::Integer(IntKind::U8);

/// Wrap `items` in module `0x1::m` and freeze the project.
fn project(b: TreeBuilder, items: Vec<NodeId>) -> Project {
    let module = b.module("0x1", "m").items(items).build();
    b.file(PackageId(0), vec![module], vec![]);
    test_support::project(b)
}

fn infer(project: &Project, owner: NodeId) -> InferenceResult {
    infer_owner(
        Resolver::new(project),
        None,
        owner,
        false,
        InferConfig::strict(),
    )
    .unwrap_or_else(|e| panic!("{e}"))
}

fn lambda_param(project: &Project, lambda: NodeId) -> NodeId {
    let tree = project.tree();
    match tree.as_expr(lambda) {
        Some(ExprKind::Lambda { params, .. }) => tree
            .as_param(params[0])
            .map_or(NodeId::INVALID, |param| param.pat),
        other => panic!("not a lambda: {other:?}"),
    }
}

fn assert_fully_inferred(result: &InferenceResult) {
    for (node, ty) in result.expr_types().chain(result.pat_types()) {
        assert!(!ty.has_infer(), "{node:?} left with {ty:?}");
    }
}

// ==================== Literals and bindings ====================

#[test]
fn unconstrained_integer_gets_default_width() {
    let b = TreeBuilder::new(StringInterner::shared());
    let x = b.bind("x");
    let lit = b.int(1);
    let main = b
        .function("main")
        .body(b.block(vec![b.let_(x, None, Some(lit))], None))
        .build();
    let project = project(b, vec![main]);

    let result = infer(&project, main);
    assert_eq!(result.pat_type(project.tree(), x), Ty::DEFAULT_INTEGER);
    assert_eq!(result.expr_type(project.tree(), lit), Ty::DEFAULT_INTEGER);
    assert!(result.type_errors().is_empty());
}

#[test]
fn integer_takes_width_from_later_use() {
    let b = TreeBuilder::new(StringInterner::shared());
    let x = b.bind("x");
    let lit = b.int(1);
    let use_x = b.path_expr("x");
    let main = b
        .function("main")
        .ret("u8")
        .body(b.block(vec![b.let_(x, None, Some(lit))], Some(use_x)))
        .build();
    let project = project(b, vec![main]);

    let result = infer(&project, main);
    assert_eq!(result.pat_type(project.tree(), x), U8);
    assert_eq!(result.expr_type(project.tree(), lit), U8);
}

#[test]
fn tuple_let_destructures_elementwise() {
    let b = TreeBuilder::new(StringInterner::shared());
    let a = b.bind("a");
    let c = b.bind("c");
    let pat = b.pat_tuple(vec![a, c]);
    let init = b.tuple(vec![b.int_suffixed(1, IntSuffix::U8), b.bool_lit(true)]);
    let main = b
        .function("main")
        .body(b.block(vec![b.let_(pat, None, Some(init))], None))
        .build();
    let project = project(b, vec![main]);

    let result = infer(&project, main);
    let tree = project.tree();
    assert_eq!(result.pat_type(tree, a), U8);
    assert_eq!(result.pat_type(tree, c), Ty::Bool);
    assert_eq!(result.pat_type(tree, pat), Ty::Tuple(vec![U8, Ty::Bool]));
}

#[test]
fn tuple_of_literals_defaults_each_element() {
    let b = TreeBuilder::new(StringInterner::shared());
    let a = b.bind("a");
    let c = b.bind("c");
    let pat = b.pat_tuple(vec![a, c]);
    let init = b.tuple(vec![b.int(1), b.int(2)]);
    let main = b
        .function("main")
        .body(b.block(vec![b.let_(pat, None, Some(init))], None))
        .build();
    let project = project(b, vec![main]);

    let result = infer(&project, main);
    let tree = project.tree();
    assert_eq!(result.pat_type(tree, a), Ty::DEFAULT_INTEGER);
    assert_eq!(result.pat_type(tree, c), Ty::DEFAULT_INTEGER);
    assert_eq!(
        result.expr_type(tree, init),
        Ty::Tuple(vec![Ty::DEFAULT_INTEGER, Ty::DEFAULT_INTEGER])
    );
    assert!(result.type_errors().is_empty());
}

#[test]
fn unpacking_a_non_tuple_is_reported() {
    let b = TreeBuilder::new(StringInterner::shared());
    let a = b.bind("a");
    let c = b.bind("c");
    let pat = b.pat_tuple(vec![a, c]);
    let main = b
        .function("main")
        .body(b.block(vec![b.let_(pat, None, Some(b.bool_lit(true)))], None))
        .build();
    let project = project(b, vec![main]);

    let result = infer(&project, main);
    let errors: Vec<_> = result.type_errors().iter().map(|e| (e.node, e.kind.clone())).collect();
    assert_eq!(errors, vec![(pat, TypeErrorKind::InvalidUnpacking { ty: Ty::Bool })]);
    assert_eq!(result.pat_type(project.tree(), a), Ty::Unknown);
    assert_eq!(result.pat_type(project.tree(), c), Ty::Unknown);
}

// ==================== Calls and fields ====================

#[test]
fn call_through_reference_reads_field_type() {
    let b = TreeBuilder::new(StringInterner::shared());
    let s = b.struct_("S").abilities("copy, drop").field("val", "u8").build();
    let field = b.field(b.path_expr("s"), "val");
    let get = b
        .function("get")
        .param("s", "&S")
        .ret("u8")
        .body(b.block(vec![], Some(field)))
        .build();
    let s_pat = b.bind("s");
    let lit = b.struct_lit("S", vec![("val", Some(b.int(1)))]);
    let arg = b.borrow(b.path_expr("s"));
    let call = b.call("get", vec![arg]);
    let main = b
        .function("main")
        .body(b.block(vec![b.let_(s_pat, None, Some(lit)), b.expr_stmt(call)], None))
        .build();
    let project = project(b, vec![s, get, main]);
    let tree = project.tree();

    let get_result = infer(&project, get);
    assert_eq!(get_result.expr_type(tree, field), U8);

    let result = infer(&project, main);
    assert_eq!(result.expr_type(tree, call), U8);
    assert_eq!(
        result.expected_type(arg),
        Some(&Ty::reference(
            Ty::Adt {
                item: s,
                args: vec![]
            },
            false
        ))
    );
    assert_eq!(result.expected_type(call), None);
    assert_eq!(
        result.pat_type(tree, s_pat),
        Ty::Adt {
            item: s,
            args: vec![]
        }
    );
    let call_path = match tree.as_expr(call) {
        Some(ExprKind::Call { path, .. }) => *path,
        _ => NodeId::INVALID,
    };
    assert_eq!(
        result.resolved_path(call_path),
        Some(
            &[ResolvedPath {
                element: get,
                is_visible: true
            }][..]
        )
    );
    assert_fully_inferred(&result);
}

#[test]
fn method_call_borrows_receiver() {
    let b = TreeBuilder::new(StringInterner::shared());
    let s = b.struct_("S").abilities("copy, drop").field("val", "u8").build();
    let val = b
        .function("val")
        .param("self", "&S")
        .ret("u8")
        .body(b.block(vec![], Some(b.field(b.path_expr("self"), "val"))))
        .build();
    let lit = b.struct_lit("S", vec![("val", Some(b.int(1)))]);
    let call = b.method_call(b.path_expr("s"), "val", vec![]);
    let main = b
        .function("main")
        .ret("u8")
        .body(b.block(vec![b.let_bind("s", lit)], Some(call)))
        .build();
    let project = project(b, vec![s, val, main]);

    let result = infer(&project, main);
    assert_eq!(result.resolved_method(call), Some(Some(val)));
    assert_eq!(result.expr_type(project.tree(), call), U8);
    assert!(result.type_errors().is_empty());
}

#[test]
fn generic_call_instantiates_from_argument() {
    let b = TreeBuilder::new(StringInterner::shared());
    let id = b
        .function("id")
        .type_param("T", "")
        .param("x", "T")
        .ret("T")
        .body(b.block(vec![], Some(b.path_expr("x"))))
        .build();
    let call = b.call("id", vec![b.bool_lit(true)]);
    let main = b.function("main").body(b.block(vec![b.expr_stmt(call)], None)).build();
    let project = project(b, vec![id, main]);

    let result = infer(&project, main);
    assert_eq!(result.expr_type(project.tree(), call), Ty::Bool);
    assert!(matches!(
        result.callable_type(call),
        Some(Ty::Callable {
            kind: CallableKind::Function(_),
            ..
        })
    ));
}

#[test]
fn explicit_type_argument_fixes_the_parameter() {
    let b = TreeBuilder::new(StringInterner::shared());
    let id = b
        .function("id")
        .type_param("T", "")
        .param("x", "T")
        .ret("T")
        .body(b.block(vec![], Some(b.path_expr("x"))))
        .build();
    let arg = b.bool_lit(true);
    let call = b.call_generic("id", &["u8"], vec![arg]);
    let main = b.function("main").body(b.block(vec![b.expr_stmt(call)], None)).build();
    let project = project(b, vec![id, main]);

    let result = infer(&project, main);
    assert_eq!(result.expr_type(project.tree(), call), U8);
    let errors: Vec<_> = result.type_errors().iter().map(|e| (e.node, e.kind.clone())).collect();
    assert_eq!(
        errors,
        vec![(
            arg,
            TypeErrorKind::TypeMismatch {
                expected: U8,
                actual: Ty::Bool
            }
        )]
    );
}

// ==================== Errors ====================

#[test]
fn mismatched_tail_is_reported_on_the_tail() {
    let b = TreeBuilder::new(StringInterner::shared());
    let tail = b.bool_lit(true);
    let f = b.function("f").ret("u8").body(b.block(vec![], Some(tail))).build();
    let project = project(b, vec![f]);

    let result = infer(&project, f);
    assert_eq!(result.expected_type(tail), Some(&U8));
    let errors: Vec<_> = result.type_errors().iter().map(|e| (e.node, e.kind.clone())).collect();
    assert_eq!(
        errors,
        vec![(
            tail,
            TypeErrorKind::TypeMismatch {
                expected: U8,
                actual: Ty::Bool
            }
        )]
    );
}

#[test]
fn missing_abilities_are_reported() {
    let b = TreeBuilder::new(StringInterner::shared());
    let no_copy = b.struct_("NoCopy").build();
    let id = b
        .function("id")
        .type_param("T", "copy")
        .param("x", "T")
        .ret("T")
        .body(b.block(vec![], Some(b.path_expr("x"))))
        .build();
    let arg = b.struct_lit("NoCopy", vec![]);
    let main = b
        .function("main")
        .body(b.block(vec![b.expr_stmt(b.call("id", vec![arg]))], None))
        .build();
    let project = project(b, vec![no_copy, id, main]);

    let result = infer(&project, main);
    let errors: Vec<_> = result.type_errors().iter().map(|e| (e.node, e.kind.clone())).collect();
    assert_eq!(
        errors,
        vec![(
            arg,
            TypeErrorKind::AbilitiesMismatch {
                ty: Ty::Adt {
                    item: no_copy,
                    args: vec![]
                },
                missing: Abilities::COPY
            }
        )]
    );
}

#[test]
#[should_panic(expected = "never inferred")]
fn strict_lookup_of_uninferred_node_panics() {
    let b = TreeBuilder::new(StringInterner::shared());
    let stray = b.bool_lit(false);
    let main = b.function("main").body(b.block(vec![], None)).build();
    let project = project(b, vec![main]);

    let result = infer(&project, main);
    let _ = result.expr_type(project.tree(), stray);
}

#[test]
fn fallible_lookups_never_panic() {
    let b = TreeBuilder::new(StringInterner::shared());
    let stray = b.bool_lit(false);
    let x = b.bind("x");
    let lit = b.int_suffixed(3, IntSuffix::U64);
    let main = b
        .function("main")
        .body(b.block(vec![b.let_(x, None, Some(lit))], None))
        .build();
    let project = project(b, vec![main]);

    let result = infer(&project, main);
    assert_eq!(result.try_expr_type(lit), Some(&Ty::Integer(IntKind::U64)));
    assert_eq!(result.try_pat_type(x), Some(&Ty::Integer(IntKind::U64)));
    assert_eq!(result.try_expr_type(stray), None);
    assert_eq!(result.try_pat_type(stray), None);
}

// ==================== Match ====================

#[test]
fn unqualified_variant_pattern_resolves_through_scrutinee() {
    let b = TreeBuilder::new(StringInterner::shared());
    let color = b
        .enum_("Color")
        .abilities("copy, drop")
        .variant("Red", &[])
        .variant("Rgb", &[("r", "u8")])
        .build();
    let rgb_pat = b.pat_struct("Rgb", vec![("r", None)], false);
    let r_use = b.path_expr("r");
    let zero = b.int(0);
    let arms = vec![b.arm(rgb_pat, None, r_use), b.arm(b.wild(), None, zero)];
    let matched = b.match_(b.path_expr("c"), arms);
    let f = b
        .function("f")
        .param("c", "Color")
        .ret("u8")
        .body(b.block(vec![], Some(matched)))
        .build();
    let project = project(b, vec![color, f]);
    let tree = project.tree();

    let result = infer(&project, f);
    let rgb = tree.as_enum(color).map_or(NodeId::INVALID, |e| e.variants[1]);
    let (path, field) = match tree.as_pat(rgb_pat) {
        Some(PatKind::Struct { path, fields, .. }) => (*path, fields[0]),
        _ => (NodeId::INVALID, NodeId::INVALID),
    };
    assert_eq!(
        result.resolved_path(path),
        Some(
            &[ResolvedPath {
                element: rgb,
                is_visible: true
            }][..]
        )
    );
    assert_eq!(result.pat_field_type(tree, field), U8);
    assert_eq!(result.expr_type(tree, r_use), U8);
    assert_eq!(result.expr_type(tree, zero), U8);
    assert_eq!(result.expr_type(tree, matched), U8);
    assert!(result.type_errors().is_empty());
}

#[test]
fn unknown_variant_in_arm_is_not_looked_up_in_scope() {
    let b = TreeBuilder::new(StringInterner::shared());
    let color = b.enum_("Color").abilities("copy, drop").variant("Red", &[]).build();
    let blue = b.struct_("Blue").abilities("copy, drop").field("b", "u8").build();
    let blue_pat = b.pat_struct("Blue", vec![("b", None)], false);
    let arms = vec![b.arm(blue_pat, None, b.int(0)), b.arm(b.wild(), None, b.int(1))];
    let matched = b.match_(b.path_expr("c"), arms);
    let f = b
        .function("f")
        .param("c", "Color")
        .ret("u8")
        .body(b.block(vec![], Some(matched)))
        .build();
    let project = project(b, vec![color, blue, f]);
    let tree = project.tree();

    let result = infer(&project, f);
    let (path, field) = match tree.as_pat(blue_pat) {
        Some(PatKind::Struct { path, fields, .. }) => (*path, fields[0]),
        _ => (NodeId::INVALID, NodeId::INVALID),
    };
    assert_eq!(result.resolved_path(path), Some(&[][..]));
    assert_eq!(result.resolved_field(field), Some(None));
    assert_eq!(result.pat_field_type(tree, field), Ty::Unknown);
}

#[test]
fn arm_binding_naming_a_constant_resolves_to_it() {
    let b = TreeBuilder::new(StringInterner::shared());
    let max = b.const_("MAX", "u8", Some(b.int_suffixed(9, IntSuffix::U8)));
    let max_pat = b.bind("MAX");
    let other_pat = b.bind("other");
    let arms = vec![
        b.arm(max_pat, None, b.int(0)),
        b.arm(other_pat, None, b.path_expr("other")),
    ];
    let matched = b.match_(b.path_expr("x"), arms);
    let f = b
        .function("f")
        .param("x", "u8")
        .ret("u8")
        .body(b.block(vec![], Some(matched)))
        .build();
    let project = project(b, vec![max, f]);
    let tree = project.tree();

    let result = infer(&project, f);
    assert_eq!(result.resolved_binding(max_pat), Some(Some(max)));
    assert_eq!(result.resolved_binding(other_pat), Some(None));
    assert_eq!(result.pat_type(tree, max_pat), U8);
    assert_eq!(result.expr_type(tree, matched), U8);
}

#[test]
fn struct_pattern_through_reference_binds_references() {
    let b = TreeBuilder::new(StringInterner::shared());
    let s = b.struct_("S").abilities("copy, drop").field("val", "u8").build();
    let val_pat = b.bind("v");
    let pat = b.pat_struct("S", vec![("val", Some(val_pat))], false);
    let f = b
        .function("f")
        .param_pat(pat, "&mut S")
        .build();
    let project = project(b, vec![s, f]);

    let result = infer(&project, f);
    assert_eq!(result.pat_type(project.tree(), val_pat), Ty::reference(U8, true));
}

// ==================== Lambdas ====================

#[test]
fn sibling_lambdas_infer_from_their_calls() {
    let b = TreeBuilder::new(StringInterner::shared());
    let f_lambda = b.lambda(&[("x", None)], b.path_expr("x"));
    let g_lambda = b.lambda(&[("y", None)], b.path_expr("y"));
    let f_call = b.call("f", vec![b.int_suffixed(1, IntSuffix::U8)]);
    let g_call = b.call("g", vec![b.bool_lit(true)]);
    let main = b
        .function("main")
        .body(b.block(
            vec![
                b.let_bind("f", f_lambda),
                b.let_bind("g", g_lambda),
                b.expr_stmt(f_call),
                b.expr_stmt(g_call),
            ],
            None,
        ))
        .build();
    let project = project(b, vec![main]);
    let tree = project.tree();

    let result = infer(&project, main);
    assert_eq!(result.pat_type(tree, lambda_param(&project, f_lambda)), U8);
    assert_eq!(result.pat_type(tree, lambda_param(&project, g_lambda)), Ty::Bool);
    assert_eq!(result.expr_type(tree, f_call), U8);
    assert_eq!(result.expr_type(tree, g_call), Ty::Bool);
    assert_eq!(
        result.expr_type(tree, f_lambda),
        Ty::Callable {
            params: vec![U8],
            ret: Box::new(U8),
            kind: CallableKind::Lambda
        }
    );
    assert_fully_inferred(&result);
}

#[test]
fn later_lambda_sees_types_settled_by_earlier_lambda_body() {
    let b = TreeBuilder::new(StringInterner::shared());
    let s = b.struct_("S").abilities("copy, drop").field("val", "u8").build();
    let val = b
        .function("val")
        .param("self", "&S")
        .ret("u8")
        .body(b.block(vec![], Some(b.field(b.path_expr("self"), "val"))))
        .build();
    let r_pat = b.bind("r");
    // `|x| r = x` is the only thing that types `r`.
    let f_lambda = b.lambda(&[("x", None)], b.assign(b.path_expr("r"), b.path_expr("x")));
    let method = b.method_call(b.path_expr("y"), "val", vec![]);
    let g_lambda = b.lambda(&[("y", None)], method);
    let lit = b.struct_lit("S", vec![("val", Some(b.int_suffixed(1, IntSuffix::U8)))]);
    let f_call = b.call("f", vec![lit]);
    let g_call = b.call("g", vec![b.path_expr("r")]);
    let main = b
        .function("main")
        .body(b.block(
            vec![
                b.let_(r_pat, None, None),
                b.let_bind("f", f_lambda),
                b.let_bind("g", g_lambda),
                b.expr_stmt(f_call),
                b.expr_stmt(g_call),
            ],
            None,
        ))
        .build();
    let project = project(b, vec![s, val, main]);
    let tree = project.tree();

    let result = infer(&project, main);
    let s_ty = Ty::Adt {
        item: s,
        args: vec![],
    };
    assert_eq!(result.pat_type(tree, r_pat), s_ty);
    assert_eq!(result.pat_type(tree, lambda_param(&project, g_lambda)), s_ty);
    assert_eq!(result.resolved_method(method), Some(Some(val)));
    assert_eq!(result.expr_type(tree, g_call), U8);
    assert!(result.type_errors().is_empty());
}

// ==================== Tracing ====================

mod span_fields {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;
    use tracing::field::{Field, Visit};
    use tracing::span::{Attributes, Id};
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

    /// Fields recorded on `infer_owner` spans, rendered with `Debug`.
    #[derive(Clone, Default)]
    struct OwnerSpanFields(Arc<Mutex<Vec<(String, String)>>>);

    impl Visit for OwnerSpanFields {
        fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
            self.0.lock().push((field.name().to_owned(), format!("{value:?}")));
        }
    }

    impl<S: tracing::Subscriber> Layer<S> for OwnerSpanFields {
        fn on_new_span(&self, attrs: &Attributes<'_>, _id: &Id, _ctx: Context<'_, S>) {
            if attrs.metadata().name() == "infer_owner" {
                attrs.record(&mut self.clone());
            }
        }
    }

    #[test]
    fn owner_span_records_mode() {
        let b = TreeBuilder::new(StringInterner::shared());
        let main = b.function("main").body(b.block(vec![], None)).build();
        let project = project(b, vec![main]);

        let fields = OwnerSpanFields::default();
        let subscriber = tracing_subscriber::registry().with(fields.clone());
        tracing::subscriber::with_default(subscriber, || {
            infer_owner(Resolver::new(&project), None, main, true, InferConfig::strict())
                .unwrap_or_else(|e| panic!("{e}"));
        });

        let recorded = fields.0.lock().clone();
        assert!(recorded.contains(&("msl".to_owned(), "true".to_owned())), "{recorded:?}");
        assert!(recorded.iter().any(|(name, _)| name == "owner"), "{recorded:?}");
    }
}

// ==================== Resolution ====================

mod proptest_resolution {
    use super::*;
    use proptest::prelude::*;

    /// Types whose `TypeParam` leaves stand for inference variables 0..3.
    fn arb_template() -> impl Strategy<Value = Ty> {
        let leaf = prop_oneof![
            Just(Ty::Unknown),
            Just(Ty::Bool),
            Just(U8),
            Just(Ty::Address),
            (0u32..3).prop_map(|i| Ty::TypeParam(NodeId::new(i))),
        ];
        leaf.prop_recursive(3, 24, 3, |inner| {
            prop_oneof![
                inner.clone().prop_map(Ty::vector),
                inner.clone().prop_map(|ty| Ty::reference(ty, false)),
                proptest::collection::vec(inner, 0..3).prop_map(Ty::Tuple),
            ]
        })
    }

    proptest! {
        #[test]
        fn fully_resolve_is_idempotent(template in arb_template(), bound in arb_template()) {
            let b = TreeBuilder::new(StringInterner::shared());
            let project = project(b, vec![]);
            let mut ctx = InferenceContext::new(&project, false);
            let vars = [ctx.fresh_ty_var(None), ctx.fresh_ty_var(None), ctx.fresh_int_var()];
            let instantiate = |ty: &Ty| fold_type_params_with(ty, |param| vars[param.index()].clone());

            // Var 0 gets a binding that may mention the others, or itself.
            let _ = ctx.combine_types(&vars[0], &instantiate(&bound));
            let ty = instantiate(&template);

            let once = ctx.fully_resolve(&ty);
            let twice = ctx.fully_resolve(&once);
            prop_assert_eq!(&once, &twice);
            prop_assert!(!once.has_infer());
        }
    }
}
