use super::*;
use mv_ir::{
    NamedAddresses, NumericAddress, Package, PackageId, StringInterner, StructureVersions,
    TreeBuilder,
};
use pretty_assertions::assert_eq;

use crate::ty::{IntKind, Ty};

struct Fixture {
    project: Project,
    helper: NodeId,
    main: NodeId,
    call: NodeId,
}

fn build(versions: StructureVersions) -> Fixture {
    let b = TreeBuilder::new(StringInterner::shared());
    let helper = b
        .function("helper")
        .ret("u64")
        .body(b.block(vec![], Some(b.int(7))))
        .build();
    let call = b.call("helper", vec![]);
    let main = b
        .function("main")
        .body(b.block(vec![b.expr_stmt(call)], None))
        .build();
    let module = b.module("0x1", "m").items([helper, main]).build();
    b.file(PackageId(0), vec![module], vec![]);
    let interner = b.interner().clone();
    let package = Package {
        name: interner.intern("app"),
        addresses: NamedAddresses::new().with(interner.intern("std"), NumericAddress::ONE),
    };
    Fixture {
        project: Project::new(b.finish(), interner, vec![package], versions),
        helper,
        main,
        call,
    }
}

fn fixture() -> Fixture {
    build(StructureVersions::new())
}

// ==================== Caching ====================

#[test]
fn results_are_cached_per_owner_and_mode() {
    let fx = fixture();
    let resolve_cache = ResolveCache::new();
    let cache = InferenceCache::new();
    let db = TypeckDb::new(&fx.project, &resolve_cache, &cache);

    let first = db.inference(fx.main, false).unwrap_or_else(|e| panic!("{e}"));
    let again = db.inference(fx.main, false).unwrap_or_else(|e| panic!("{e}"));
    assert!(Arc::ptr_eq(&first, &again));
    assert_eq!(cache.len(), 1);

    let spec = db.inference(fx.main, true).unwrap_or_else(|e| panic!("{e}"));
    assert!(spec.msl);
    assert!(!Arc::ptr_eq(&first, &spec));
    assert_eq!(cache.len(), 2);
}

#[test]
fn version_bump_makes_entries_stale() {
    let fx = fixture();
    let resolve_cache = ResolveCache::new();
    let cache = InferenceCache::new();
    TypeckDb::new(&fx.project, &resolve_cache, &cache)
        .inference(fx.main, false)
        .unwrap_or_else(|e| panic!("{e}"));

    cache.invalidate_stale(&fx.project);
    assert_eq!(cache.len(), 1);

    let mut versions = StructureVersions::new();
    versions.bump_project();
    let bumped = build(versions);
    cache.invalidate_stale(&bumped.project);
    assert!(cache.is_empty());
}

#[test]
fn cancelled_runs_publish_nothing() {
    let fx = fixture();
    let resolve_cache = ResolveCache::new();
    let cache = InferenceCache::new();
    let flag = CancellationFlag::new();
    flag.cancel();
    let db = TypeckDb::new(&fx.project, &resolve_cache, &cache).with_cancellation(&flag);

    assert!(matches!(db.inference(fx.main, false), Err(Cancelled)));
    assert!(cache.is_empty());

    flag.reset();
    assert!(db.inference(fx.main, false).is_ok());
    assert_eq!(cache.len(), 1);
}

// ==================== Queries ====================

#[test]
fn element_inference_uses_enclosing_owner() {
    let fx = fixture();
    let resolve_cache = ResolveCache::new();
    let cache = InferenceCache::new();
    let db = TypeckDb::new(&fx.project, &resolve_cache, &cache).with_config(InferConfig::strict());

    let result = db
        .inference_for(fx.call, false)
        .unwrap_or_else(|e| panic!("{e}"))
        .unwrap_or_else(|| panic!("no owner for call"));
    assert_eq!(result.owner, fx.main);
    assert_eq!(
        result.expr_type(fx.project.tree(), fx.call),
        Ty::Integer(IntKind::U64)
    );

    let files = fx.project.tree().files().to_vec();
    assert!(matches!(db.inference_for(files[0], false), Ok(None)));
}

#[test]
fn parallel_inference_covers_every_owner() {
    let fx = fixture();
    let resolve_cache = ResolveCache::new();
    let cache = InferenceCache::new();
    let db = TypeckDb::new(&fx.project, &resolve_cache, &cache);

    let owners = db.owners();
    assert_eq!(owners, vec![fx.helper, fx.main]);

    let results = db.infer_all(&owners, false).unwrap_or_else(|e| panic!("{e}"));
    let inferred: Vec<NodeId> = results.iter().map(|r| r.owner).collect();
    assert_eq!(inferred, owners);
    assert_eq!(cache.len(), 2);
}

#[test]
fn paths_resolve_through_the_shared_cache() {
    let fx = fixture();
    let resolve_cache = ResolveCache::new();
    let cache = InferenceCache::new();
    let db = TypeckDb::new(&fx.project, &resolve_cache, &cache);
    let path = match fx.project.tree().as_expr(fx.call) {
        Some(mv_ir::ast::ExprKind::Call { path, .. }) => *path,
        _ => NodeId::INVALID,
    };

    let resolved = db.resolve_path(path).unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(resolved.iter().map(|r| r.element).collect::<Vec<_>>(), vec![fx.helper]);
    assert!(!resolve_cache.is_empty());
    assert!(!db.scope_chain(fx.call).is_empty());
}
