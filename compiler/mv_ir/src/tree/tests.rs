use super::*;
use crate::{StringInterner, TreeBuilder};
use pretty_assertions::assert_eq;

// ==================== Parent links ====================

#[test]
fn finish_links_children_to_parents() {
    let b = TreeBuilder::new(StringInterner::shared());
    let one = b.int(1);
    let stmt = b.let_bind("x", one);
    let block = b.block(vec![stmt], None);
    let tree = b.finish();

    assert_eq!(tree.parent(one), Some(stmt));
    assert_eq!(tree.parent(stmt), Some(block));
    assert_eq!(tree.parent(block), None);
}

#[test]
fn ancestors_are_innermost_first() {
    let b = TreeBuilder::new(StringInterner::shared());
    let one = b.int(1);
    let stmt = b.expr_stmt(one);
    let block = b.block(vec![stmt], None);
    let tree = b.finish();

    let chain: Vec<NodeId> = tree.ancestors(one).collect();
    assert_eq!(chain, vec![stmt, block]);
    assert!(tree.is_ancestor_or_self(block, one));
    assert!(!tree.is_ancestor_or_self(one, block));
}

#[test]
fn descendants_are_preorder() {
    let b = TreeBuilder::new(StringInterner::shared());
    let lhs = b.int(1);
    let rhs = b.int(2);
    let sum = b.binary(crate::ast::BinaryOp::Add, lhs, rhs);
    let tree = b.finish();

    assert_eq!(tree.descendants(sum), vec![sum, lhs, rhs]);
}

// ==================== Containment queries ====================

#[test]
fn containing_module_and_file() {
    let b = TreeBuilder::new(StringInterner::shared());
    let tail = b.int(7);
    let body = b.block(vec![], Some(tail));
    let fun = b.function("f").ret("u64").body(body).build();
    let module = b.module("0x1", "m").item(fun).build();
    let file = b.file(crate::PackageId(0), vec![module], vec![]);
    let tree = b.finish();

    assert_eq!(tree.containing_module(tail), Some(module));
    assert_eq!(tree.containing_file(tail), Some(file));
    assert_eq!(tree.inference_owner(tail), Some(fun));
    assert_eq!(tree.files(), &[file]);
}

#[test]
fn spec_code_detection() {
    let b = TreeBuilder::new(StringInterner::shared());
    let cond = b.bool_lit(true);
    let pred = b.spec_stmt(crate::ast::SpecPredicate::Ensures, cond);
    let spec_body = b.block(vec![pred], None);
    let spec = b.item_spec(Some("f"), spec_body);
    let plain = b.int(1);
    let body = b.block(vec![], Some(plain));
    let fun = b.function("f").body(body).build();
    let _module = b.module("0x1", "m").item(fun).item(spec).build();
    let tree = b.finish();

    assert!(tree.is_in_spec(cond));
    assert!(!tree.is_in_spec(plain));
}

#[test]
fn typed_accessors_check_kind() {
    let b = TreeBuilder::new(StringInterner::shared());
    let one = b.int(1);
    let tree = b.finish();

    assert!(tree.as_expr(one).is_some());
    assert!(tree.as_pat(one).is_none());
    assert!(tree.as_expr(NodeId::INVALID).is_none());
}
