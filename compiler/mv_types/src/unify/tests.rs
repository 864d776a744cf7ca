use super::*;
use crate::ty::IntKind;
use pretty_assertions::assert_eq;

fn table_with(n: u32) -> (UnificationTable<IntVar>, Vec<IntVar>) {
    let mut table = UnificationTable::new();
    let keys = (0..n).map(|_| table.new_key(IntVar)).collect();
    (table, keys)
}

// ==================== Union-find ====================

#[test]
fn fresh_keys_are_their_own_roots() {
    let (mut table, keys) = table_with(3);
    for &key in &keys {
        assert_eq!(table.find(key), key);
        assert_eq!(table.value_of(key), None);
    }
}

#[test]
fn union_shares_value_in_both_directions() {
    let (mut table, keys) = table_with(2);
    table.unify_var_var(keys[0], keys[1]);
    table.unify_var_value(keys[1], Ty::Integer(IntKind::U8));

    assert_eq!(table.find(keys[0]), table.find(keys[1]));
    assert_eq!(table.value_of(keys[0]), Some(Ty::Integer(IntKind::U8)));
}

#[test]
fn union_keeps_existing_value_of_either_side() {
    let (mut table, keys) = table_with(2);
    table.unify_var_value(keys[1], Ty::Bool);
    table.unify_var_var(keys[0], keys[1]);

    assert_eq!(table.value_of(keys[0]), Some(Ty::Bool));
}

#[test]
fn long_chains_compress_to_the_root() {
    let (mut table, keys) = table_with(16);
    for pair in keys.windows(2) {
        table.unify_var_var(pair[0], pair[1]);
    }
    let root = table.find(keys[0]);
    for &key in &keys {
        assert_eq!(table.find(key), root);
    }
}

// ==================== Snapshots ====================

#[test]
fn rollback_restores_unions_values_and_keys() {
    let (mut table, keys) = table_with(2);
    let snapshot = table.snapshot();
    table.unify_var_var(keys[0], keys[1]);
    table.unify_var_value(keys[0], Ty::Num);
    let extra = table.new_key(IntVar);
    table.rollback_to(snapshot);

    assert_ne!(table.find(keys[0]), table.find(keys[1]));
    assert_eq!(table.value_of(keys[0]), None);
    assert_eq!(table.len(), 2);
    assert_eq!(extra.0, 2);
}

#[test]
fn rollback_undoes_path_compression() {
    let (mut table, keys) = table_with(3);
    table.unify_var_var(keys[0], keys[1]);
    let snapshot = table.snapshot();
    table.unify_var_var(keys[1], keys[2]);
    let _ = table.find(keys[0]);
    table.rollback_to(snapshot);

    assert_eq!(table.find(keys[0]), table.find(keys[1]));
    assert_ne!(table.find(keys[0]), table.find(keys[2]));
}

#[test]
fn commit_keeps_changes() {
    let (mut table, keys) = table_with(2);
    let snapshot = table.snapshot();
    table.unify_var_value(keys[0], Ty::Address);
    table.commit(snapshot);

    assert_eq!(table.value_of(keys[0]), Some(Ty::Address));
}

#[test]
fn nested_snapshots_roll_back_independently() {
    let (mut table, keys) = table_with(2);
    let outer = table.snapshot();
    table.unify_var_value(keys[0], Ty::Bool);
    let inner = table.snapshot();
    table.unify_var_value(keys[1], Ty::Bool);
    table.rollback_to(inner);

    assert_eq!(table.value_of(keys[0]), Some(Ty::Bool));
    assert_eq!(table.value_of(keys[1]), None);

    table.rollback_to(outer);
    assert_eq!(table.value_of(keys[0]), None);
}

// ==================== Properties ====================

mod proptest_union_find {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn union_is_an_equivalence(
            unions in proptest::collection::vec((0u32..12, 0u32..12), 0..40),
        ) {
            let (mut table, keys) = table_with(12);
            let mut naive: Vec<usize> = (0..12).collect();
            for &(a, b) in &unions {
                table.unify_var_var(keys[a as usize], keys[b as usize]);
                let (from, to) = (naive[a as usize], naive[b as usize]);
                for class in &mut naive {
                    if *class == from {
                        *class = to;
                    }
                }
            }
            for a in 0..12 {
                for b in 0..12 {
                    let same = table.find(keys[a]) == table.find(keys[b]);
                    prop_assert_eq!(same, naive[a] == naive[b]);
                }
            }
        }

        #[test]
        fn rollback_restores_every_root(
            before in proptest::collection::vec((0u32..8, 0u32..8), 0..12),
            during in proptest::collection::vec((0u32..8, 0u32..8), 0..12),
        ) {
            let (mut table, keys) = table_with(8);
            for &(a, b) in &before {
                table.unify_var_var(keys[a as usize], keys[b as usize]);
            }
            let expected: Vec<IntVar> = keys.iter().map(|&k| table.find(k)).collect();

            let snapshot = table.snapshot();
            for &(a, b) in &during {
                table.unify_var_var(keys[a as usize], keys[b as usize]);
                let _ = table.find(keys[a as usize]);
            }
            table.rollback_to(snapshot);

            let actual: Vec<IntVar> = keys.iter().map(|&k| table.find(k)).collect();
            prop_assert_eq!(actual, expected);
        }
    }
}
