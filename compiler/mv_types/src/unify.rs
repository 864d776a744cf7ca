//! Union-find over inference variables with snapshots.
//!
//! One [`UnificationTable`] per variable kind. Each slot stores its parent
//! key (the root stores itself), a rank for union by rank and, at the root
//! only, the bound value.
//!
//! # Snapshots
//!
//! While a snapshot is open every mutation, including path compression,
//! records the slot's previous state in an undo log. [`rollback_to`]
//! replays the log backwards; [`commit`] keeps the changes. Snapshots nest.
//!
//! [`rollback_to`]: UnificationTable::rollback_to
//! [`commit`]: UnificationTable::commit

use std::fmt;

use crate::ty::{IntVar, Ty, TyVar};

/// Key type of a [`UnificationTable`].
pub trait UnifyKey: Copy + Eq + fmt::Debug {
    /// Slot index of this key.
    fn index(self) -> u32;
}

impl UnifyKey for TyVar {
    #[inline]
    fn index(self) -> u32 {
        self.id
    }
}

impl UnifyKey for IntVar {
    #[inline]
    fn index(self) -> u32 {
        self.0
    }
}

#[derive(Clone, Debug)]
struct VarValue<K> {
    parent: K,
    rank: u32,
    value: Option<Ty>,
}

#[derive(Debug)]
enum UndoEntry<K> {
    NewKey,
    SetSlot { index: u32, old: VarValue<K> },
}

/// Position in the undo log a snapshot can roll back to.
#[must_use = "a snapshot must be committed or rolled back"]
#[derive(Debug)]
pub struct Snapshot {
    undo_len: usize,
}

pub struct UnificationTable<K: UnifyKey> {
    values: Vec<VarValue<K>>,
    undo_log: Vec<UndoEntry<K>>,
    open_snapshots: usize,
}

impl<K: UnifyKey> Default for UnificationTable<K> {
    fn default() -> Self {
        UnificationTable {
            values: Vec::new(),
            undo_log: Vec::new(),
            open_snapshots: 0,
        }
    }
}

impl<K: UnifyKey> UnificationTable<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Allocate an unbound key; `make` receives its slot index.
    pub fn new_key(&mut self, make: impl FnOnce(u32) -> K) -> K {
        let index = u32::try_from(self.values.len()).unwrap_or(u32::MAX);
        let key = make(index);
        debug_assert_eq!(key.index(), index);
        self.values.push(VarValue {
            parent: key,
            rank: 0,
            value: None,
        });
        if self.in_snapshot() {
            self.undo_log.push(UndoEntry::NewKey);
        }
        key
    }

    /// Root of `key`'s equivalence class, compressing the path to it.
    pub fn find(&mut self, key: K) -> K {
        let parent = self.slot(key).parent;
        if parent == key {
            return key;
        }
        let root = self.find(parent);
        if root != parent {
            self.update(key.index(), |slot| slot.parent = root);
        }
        root
    }

    /// Value bound to `key`'s class, if any.
    pub fn value_of(&mut self, key: K) -> Option<Ty> {
        let root = self.find(key);
        self.slot(root).value.clone()
    }

    /// Merge the classes of `a` and `b`.
    ///
    /// The merged class keeps whichever value either side had; the root's
    /// value wins if both were bound.
    pub fn unify_var_var(&mut self, a: K, b: K) {
        let (a, b) = (self.find(a), self.find(b));
        if a == b {
            return;
        }
        let (rank_a, rank_b) = (self.slot(a).rank, self.slot(b).rank);
        let (root, child) = if rank_a >= rank_b { (a, b) } else { (b, a) };
        let child_value = self.slot(child).value.clone();
        self.update(child.index(), |slot| slot.parent = root);
        self.update(root.index(), |slot| {
            if rank_a == rank_b {
                slot.rank += 1;
            }
            if slot.value.is_none() {
                slot.value = child_value;
            }
        });
    }

    /// Bind `key`'s class to `value`, replacing any previous binding.
    pub fn unify_var_value(&mut self, key: K, value: Ty) {
        let root = self.find(key);
        self.update(root.index(), |slot| slot.value = Some(value));
    }

    pub fn snapshot(&mut self) -> Snapshot {
        self.open_snapshots += 1;
        Snapshot {
            undo_len: self.undo_log.len(),
        }
    }

    /// Undo everything since `snapshot` was taken.
    pub fn rollback_to(&mut self, snapshot: Snapshot) {
        while self.undo_log.len() > snapshot.undo_len {
            match self.undo_log.pop() {
                Some(UndoEntry::NewKey) => {
                    self.values.pop();
                }
                Some(UndoEntry::SetSlot { index, old }) => {
                    if let Some(slot) = self.values.get_mut(index as usize) {
                        *slot = old;
                    }
                }
                None => break,
            }
        }
        self.close(&snapshot);
    }

    /// Keep everything since `snapshot` was taken.
    pub fn commit(&mut self, snapshot: Snapshot) {
        self.close(&snapshot);
    }

    fn close(&mut self, snapshot: &Snapshot) {
        self.open_snapshots = self.open_snapshots.saturating_sub(1);
        if self.open_snapshots == 0 {
            debug_assert_eq!(snapshot.undo_len, 0);
            self.undo_log.clear();
        }
    }

    #[inline]
    fn in_snapshot(&self) -> bool {
        self.open_snapshots > 0
    }

    #[inline]
    fn slot(&self, key: K) -> &VarValue<K> {
        &self.values[key.index() as usize]
    }

    fn update(&mut self, index: u32, f: impl FnOnce(&mut VarValue<K>)) {
        let in_snapshot = self.in_snapshot();
        let Some(slot) = self.values.get_mut(index as usize) else {
            return;
        };
        if in_snapshot {
            self.undo_log.push(UndoEntry::SetSlot {
                index,
                old: slot.clone(),
            });
        }
        f(slot);
    }
}

#[cfg(test)]
mod tests;
