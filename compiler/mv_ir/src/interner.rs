//! String interner for identifiers.
//!
//! Interning happens while trees are built and while well-known names are
//! looked up; both can run on several threads at once, so the table sits
//! behind a `RwLock` with a read-mostly fast path.

use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::Name;

/// Error when interning a string fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternError {
    /// More than `u32::MAX` distinct strings.
    Overflow { count: usize },
}

impl std::fmt::Display for InternError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InternError::Overflow { count } => {
                write!(f, "interner exceeded capacity: {count} strings")
            }
        }
    }
}

impl std::error::Error for InternError {}

#[derive(Default)]
struct Table {
    map: FxHashMap<&'static str, Name>,
    strings: Vec<&'static str>,
}

/// Identifier interner.
///
/// Strings are leaked on first insertion and never freed, which makes
/// [`StringInterner::lookup`] hand out `&'static str` without holding the lock.
pub struct StringInterner {
    table: RwLock<Table>,
}

/// Interner shared between the tree, the project and concurrent queries.
pub type SharedInterner = Arc<StringInterner>;

impl StringInterner {
    /// Create an interner with the empty string and Move keywords pre-interned.
    pub fn new() -> Self {
        let interner = Self {
            table: RwLock::new(Table::default()),
        };
        interner.intern("");
        for kw in KEYWORDS {
            interner.intern(kw);
        }
        interner
    }

    /// Create a shared interner.
    pub fn shared() -> SharedInterner {
        Arc::new(Self::new())
    }

    /// Intern `s`, failing only on overflow.
    pub fn try_intern(&self, s: &str) -> Result<Name, InternError> {
        if let Some(&name) = self.table.read().map.get(s) {
            return Ok(name);
        }

        let mut table = self.table.write();
        if let Some(&name) = table.map.get(s) {
            return Ok(name);
        }

        let raw = u32::try_from(table.strings.len()).map_err(|_| InternError::Overflow {
            count: table.strings.len(),
        })?;
        let leaked: &'static str = Box::leak(s.to_owned().into_boxed_str());
        let name = Name::from_raw(raw);
        table.strings.push(leaked);
        table.map.insert(leaked, name);
        Ok(name)
    }

    /// Intern `s`.
    ///
    /// # Panics
    /// Panics if more than `u32::MAX` strings were interned.
    #[inline]
    pub fn intern(&self, s: &str) -> Name {
        self.try_intern(s).unwrap_or_else(|e| panic!("{e}"))
    }

    /// Look up an already interned string without inserting it.
    pub fn get(&self, s: &str) -> Option<Name> {
        self.table.read().map.get(s).copied()
    }

    /// The string behind `name`.
    ///
    /// Names from a different interner yield the empty string.
    pub fn lookup(&self, name: Name) -> &'static str {
        self.table
            .read()
            .strings
            .get(name.index())
            .copied()
            .unwrap_or("")
    }

    /// Number of interned strings, including the empty string.
    pub fn len(&self) -> usize {
        self.table.read().strings.len()
    }

    /// Whether only the empty string is interned.
    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

const KEYWORDS: &[&str] = &[
    "Self", "self", "result", "module", "script", "spec", "fun", "struct", "enum", "use",
    "friend", "public", "package", "native", "entry", "inline", "const", "schema", "global",
    "let", "mut", "return", "abort", "break", "continue", "loop", "while", "if", "else",
    "match", "as", "copy", "move", "drop", "store", "key", "phantom", "acquires", "u8", "u16",
    "u32", "u64", "u128", "u256", "bool", "address", "signer", "vector", "num", "bv", "range",
    "test", "test_only", "verify_only",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intern_is_idempotent() {
        let interner = StringInterner::new();
        let a = interner.intern("coin");
        let b = interner.intern("coin");
        assert_eq!(a, b);
        assert_eq!(interner.lookup(a), "coin");
    }

    #[test]
    fn empty_string_is_name_zero() {
        let interner = StringInterner::new();
        assert_eq!(interner.intern(""), Name::EMPTY);
        assert_eq!(interner.lookup(Name::EMPTY), "");
    }

    #[test]
    fn keywords_are_pre_interned() {
        let interner = StringInterner::new();
        assert!(interner.get("Self").is_some());
        assert!(interner.get("vector").is_some());
        assert!(interner.get("not_a_keyword").is_none());
    }

    #[test]
    fn concurrent_interning_agrees() {
        let interner = StringInterner::shared();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let interner = Arc::clone(&interner);
                std::thread::spawn(move || interner.intern("balance"))
            })
            .collect();
        let names: Vec<Name> = handles
            .into_iter()
            .map(|h| h.join().unwrap_or_else(|_| panic!("interning thread panicked")))
            .collect();
        assert!(names.windows(2).all(|w| w[0] == w[1]));
    }
}
