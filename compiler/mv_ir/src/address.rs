//! Account addresses and named-address maps.

use std::fmt;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::Name;

/// Length of an account address in bytes.
pub const ADDRESS_LENGTH: usize = 32;

/// A numeric account address.
///
/// Stored as big-endian bytes so that `0x1` and `0x0001` compare equal.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct NumericAddress([u8; ADDRESS_LENGTH]);

impl NumericAddress {
    pub const ZERO: NumericAddress = NumericAddress([0; ADDRESS_LENGTH]);

    /// The standard library address `0x1`.
    pub const ONE: NumericAddress = {
        let mut bytes = [0; ADDRESS_LENGTH];
        bytes[ADDRESS_LENGTH - 1] = 1;
        NumericAddress(bytes)
    };

    /// Parse `0x`-prefixed hex text with up to 64 digits.
    ///
    /// Returns `None` for anything else, including the empty `0x`.
    pub fn parse(text: &str) -> Option<Self> {
        let digits = text.strip_prefix("0x")?;
        if digits.is_empty() || digits.len() > ADDRESS_LENGTH * 2 {
            return None;
        }
        let mut bytes = [0u8; ADDRESS_LENGTH];
        // Walk from the least significant digit so short forms left-pad with zeros.
        for (i, ch) in digits.bytes().rev().enumerate() {
            let nibble = char::from(ch).to_digit(16)?;
            #[expect(clippy::cast_possible_truncation, reason = "hex digit fits in u8")]
            let nibble = nibble as u8;
            let byte = &mut bytes[ADDRESS_LENGTH - 1 - i / 2];
            if i % 2 == 0 {
                *byte |= nibble;
            } else {
                *byte |= nibble << 4;
            }
        }
        Some(NumericAddress(bytes))
    }

    #[inline]
    pub fn bytes(&self) -> &[u8; ADDRESS_LENGTH] {
        &self.0
    }

    /// Whether this is the standard library address `0x1`.
    #[inline]
    pub fn is_0x1(&self) -> bool {
        *self == Self::ONE
    }
}

impl fmt::Display for NumericAddress {
    /// Short form without leading zeros: `0x1`, `0xcafe`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex: String = self.0.iter().map(|b| format!("{b:02x}")).collect();
        let trimmed = hex.trim_start_matches('0');
        if trimmed.is_empty() {
            write!(f, "0x0")
        } else {
            write!(f, "0x{trimmed}")
        }
    }
}

impl fmt::Debug for NumericAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NumericAddress({self})")
    }
}

/// An address as written in source: a literal or a named address.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum AddressRef {
    Value(NumericAddress),
    Named(Name),
}

/// Named addresses declared by one package.
///
/// `values` hold concrete assignments, `placeholders` are names declared as
/// `_` and waiting for a dependent package to substitute them, and
/// `dev_values` are the dev-addresses that apply only when compiling tests.
#[derive(Clone, Debug, Default)]
pub struct NamedAddresses {
    values: FxHashMap<Name, NumericAddress>,
    placeholders: FxHashSet<Name>,
    dev_values: FxHashMap<Name, NumericAddress>,
}

impl NamedAddresses {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `name = value`, replacing a placeholder of the same name.
    pub fn insert(&mut self, name: Name, value: NumericAddress) {
        self.placeholders.remove(&name);
        self.values.insert(name, value);
    }

    /// Declare `name = "_"`.
    pub fn insert_placeholder(&mut self, name: Name) {
        if !self.values.contains_key(&name) {
            self.placeholders.insert(name);
        }
    }

    /// Declare a dev-address `name = value`.
    pub fn insert_dev(&mut self, name: Name, value: NumericAddress) {
        self.dev_values.insert(name, value);
    }

    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, name: Name, value: NumericAddress) -> Self {
        self.insert(name, value);
        self
    }

    /// Whether `name` is declared at all, placeholders included.
    pub fn is_declared(&self, name: Name) -> bool {
        self.values.contains_key(&name)
            || self.placeholders.contains(&name)
            || self.dev_values.contains_key(&name)
    }

    /// Concrete value of `name`; placeholders have none.
    pub fn lookup(&self, name: Name) -> Option<NumericAddress> {
        self.values.get(&name).copied()
    }

    /// Like [`lookup`](Self::lookup), falling back to dev-addresses.
    pub fn lookup_test_aware(&self, name: Name) -> Option<NumericAddress> {
        self.lookup(name)
            .or_else(|| self.dev_values.get(&name).copied())
    }

    /// Substitute placeholders from a dependent package's assignments.
    ///
    /// Entries in `subst` that do not name a placeholder are ignored.
    pub fn apply_substitution(&mut self, subst: &FxHashMap<Name, NumericAddress>) {
        let filled: Vec<Name> = self
            .placeholders
            .iter()
            .copied()
            .filter(|name| subst.contains_key(name))
            .collect();
        for name in filled {
            self.placeholders.remove(&name);
            self.values.insert(name, subst[&name]);
        }
    }

    /// Merge the addresses of a dependency; existing entries win.
    pub fn extend_with(&mut self, other: &NamedAddresses) {
        for (&name, &value) in &other.values {
            self.values.entry(name).or_insert(value);
            self.placeholders.remove(&name);
        }
        for &name in &other.placeholders {
            if !self.values.contains_key(&name) {
                self.placeholders.insert(name);
            }
        }
        for (&name, &value) in &other.dev_values {
            self.dev_values.entry(name).or_insert(value);
        }
    }
}
