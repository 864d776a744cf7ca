//! Pre-interned names the resolver and the type checker compare against.

use crate::{Name, StringInterner};

/// Well-known identifiers, interned once per project.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct KnownNames {
    pub self_module: Name,
    pub self_param: Name,
    pub result: Name,
    pub vector: Name,
    pub std: Name,
    pub u8: Name,
    pub u16: Name,
    pub u32: Name,
    pub u64: Name,
    pub u128: Name,
    pub u256: Name,
    pub bool: Name,
    pub address: Name,
    pub signer: Name,
    pub num: Name,
    pub bv: Name,
    pub range: Name,
}

impl KnownNames {
    pub fn new(interner: &StringInterner) -> Self {
        KnownNames {
            self_module: interner.intern("Self"),
            self_param: interner.intern("self"),
            result: interner.intern("result"),
            vector: interner.intern("vector"),
            std: interner.intern("std"),
            u8: interner.intern("u8"),
            u16: interner.intern("u16"),
            u32: interner.intern("u32"),
            u64: interner.intern("u64"),
            u128: interner.intern("u128"),
            u256: interner.intern("u256"),
            bool: interner.intern("bool"),
            address: interner.intern("address"),
            signer: interner.intern("signer"),
            num: interner.intern("num"),
            bv: interner.intern("bv"),
            range: interner.intern("range"),
        }
    }

    /// Builtin type names usable outside specs.
    pub fn is_builtin_type(&self, name: Name) -> bool {
        [
            self.u8,
            self.u16,
            self.u32,
            self.u64,
            self.u128,
            self.u256,
            self.bool,
            self.address,
            self.signer,
            self.vector,
        ]
        .contains(&name)
    }

    /// Builtin type names that only exist in specs.
    pub fn is_spec_builtin_type(&self, name: Name) -> bool {
        [self.num, self.bv, self.range].contains(&name)
    }
}
