//! Cached-style summary bits for types.
//!
//! Computed by a single traversal and used to skip work: a type without
//! `HAS_INFER` needs no variable resolution, a type without `HAS_ADT`,
//! `HAS_INFER` or `HAS_TYPE_PARAM` needs no ability check.

use bitflags::bitflags;

bitflags! {
    /// What occurs anywhere inside a type.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct TypeFlags: u32 {
        /// Contains a general inference variable.
        const HAS_TY_VAR = 1 << 0;
        /// Contains an integer inference variable.
        const HAS_INT_VAR = 1 << 1;
        /// Contains a type parameter.
        const HAS_TYPE_PARAM = 1 << 2;
        /// Contains a struct or enum.
        const HAS_ADT = 1 << 3;
        /// Contains `Unknown`.
        const HAS_UNKNOWN = 1 << 4;
        /// Contains a reference.
        const HAS_REFERENCE = 1 << 5;

        /// Contains any inference variable.
        const HAS_INFER = Self::HAS_TY_VAR.bits() | Self::HAS_INT_VAR.bits();
        /// Ability checks are meaningful for this type.
        const NEEDS_ABILITY_CHECK = Self::HAS_INFER.bits()
            | Self::HAS_ADT.bits()
            | Self::HAS_TYPE_PARAM.bits();
    }
}
