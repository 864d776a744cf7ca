//! Syntax arena and project model for Move analysis.
//!
//! Everything the resolver and the type checker read lives here:
//!
//! - [`SyntaxTree`]: an arena of [`Node`]s addressed by [`NodeId`], with
//!   parent links computed once the tree is built.
//! - [`ast`]: the closed set of node kinds.
//! - [`Name`] / [`StringInterner`]: interned identifiers.
//! - [`NumericAddress`] / [`NamedAddresses`]: account addresses and the
//!   per-package name assignments.
//! - [`Project`]: a read-only snapshot tying the tree to its packages, the
//!   `(address, module)` index and the [`StructureVersions`] used for cache
//!   invalidation.
//! - [`TreeBuilder`]: programmatic construction, used by the parser front end
//!   and by tests.

/// Compile-time assertion that a type has a specific size.
///
/// Used to prevent accidental size regressions in frequently-allocated types.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

mod address;
pub mod ast;
mod builder;
mod interner;
mod known;
mod name;
mod node_id;
mod project;
mod span;
mod tree;
mod version;

pub use address::{AddressRef, NamedAddresses, NumericAddress, ADDRESS_LENGTH};
pub use builder::{
    EnumBuilder, FunctionBuilder, ModuleBuilder, ModuleSpecBuilder, StructBuilder, TreeBuilder,
};
pub use interner::{InternError, SharedInterner, StringInterner};
pub use known::KnownNames;
pub use name::Name;
pub use node_id::{NodeId, PackageId};
pub use project::{Package, Project};
pub use span::Span;
pub use tree::{Node, SyntaxTree};
pub use version::{DependencyToken, StructureVersions};

#[cfg(target_pointer_width = "64")]
mod size_asserts {
    use super::{Name, NodeId, Span};
    crate::static_assert_size!(Name, 4);
    crate::static_assert_size!(NodeId, 4);
    crate::static_assert_size!(Span, 8);
}
