//! Shared fixtures for unit tests.

use mv_ir::{NamedAddresses, NumericAddress, Package, Project, StructureVersions, TreeBuilder};

/// Freeze `b` into a single-package project where `std` is `0x1`.
pub(crate) fn project(b: TreeBuilder) -> Project {
    crate::init_tracing();
    let interner = b.interner().clone();
    let package = Package {
        name: interner.intern("app"),
        addresses: NamedAddresses::new().with(interner.intern("std"), NumericAddress::ONE),
    };
    Project::new(b.finish(), interner, vec![package], StructureVersions::new())
}
