//! Named address lookup.

use mv_ir::{Name, NodeId, NumericAddress, Project};

/// Numeric value of the named address `name` as seen from `element`.
///
/// Looks in the address map of the package containing `element`. With
/// `test_aware`, dev-addresses count too. Placeholders and undeclared names
/// yield `None`.
pub fn resolve_named_address(
    project: &Project,
    element: NodeId,
    name: Name,
    test_aware: bool,
) -> Option<NumericAddress> {
    let addresses = &project.package_of(element)?.addresses;
    if test_aware {
        addresses.lookup_test_aware(name)
    } else {
        addresses.lookup(name)
    }
}
