//! Project snapshot: the tree plus everything resolution needs around it.

use rustc_hash::FxHashMap;

use crate::ast::NodeKind;
use crate::{
    AddressRef, DependencyToken, KnownNames, Name, NamedAddresses, NodeId, NumericAddress,
    PackageId, SharedInterner, StructureVersions, SyntaxTree,
};

/// One compilation unit and its resolved address assignments.
#[derive(Clone, Debug)]
pub struct Package {
    pub name: Name,
    pub addresses: NamedAddresses,
}

/// `(address, module name)` lookups, built once per snapshot.
#[derive(Debug, Default)]
struct ModuleIndex {
    modules: FxHashMap<(NumericAddress, Name), Vec<NodeId>>,
    specs: FxHashMap<(NumericAddress, Name), Vec<NodeId>>,
    addresses: FxHashMap<NodeId, NumericAddress>,
}

/// Read-only input to every resolution and inference query.
///
/// Shared across threads; a structural edit produces a new snapshot with
/// advanced [`StructureVersions`].
pub struct Project {
    tree: SyntaxTree,
    interner: SharedInterner,
    packages: Vec<Package>,
    known: KnownNames,
    versions: StructureVersions,
    index: ModuleIndex,
}

impl Project {
    pub fn new(
        tree: SyntaxTree,
        interner: SharedInterner,
        packages: Vec<Package>,
        versions: StructureVersions,
    ) -> Self {
        let known = KnownNames::new(&interner);
        let mut project = Project {
            tree,
            interner,
            packages,
            known,
            versions,
            index: ModuleIndex::default(),
        };
        project.index = project.build_index();
        project
    }

    fn build_index(&self) -> ModuleIndex {
        let mut index = ModuleIndex::default();
        for &file in self.tree.files() {
            let Some(file_decl) = self.tree.as_file(file) else {
                continue;
            };
            for &module in &file_decl.modules {
                let Some(decl) = self.tree.as_module(module) else {
                    continue;
                };
                let Some(address) = decl
                    .address
                    .and_then(|addr| self.address_value(file, addr))
                else {
                    continue;
                };
                index.addresses.insert(module, address);
                index
                    .modules
                    .entry((address, decl.name))
                    .or_default()
                    .push(module);
            }
        }
        for &file in self.tree.files() {
            let Some(file_decl) = self.tree.as_file(file) else {
                continue;
            };
            for &spec in &file_decl.module_specs {
                let Some(decl) = self.tree.as_module_spec(spec) else {
                    continue;
                };
                let address = match decl.address {
                    Some(addr) => self.address_value(file, addr),
                    None => file_decl
                        .modules
                        .iter()
                        .filter(|&&m| {
                            self.tree
                                .as_module(m)
                                .is_some_and(|module| module.name == decl.module)
                        })
                        .find_map(|m| index.addresses.get(m).copied()),
                };
                if let Some(address) = address {
                    index
                        .specs
                        .entry((address, decl.module))
                        .or_default()
                        .push(spec);
                }
            }
        }
        index
    }

    /// Numeric value of an address written in `file`.
    ///
    /// Declarations are indexed test-aware so that dev-address modules are
    /// reachable from test code.
    fn address_value(&self, file: NodeId, addr: AddressRef) -> Option<NumericAddress> {
        match addr {
            AddressRef::Value(value) => Some(value),
            AddressRef::Named(name) => self
                .package_of(file)?
                .addresses
                .lookup_test_aware(name),
        }
    }

    #[inline]
    pub fn tree(&self) -> &SyntaxTree {
        &self.tree
    }

    #[inline]
    pub fn interner(&self) -> &SharedInterner {
        &self.interner
    }

    #[inline]
    pub fn known(&self) -> &KnownNames {
        &self.known
    }

    #[inline]
    pub fn versions(&self) -> &StructureVersions {
        &self.versions
    }

    /// Text of an interned name.
    #[inline]
    pub fn text(&self, name: Name) -> &'static str {
        self.interner.lookup(name)
    }

    pub fn packages(&self) -> &[Package] {
        &self.packages
    }

    pub fn package(&self, id: PackageId) -> Option<&Package> {
        self.packages.get(id.index())
    }

    pub fn package_id_of(&self, node: NodeId) -> Option<PackageId> {
        let file = self.tree.containing_file(node)?;
        self.tree.as_file(file).map(|f| f.package)
    }

    pub fn package_of(&self, node: NodeId) -> Option<&Package> {
        self.package(self.package_id_of(node)?)
    }

    /// Cache key for anything computed about `node`.
    pub fn dependency_token(&self, node: NodeId) -> DependencyToken {
        self.versions.token(self.tree.containing_file(node))
    }

    /// Address a module is declared at, if it could be resolved.
    pub fn module_address(&self, module: NodeId) -> Option<NumericAddress> {
        self.index.addresses.get(&module).copied()
    }

    /// Modules declared as `address::name`.
    pub fn modules_at(&self, address: NumericAddress, name: Name) -> &[NodeId] {
        self.index
            .modules
            .get(&(address, name))
            .map_or(&[][..], Vec::as_slice)
    }

    /// Module specs attached to `module`.
    pub fn module_specs_of(&self, module: NodeId) -> &[NodeId] {
        let Some(address) = self.module_address(module) else {
            return &[];
        };
        let Some(decl) = self.tree.as_module(module) else {
            return &[];
        };
        self.index
            .specs
            .get(&(address, decl.name))
            .map_or(&[][..], Vec::as_slice)
    }

    /// Module a module spec is attached to.
    pub fn module_spec_target(&self, spec: NodeId) -> Option<NodeId> {
        self.index
            .specs
            .iter()
            .find(|(_, specs)| specs.contains(&spec))
            .and_then(|(&(address, name), _)| self.modules_at(address, name).first().copied())
    }

    /// Functions of `module` that are not restricted to test builds.
    pub fn non_test_functions(&self, module: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let items = self
            .tree
            .as_module(module)
            .map_or(&[][..], |m| m.items.as_slice());
        items.iter().copied().filter(|&item| {
            self.tree
                .as_function(item)
                .is_some_and(|f| !f.attrs.is_test_code())
        })
    }

    /// Whether `node` is (in) a `File`, `Module`, item or statement that
    /// only exists in test builds.
    pub fn is_test_code(&self, node: NodeId) -> bool {
        self.tree.ancestors_or_self(node).any(|n| match self.tree.kind(n) {
            NodeKind::Module(m) => m.attrs.is_test_code(),
            NodeKind::Function(f) => f.attrs.is_test_code(),
            NodeKind::Struct(s) => s.attrs.is_test_code(),
            NodeKind::Enum(e) => e.attrs.is_test_code(),
            NodeKind::Const(c) => c.attrs.is_test_code(),
            NodeKind::UseStmt(u) => u.attrs.is_test_code(),
            _ => false,
        })
    }

    /// Whether `node` is (in) an item marked `#[verify_only]`.
    pub fn is_verify_only(&self, node: NodeId) -> bool {
        self.tree.ancestors_or_self(node).any(|n| match self.tree.kind(n) {
            NodeKind::Module(m) => m.attrs.verify_only,
            NodeKind::Function(f) => f.attrs.verify_only,
            NodeKind::Struct(s) => s.attrs.verify_only,
            NodeKind::Enum(e) => e.attrs.verify_only,
            NodeKind::Const(c) => c.attrs.verify_only,
            NodeKind::UseStmt(u) => u.attrs.verify_only,
            _ => false,
        })
    }
}
