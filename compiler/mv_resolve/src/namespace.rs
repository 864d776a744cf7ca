//! Resolution namespaces.

use bitflags::bitflags;
use mv_ir::ast::NodeKind;

bitflags! {
    /// Namespaces a name can live in.
    ///
    /// Lookups ask for a set; a declaration matches when its namespaces
    /// intersect the requested ones. Enum variants are both types (struct
    /// literals, patterns) and values (unit variants in expressions).
    #[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
    pub struct Namespace: u8 {
        const VALUE = 1 << 0;
        const TYPE = 1 << 1;
        const MODULE = 1 << 2;
        const SCHEMA = 1 << 3;

        /// What a `::` qualifier can name.
        const QUALIFIER = Self::TYPE.bits() | Self::MODULE.bits();
    }
}

impl Namespace {
    /// Namespaces a declaration node is found in.
    pub fn of_decl(kind: &NodeKind) -> Namespace {
        match kind {
            NodeKind::Module(_) => Namespace::MODULE,
            NodeKind::Struct(_) | NodeKind::Enum(_) | NodeKind::TypeParam(_) => Namespace::TYPE,
            NodeKind::Variant(_) => Namespace::TYPE | Namespace::VALUE,
            NodeKind::Function(_)
            | NodeKind::Const(_)
            | NodeKind::GlobalVar(_)
            | NodeKind::SchemaField(_)
            | NodeKind::Field(_)
            | NodeKind::ItemSpec(_)
            | NodeKind::Pat(_)
            | NodeKind::PatField(_) => Namespace::VALUE,
            NodeKind::Schema(_) => Namespace::SCHEMA,
            NodeKind::File(_)
            | NodeKind::ModuleSpec(_)
            | NodeKind::UseStmt(_)
            | NodeKind::UseSpeck(_)
            | NodeKind::Friend(_)
            | NodeKind::Param(_)
            | NodeKind::Attr(_)
            | NodeKind::Block(_)
            | NodeKind::Stmt(_)
            | NodeKind::Expr(_)
            | NodeKind::StructLitField(_)
            | NodeKind::MatchArm(_)
            | NodeKind::Path(_)
            | NodeKind::Type(_) => Namespace::empty(),
        }
    }
}
