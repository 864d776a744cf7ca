//! Declarations: files, modules, module specs, uses and module items.

use bitflags::bitflags;

use crate::{AddressRef, Name, NodeId, PackageId};

/// Root of one source file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct File {
    pub package: PackageId,
    pub modules: Vec<NodeId>,
    pub module_specs: Vec<NodeId>,
}

/// `module 0x1::m { ... }`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModuleDecl {
    pub address: Option<AddressRef>,
    pub name: Name,
    pub uses: Vec<NodeId>,
    pub friends: Vec<NodeId>,
    /// Structs, enums, functions, constants, schemas, global variables and
    /// item specs in declaration order.
    pub items: Vec<NodeId>,
    pub attrs: Attributes,
}

/// `spec 0x1::m { ... }`: spec-only items attached to a module declared
/// elsewhere.
///
/// Without an address the target is the module of that name in the same
/// file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModuleSpecDecl {
    pub address: Option<AddressRef>,
    pub module: Name,
    pub uses: Vec<NodeId>,
    pub items: Vec<NodeId>,
}

/// `use <speck>;`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UseStmt {
    pub speck: NodeId,
    pub attrs: Attributes,
}

/// One path in a `use` declaration.
///
/// `use 0x1::m::{Self, f as g}` is a root speck with path `0x1::m` and two
/// group children whose paths are relative to it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UseSpeck {
    pub path: NodeId,
    pub alias: Option<Name>,
    pub group: Vec<NodeId>,
}

/// `friend 0x1::other;`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FriendDecl {
    pub path: NodeId,
}

bitflags! {
    /// Abilities declared on a struct, enum or type parameter bound.
    #[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
    pub struct Abilities: u8 {
        const COPY = 1 << 0;
        const DROP = 1 << 1;
        const STORE = 1 << 2;
        const KEY = 1 << 3;
    }
}

impl Abilities {
    /// Parse a comma or space separated list such as `"copy, drop"`.
    ///
    /// Unknown words are ignored.
    pub fn parse_list(text: &str) -> Self {
        text.split(|c: char| c == ',' || c.is_whitespace() || c == '+')
            .filter(|word| !word.is_empty())
            .fold(Abilities::empty(), |acc, word| {
                acc | match word {
                    "copy" => Abilities::COPY,
                    "drop" => Abilities::DROP,
                    "store" => Abilities::STORE,
                    "key" => Abilities::KEY,
                    _ => Abilities::empty(),
                }
            })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructDecl {
    pub name: Name,
    pub abilities: Abilities,
    pub type_params: Vec<NodeId>,
    pub fields: Vec<NodeId>,
    pub attrs: Attributes,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnumDecl {
    pub name: Name,
    pub abilities: Abilities,
    pub type_params: Vec<NodeId>,
    pub variants: Vec<NodeId>,
    pub attrs: Attributes,
}

/// Enum variant; unit variants have no fields.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VariantDecl {
    pub name: Name,
    pub fields: Vec<NodeId>,
}

/// Named field of a struct or variant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDecl {
    pub name: Name,
    pub ty: NodeId,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum FunctionKind {
    #[default]
    Regular,
    /// `spec fun`
    Spec,
    /// Function declared inside a spec block.
    SpecInline,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Visibility {
    #[default]
    Private,
    Public,
    Friend,
    Package,
    /// Deprecated `public(script)`; treated as public.
    Script,
}

bitflags! {
    #[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
    pub struct FunctionModifiers: u8 {
        const NATIVE = 1 << 0;
        const ENTRY = 1 << 1;
        const INLINE = 1 << 2;
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FunctionDecl {
    pub name: Name,
    pub kind: FunctionKind,
    pub visibility: Visibility,
    pub modifiers: FunctionModifiers,
    pub type_params: Vec<NodeId>,
    pub params: Vec<NodeId>,
    pub ret: Option<NodeId>,
    pub body: Option<NodeId>,
    pub attrs: Attributes,
}

impl FunctionDecl {
    #[inline]
    pub fn is_spec(&self) -> bool {
        !matches!(self.kind, FunctionKind::Regular)
    }

    #[inline]
    pub fn is_native(&self) -> bool {
        self.modifiers.contains(FunctionModifiers::NATIVE)
    }

    #[inline]
    pub fn is_entry(&self) -> bool {
        self.modifiers.contains(FunctionModifiers::ENTRY)
    }

    #[inline]
    pub fn is_inline(&self) -> bool {
        self.modifiers.contains(FunctionModifiers::INLINE)
    }
}

/// Function, lambda or quantifier parameter.
///
/// Lambda and quantifier parameters may omit the type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParamDecl {
    pub pat: NodeId,
    pub ty: Option<NodeId>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeParamDecl {
    pub name: Name,
    pub abilities: Abilities,
    pub phantom: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConstDecl {
    pub name: Name,
    pub ty: NodeId,
    pub init: Option<NodeId>,
    pub attrs: Attributes,
}

/// `schema S<T> { x: u64; requires x > 0; }`
///
/// Field declarations are [`SchemaFieldDecl`] nodes among the body's
/// statements.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SchemaDecl {
    pub name: Name,
    pub type_params: Vec<NodeId>,
    pub body: NodeId,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SchemaFieldDecl {
    pub name: Name,
    pub ty: NodeId,
}

/// `global supply<T>: num;`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlobalVarDecl {
    pub name: Name,
    pub type_params: Vec<NodeId>,
    pub ty: NodeId,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ItemSpecTarget {
    /// `spec module { ... }`
    Module,
    /// `spec transfer { ... }`
    Item(Name),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemSpecDecl {
    pub target: ItemSpecTarget,
    pub body: NodeId,
}

/// Attributes attached to an item.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Attributes {
    pub test: bool,
    pub test_only: bool,
    pub verify_only: bool,
    /// `Attr` nodes of other attribute items, e.g. `expected_failure(...)`.
    pub items: Vec<NodeId>,
}

impl Attributes {
    /// Restricted to test builds.
    #[inline]
    pub fn is_test_code(&self) -> bool {
        self.test || self.test_only
    }
}

/// `name` or `name = value` inside `#[...]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttrItem {
    pub name: Name,
    pub value: Option<NodeId>,
    pub nested: Vec<NodeId>,
}
