//! Type representation.
//!
//! [`Ty`] is a plain recursive value: cloning is cheap enough for the sizes
//! Move programs produce, and structural equality is what unification and
//! caching compare. Inference variables ([`TyInfer`]) only appear while a
//! walker is running; published results are folded free of them.

use std::fmt::Write as _;

use mv_ir::ast::{Abilities, IntSuffix, NodeKind};
use mv_ir::{Name, NodeId, Project};

use crate::flags::TypeFlags;
use crate::fold::TypeVisitor;

/// Width of an integer type.
///
/// `Default` is the type an unconstrained literal settles on; it unifies
/// with every concrete width.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum IntKind {
    U8,
    U16,
    U32,
    U64,
    U128,
    U256,
    Default,
}

impl IntKind {
    pub fn as_str(self) -> &'static str {
        match self {
            IntKind::U8 => "u8",
            IntKind::U16 => "u16",
            IntKind::U32 => "u32",
            IntKind::U64 => "u64",
            IntKind::U128 => "u128",
            IntKind::U256 => "u256",
            IntKind::Default => "integer",
        }
    }

    /// Two widths unify when they are equal or either is `Default`.
    #[inline]
    pub fn is_compatible(self, other: IntKind) -> bool {
        self == other || self == IntKind::Default || other == IntKind::Default
    }

    /// Width named by a builtin type name, if any.
    pub fn from_name(project: &Project, name: Name) -> Option<IntKind> {
        let known = project.known();
        let kind = match name {
            n if n == known.u8 => IntKind::U8,
            n if n == known.u16 => IntKind::U16,
            n if n == known.u32 => IntKind::U32,
            n if n == known.u64 => IntKind::U64,
            n if n == known.u128 => IntKind::U128,
            n if n == known.u256 => IntKind::U256,
            _ => return None,
        };
        Some(kind)
    }
}

impl From<IntSuffix> for IntKind {
    fn from(suffix: IntSuffix) -> Self {
        match suffix {
            IntSuffix::U8 => IntKind::U8,
            IntSuffix::U16 => IntKind::U16,
            IntSuffix::U32 => IntKind::U32,
            IntSuffix::U64 => IntKind::U64,
            IntSuffix::U128 => IntKind::U128,
            IntSuffix::U256 => IntKind::U256,
        }
    }
}

/// General inference variable.
///
/// `origin` is the type parameter this variable was instantiated for, if
/// any; unresolved variables fall back to it when errors are rendered.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TyVar {
    pub id: u32,
    pub origin: Option<NodeId>,
}

/// Integer inference variable: an integer of not yet known width.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct IntVar(pub u32);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TyInfer {
    TyVar(TyVar),
    IntVar(IntVar),
}

/// What a callable type was built from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CallableKind {
    Function(NodeId),
    Lambda,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Ty {
    /// Could not be determined. Unifies with everything.
    Unknown,
    /// Type of diverging expressions. Unifies with everything.
    Never,
    Unit,
    /// Builtin without structure of its own, e.g. spec-only `range` or `bv`.
    Primitive(Name),
    Integer(IntKind),
    /// Unbounded spec-language integer.
    Num,
    Bool,
    Address,
    Signer,
    Vector(Box<Ty>),
    Reference {
        referenced: Box<Ty>,
        mutable: bool,
    },
    Tuple(Vec<Ty>),
    TypeParam(NodeId),
    /// Struct or enum applied to type arguments.
    Adt {
        item: NodeId,
        args: Vec<Ty>,
    },
    Callable {
        params: Vec<Ty>,
        ret: Box<Ty>,
        kind: CallableKind,
    },
    Infer(TyInfer),
}

impl Ty {
    pub const DEFAULT_INTEGER: Ty = Ty::Integer(IntKind::Default);

    #[inline]
    pub fn vector(item: Ty) -> Ty {
        Ty::Vector(Box::new(item))
    }

    #[inline]
    pub fn reference(referenced: Ty, mutable: bool) -> Ty {
        Ty::Reference {
            referenced: Box::new(referenced),
            mutable,
        }
    }

    #[inline]
    pub fn ty_var(var: TyVar) -> Ty {
        Ty::Infer(TyInfer::TyVar(var))
    }

    #[inline]
    pub fn int_var(var: IntVar) -> Ty {
        Ty::Infer(TyInfer::IntVar(var))
    }

    /// Summary of what occurs anywhere inside this type.
    pub fn flags(&self) -> TypeFlags {
        let mut collector = FlagCollector(TypeFlags::empty());
        collector.visit(self);
        collector.0
    }

    #[inline]
    pub fn has_infer(&self) -> bool {
        self.flags().intersects(TypeFlags::HAS_INFER)
    }

    #[inline]
    pub fn is_unknown(&self) -> bool {
        matches!(self, Ty::Unknown)
    }

    #[inline]
    pub fn is_never(&self) -> bool {
        matches!(self, Ty::Never)
    }

    /// Integer, integer variable or `num`.
    pub fn is_integer_like(&self) -> bool {
        matches!(
            self,
            Ty::Integer(_) | Ty::Num | Ty::Infer(TyInfer::IntVar(_))
        )
    }

    /// The type behind any number of references.
    pub fn innermost(&self) -> &Ty {
        let mut ty = self;
        while let Ty::Reference { referenced, .. } = ty {
            ty = referenced;
        }
        ty
    }

    /// Spec-language view of a type: references are transparent and every
    /// integer is `num`. Outside specs the type is returned unchanged.
    pub fn refine_for_specs(&self, msl: bool) -> Ty {
        if !msl {
            return self.clone();
        }
        match self.innermost() {
            Ty::Integer(_) => Ty::Num,
            other => other.clone(),
        }
    }

    /// Abilities a value of this type has.
    ///
    /// Unknown, diverging and unresolved types are treated as having every
    /// ability, except a variable instantiated for a type parameter, which
    /// has that parameter's bounds.
    pub fn abilities(&self, project: &Project) -> Abilities {
        let tree = project.tree();
        let primitive = Abilities::COPY | Abilities::DROP | Abilities::STORE;
        match self {
            Ty::Unknown | Ty::Never => Abilities::all(),
            Ty::Infer(TyInfer::TyVar(TyVar {
                origin: Some(param),
                ..
            })) => type_param_bounds(project, *param),
            Ty::Infer(TyInfer::TyVar(_)) => Abilities::all(),
            Ty::Infer(TyInfer::IntVar(_))
            | Ty::Unit
            | Ty::Primitive(_)
            | Ty::Integer(_)
            | Ty::Num
            | Ty::Bool
            | Ty::Address => primitive,
            Ty::Signer => Abilities::DROP,
            Ty::Vector(item) => item.abilities(project) & primitive,
            Ty::Reference { .. } => Abilities::COPY | Abilities::DROP,
            Ty::Tuple(items) => items
                .iter()
                .fold(Abilities::all(), |acc, item| acc & item.abilities(project)),
            Ty::TypeParam(param) => type_param_bounds(project, *param),
            Ty::Adt { item, .. } => match tree.get(*item).map(|n| &n.kind) {
                Some(NodeKind::Struct(s)) => s.abilities,
                Some(NodeKind::Enum(e)) => e.abilities,
                _ => Abilities::all(),
            },
            Ty::Callable { .. } => Abilities::empty(),
        }
    }

    /// Render for diagnostics, e.g. `&mut vector<u8>` or `Coin<?T>`.
    pub fn display(&self, project: &Project) -> String {
        let mut out = String::new();
        self.write_to(project, &mut out);
        out
    }

    fn write_to(&self, project: &Project, out: &mut String) {
        match self {
            Ty::Unknown => out.push_str("<unknown>"),
            Ty::Never => out.push_str("<never>"),
            Ty::Unit => out.push_str("()"),
            Ty::Primitive(name) => out.push_str(project.text(*name)),
            Ty::Integer(kind) => out.push_str(kind.as_str()),
            Ty::Num => out.push_str("num"),
            Ty::Bool => out.push_str("bool"),
            Ty::Address => out.push_str("address"),
            Ty::Signer => out.push_str("signer"),
            Ty::Vector(item) => {
                out.push_str("vector<");
                item.write_to(project, out);
                out.push('>');
            }
            Ty::Reference {
                referenced,
                mutable,
            } => {
                out.push_str(if *mutable { "&mut " } else { "&" });
                referenced.write_to(project, out);
            }
            Ty::Tuple(items) => {
                out.push('(');
                write_list(items, project, out);
                out.push(')');
            }
            Ty::TypeParam(param) => out.push_str(decl_text(project, *param)),
            Ty::Adt { item, args } => {
                out.push_str(decl_text(project, *item));
                if !args.is_empty() {
                    out.push('<');
                    write_list(args, project, out);
                    out.push('>');
                }
            }
            Ty::Callable { params, ret, .. } => {
                out.push('|');
                write_list(params, project, out);
                out.push_str("| -> ");
                ret.write_to(project, out);
            }
            Ty::Infer(TyInfer::TyVar(var)) => match var.origin {
                Some(param) => {
                    let _ = write!(out, "?{}", decl_text(project, param));
                }
                None => out.push_str("?_"),
            },
            Ty::Infer(TyInfer::IntVar(_)) => out.push_str("?int"),
        }
    }
}

fn write_list(items: &[Ty], project: &Project, out: &mut String) {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        item.write_to(project, out);
    }
}

fn decl_text(project: &Project, decl: NodeId) -> &'static str {
    project
        .tree()
        .get(decl)
        .and_then(|node| node.kind.decl_name())
        .map_or("<anonymous>", |name| project.text(name))
}

fn type_param_bounds(project: &Project, param: NodeId) -> Abilities {
    project
        .tree()
        .as_type_param(param)
        .map_or(Abilities::all(), |tp| tp.abilities)
}

struct FlagCollector(TypeFlags);

impl TypeVisitor for FlagCollector {
    fn visit(&mut self, ty: &Ty) -> bool {
        self.0 |= match ty {
            Ty::Unknown => TypeFlags::HAS_UNKNOWN,
            Ty::Reference { .. } => TypeFlags::HAS_REFERENCE,
            Ty::TypeParam(_) => TypeFlags::HAS_TYPE_PARAM,
            Ty::Adt { .. } => TypeFlags::HAS_ADT,
            Ty::Infer(TyInfer::TyVar(_)) => TypeFlags::HAS_TY_VAR,
            Ty::Infer(TyInfer::IntVar(_)) => TypeFlags::HAS_INT_VAR,
            _ => TypeFlags::empty(),
        };
        self.super_visit(ty)
    }
}

#[cfg(test)]
mod tests;
