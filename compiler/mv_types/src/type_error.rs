//! User-facing type errors.
//!
//! Errors are values attached to the node they concern and accumulated in
//! the order the walker found them. Inference keeps going after an error.

use mv_ir::ast::{Abilities, BinaryOp};
use mv_ir::{NodeId, Project};

use crate::ty::Ty;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeErrorKind {
    TypeMismatch { expected: Ty, actual: Ty },
    /// A tuple pattern applied to a value that is not a tuple of that arity.
    InvalidUnpacking { ty: Ty },
    AbilitiesMismatch { ty: Ty, missing: Abilities },
    UnsupportedBinaryOp { op: BinaryOp, ty: Ty },
    InvalidDereference { ty: Ty },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeError {
    pub node: NodeId,
    pub kind: TypeErrorKind,
}

impl TypeError {
    pub fn new(node: NodeId, kind: TypeErrorKind) -> Self {
        TypeError { node, kind }
    }

    /// Rebuild with every type passed through `f`.
    #[must_use]
    pub fn map_types(self, mut f: impl FnMut(&Ty) -> Ty) -> Self {
        let kind = match self.kind {
            TypeErrorKind::TypeMismatch { expected, actual } => TypeErrorKind::TypeMismatch {
                expected: f(&expected),
                actual: f(&actual),
            },
            TypeErrorKind::InvalidUnpacking { ty } => TypeErrorKind::InvalidUnpacking { ty: f(&ty) },
            TypeErrorKind::AbilitiesMismatch { ty, missing } => {
                TypeErrorKind::AbilitiesMismatch { ty: f(&ty), missing }
            }
            TypeErrorKind::UnsupportedBinaryOp { op, ty } => {
                TypeErrorKind::UnsupportedBinaryOp { op, ty: f(&ty) }
            }
            TypeErrorKind::InvalidDereference { ty } => {
                TypeErrorKind::InvalidDereference { ty: f(&ty) }
            }
        };
        TypeError {
            node: self.node,
            kind,
        }
    }

    pub fn message(&self, project: &Project) -> String {
        match &self.kind {
            TypeErrorKind::TypeMismatch { expected, actual } => format!(
                "Incompatible type '{}', expected '{}'",
                actual.display(project),
                expected.display(project)
            ),
            TypeErrorKind::InvalidUnpacking { ty } => {
                format!("Invalid unpacking. Expected {}", ty.display(project))
            }
            TypeErrorKind::AbilitiesMismatch { ty, missing } => format!(
                "The type '{}' does not have required abilities: {}",
                ty.display(project),
                ability_list(*missing)
            ),
            TypeErrorKind::UnsupportedBinaryOp { op, ty } => format!(
                "Invalid argument to '{}': expected integer type, but found '{}'",
                op.as_str(),
                ty.display(project)
            ),
            TypeErrorKind::InvalidDereference { ty } => format!(
                "Invalid dereference. Expected '&_' but found '{}'",
                ty.display(project)
            ),
        }
    }
}

fn ability_list(abilities: Abilities) -> String {
    [
        (Abilities::COPY, "copy"),
        (Abilities::DROP, "drop"),
        (Abilities::STORE, "store"),
        (Abilities::KEY, "key"),
    ]
    .iter()
    .filter(|(flag, _)| abilities.contains(*flag))
    .map(|&(_, name)| name)
    .collect::<Vec<_>>()
    .join(", ")
}
