//! Blocks, statements and expressions.

use crate::{AddressRef, Name, NodeId};

/// `{ stmts; tail }`
///
/// Statement entries are `Stmt`, `UseStmt` or `SchemaField` nodes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Block {
    pub stmts: Vec<NodeId>,
    pub tail: Option<NodeId>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StmtKind {
    Let {
        pat: NodeId,
        ty: Option<NodeId>,
        init: Option<NodeId>,
    },
    Expr(NodeId),
    /// `requires x > 0;` and friends inside spec blocks.
    Spec { kind: SpecPredicate, expr: NodeId },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SpecPredicate {
    Assert,
    Assume,
    Requires,
    Ensures,
    AbortsIf,
    Invariant,
}

/// Explicit integer literal suffix: `1u8`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum IntSuffix {
    U8,
    U16,
    U32,
    U64,
    U128,
    U256,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Lit {
    Int { value: u128, suffix: Option<IntSuffix> },
    Bool(bool),
    /// `@0x1`, `@std`
    Address(AddressRef),
    /// `b"bytes"` and `x"0f"`
    ByteString,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
    And,
    Or,
    /// `==>` in specs.
    Implies,
    /// `a..b` in specs.
    Range,
}

impl BinaryOp {
    pub fn is_arithmetic(self) -> bool {
        matches!(
            self,
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod
        )
    }

    pub fn is_bitwise(self) -> bool {
        matches!(self, BinaryOp::BitAnd | BinaryOp::BitOr | BinaryOp::BitXor)
    }

    pub fn is_shift(self) -> bool {
        matches!(self, BinaryOp::Shl | BinaryOp::Shr)
    }

    pub fn is_ordering(self) -> bool {
        matches!(self, BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge)
    }

    pub fn is_equality(self) -> bool {
        matches!(self, BinaryOp::Eq | BinaryOp::Ne)
    }

    pub fn is_logic(self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or | BinaryOp::Implies)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::Implies => "==>",
            BinaryOp::Range => "..",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum QuantKind {
    Forall,
    Exists,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExprKind {
    Lit(Lit),
    /// Reference to a local, constant, function or unit variant.
    Path(NodeId),
    /// `f(args)` where `f` is a function path or a callable-typed local.
    Call {
        path: NodeId,
        args: Vec<NodeId>,
    },
    MethodCall {
        receiver: NodeId,
        name: Name,
        type_args: Vec<NodeId>,
        args: Vec<NodeId>,
    },
    Field {
        receiver: NodeId,
        name: Name,
    },
    StructLit {
        path: NodeId,
        fields: Vec<NodeId>,
    },
    /// `vector[a, b]`, optionally `vector<T>[...]`.
    Vector {
        elem_ty: Option<NodeId>,
        elems: Vec<NodeId>,
    },
    Borrow {
        mutable: bool,
        expr: NodeId,
    },
    Deref(NodeId),
    Not(NodeId),
    Copy(NodeId),
    Move(NodeId),
    Binary {
        op: BinaryOp,
        lhs: NodeId,
        rhs: NodeId,
    },
    Assign {
        lhs: NodeId,
        rhs: NodeId,
    },
    Block(NodeId),
    If {
        cond: NodeId,
        then_branch: NodeId,
        else_branch: Option<NodeId>,
    },
    While {
        cond: NodeId,
        body: NodeId,
    },
    Loop {
        body: NodeId,
    },
    Return(Option<NodeId>),
    Abort(NodeId),
    Break,
    Continue,
    Tuple(Vec<NodeId>),
    Unit,
    /// `(e as u64)`
    Cast {
        expr: NodeId,
        ty: NodeId,
    },
    /// `(e: T)`
    Annotated {
        expr: NodeId,
        ty: NodeId,
    },
    Index {
        base: NodeId,
        index: NodeId,
    },
    /// `|a, b: u8| body`; parameters are `Param` nodes.
    Lambda {
        params: Vec<NodeId>,
        body: NodeId,
    },
    Match {
        scrutinee: NodeId,
        arms: Vec<NodeId>,
    },
    /// `forall x: u64 where x > 0: body`; bindings are `Param` nodes.
    Quant {
        kind: QuantKind,
        bindings: Vec<NodeId>,
        where_clause: Option<NodeId>,
        body: NodeId,
    },
}

/// `name: expr` inside a struct literal.
///
/// Shorthand `S { x }` is recorded with `shorthand` set and a synthesized
/// path expression `x` as `expr`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructLitField {
    pub name: Name,
    pub expr: NodeId,
    pub shorthand: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchArm {
    pub pat: NodeId,
    pub guard: Option<NodeId>,
    pub body: NodeId,
}
