//! Syntax node kinds.
//!
//! Every node of a [`SyntaxTree`](crate::SyntaxTree) carries one
//! [`NodeKind`]. The set is closed: resolution and inference match on it
//! exhaustively, so adding a kind forces every dispatch point to decide what
//! to do with it.
//!
//! Children are referenced by [`NodeId`] and must be allocated before their
//! parent. [`NodeKind::children`] lists them in source order; parent links
//! are derived from it once the tree is finished.

mod expr;
mod items;
mod pat;
mod path;

pub use expr::{
    BinaryOp, Block, ExprKind, IntSuffix, Lit, MatchArm, QuantKind, SpecPredicate, StmtKind,
    StructLitField,
};
pub use items::{
    Abilities, AttrItem, Attributes, ConstDecl, EnumDecl, FieldDecl, File, FriendDecl,
    FunctionDecl, FunctionKind, FunctionModifiers, GlobalVarDecl, ItemSpecDecl, ItemSpecTarget,
    ModuleDecl, ModuleSpecDecl, ParamDecl, SchemaDecl, SchemaFieldDecl, StructDecl,
    TypeParamDecl, UseSpeck, UseStmt, VariantDecl, Visibility,
};
pub use pat::{PatField, PatKind};
pub use path::{Path, PathSegment, TypeExprKind};

use crate::{Name, NodeId};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    File(File),
    Module(ModuleDecl),
    ModuleSpec(ModuleSpecDecl),
    UseStmt(UseStmt),
    UseSpeck(UseSpeck),
    Friend(FriendDecl),
    Struct(StructDecl),
    Enum(EnumDecl),
    Variant(VariantDecl),
    Field(FieldDecl),
    Function(FunctionDecl),
    Param(ParamDecl),
    TypeParam(TypeParamDecl),
    Const(ConstDecl),
    Schema(SchemaDecl),
    SchemaField(SchemaFieldDecl),
    GlobalVar(GlobalVarDecl),
    ItemSpec(ItemSpecDecl),
    Attr(AttrItem),
    Block(Block),
    Stmt(StmtKind),
    Expr(ExprKind),
    Pat(PatKind),
    PatField(PatField),
    StructLitField(StructLitField),
    MatchArm(MatchArm),
    Path(Path),
    Type(TypeExprKind),
}

impl NodeKind {
    /// Short human-readable kind name for diagnostics.
    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::File(_) => "file",
            NodeKind::Module(_) => "module",
            NodeKind::ModuleSpec(_) => "module spec",
            NodeKind::UseStmt(_) => "use statement",
            NodeKind::UseSpeck(_) => "use speck",
            NodeKind::Friend(_) => "friend declaration",
            NodeKind::Struct(_) => "struct",
            NodeKind::Enum(_) => "enum",
            NodeKind::Variant(_) => "enum variant",
            NodeKind::Field(_) => "field",
            NodeKind::Function(_) => "function",
            NodeKind::Param(_) => "parameter",
            NodeKind::TypeParam(_) => "type parameter",
            NodeKind::Const(_) => "constant",
            NodeKind::Schema(_) => "schema",
            NodeKind::SchemaField(_) => "schema field",
            NodeKind::GlobalVar(_) => "global variable",
            NodeKind::ItemSpec(_) => "item spec",
            NodeKind::Attr(_) => "attribute",
            NodeKind::Block(_) => "block",
            NodeKind::Stmt(_) => "statement",
            NodeKind::Expr(_) => "expression",
            NodeKind::Pat(_) => "pattern",
            NodeKind::PatField(_) => "pattern field",
            NodeKind::StructLitField(_) => "struct literal field",
            NodeKind::MatchArm(_) => "match arm",
            NodeKind::Path(_) => "path",
            NodeKind::Type(_) => "type",
        }
    }

    /// Declared name for named declarations.
    pub fn decl_name(&self) -> Option<Name> {
        match self {
            NodeKind::Module(m) => Some(m.name),
            NodeKind::Struct(s) => Some(s.name),
            NodeKind::Enum(e) => Some(e.name),
            NodeKind::Variant(v) => Some(v.name),
            NodeKind::Field(f) => Some(f.name),
            NodeKind::Function(f) => Some(f.name),
            NodeKind::TypeParam(t) => Some(t.name),
            NodeKind::Const(c) => Some(c.name),
            NodeKind::Schema(s) => Some(s.name),
            NodeKind::SchemaField(f) => Some(f.name),
            NodeKind::GlobalVar(g) => Some(g.name),
            NodeKind::Pat(PatKind::Binding { name }) => Some(*name),
            NodeKind::PatField(f) => Some(f.name),
            _ => None,
        }
    }

    /// Direct children in source order.
    pub fn children(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.push_children(&mut out);
        out
    }

    fn push_children(&self, out: &mut Vec<NodeId>) {
        match self {
            NodeKind::File(file) => {
                out.extend(&file.modules);
                out.extend(&file.module_specs);
            }
            NodeKind::Module(module) => {
                out.extend(&module.attrs.items);
                out.extend(&module.uses);
                out.extend(&module.friends);
                out.extend(&module.items);
            }
            NodeKind::ModuleSpec(spec) => {
                out.extend(&spec.uses);
                out.extend(&spec.items);
            }
            NodeKind::UseStmt(stmt) => {
                out.extend(&stmt.attrs.items);
                out.push(stmt.speck);
            }
            NodeKind::UseSpeck(speck) => {
                out.push(speck.path);
                out.extend(&speck.group);
            }
            NodeKind::Friend(friend) => out.push(friend.path),
            NodeKind::Struct(s) => {
                out.extend(&s.attrs.items);
                out.extend(&s.type_params);
                out.extend(&s.fields);
            }
            NodeKind::Enum(e) => {
                out.extend(&e.attrs.items);
                out.extend(&e.type_params);
                out.extend(&e.variants);
            }
            NodeKind::Variant(v) => out.extend(&v.fields),
            NodeKind::Field(f) => out.push(f.ty),
            NodeKind::Function(f) => {
                out.extend(&f.attrs.items);
                out.extend(&f.type_params);
                out.extend(&f.params);
                out.extend(f.ret);
                out.extend(f.body);
            }
            NodeKind::Param(p) => {
                out.push(p.pat);
                out.extend(p.ty);
            }
            NodeKind::TypeParam(_) => {}
            NodeKind::Const(c) => {
                out.extend(&c.attrs.items);
                out.push(c.ty);
                out.extend(c.init);
            }
            NodeKind::Schema(s) => {
                out.extend(&s.type_params);
                out.push(s.body);
            }
            NodeKind::SchemaField(f) => out.push(f.ty),
            NodeKind::GlobalVar(g) => {
                out.extend(&g.type_params);
                out.push(g.ty);
            }
            NodeKind::ItemSpec(spec) => out.push(spec.body),
            NodeKind::Attr(attr) => {
                out.extend(attr.value);
                out.extend(&attr.nested);
            }
            NodeKind::Block(block) => {
                out.extend(&block.stmts);
                out.extend(block.tail);
            }
            NodeKind::Stmt(stmt) => match stmt {
                StmtKind::Let { pat, ty, init } => {
                    out.push(*pat);
                    out.extend(*ty);
                    out.extend(*init);
                }
                StmtKind::Expr(expr) | StmtKind::Spec { expr, .. } => out.push(*expr),
            },
            NodeKind::Expr(expr) => push_expr_children(expr, out),
            NodeKind::Pat(pat) => match pat {
                PatKind::Binding { .. } | PatKind::Wild | PatKind::Unit => {}
                PatKind::Tuple(items) => out.extend(items),
                PatKind::Struct { path, fields, .. } => {
                    out.push(*path);
                    out.extend(fields);
                }
                PatKind::Path(path) => out.push(*path),
            },
            NodeKind::PatField(field) => out.push(field.pat),
            NodeKind::StructLitField(field) => out.push(field.expr),
            NodeKind::MatchArm(arm) => {
                out.push(arm.pat);
                out.extend(arm.guard);
                out.push(arm.body);
            }
            NodeKind::Path(path) => {
                out.extend(path.qualifier);
                out.extend(&path.type_args);
            }
            NodeKind::Type(ty) => match ty {
                TypeExprKind::Path(path) => out.push(*path),
                TypeExprKind::Ref { inner, .. } => out.push(*inner),
                TypeExprKind::Tuple(items) => out.extend(items),
                TypeExprKind::Unit => {}
                TypeExprKind::Lambda { params, ret } => {
                    out.extend(params);
                    out.extend(*ret);
                }
            },
        }
    }
}

fn push_expr_children(expr: &ExprKind, out: &mut Vec<NodeId>) {
    match expr {
        ExprKind::Lit(_) | ExprKind::Break | ExprKind::Continue | ExprKind::Unit => {}
        ExprKind::Path(path) => out.push(*path),
        ExprKind::Call { path, args } => {
            out.push(*path);
            out.extend(args);
        }
        ExprKind::MethodCall {
            receiver,
            type_args,
            args,
            ..
        } => {
            out.push(*receiver);
            out.extend(type_args);
            out.extend(args);
        }
        ExprKind::Field { receiver, .. } => out.push(*receiver),
        ExprKind::StructLit { path, fields } => {
            out.push(*path);
            out.extend(fields);
        }
        ExprKind::Vector { elem_ty, elems } => {
            out.extend(*elem_ty);
            out.extend(elems);
        }
        ExprKind::Borrow { expr, .. }
        | ExprKind::Deref(expr)
        | ExprKind::Not(expr)
        | ExprKind::Copy(expr)
        | ExprKind::Move(expr)
        | ExprKind::Block(expr)
        | ExprKind::Abort(expr) => out.push(*expr),
        ExprKind::Binary { lhs, rhs, .. } | ExprKind::Assign { lhs, rhs } => {
            out.push(*lhs);
            out.push(*rhs);
        }
        ExprKind::If {
            cond,
            then_branch,
            else_branch,
        } => {
            out.push(*cond);
            out.push(*then_branch);
            out.extend(*else_branch);
        }
        ExprKind::While { cond, body } => {
            out.push(*cond);
            out.push(*body);
        }
        ExprKind::Loop { body } => out.push(*body),
        ExprKind::Return(value) => out.extend(*value),
        ExprKind::Tuple(items) => out.extend(items),
        ExprKind::Cast { expr, ty } | ExprKind::Annotated { expr, ty } => {
            out.push(*expr);
            out.push(*ty);
        }
        ExprKind::Index { base, index } => {
            out.push(*base);
            out.push(*index);
        }
        ExprKind::Lambda { params, body } => {
            out.extend(params);
            out.push(*body);
        }
        ExprKind::Match { scrutinee, arms } => {
            out.push(*scrutinee);
            out.extend(arms);
        }
        ExprKind::Quant {
            bindings,
            where_clause,
            body,
            ..
        } => {
            out.extend(bindings);
            out.extend(*where_clause);
            out.push(*body);
        }
    }
}
