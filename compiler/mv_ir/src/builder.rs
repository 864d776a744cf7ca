//! Programmatic construction of syntax trees.
//!
//! The parser lives outside this workspace; `TreeBuilder` is how it (and
//! every test) hands trees to the resolver and the type checker. Methods take
//! `&self` so that nested calls read like the source they stand for:
//!
//! ```ignore
//! let b = TreeBuilder::new(StringInterner::shared());
//! let body = b.block(vec![], Some(b.call("get", vec![b.borrow(b.path_expr("s"))])));
//! ```
//!
//! Types and paths are given as strings in surface syntax (`"&mut vector<u8>"`,
//! `"0x1::coin::Coin"`) and parsed by a small recursive-descent reader.

use std::cell::RefCell;

use crate::ast::{
    Abilities, AttrItem, Attributes, BinaryOp, Block, ConstDecl, EnumDecl, ExprKind, FieldDecl,
    File, FriendDecl, FunctionDecl, FunctionKind, FunctionModifiers, GlobalVarDecl, IntSuffix,
    ItemSpecDecl, ItemSpecTarget, Lit, MatchArm, ModuleDecl, ModuleSpecDecl, NodeKind,
    ParamDecl, PatField, PatKind, Path, PathSegment, QuantKind, SchemaDecl, SchemaFieldDecl,
    SpecPredicate, StmtKind, StructDecl, StructLitField, TypeExprKind, TypeParamDecl,
    UseSpeck, UseStmt, VariantDecl, Visibility,
};
use crate::tree::Node;
use crate::{AddressRef, Name, NodeId, NumericAddress, PackageId, SharedInterner, Span, SyntaxTree};

/// Allocates nodes bottom-up and freezes them into a [`SyntaxTree`].
pub struct TreeBuilder {
    interner: SharedInterner,
    nodes: RefCell<Vec<Node>>,
}

impl TreeBuilder {
    pub fn new(interner: SharedInterner) -> Self {
        TreeBuilder {
            interner,
            nodes: RefCell::new(Vec::new()),
        }
    }

    pub fn interner(&self) -> &SharedInterner {
        &self.interner
    }

    #[inline]
    pub fn name(&self, text: &str) -> Name {
        self.interner.intern(text)
    }

    pub fn alloc(&self, kind: NodeKind) -> NodeId {
        self.alloc_spanned(kind, Span::DUMMY)
    }

    /// # Panics
    /// Panics if more than `u32::MAX - 1` nodes are allocated.
    pub fn alloc_spanned(&self, kind: NodeKind, span: Span) -> NodeId {
        let mut nodes = self.nodes.borrow_mut();
        let raw = u32::try_from(nodes.len())
            .ok()
            .filter(|&raw| raw != u32::MAX)
            .unwrap_or_else(|| panic!("syntax tree exceeded {} nodes", u32::MAX));
        nodes.push(Node {
            kind,
            span,
            parent: None,
        });
        NodeId::new(raw)
    }

    pub fn finish(self) -> SyntaxTree {
        SyntaxTree::from_nodes(self.nodes.into_inner())
    }

    // ==================== Paths and types ====================

    fn segment(&self, text: &str) -> PathSegment {
        match NumericAddress::parse(text) {
            Some(addr) => PathSegment::Address(AddressRef::Value(addr)),
            None => PathSegment::Name(self.name(text)),
        }
    }

    /// `a::b::c` as nested `Path` nodes; returns the outermost one.
    pub fn path(&self, text: &str) -> NodeId {
        self.path_with_type_args(text, Vec::new())
    }

    /// Like [`path`](Self::path), with type arguments on the last segment.
    pub fn path_with_type_args(&self, text: &str, type_args: Vec<NodeId>) -> NodeId {
        let segments: Vec<&str> = text.split("::").map(str::trim).collect();
        let last = segments.len() - 1;
        let mut qualifier = None;
        let mut type_args = Some(type_args);
        for (i, seg) in segments.into_iter().enumerate() {
            let args = if i == last {
                type_args.take().unwrap_or_default()
            } else {
                Vec::new()
            };
            qualifier = Some(self.alloc(NodeKind::Path(Path {
                qualifier,
                segment: self.segment(seg),
                type_args: args,
            })));
        }
        qualifier.unwrap_or(NodeId::INVALID)
    }

    /// Parse a type in surface syntax.
    ///
    /// # Panics
    /// Panics on malformed input.
    pub fn ty(&self, text: &str) -> NodeId {
        let mut parser = TypeParser::new(self, text);
        let ty = parser.parse_type();
        if !parser.at_end() {
            panic!("malformed type `{text}`");
        }
        ty
    }

    fn opt_ty(&self, text: Option<&str>) -> Option<NodeId> {
        text.map(|t| self.ty(t))
    }

    // ==================== Expressions ====================

    pub fn expr(&self, kind: ExprKind) -> NodeId {
        self.alloc(NodeKind::Expr(kind))
    }

    pub fn int(&self, value: u128) -> NodeId {
        self.expr(ExprKind::Lit(Lit::Int {
            value,
            suffix: None,
        }))
    }

    pub fn int_suffixed(&self, value: u128, suffix: IntSuffix) -> NodeId {
        self.expr(ExprKind::Lit(Lit::Int {
            value,
            suffix: Some(suffix),
        }))
    }

    pub fn bool_lit(&self, value: bool) -> NodeId {
        self.expr(ExprKind::Lit(Lit::Bool(value)))
    }

    /// `@0x1` or `@std`.
    pub fn address_lit(&self, text: &str) -> NodeId {
        let addr = match NumericAddress::parse(text) {
            Some(value) => AddressRef::Value(value),
            None => AddressRef::Named(self.name(text)),
        };
        self.expr(ExprKind::Lit(Lit::Address(addr)))
    }

    pub fn byte_string(&self) -> NodeId {
        self.expr(ExprKind::Lit(Lit::ByteString))
    }

    pub fn path_expr(&self, text: &str) -> NodeId {
        let path = self.path(text);
        self.expr(ExprKind::Path(path))
    }

    pub fn call(&self, callee: &str, args: Vec<NodeId>) -> NodeId {
        let path = self.path(callee);
        self.expr(ExprKind::Call { path, args })
    }

    /// Call with explicit type arguments: `f<u8>(x)`.
    pub fn call_generic(&self, callee: &str, type_args: &[&str], args: Vec<NodeId>) -> NodeId {
        let type_args = type_args.iter().map(|t| self.ty(t)).collect();
        let path = self.path_with_type_args(callee, type_args);
        self.expr(ExprKind::Call { path, args })
    }

    pub fn method_call(&self, receiver: NodeId, name: &str, args: Vec<NodeId>) -> NodeId {
        self.expr(ExprKind::MethodCall {
            receiver,
            name: self.name(name),
            type_args: Vec::new(),
            args,
        })
    }

    pub fn field(&self, receiver: NodeId, name: &str) -> NodeId {
        self.expr(ExprKind::Field {
            receiver,
            name: self.name(name),
        })
    }

    /// Struct literal; a `None` value makes a shorthand field.
    pub fn struct_lit(&self, path: &str, fields: Vec<(&str, Option<NodeId>)>) -> NodeId {
        let path = self.path(path);
        let fields = fields
            .into_iter()
            .map(|(name, expr)| {
                let shorthand = expr.is_none();
                let expr = expr.unwrap_or_else(|| self.path_expr(name));
                self.alloc(NodeKind::StructLitField(StructLitField {
                    name: self.name(name),
                    expr,
                    shorthand,
                }))
            })
            .collect();
        self.expr(ExprKind::StructLit { path, fields })
    }

    pub fn vector_lit(&self, elem_ty: Option<&str>, elems: Vec<NodeId>) -> NodeId {
        let elem_ty = self.opt_ty(elem_ty);
        self.expr(ExprKind::Vector { elem_ty, elems })
    }

    pub fn borrow(&self, expr: NodeId) -> NodeId {
        self.expr(ExprKind::Borrow {
            mutable: false,
            expr,
        })
    }

    pub fn borrow_mut(&self, expr: NodeId) -> NodeId {
        self.expr(ExprKind::Borrow {
            mutable: true,
            expr,
        })
    }

    pub fn deref(&self, expr: NodeId) -> NodeId {
        self.expr(ExprKind::Deref(expr))
    }

    pub fn not(&self, expr: NodeId) -> NodeId {
        self.expr(ExprKind::Not(expr))
    }

    pub fn binary(&self, op: BinaryOp, lhs: NodeId, rhs: NodeId) -> NodeId {
        self.expr(ExprKind::Binary { op, lhs, rhs })
    }

    pub fn assign(&self, lhs: NodeId, rhs: NodeId) -> NodeId {
        self.expr(ExprKind::Assign { lhs, rhs })
    }

    pub fn block_expr(&self, stmts: Vec<NodeId>, tail: Option<NodeId>) -> NodeId {
        let block = self.block(stmts, tail);
        self.expr(ExprKind::Block(block))
    }

    pub fn if_(&self, cond: NodeId, then_branch: NodeId, else_branch: Option<NodeId>) -> NodeId {
        self.expr(ExprKind::If {
            cond,
            then_branch,
            else_branch,
        })
    }

    pub fn while_(&self, cond: NodeId, body: NodeId) -> NodeId {
        self.expr(ExprKind::While { cond, body })
    }

    pub fn loop_(&self, body: NodeId) -> NodeId {
        self.expr(ExprKind::Loop { body })
    }

    pub fn ret(&self, value: Option<NodeId>) -> NodeId {
        self.expr(ExprKind::Return(value))
    }

    pub fn abort(&self, code: NodeId) -> NodeId {
        self.expr(ExprKind::Abort(code))
    }

    pub fn break_(&self) -> NodeId {
        self.expr(ExprKind::Break)
    }

    pub fn continue_(&self) -> NodeId {
        self.expr(ExprKind::Continue)
    }

    pub fn tuple(&self, items: Vec<NodeId>) -> NodeId {
        self.expr(ExprKind::Tuple(items))
    }

    pub fn unit(&self) -> NodeId {
        self.expr(ExprKind::Unit)
    }

    pub fn cast(&self, expr: NodeId, ty: &str) -> NodeId {
        let ty = self.ty(ty);
        self.expr(ExprKind::Cast { expr, ty })
    }

    pub fn annotated(&self, expr: NodeId, ty: &str) -> NodeId {
        let ty = self.ty(ty);
        self.expr(ExprKind::Annotated { expr, ty })
    }

    pub fn index(&self, base: NodeId, index: NodeId) -> NodeId {
        self.expr(ExprKind::Index { base, index })
    }

    /// `|a, b: u8| body`
    pub fn lambda(&self, params: &[(&str, Option<&str>)], body: NodeId) -> NodeId {
        let params = params
            .iter()
            .map(|&(name, ty)| {
                let pat = self.bind(name);
                let ty = self.opt_ty(ty);
                self.alloc(NodeKind::Param(ParamDecl { pat, ty }))
            })
            .collect();
        self.expr(ExprKind::Lambda { params, body })
    }

    pub fn match_(&self, scrutinee: NodeId, arms: Vec<NodeId>) -> NodeId {
        self.expr(ExprKind::Match { scrutinee, arms })
    }

    pub fn arm(&self, pat: NodeId, guard: Option<NodeId>, body: NodeId) -> NodeId {
        self.alloc(NodeKind::MatchArm(MatchArm { pat, guard, body }))
    }

    /// Spec quantifier over typed bindings.
    pub fn quant(
        &self,
        kind: QuantKind,
        bindings: &[(&str, &str)],
        where_clause: Option<NodeId>,
        body: NodeId,
    ) -> NodeId {
        let bindings = bindings
            .iter()
            .map(|&(name, ty)| self.param_node(name, ty))
            .collect();
        self.expr(ExprKind::Quant {
            kind,
            bindings,
            where_clause,
            body,
        })
    }

    // ==================== Statements ====================

    pub fn block(&self, stmts: Vec<NodeId>, tail: Option<NodeId>) -> NodeId {
        self.alloc(NodeKind::Block(Block { stmts, tail }))
    }

    pub fn let_(&self, pat: NodeId, ty: Option<&str>, init: Option<NodeId>) -> NodeId {
        let ty = self.opt_ty(ty);
        self.alloc(NodeKind::Stmt(StmtKind::Let { pat, ty, init }))
    }

    /// `let name = init;`
    pub fn let_bind(&self, name: &str, init: NodeId) -> NodeId {
        let pat = self.bind(name);
        self.let_(pat, None, Some(init))
    }

    pub fn expr_stmt(&self, expr: NodeId) -> NodeId {
        self.alloc(NodeKind::Stmt(StmtKind::Expr(expr)))
    }

    pub fn spec_stmt(&self, kind: SpecPredicate, expr: NodeId) -> NodeId {
        self.alloc(NodeKind::Stmt(StmtKind::Spec { kind, expr }))
    }

    // ==================== Patterns ====================

    pub fn bind(&self, name: &str) -> NodeId {
        self.alloc(NodeKind::Pat(PatKind::Binding {
            name: self.name(name),
        }))
    }

    pub fn wild(&self) -> NodeId {
        self.alloc(NodeKind::Pat(PatKind::Wild))
    }

    pub fn pat_unit(&self) -> NodeId {
        self.alloc(NodeKind::Pat(PatKind::Unit))
    }

    pub fn pat_tuple(&self, items: Vec<NodeId>) -> NodeId {
        self.alloc(NodeKind::Pat(PatKind::Tuple(items)))
    }

    /// Struct pattern; a `None` sub-pattern makes a shorthand field.
    pub fn pat_struct(&self, path: &str, fields: Vec<(&str, Option<NodeId>)>, has_rest: bool) -> NodeId {
        let path = self.path(path);
        let fields = fields
            .into_iter()
            .map(|(name, pat)| {
                let shorthand = pat.is_none();
                let pat = pat.unwrap_or_else(|| self.bind(name));
                self.alloc(NodeKind::PatField(PatField {
                    name: self.name(name),
                    pat,
                    shorthand,
                }))
            })
            .collect();
        self.alloc(NodeKind::Pat(PatKind::Struct {
            path,
            fields,
            has_rest,
        }))
    }

    pub fn pat_path(&self, path: &str) -> NodeId {
        let path = self.path(path);
        self.alloc(NodeKind::Pat(PatKind::Path(path)))
    }

    // ==================== Items ====================

    fn param_node(&self, name: &str, ty: &str) -> NodeId {
        let pat = self.bind(name);
        let ty = Some(self.ty(ty));
        self.alloc(NodeKind::Param(ParamDecl { pat, ty }))
    }

    fn type_param_node(&self, name: &str, abilities: &str, phantom: bool) -> NodeId {
        self.alloc(NodeKind::TypeParam(TypeParamDecl {
            name: self.name(name),
            abilities: Abilities::parse_list(abilities),
            phantom,
        }))
    }

    fn field_node(&self, name: &str, ty: &str) -> NodeId {
        let ty = self.ty(ty);
        self.alloc(NodeKind::Field(FieldDecl {
            name: self.name(name),
            ty,
        }))
    }

    pub fn function(&self, name: &str) -> FunctionBuilder<'_> {
        FunctionBuilder {
            b: self,
            decl: FunctionDecl {
                name: self.name(name),
                kind: FunctionKind::Regular,
                visibility: Visibility::Private,
                modifiers: FunctionModifiers::empty(),
                type_params: Vec::new(),
                params: Vec::new(),
                ret: None,
                body: None,
                attrs: Attributes::default(),
            },
        }
    }

    pub fn struct_(&self, name: &str) -> StructBuilder<'_> {
        StructBuilder {
            b: self,
            decl: StructDecl {
                name: self.name(name),
                abilities: Abilities::empty(),
                type_params: Vec::new(),
                fields: Vec::new(),
                attrs: Attributes::default(),
            },
        }
    }

    pub fn enum_(&self, name: &str) -> EnumBuilder<'_> {
        EnumBuilder {
            b: self,
            decl: EnumDecl {
                name: self.name(name),
                abilities: Abilities::empty(),
                type_params: Vec::new(),
                variants: Vec::new(),
                attrs: Attributes::default(),
            },
        }
    }

    pub fn const_(&self, name: &str, ty: &str, init: Option<NodeId>) -> NodeId {
        let ty = self.ty(ty);
        self.alloc(NodeKind::Const(ConstDecl {
            name: self.name(name),
            ty,
            init,
            attrs: Attributes::default(),
        }))
    }

    /// Schema whose body holds `fields` followed by `stmts`.
    pub fn schema(&self, name: &str, type_params: &[&str], fields: &[(&str, &str)], stmts: Vec<NodeId>) -> NodeId {
        let type_params = type_params
            .iter()
            .map(|tp| self.type_param_node(tp, "", false))
            .collect();
        let mut body_stmts: Vec<NodeId> = fields
            .iter()
            .map(|&(field, ty)| {
                let ty = self.ty(ty);
                self.alloc(NodeKind::SchemaField(SchemaFieldDecl {
                    name: self.name(field),
                    ty,
                }))
            })
            .collect();
        body_stmts.extend(stmts);
        let body = self.block(body_stmts, None);
        self.alloc(NodeKind::Schema(SchemaDecl {
            name: self.name(name),
            type_params,
            body,
        }))
    }

    pub fn global(&self, name: &str, ty: &str) -> NodeId {
        let ty = self.ty(ty);
        self.alloc(NodeKind::GlobalVar(GlobalVarDecl {
            name: self.name(name),
            type_params: Vec::new(),
            ty,
        }))
    }

    /// `spec target { body }`; `None` targets the module.
    pub fn item_spec(&self, target: Option<&str>, body: NodeId) -> NodeId {
        let target = match target {
            Some(name) => ItemSpecTarget::Item(self.name(name)),
            None => ItemSpecTarget::Module,
        };
        self.alloc(NodeKind::ItemSpec(ItemSpecDecl { target, body }))
    }

    pub fn attr(&self, name: &str, value: Option<NodeId>) -> NodeId {
        self.alloc(NodeKind::Attr(AttrItem {
            name: self.name(name),
            value,
            nested: Vec::new(),
        }))
    }

    fn speck(&self, path: &str, alias: Option<&str>, group: Vec<NodeId>) -> NodeId {
        let path = self.path(path);
        self.alloc(NodeKind::UseSpeck(UseSpeck {
            path,
            alias: alias.map(|a| self.name(a)),
            group,
        }))
    }

    fn use_stmt(&self, speck: NodeId, attrs: Attributes) -> NodeId {
        self.alloc(NodeKind::UseStmt(UseStmt { speck, attrs }))
    }

    /// `use path;`
    pub fn use_(&self, path: &str) -> NodeId {
        let speck = self.speck(path, None, Vec::new());
        self.use_stmt(speck, Attributes::default())
    }

    /// `use path as alias;`
    pub fn use_as(&self, path: &str, alias: &str) -> NodeId {
        let speck = self.speck(path, Some(alias), Vec::new());
        self.use_stmt(speck, Attributes::default())
    }

    /// `use path::{a, b as c};`
    pub fn use_group(&self, path: &str, members: &[(&str, Option<&str>)]) -> NodeId {
        let group = members
            .iter()
            .map(|&(member, alias)| self.speck(member, alias, Vec::new()))
            .collect();
        let speck = self.speck(path, None, group);
        self.use_stmt(speck, Attributes::default())
    }

    /// `#[test_only] use path;`
    pub fn use_test_only(&self, path: &str) -> NodeId {
        let speck = self.speck(path, None, Vec::new());
        let attrs = Attributes {
            test_only: true,
            ..Attributes::default()
        };
        self.use_stmt(speck, attrs)
    }

    pub fn friend(&self, path: &str) -> NodeId {
        let path = self.path(path);
        self.alloc(NodeKind::Friend(FriendDecl { path }))
    }

    fn address_ref(&self, text: &str) -> Option<AddressRef> {
        if text.is_empty() {
            return None;
        }
        Some(match NumericAddress::parse(text) {
            Some(value) => AddressRef::Value(value),
            None => AddressRef::Named(self.name(text)),
        })
    }

    /// `module address::name { ... }`; an empty address leaves it unset.
    pub fn module(&self, address: &str, name: &str) -> ModuleBuilder<'_> {
        ModuleBuilder {
            b: self,
            decl: ModuleDecl {
                address: self.address_ref(address),
                name: self.name(name),
                uses: Vec::new(),
                friends: Vec::new(),
                items: Vec::new(),
                attrs: Attributes::default(),
            },
        }
    }

    pub fn module_spec(&self, address: &str, module: &str) -> ModuleSpecBuilder<'_> {
        ModuleSpecBuilder {
            b: self,
            decl: ModuleSpecDecl {
                address: self.address_ref(address),
                module: self.name(module),
                uses: Vec::new(),
                items: Vec::new(),
            },
        }
    }

    pub fn file(&self, package: PackageId, modules: Vec<NodeId>, module_specs: Vec<NodeId>) -> NodeId {
        self.alloc(NodeKind::File(File {
            package,
            modules,
            module_specs,
        }))
    }
}

/// Accumulates a [`FunctionDecl`].
pub struct FunctionBuilder<'b> {
    b: &'b TreeBuilder,
    decl: FunctionDecl,
}

impl FunctionBuilder<'_> {
    #[must_use]
    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.decl.visibility = visibility;
        self
    }

    #[must_use]
    pub fn public(self) -> Self {
        self.visibility(Visibility::Public)
    }

    #[must_use]
    pub fn kind(mut self, kind: FunctionKind) -> Self {
        self.decl.kind = kind;
        self
    }

    #[must_use]
    pub fn modifier(mut self, modifier: FunctionModifiers) -> Self {
        self.decl.modifiers |= modifier;
        self
    }

    #[must_use]
    pub fn test(mut self) -> Self {
        self.decl.attrs.test = true;
        self
    }

    #[must_use]
    pub fn test_only(mut self) -> Self {
        self.decl.attrs.test_only = true;
        self
    }

    #[must_use]
    pub fn verify_only(mut self) -> Self {
        self.decl.attrs.verify_only = true;
        self
    }

    #[must_use]
    pub fn attr(mut self, attr: NodeId) -> Self {
        self.decl.attrs.items.push(attr);
        self
    }

    #[must_use]
    pub fn type_param(mut self, name: &str, abilities: &str) -> Self {
        let tp = self.b.type_param_node(name, abilities, false);
        self.decl.type_params.push(tp);
        self
    }

    /// Parameter bound to a simple name.
    #[must_use]
    pub fn param(mut self, name: &str, ty: &str) -> Self {
        let param = self.b.param_node(name, ty);
        self.decl.params.push(param);
        self
    }

    /// Parameter with an arbitrary pattern.
    #[must_use]
    pub fn param_pat(mut self, pat: NodeId, ty: &str) -> Self {
        let ty = Some(self.b.ty(ty));
        let param = self.b.alloc(NodeKind::Param(ParamDecl { pat, ty }));
        self.decl.params.push(param);
        self
    }

    #[must_use]
    pub fn ret(mut self, ty: &str) -> Self {
        self.decl.ret = Some(self.b.ty(ty));
        self
    }

    #[must_use]
    pub fn body(mut self, block: NodeId) -> Self {
        self.decl.body = Some(block);
        self
    }

    pub fn build(self) -> NodeId {
        self.b.alloc(NodeKind::Function(self.decl))
    }
}

/// Accumulates a [`StructDecl`].
pub struct StructBuilder<'b> {
    b: &'b TreeBuilder,
    decl: StructDecl,
}

impl StructBuilder<'_> {
    #[must_use]
    pub fn abilities(mut self, abilities: &str) -> Self {
        self.decl.abilities = Abilities::parse_list(abilities);
        self
    }

    #[must_use]
    pub fn type_param(mut self, name: &str, abilities: &str) -> Self {
        let tp = self.b.type_param_node(name, abilities, false);
        self.decl.type_params.push(tp);
        self
    }

    #[must_use]
    pub fn phantom_type_param(mut self, name: &str, abilities: &str) -> Self {
        let tp = self.b.type_param_node(name, abilities, true);
        self.decl.type_params.push(tp);
        self
    }

    #[must_use]
    pub fn field(mut self, name: &str, ty: &str) -> Self {
        let field = self.b.field_node(name, ty);
        self.decl.fields.push(field);
        self
    }

    #[must_use]
    pub fn test_only(mut self) -> Self {
        self.decl.attrs.test_only = true;
        self
    }

    pub fn build(self) -> NodeId {
        self.b.alloc(NodeKind::Struct(self.decl))
    }
}

/// Accumulates an [`EnumDecl`].
pub struct EnumBuilder<'b> {
    b: &'b TreeBuilder,
    decl: EnumDecl,
}

impl EnumBuilder<'_> {
    #[must_use]
    pub fn abilities(mut self, abilities: &str) -> Self {
        self.decl.abilities = Abilities::parse_list(abilities);
        self
    }

    #[must_use]
    pub fn type_param(mut self, name: &str, abilities: &str) -> Self {
        let tp = self.b.type_param_node(name, abilities, false);
        self.decl.type_params.push(tp);
        self
    }

    #[must_use]
    pub fn variant(mut self, name: &str, fields: &[(&str, &str)]) -> Self {
        let fields = fields
            .iter()
            .map(|&(field, ty)| self.b.field_node(field, ty))
            .collect();
        let variant = self.b.alloc(NodeKind::Variant(VariantDecl {
            name: self.b.name(name),
            fields,
        }));
        self.decl.variants.push(variant);
        self
    }

    pub fn build(self) -> NodeId {
        self.b.alloc(NodeKind::Enum(self.decl))
    }
}

/// Accumulates a [`ModuleDecl`].
pub struct ModuleBuilder<'b> {
    b: &'b TreeBuilder,
    decl: ModuleDecl,
}

impl ModuleBuilder<'_> {
    #[must_use]
    pub fn use_(mut self, stmt: NodeId) -> Self {
        self.decl.uses.push(stmt);
        self
    }

    #[must_use]
    pub fn friend(mut self, friend: NodeId) -> Self {
        self.decl.friends.push(friend);
        self
    }

    #[must_use]
    pub fn item(mut self, item: NodeId) -> Self {
        self.decl.items.push(item);
        self
    }

    #[must_use]
    pub fn items(mut self, items: impl IntoIterator<Item = NodeId>) -> Self {
        self.decl.items.extend(items);
        self
    }

    #[must_use]
    pub fn test_only(mut self) -> Self {
        self.decl.attrs.test_only = true;
        self
    }

    pub fn build(self) -> NodeId {
        self.b.alloc(NodeKind::Module(self.decl))
    }
}

/// Accumulates a [`ModuleSpecDecl`].
pub struct ModuleSpecBuilder<'b> {
    b: &'b TreeBuilder,
    decl: ModuleSpecDecl,
}

impl ModuleSpecBuilder<'_> {
    #[must_use]
    pub fn use_(mut self, stmt: NodeId) -> Self {
        self.decl.uses.push(stmt);
        self
    }

    #[must_use]
    pub fn item(mut self, item: NodeId) -> Self {
        self.decl.items.push(item);
        self
    }

    pub fn build(self) -> NodeId {
        self.b.alloc(NodeKind::ModuleSpec(self.decl))
    }
}

// ==================== Type reader ====================

struct TypeParser<'b, 's> {
    b: &'b TreeBuilder,
    text: &'s str,
    tokens: Vec<&'s str>,
    pos: usize,
}

impl<'b, 's> TypeParser<'b, 's> {
    fn new(b: &'b TreeBuilder, text: &'s str) -> Self {
        TypeParser {
            b,
            text,
            tokens: tokenize(text),
            pos: 0,
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn peek(&self) -> Option<&'s str> {
        self.tokens.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<&'s str> {
        let tok = self.peek();
        self.pos += 1;
        tok
    }

    fn eat(&mut self, tok: &str) -> bool {
        if self.peek() == Some(tok) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, tok: &str) {
        if !self.eat(tok) {
            panic!("expected `{tok}` in type `{}`", self.text);
        }
    }

    fn parse_type(&mut self) -> NodeId {
        match self.peek() {
            Some("&") => {
                self.bump();
                let mutable = self.eat("mut");
                let inner = self.parse_type();
                self.b.alloc(NodeKind::Type(TypeExprKind::Ref { mutable, inner }))
            }
            Some("(") => {
                self.bump();
                if self.eat(")") {
                    return self.b.alloc(NodeKind::Type(TypeExprKind::Unit));
                }
                let items = self.parse_list(")");
                self.b.alloc(NodeKind::Type(TypeExprKind::Tuple(items)))
            }
            Some("|") => {
                self.bump();
                let params = if self.eat("|") {
                    Vec::new()
                } else {
                    self.parse_list("|")
                };
                let ret = if self.eat("->") {
                    Some(self.parse_type())
                } else {
                    None
                };
                self.b.alloc(NodeKind::Type(TypeExprKind::Lambda { params, ret }))
            }
            Some(_) => {
                let path = self.parse_path();
                self.b.alloc(NodeKind::Type(TypeExprKind::Path(path)))
            }
            None => panic!("unexpected end of type `{}`", self.text),
        }
    }

    /// Comma separated types up to and including `close`.
    fn parse_list(&mut self, close: &str) -> Vec<NodeId> {
        let mut items = vec![self.parse_type()];
        while self.eat(",") {
            items.push(self.parse_type());
        }
        self.expect(close);
        items
    }

    fn parse_path(&mut self) -> NodeId {
        let mut segments = Vec::new();
        loop {
            match self.bump() {
                Some(seg) if seg.chars().all(|c| c.is_alphanumeric() || c == '_') => {
                    segments.push(seg);
                }
                _ => panic!("expected identifier in type `{}`", self.text),
            }
            if !self.eat("::") {
                break;
            }
        }
        let type_args = if self.eat("<") {
            self.parse_list(">")
        } else {
            Vec::new()
        };
        self.b.path_with_type_args(&segments.join("::"), type_args)
    }
}

fn tokenize(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut rest = text;
    while let Some(ch) = rest.chars().next() {
        if ch.is_whitespace() {
            rest = &rest[ch.len_utf8()..];
            continue;
        }
        let len = if rest.starts_with("::") || rest.starts_with("->") {
            2
        } else if ch.is_alphanumeric() || ch == '_' {
            rest.find(|c: char| !(c.is_alphanumeric() || c == '_'))
                .unwrap_or(rest.len())
        } else {
            ch.len_utf8()
        };
        tokens.push(&rest[..len]);
        rest = &rest[len..];
    }
    tokens
}
